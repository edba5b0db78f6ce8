/*
 * Responsibility
 * - storage traits (one per entity family) both backends implement
 * - gets return Option; absence is the service's signal for NotFound
 */
use async_trait::async_trait;

use crate::model::{Film, Genre, Mpa, User};

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::RepoError;

#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Stores the record and returns it with the assigned id
    /// (any incoming id is ignored).
    async fn add_user(&self, user: User) -> Result<User, RepoError>;

    /// Full-record replace keyed by `user.id`. The caller has already
    /// checked existence.
    async fn update_user(&self, user: User) -> Result<User, RepoError>;

    /// Removes the user together with their likes and both directions of
    /// their friendship edges.
    async fn delete_user(&self, user_id: i64) -> Result<(), RepoError>;

    async fn user_by_id(&self, user_id: i64) -> Result<Option<User>, RepoError>;

    async fn all_users(&self) -> Result<Vec<User>, RepoError>;

    /// Records `(user_id, friend_id)` as unconfirmed, or confirms both
    /// directions when the reverse edge already exists. Idempotent.
    async fn add_friend(&self, user_id: i64, friend_id: i64) -> Result<(), RepoError>;

    /// Deletes `(user_id, friend_id)`; when an edge was actually deleted,
    /// the reverse edge (if any) is downgraded to unconfirmed. Deleting an
    /// absent edge is a no-op.
    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> Result<(), RepoError>;

    /// Users `b` with edges in both directions between `user_id` and `b`,
    /// regardless of status.
    async fn friends(&self, user_id: i64) -> Result<Vec<User>, RepoError>;

    /// Intersection of the two outgoing friend-id sets, any status.
    /// Unordered.
    async fn common_friends(&self, user_id: i64, other_id: i64) -> Result<Vec<User>, RepoError>;
}

#[async_trait]
pub trait FilmStorage: Send + Sync {
    /// Stores the record (genre links included) and returns it with the
    /// assigned id.
    async fn add_film(&self, film: Film) -> Result<Film, RepoError>;

    /// Full-record replace keyed by `film.id`, genre links included.
    async fn update_film(&self, film: Film) -> Result<Film, RepoError>;

    async fn delete_film(&self, film_id: i64) -> Result<(), RepoError>;

    async fn film_by_id(&self, film_id: i64) -> Result<Option<Film>, RepoError>;

    async fn all_films(&self) -> Result<Vec<Film>, RepoError>;

    /// Set-insert; idempotent.
    async fn add_like(&self, film_id: i64, user_id: i64) -> Result<(), RepoError>;

    /// Returns whether a like was actually removed.
    async fn remove_like(&self, film_id: i64, user_id: i64) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait GenreStorage: Send + Sync {
    async fn all_genres(&self) -> Result<Vec<Genre>, RepoError>;
    async fn genre_by_id(&self, id: i64) -> Result<Option<Genre>, RepoError>;
}

#[async_trait]
pub trait MpaStorage: Send + Sync {
    async fn all_mpa(&self) -> Result<Vec<Mpa>, RepoError>;
    async fn mpa_by_id(&self, id: i64) -> Result<Option<Mpa>, RepoError>;
}

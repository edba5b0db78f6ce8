/*
 * Responsibility
 * - Postgres backend via sqlx
 * - multi-statement mutations (film + genre links, two-sided friendship
 *   updates) run inside a transaction
 */
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use crate::model::{Film, FriendshipStatus, Genre, Mpa, User};
use crate::storage::{FilmStorage, GenreStorage, MpaStorage, RepoError, UserStorage};

pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    login: String,
    name: String,
    birthday: NaiveDate,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            login: row.login,
            name: row.name,
            birthday: row.birthday,
        }
    }
}

#[derive(Debug, FromRow)]
struct FilmRow {
    id: i64,
    name: String,
    description: String,
    release_date: NaiveDate,
    duration: i32,
    mpa_id: i64,
    mpa_name: String,
}

#[derive(Debug, FromRow)]
struct GenreRow {
    id: i64,
    name: String,
}

impl From<GenreRow> for Genre {
    fn from(row: GenreRow) -> Self {
        Genre {
            id: row.id,
            name: row.name,
        }
    }
}

const FILM_SELECT: &str = r#"
    SELECT f.id, f.name, f.description, f.release_date, f.duration,
           m.id AS mpa_id, m.name AS mpa_name
    FROM films f
    JOIN mpa m ON m.id = f.mpa_id
"#;

impl PostgresStorage {
    async fn hydrate_film(&self, row: FilmRow) -> Result<Film, RepoError> {
        let genres = sqlx::query_as::<_, GenreRow>(
            r#"
            SELECT g.id, g.name
            FROM genres g
            JOIN film_genres fg ON fg.genre_id = g.id
            WHERE fg.film_id = $1
            ORDER BY g.id
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        let likes: Vec<(i64,)> =
            sqlx::query_as(r#"SELECT user_id FROM likes WHERE film_id = $1"#)
                .bind(row.id)
                .fetch_all(&self.pool)
                .await?;

        Ok(Film {
            id: row.id,
            name: row.name,
            description: row.description,
            release_date: row.release_date,
            duration: row.duration,
            mpa: Mpa {
                id: row.mpa_id,
                name: row.mpa_name,
            },
            genres: genres.into_iter().map(Genre::from).collect(),
            likes: likes.into_iter().map(|(id,)| id).collect::<HashSet<_>>(),
        })
    }
}

#[async_trait]
impl UserStorage for PostgresStorage {
    async fn add_user(&self, user: User) -> Result<User, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, login, name, birthday)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, login, name, birthday
            "#,
        )
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.name)
        .bind(user.birthday)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_user(&self, user: User) -> Result<User, RepoError> {
        sqlx::query(
            r#"
            UPDATE users
            SET email = $2, login = $3, name = $4, birthday = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.name)
        .bind(user.birthday)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, user_id: i64) -> Result<(), RepoError> {
        // likes and friendship edges go via ON DELETE CASCADE
        sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn user_by_id(&self, user_id: i64) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT id, email, login, name, birthday FROM users WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn all_users(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"SELECT id, email, login, name, birthday FROM users ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn add_friend(&self, user_id: i64, friend_id: i64) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;

        let reverse: Option<(i32,)> = sqlx::query_as(
            r#"SELECT 1 FROM friends WHERE user_id = $1 AND friend_id = $2"#,
        )
        .bind(friend_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let status = if reverse.is_some() {
            FriendshipStatus::Confirmed
        } else {
            FriendshipStatus::Unconfirmed
        };

        sqlx::query(
            r#"
            INSERT INTO friends (user_id, friend_id, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, friend_id) DO UPDATE SET status = $3
            "#,
        )
        .bind(user_id)
        .bind(friend_id)
        .bind(status.as_str())
        .execute(&mut *tx)
        .await?;

        if reverse.is_some() {
            sqlx::query(
                r#"UPDATE friends SET status = $3 WHERE user_id = $1 AND friend_id = $2"#,
            )
            .bind(friend_id)
            .bind(user_id)
            .bind(FriendshipStatus::Confirmed.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r#"DELETE FROM friends WHERE user_id = $1 AND friend_id = $2"#,
        )
        .bind(user_id)
        .bind(friend_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if deleted > 0 {
            sqlx::query(
                r#"UPDATE friends SET status = $3 WHERE user_id = $1 AND friend_id = $2"#,
            )
            .bind(friend_id)
            .bind(user_id)
            .bind(FriendshipStatus::Unconfirmed.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn friends(&self, user_id: i64) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.email, u.login, u.name, u.birthday
            FROM users u
            JOIN friends f ON f.friend_id = u.id
            WHERE f.user_id = $1
              AND EXISTS (
                  SELECT 1 FROM friends r
                  WHERE r.user_id = f.friend_id AND r.friend_id = $1
              )
            ORDER BY u.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn common_friends(&self, user_id: i64, other_id: i64) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.email, u.login, u.name, u.birthday
            FROM users u
            JOIN friends f1 ON f1.friend_id = u.id
            JOIN friends f2 ON f2.friend_id = u.id
            WHERE f1.user_id = $1 AND f2.user_id = $2
            "#,
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[async_trait]
impl FilmStorage for PostgresStorage {
    async fn add_film(&self, mut film: Film) -> Result<Film, RepoError> {
        let mut tx = self.pool.begin().await?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO films (name, description, release_date, duration, mpa_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.mpa.id)
        .fetch_one(&mut *tx)
        .await?;

        for genre in &film.genres {
            sqlx::query(r#"INSERT INTO film_genres (film_id, genre_id) VALUES ($1, $2)"#)
                .bind(id)
                .bind(genre.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        film.id = id;
        film.likes.clear();
        Ok(film)
    }

    async fn update_film(&self, film: Film) -> Result<Film, RepoError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE films
            SET name = $2, description = $3, release_date = $4, duration = $5, mpa_id = $6
            WHERE id = $1
            "#,
        )
        .bind(film.id)
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.mpa.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(r#"DELETE FROM film_genres WHERE film_id = $1"#)
            .bind(film.id)
            .execute(&mut *tx)
            .await?;

        for genre in &film.genres {
            sqlx::query(r#"INSERT INTO film_genres (film_id, genre_id) VALUES ($1, $2)"#)
                .bind(film.id)
                .bind(genre.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(film)
    }

    async fn delete_film(&self, film_id: i64) -> Result<(), RepoError> {
        sqlx::query(r#"DELETE FROM films WHERE id = $1"#)
            .bind(film_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn film_by_id(&self, film_id: i64) -> Result<Option<Film>, RepoError> {
        let row = sqlx::query_as::<_, FilmRow>(&format!("{FILM_SELECT} WHERE f.id = $1"))
            .bind(film_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate_film(row).await?)),
            None => Ok(None),
        }
    }

    async fn all_films(&self) -> Result<Vec<Film>, RepoError> {
        let rows = sqlx::query_as::<_, FilmRow>(&format!("{FILM_SELECT} ORDER BY f.id"))
            .fetch_all(&self.pool)
            .await?;

        let mut films = Vec::with_capacity(rows.len());
        for row in rows {
            films.push(self.hydrate_film(row).await?);
        }
        Ok(films)
    }

    async fn add_like(&self, film_id: i64, user_id: i64) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO likes (film_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(film_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_like(&self, film_id: i64, user_id: i64) -> Result<bool, RepoError> {
        let result = sqlx::query(r#"DELETE FROM likes WHERE film_id = $1 AND user_id = $2"#)
            .bind(film_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl GenreStorage for PostgresStorage {
    async fn all_genres(&self) -> Result<Vec<Genre>, RepoError> {
        let rows = sqlx::query_as::<_, GenreRow>(r#"SELECT id, name FROM genres ORDER BY id"#)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Genre::from).collect())
    }

    async fn genre_by_id(&self, id: i64) -> Result<Option<Genre>, RepoError> {
        let row = sqlx::query_as::<_, GenreRow>(r#"SELECT id, name FROM genres WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Genre::from))
    }
}

#[async_trait]
impl MpaStorage for PostgresStorage {
    async fn all_mpa(&self) -> Result<Vec<Mpa>, RepoError> {
        let rows = sqlx::query_as::<_, GenreRow>(r#"SELECT id, name FROM mpa ORDER BY id"#)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| Mpa {
                id: r.id,
                name: r.name,
            })
            .collect())
    }

    async fn mpa_by_id(&self, id: i64) -> Result<Option<Mpa>, RepoError> {
        let row = sqlx::query_as::<_, GenreRow>(r#"SELECT id, name FROM mpa WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| Mpa {
            id: r.id,
            name: r.name,
        }))
    }
}

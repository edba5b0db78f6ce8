/*
 * Responsibility
 * - in-memory backend: HashMaps behind tokio RwLocks
 * - ids assigned as max existing id + 1, starting at 1
 * - friendship kept as an explicit (from, to) -> status index so both
 *   directions mutate under one lock
 */
use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::{Film, FriendshipStatus, GENRE_SEED, Genre, MPA_SEED, Mpa, User};
use crate::storage::{FilmStorage, GenreStorage, MpaStorage, RepoError, UserStorage};

pub struct MemoryStorage {
    users: RwLock<HashMap<i64, User>>,
    films: RwLock<HashMap<i64, Film>>,
    friendships: RwLock<BTreeMap<(i64, i64), FriendshipStatus>>,
    genres: Vec<Genre>,
    mpa: Vec<Mpa>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            films: RwLock::new(HashMap::new()),
            friendships: RwLock::new(BTreeMap::new()),
            genres: GENRE_SEED
                .iter()
                .map(|&(id, name)| Genre {
                    id,
                    name: name.to_string(),
                })
                .collect(),
            mpa: MPA_SEED
                .iter()
                .map(|&(id, name)| Mpa {
                    id,
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn next_id<V>(map: &HashMap<i64, V>) -> i64 {
    map.keys().max().copied().unwrap_or(0) + 1
}

#[async_trait]
impl UserStorage for MemoryStorage {
    async fn add_user(&self, mut user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        user.id = next_id(&users);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: User) -> Result<User, RepoError> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, user_id: i64) -> Result<(), RepoError> {
        self.users.write().await.remove(&user_id);
        self.friendships
            .write()
            .await
            .retain(|&(from, to), _| from != user_id && to != user_id);
        for film in self.films.write().await.values_mut() {
            film.likes.remove(&user_id);
        }
        Ok(())
    }

    async fn user_by_id(&self, user_id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn all_users(&self) -> Result<Vec<User>, RepoError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn add_friend(&self, user_id: i64, friend_id: i64) -> Result<(), RepoError> {
        let mut rel = self.friendships.write().await;
        if rel.contains_key(&(friend_id, user_id)) {
            rel.insert((user_id, friend_id), FriendshipStatus::Confirmed);
            rel.insert((friend_id, user_id), FriendshipStatus::Confirmed);
        } else {
            rel.entry((user_id, friend_id))
                .or_insert(FriendshipStatus::Unconfirmed);
        }
        Ok(())
    }

    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> Result<(), RepoError> {
        let mut rel = self.friendships.write().await;
        if rel.remove(&(user_id, friend_id)).is_some() {
            if let Some(status) = rel.get_mut(&(friend_id, user_id)) {
                *status = FriendshipStatus::Unconfirmed;
            }
        }
        Ok(())
    }

    async fn friends(&self, user_id: i64) -> Result<Vec<User>, RepoError> {
        let rel = self.friendships.read().await;
        let ids: Vec<i64> = rel
            .keys()
            .filter(|&&(from, to)| from == user_id && rel.contains_key(&(to, user_id)))
            .map(|&(_, to)| to)
            .collect();
        drop(rel);

        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn common_friends(&self, user_id: i64, other_id: i64) -> Result<Vec<User>, RepoError> {
        let rel = self.friendships.read().await;
        let outgoing = |of: i64| -> HashSet<i64> {
            rel.range((of, i64::MIN)..=(of, i64::MAX))
                .map(|(&(_, to), _)| to)
                .collect()
        };
        let common: Vec<i64> = outgoing(user_id)
            .intersection(&outgoing(other_id))
            .copied()
            .collect();
        drop(rel);

        let users = self.users.read().await;
        Ok(common
            .iter()
            .filter_map(|id| users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl FilmStorage for MemoryStorage {
    async fn add_film(&self, mut film: Film) -> Result<Film, RepoError> {
        let mut films = self.films.write().await;
        film.id = next_id(&films);
        films.insert(film.id, film.clone());
        Ok(film)
    }

    async fn update_film(&self, film: Film) -> Result<Film, RepoError> {
        self.films.write().await.insert(film.id, film.clone());
        Ok(film)
    }

    async fn delete_film(&self, film_id: i64) -> Result<(), RepoError> {
        self.films.write().await.remove(&film_id);
        Ok(())
    }

    async fn film_by_id(&self, film_id: i64) -> Result<Option<Film>, RepoError> {
        Ok(self.films.read().await.get(&film_id).cloned())
    }

    async fn all_films(&self) -> Result<Vec<Film>, RepoError> {
        let mut films: Vec<Film> = self.films.read().await.values().cloned().collect();
        films.sort_by_key(|f| f.id);
        Ok(films)
    }

    async fn add_like(&self, film_id: i64, user_id: i64) -> Result<(), RepoError> {
        if let Some(film) = self.films.write().await.get_mut(&film_id) {
            film.likes.insert(user_id);
        }
        Ok(())
    }

    async fn remove_like(&self, film_id: i64, user_id: i64) -> Result<bool, RepoError> {
        Ok(self
            .films
            .write()
            .await
            .get_mut(&film_id)
            .is_some_and(|film| film.likes.remove(&user_id)))
    }
}

#[async_trait]
impl GenreStorage for MemoryStorage {
    async fn all_genres(&self) -> Result<Vec<Genre>, RepoError> {
        Ok(self.genres.clone())
    }

    async fn genre_by_id(&self, id: i64) -> Result<Option<Genre>, RepoError> {
        Ok(self.genres.iter().find(|g| g.id == id).cloned())
    }
}

#[async_trait]
impl MpaStorage for MemoryStorage {
    async fn all_mpa(&self) -> Result<Vec<Mpa>, RepoError> {
        Ok(self.mpa.clone())
    }

    async fn mpa_by_id(&self, id: i64) -> Result<Option<Mpa>, RepoError> {
        Ok(self.mpa.iter().find(|m| m.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn user(login: &str) -> User {
        User {
            id: 0,
            email: format!("{login}@example.com"),
            login: login.to_string(),
            name: login.to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        }
    }

    fn film(name: &str) -> Film {
        Film {
            id: 0,
            name: name.to_string(),
            description: String::new(),
            release_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            duration: 90,
            mpa: Mpa {
                id: 1,
                name: "G".to_string(),
            },
            genres: Vec::new(),
            likes: HashSet::new(),
        }
    }

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let store = MemoryStorage::new();
        let a = store.add_user(user("a")).await.unwrap();
        let b = store.add_user(user("b")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);

        let f = store.add_film(film("f")).await.unwrap();
        assert_eq!(f.id, 1);
    }

    #[tokio::test]
    async fn one_sided_add_is_unconfirmed() {
        let store = MemoryStorage::new();
        let a = store.add_user(user("a")).await.unwrap();
        let b = store.add_user(user("b")).await.unwrap();

        store.add_friend(a.id, b.id).await.unwrap();

        let rel = store.friendships.read().await;
        assert_eq!(
            rel.get(&(a.id, b.id)),
            Some(&FriendshipStatus::Unconfirmed)
        );
        assert!(!rel.contains_key(&(b.id, a.id)));
    }

    #[tokio::test]
    async fn reciprocal_add_confirms_both_directions() {
        let store = MemoryStorage::new();
        let a = store.add_user(user("a")).await.unwrap();
        let b = store.add_user(user("b")).await.unwrap();

        store.add_friend(a.id, b.id).await.unwrap();
        store.add_friend(b.id, a.id).await.unwrap();

        let rel = store.friendships.read().await;
        assert_eq!(rel.get(&(a.id, b.id)), Some(&FriendshipStatus::Confirmed));
        assert_eq!(rel.get(&(b.id, a.id)), Some(&FriendshipStatus::Confirmed));
    }

    #[tokio::test]
    async fn remove_downgrades_reverse_edge() {
        let store = MemoryStorage::new();
        let a = store.add_user(user("a")).await.unwrap();
        let b = store.add_user(user("b")).await.unwrap();

        store.add_friend(a.id, b.id).await.unwrap();
        store.add_friend(b.id, a.id).await.unwrap();
        store.remove_friend(a.id, b.id).await.unwrap();

        let rel = store.friendships.read().await;
        assert!(!rel.contains_key(&(a.id, b.id)));
        assert_eq!(
            rel.get(&(b.id, a.id)),
            Some(&FriendshipStatus::Unconfirmed)
        );
    }

    #[tokio::test]
    async fn remove_of_absent_edge_is_a_noop() {
        let store = MemoryStorage::new();
        let a = store.add_user(user("a")).await.unwrap();
        let b = store.add_user(user("b")).await.unwrap();

        store.add_friend(b.id, a.id).await.unwrap();
        store.remove_friend(a.id, b.id).await.unwrap();

        // b's one-sided edge must survive untouched
        let rel = store.friendships.read().await;
        assert_eq!(
            rel.get(&(b.id, a.id)),
            Some(&FriendshipStatus::Unconfirmed)
        );
    }

    #[tokio::test]
    async fn delete_user_cascades_edges_and_likes() {
        let store = MemoryStorage::new();
        let a = store.add_user(user("a")).await.unwrap();
        let b = store.add_user(user("b")).await.unwrap();
        let f = store.add_film(film("f")).await.unwrap();

        store.add_friend(a.id, b.id).await.unwrap();
        store.add_friend(b.id, a.id).await.unwrap();
        store.add_like(f.id, a.id).await.unwrap();

        store.delete_user(a.id).await.unwrap();

        assert!(store.friendships.read().await.is_empty());
        let film = store.film_by_id(f.id).await.unwrap().unwrap();
        assert!(film.likes.is_empty());
    }
}

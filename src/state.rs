/*
 * Responsibility
 * - shared context handed to the Router (AppState)
 * - holds trait-object handles to one storage backend; Clone is cheap
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::storage::memory::MemoryStorage;
use crate::storage::postgres::PostgresStorage;
use crate::storage::{FilmStorage, GenreStorage, MpaStorage, UserStorage};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStorage>,
    pub films: Arc<dyn FilmStorage>,
    pub genres: Arc<dyn GenreStorage>,
    pub mpa: Arc<dyn MpaStorage>,
}

impl AppState {
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStorage::new());
        Self {
            users: store.clone(),
            films: store.clone(),
            genres: store.clone(),
            mpa: store,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PostgresStorage::new(pool));
        Self {
            users: store.clone(),
            films: store.clone(),
            genres: store.clone(),
            mpa: store,
        }
    }
}

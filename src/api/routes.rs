/*
 * Responsibility
 * - the URL structure of the service, one route() call per path
 */
use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use crate::api::handlers::{
    films::{
        add_like, create_film, delete_film, get_film, list_films, popular_films, remove_like,
        update_film, update_film_by_id,
    },
    health::health,
    lookups::{get_genre, get_mpa, list_genres, list_mpa},
    users::{
        add_friend, common_friends, create_user, delete_user, get_user, list_friends, list_users,
        remove_friend, update_user, update_user_by_id,
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/films", get(list_films).post(create_film).put(update_film))
        .route("/films/popular", get(popular_films))
        .route(
            "/films/{id}",
            get(get_film).put(update_film_by_id).delete(delete_film),
        )
        .route("/films/{id}/like/{user_id}", put(add_like).delete(remove_like))
        .route("/users", get(list_users).post(create_user).put(update_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user_by_id).delete(delete_user),
        )
        .route("/users/{id}/friends", get(list_friends))
        .route("/users/{id}/friends/common/{other_id}", get(common_friends))
        .route(
            "/users/{id}/friends/{friend_id}",
            put(add_friend).delete(remove_friend),
        )
        .route("/genres", get(list_genres))
        .route("/genres/{id}", get(get_genre))
        .route("/mpa", get(list_mpa))
        .route("/mpa/{id}", get(get_mpa))
}

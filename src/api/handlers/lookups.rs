/*
 * Responsibility
 * - read-only /genres and /mpa reference lookups
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    error::AppError,
    model::{Genre, Mpa},
    state::AppState,
};

pub async fn list_genres(State(state): State<AppState>) -> Result<Json<Vec<Genre>>, AppError> {
    Ok(Json(state.genres.all_genres().await?))
}

pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Genre>, AppError> {
    let genre = state
        .genres
        .genre_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("genre", id))?;
    Ok(Json(genre))
}

pub async fn list_mpa(State(state): State<AppState>) -> Result<Json<Vec<Mpa>>, AppError> {
    Ok(Json(state.mpa.all_mpa().await?))
}

pub async fn get_mpa(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Mpa>, AppError> {
    let mpa = state
        .mpa
        .mpa_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("MPA rating", id))?;
    Ok(Json(mpa))
}

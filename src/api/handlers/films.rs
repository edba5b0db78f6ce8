/*
 * Responsibility
 * - /films handlers: extract -> service call -> DTO response
 * - like endpoints and the popularity listing
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    api::dto::films::{FilmRequest, FilmResponse},
    error::AppError,
    services::films,
    state::AppState,
};

pub async fn list_films(State(state): State<AppState>) -> Result<Json<Vec<FilmResponse>>, AppError> {
    let films = films::list(&state).await?;
    Ok(Json(films.into_iter().map(FilmResponse::from).collect()))
}

pub async fn create_film(
    State(state): State<AppState>,
    Json(req): Json<FilmRequest>,
) -> Result<(StatusCode, Json<FilmResponse>), AppError> {
    let film = films::create(&state, req.into()).await?;
    Ok((StatusCode::CREATED, Json(film.into())))
}

/// PUT /films — full-record replace, id taken from the body.
pub async fn update_film(
    State(state): State<AppState>,
    Json(req): Json<FilmRequest>,
) -> Result<Json<FilmResponse>, AppError> {
    let film = films::update(&state, req.into()).await?;
    Ok(Json(film.into()))
}

pub async fn get_film(
    State(state): State<AppState>,
    Path(film_id): Path<i64>,
) -> Result<Json<FilmResponse>, AppError> {
    let film = films::get(&state, film_id).await?;
    Ok(Json(film.into()))
}

/// PUT /films/{id} — same replace, the path id wins over any body id.
pub async fn update_film_by_id(
    State(state): State<AppState>,
    Path(film_id): Path<i64>,
    Json(mut req): Json<FilmRequest>,
) -> Result<Json<FilmResponse>, AppError> {
    req.id = Some(film_id);
    let film = films::update(&state, req.into()).await?;
    Ok(Json(film.into()))
}

pub async fn delete_film(
    State(state): State<AppState>,
    Path(film_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    films::delete(&state, film_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_like(
    State(state): State<AppState>,
    Path((film_id, user_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    films::add_like(&state, film_id, user_id).await?;
    Ok(StatusCode::OK)
}

pub async fn remove_like(
    State(state): State<AppState>,
    Path((film_id, user_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    films::remove_like(&state, film_id, user_id).await?;
    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    pub count: Option<i64>,
}

pub async fn popular_films(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> Result<Json<Vec<FilmResponse>>, AppError> {
    let films = films::popular(&state, params.count).await?;
    Ok(Json(films.into_iter().map(FilmResponse::from).collect()))
}

/*
 * Responsibility
 * - /users handlers: CRUD plus the friendship endpoints
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::dto::users::{UserRequest, UserResponse},
    error::AppError,
    services::users,
    state::AppState,
};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = users::list(&state).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<UserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = users::create(&state, req.into()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /users — full-record replace, id taken from the body.
pub async fn update_user(
    State(state): State<AppState>,
    Json(req): Json<UserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = users::update(&state, req.into()).await?;
    Ok(Json(user.into()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = users::get(&state, user_id).await?;
    Ok(Json(user.into()))
}

/// PUT /users/{id} — same replace, the path id wins over any body id.
pub async fn update_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(mut req): Json<UserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.id = Some(user_id);
    let user = users::update(&state, req.into()).await?;
    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    users::delete(&state, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_friend(
    State(state): State<AppState>,
    Path((user_id, friend_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    users::add_friend(&state, user_id, friend_id).await?;
    Ok(StatusCode::OK)
}

pub async fn remove_friend(
    State(state): State<AppState>,
    Path((user_id, friend_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    users::remove_friend(&state, user_id, friend_id).await?;
    Ok(StatusCode::OK)
}

pub async fn list_friends(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let friends = users::friends(&state, user_id).await?;
    Ok(Json(friends.into_iter().map(UserResponse::from).collect()))
}

pub async fn common_friends(
    State(state): State<AppState>,
    Path((user_id, other_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let friends = users::common_friends(&state, user_id, other_id).await?;
    Ok(Json(friends.into_iter().map(UserResponse::from).collect()))
}

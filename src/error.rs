/*
 * Responsibility
 * - app-wide AppError definition
 * - IntoResponse impl (HTTP status / JSON error body)
 * - RepoError funnels in here so handlers only ever see AppError
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::storage::RepoError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{reason}")]
    Validation { reason: String },
    #[error("{what} not found")]
    NotFound { what: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// NotFound naming the missing entity and id, e.g. "film with id 7".
    pub fn not_found(entity: &str, id: i64) -> Self {
        Self::NotFound {
            what: format!("{entity} with id {id}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Validation { reason } => (StatusCode::BAD_REQUEST, "validation", reason),
            AppError::NotFound { what } => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{what} not found."),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        tracing::error!(error = %e, "storage failure");
        AppError::Internal
    }
}

//! Error types for the book club server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Client errors carry their specific message; server errors are
        // logged in full here and answered with the bare status text.
        match self {
            AppError::Validation(msg) => {
                tracing::warn!(error = %msg, "invalid request");
                (StatusCode::BAD_REQUEST, msg).into_response()
            }
            AppError::NotFound(msg) => {
                tracing::warn!(error = %msg, "resource not found");
                plain_status(StatusCode::NOT_FOUND)
            }
            AppError::NotImplemented(msg) => {
                tracing::warn!(error = %msg, "operation not implemented");
                plain_status(StatusCode::NOT_IMPLEMENTED)
            }
            AppError::Database(e) => {
                tracing::error!(error = ?e, "database error");
                plain_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Migration(msg) => {
                tracing::error!(error = %msg, "migration error");
                plain_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                plain_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

fn plain_status(status: StatusCode) -> Response {
    let body = status.canonical_reason().unwrap_or_default().to_string();
    (status, body).into_response()
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

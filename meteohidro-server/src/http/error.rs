//! API error types with IntoResponse
//!
//! Errors are converted to `{"ok": false, "error", "message"}` JSON
//! responses. Database details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::{DbError, PoolError};
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Bad query parameter (400)
    Validation(ValidationError),

    /// Pool exhausted or closed (503, logged)
    Unavailable(DbError),

    /// Query or connection failure (500, logged)
    Database(DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
            Self::Unavailable(e) => {
                tracing::warn!("Database unavailable: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "db_unavailable",
                    "database temporarily unavailable".to_string(),
                )
            }
            Self::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "db_query_error",
                    "db query error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "ok": false,
            "error": code,
            "message": message
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        if e.is_unavailable() {
            Self::Unavailable(e)
        } else {
            Self::Database(e)
        }
    }
}

impl From<PoolError> for ApiError {
    fn from(e: PoolError) -> Self {
        Self::from(DbError::from(e))
    }
}

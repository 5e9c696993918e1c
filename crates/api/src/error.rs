use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parkpass_core::error::CoreError;
use parkpass_db::DbError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `parkpass_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(core) => AppError::Core(core),
            DbError::Database(db) => AppError::Database(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidInterval => {
                    (StatusCode::BAD_REQUEST, "INVALID_INTERVAL", core.to_string())
                }
                CoreError::TokenMalformed(_) => {
                    (StatusCode::BAD_REQUEST, "MALFORMED_PASS", core.to_string())
                }
                CoreError::ChecksumMismatch => {
                    (StatusCode::UNAUTHORIZED, "CHECKSUM_MISMATCH", core.to_string())
                }
                CoreError::NoSpotAvailable(_) => {
                    (StatusCode::CONFLICT, "NO_SPOT_AVAILABLE", core.to_string())
                }
                CoreError::TokenExhausted => {
                    (StatusCode::CONFLICT, "PASS_EXHAUSTED", core.to_string())
                }
                CoreError::AlreadyEntered => {
                    (StatusCode::CONFLICT, "ALREADY_ENTERED", core.to_string())
                }
                CoreError::AlreadyExited => {
                    (StatusCode::CONFLICT, "ALREADY_EXITED", core.to_string())
                }
                CoreError::NotYetEntered => {
                    (StatusCode::CONFLICT, "NOT_YET_ENTERED", core.to_string())
                }
                CoreError::ReservationCancelled => {
                    (StatusCode::CONFLICT, "RESERVATION_CANCELLED", core.to_string())
                }
                CoreError::TerminalStateViolation(msg) => {
                    (StatusCode::CONFLICT, "STATE_CONFLICT", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.is_unique_violation() {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    "Duplicate value violates a unique constraint".to_string(),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

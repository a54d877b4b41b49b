//! Unified error handling with consistent API response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error detail in the API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            error: None,
        })
    }

    /// Wrap an error in the envelope.
    pub fn error(code: &str, message: &str) -> Json<Self> {
        Json(Self {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        })
    }
}

/// Application error type mapping to HTTP status codes.
///
/// Pattern and sequence failures carry their own variants so callers can
/// distinguish configuration defects (never retried) from transient storage
/// trouble (retried at the allocator boundary).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Sequence overflow: running number {no} does not fit in {width} digits")]
    SequenceOverflow { no: i64, width: u32 },

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Duplicate code: {0}")]
    DuplicateCode(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error is a deterministic configuration defect.
    ///
    /// These are never retried: re-running the same parse or the same
    /// overflowing allocation fails identically until an admin fixes the
    /// pattern config.
    pub fn is_config_defect(&self) -> bool {
        matches!(self, Self::InvalidPattern(_) | Self::SequenceOverflow { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::InvalidPattern(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_PATTERN",
                msg.clone(),
            ),
            AppError::SequenceOverflow { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "SEQUENCE_OVERFLOW",
                self.to_string(),
            ),
            AppError::PersistenceUnavailable(msg) => {
                tracing::error!(error = %msg, "Persistence unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "PERSISTENCE_UNAVAILABLE",
                    "Storage layer is temporarily unavailable".to_string(),
                )
            }
            AppError::DuplicateCode(msg) => (StatusCode::CONFLICT, "DUPLICATE_CODE", msg.clone()),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()> {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message,
            }),
        };

        (status, Json(body)).into_response()
    }
}

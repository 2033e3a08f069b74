// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;

use crate::database::DatabaseError;
use crate::validation::FieldError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    // 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),

    // 404 Not Found (also covers rejected writes, see `from_db`)
    #[error("{0}")]
    NotFound(String),

    // 409 Conflict
    #[error("{0}")]
    Conflict(String),

    // 413 Payload Too Large
    #[error("{0}")]
    PayloadTooLarge(String),

    // 500 Internal Server Error; the message is logged, never sent
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation(errors) => json!({
                "error": self.to_string(),
                "code": self.error_code(),
                "errors": errors,
            }),
            ApiError::Internal(_) => json!({
                "error": "Internal server error",
                "code": self.error_code(),
            }),
            _ => json!({
                "error": self.to_string(),
                "code": self.error_code(),
            }),
        }
    }

    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(path, message)])
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!("internal error: {}", message);
        ApiError::Internal(message)
    }

    /// Repository failure on a single resource. Missing rows and constraint
    /// violations both become 404 with `message`.
    pub fn from_db(err: DatabaseError, message: &str) -> Self {
        match err {
            DatabaseError::NotFound => ApiError::not_found(message),
            DatabaseError::Constraint(detail) => {
                tracing::debug!("constraint violation: {}", detail);
                ApiError::not_found(message)
            }
            other => other.into(),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound => ApiError::not_found("Not found"),
            DatabaseError::Constraint(_) => ApiError::not_found("Not found or invalid data"),
            DatabaseError::Sqlx(e) => ApiError::internal(format!("database error: {e}")),
        }
    }
}

impl From<crate::auth::AuthError> for ApiError {
    fn from(err: crate::auth::AuthError) -> Self {
        ApiError::internal(err.to_string())
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// One field-level violation inside a validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Wire shape is always `{error, message, details?}`. Ownership failures are
/// reported as NotFound so callers cannot distinguish them from absence.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("{message}")]
    Unauthenticated { error: String, message: String },

    #[error("{0}")]
    Forbidden(String),

    #[error("{message}")]
    NotFound { error: String, message: String },

    // Duplicate names/emails and blocked deletes surface as 400 on the
    // wire, not 409.
    #[error("{message}")]
    Conflict { error: String, message: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details,
        }
    }

    /// Missing or unusable credentials; most callers use the default
    /// "Access denied" label, login overrides it.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated {
            error: "Access denied".to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        ApiError::Unauthenticated {
            error: "Invalid credentials".to_string(),
            message: "Email or password is incorrect".to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::NotFound {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn conflict(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Conflict {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::BAD_REQUEST,
            ApiError::Database(e) if is_unique_violation(e) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation { message, details } => json!({
                "error": "Validation error",
                "message": message,
                "details": details,
            }),
            ApiError::Unauthenticated { error, message } => json!({
                "error": error,
                "message": message,
            }),
            ApiError::Forbidden(message) => json!({
                "error": "Access denied",
                "message": message,
            }),
            ApiError::NotFound { error, message } => json!({
                "error": error,
                "message": message,
            }),
            ApiError::Conflict { error, message } => json!({
                "error": error,
                "message": message,
            }),
            ApiError::Database(e) if is_unique_violation(e) => json!({
                "error": "Conflict",
                "message": "Resource already exists (duplicate entry)",
            }),
            ApiError::Database(_) | ApiError::Internal(_) => json!({
                "error": "Internal server error",
                "message": "An unexpected error occurred",
            }),
        }
    }
}

// 23505 = PostgreSQL unique violation; a backstop behind the explicit
// duplicate checks in the services.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        match err {
            crate::database::DatabaseError::Sqlx(e) => ApiError::Database(e),
            other => {
                tracing::error!("Database error: {}", other);
                ApiError::internal("Database error occurred")
            }
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("Password hashing error: {}", err);
        ApiError::internal("Failed to process credentials")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Server-side failures get logged with detail; the client sees a
        // generic message.
        if let ApiError::Database(e) = &self {
            if !is_unique_violation(e) {
                tracing::error!("Database error: {:?}", e);
            }
        }
        if let ApiError::Internal(msg) = &self {
            tracing::error!("Internal error: {}", msg);
        }

        (self.status_code(), Json(self.to_json())).into_response()
    }
}

pub mod auth;
pub mod categories;
pub mod leads;
pub mod users;
pub mod validate;

use axum::extract::rejection::JsonRejection;

use crate::error::ApiError;

/// Malformed or unparseable JSON bodies become validation errors so every
/// failure keeps the `{error, message, details?}` shape.
pub fn bad_json(rejection: JsonRejection) -> ApiError {
    ApiError::validation(rejection.body_text(), vec![])
}

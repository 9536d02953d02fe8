use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{bad_json, validate};
use crate::auth;
use crate::error::{ApiError, FieldError};
use crate::middleware::auth::AuthUser;
use crate::services::user_service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

impl RegisterRequest {
    fn validate(self) -> Result<(String, String, String), ApiError> {
        let email = self.email.unwrap_or_default().trim().to_string();
        let password = self.password.unwrap_or_default();
        let name = self.name.unwrap_or_default().trim().to_string();

        let mut details = Vec::new();
        if !validate::email_format(&email) {
            details.push(FieldError::new("email", "Invalid email address"));
        }
        if password.len() < 6 {
            details.push(FieldError::new(
                "password",
                "Password must be at least 6 characters",
            ));
        }
        if name.is_empty() {
            details.push(FieldError::new("name", "Name is required"));
        }
        validate::reject_if_invalid(details)?;

        Ok((email, password, name))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    fn validate(self) -> Result<(String, String), ApiError> {
        let email = self.email.unwrap_or_default().trim().to_string();
        let password = self.password.unwrap_or_default();

        let mut details = Vec::new();
        if !validate::email_format(&email) {
            details.push(FieldError::new("email", "Invalid email address"));
        }
        if password.is_empty() {
            details.push(FieldError::new("password", "Password is required"));
        }
        validate::reject_if_invalid(details)?;

        Ok((email, password))
    }
}

/// POST /auth/register - create an account and issue a token
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(req) = payload.map_err(bad_json)?;
    let (email, password, name) = req.validate()?;

    if user_service::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(ApiError::conflict(
            "User already exists",
            "An account with this email already exists",
        ));
    }

    let password_hash = bcrypt::hash(&password, state.config.security.bcrypt_cost)?;
    let user = user_service::insert(&state.pool, &email, &password_hash, &name).await?;
    let token = issue_token(&state, user.id)?;

    info!("User registered: {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": user,
            "token": token,
        })),
    ))
}

/// POST /auth/login - verify credentials and issue a token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload.map_err(bad_json)?;
    let (email, password) = req.validate()?;

    let user = user_service::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(ApiError::invalid_credentials)?;

    if !bcrypt::verify(&password, &user.password)? {
        return Err(ApiError::invalid_credentials());
    }

    let token = issue_token(&state, user.id)?;

    info!("User logged in: {}", user.id);

    Ok(Json(json!({
        "message": "Login successful",
        "user": crate::database::models::UserPublic::from(user),
        "token": token,
    })))
}

/// GET /auth/me - fresh profile for the authenticated caller
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let user = user_service::find_public(&state.pool, auth_user.id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found("User not found", "User account no longer exists")
        })?;

    Ok(Json(json!({ "user": user })))
}

/// POST /auth/verify - confirm the presented token still resolves
pub async fn verify(Extension(auth_user): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "valid": true,
        "user": auth_user,
    }))
}

fn issue_token(state: &AppState, user_id: uuid::Uuid) -> Result<String, ApiError> {
    auth::generate_token(user_id, &state.config.security).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal("Failed to issue token")
    })
}

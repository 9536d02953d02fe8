use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth;
use crate::database::models::Role;
use crate::error::ApiError;
use crate::services::user_service;
use crate::state::AppState;

/// Authenticated caller context injected into protected requests.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Bearer-token middleware for the protected routes. Decodes the JWT and
/// re-verifies the user row on every request; a token for a deleted account
/// is rejected even though its signature is still valid.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;

    let claims = auth::decode_token(&token, &state.config.security.jwt_secret)
        .map_err(|_| ApiError::unauthenticated("Invalid token"))?;

    let user = user_service::find_auth(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("User not found"))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthenticated("No token provided"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthenticated("Invalid Authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        Some(_) => Err(ApiError::unauthenticated("No token provided")),
        None => Err(ApiError::unauthenticated(
            "Authorization header must use Bearer token format",
        )),
    }
}

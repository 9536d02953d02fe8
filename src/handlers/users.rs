use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{bad_json, validate};
use crate::error::{ApiError, FieldError};
use crate::filter::{UserFilter, UserListParams};
use crate::middleware::auth::AuthUser;
use crate::services::user_service;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    fn validate(self) -> Result<(Option<String>, Option<String>), ApiError> {
        let name = self.name.map(|n| n.trim().to_string());
        let email = self.email.map(|e| e.trim().to_string());

        let mut details = Vec::new();
        if let Some(name) = name.as_deref() {
            if name.is_empty() {
                details.push(FieldError::new("name", "Name cannot be empty"));
            }
        }
        if let Some(email) = email.as_deref() {
            if !validate::email_format(email) {
                details.push(FieldError::new("email", "Invalid email address"));
            }
        }
        validate::reject_if_invalid(details)?;

        Ok((name, email))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl ChangePasswordRequest {
    fn validate(self) -> Result<(String, String), ApiError> {
        let current = self.current_password.unwrap_or_default();
        let new = self.new_password.unwrap_or_default();

        let mut details = Vec::new();
        if current.is_empty() {
            details.push(FieldError::new("currentPassword", "Current password is required"));
        }
        if new.len() < 6 {
            details.push(FieldError::new(
                "newPassword",
                "Password must be at least 6 characters",
            ));
        }
        validate::reject_if_invalid(details)?;

        Ok((current, new))
    }
}

/// GET /users/profile - the caller's profile with their lead count
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let user = user_service::find_public(&state.pool, auth_user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found", "User profile not found"))?;
    let lead_count = user_service::lead_count(&state.pool, auth_user.id).await?;

    let mut body = serde_json::to_value(&user)
        .map_err(|e| ApiError::internal(format!("Failed to serialize user: {e}")))?;
    body["leadCount"] = json!(lead_count);
    Ok(Json(json!({ "user": body })))
}

/// PUT /users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload.map_err(bad_json)?;
    let (name, email) = req.validate()?;

    // A new email must not collide with another account
    if let Some(email) = email.as_deref() {
        if user_service::email_taken_by_other(&state.pool, email, auth_user.id).await? {
            return Err(ApiError::conflict(
                "Email already exists",
                "This email is already registered to another account",
            ));
        }
    }

    let user =
        user_service::update_profile(&state.pool, auth_user.id, name.as_deref(), email.as_deref())
            .await?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": user,
    })))
}

/// PUT /users/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload.map_err(bad_json)?;
    let (current_password, new_password) = req.validate()?;

    let user = user_service::find_by_id(&state.pool, auth_user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found", "User account not found"))?;

    if !bcrypt::verify(&current_password, &user.password)? {
        return Err(ApiError::conflict(
            "Invalid password",
            "Current password is incorrect",
        ));
    }

    let password_hash = bcrypt::hash(&new_password, state.config.security.bcrypt_cost)?;
    user_service::update_password(&state.pool, auth_user.id, &password_hash).await?;

    info!("Password changed for user: {}", auth_user.id);

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

/// DELETE /users/account - removes the account and cascades its leads
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    user_service::delete(&state.pool, auth_user.id).await?;

    info!("Account deleted: {}", auth_user.id);

    Ok(Json(json!({ "message": "Account deleted successfully" })))
}

/// GET /users - admin-only paginated, searchable user listing
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(params): Query<UserListParams>,
) -> Result<Json<Value>, ApiError> {
    if !auth_user.role.is_admin() {
        return Err(ApiError::forbidden("Insufficient permissions"));
    }

    let filter = UserFilter::from_params(&params, &state.config.pagination);
    let (users, pagination) = user_service::list(&state.pool, &filter).await?;

    Ok(Json(json!({
        "users": users,
        "pagination": pagination,
    })))
}

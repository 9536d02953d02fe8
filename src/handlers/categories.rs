use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{bad_json, validate};
use crate::database::models::{Category, CategoryWithCount};
use crate::error::{ApiError, FieldError};
use crate::services::category_service;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl CreateCategoryRequest {
    fn validate(self) -> Result<(String, Option<String>, Option<String>), ApiError> {
        let name = self.name.unwrap_or_default().trim().to_string();

        let mut details = Vec::new();
        if name.is_empty() {
            details.push(FieldError::new("name", "Name is required"));
        }
        if let Some(color) = self.color.as_deref() {
            if !validate::color_format(color) {
                details.push(FieldError::new("color", "Color must be a hex value like #3b82f6"));
            }
        }
        validate::reject_if_invalid(details)?;

        Ok((name, self.description, self.color))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl UpdateCategoryRequest {
    fn validate(self) -> Result<(Option<String>, Option<String>, Option<String>), ApiError> {
        let name = self.name.map(|n| n.trim().to_string());

        let mut details = Vec::new();
        if let Some(name) = name.as_deref() {
            if name.is_empty() {
                details.push(FieldError::new("name", "Name cannot be empty"));
            }
        }
        if let Some(color) = self.color.as_deref() {
            if !validate::color_format(color) {
                details.push(FieldError::new("color", "Color must be a hex value like #3b82f6"));
            }
        }
        validate::reject_if_invalid(details)?;

        Ok((name, self.description, self.color))
    }
}

/// GET /categories - every category with its lead count, by name
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryWithCount>>, ApiError> {
    let categories = category_service::list(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /categories/:id - category detail with its leads
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_category_id(&id)?;
    let (category, leads) = category_service::detail(&state.pool, id)
        .await?
        .ok_or_else(category_not_found)?;

    let mut body = serde_json::to_value(&category)
        .map_err(|e| ApiError::internal(format!("Failed to serialize category: {e}")))?;
    body["leads"] = json!(leads);
    Ok(Json(body))
}

/// POST /categories
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(req) = payload.map_err(bad_json)?;
    let (name, description, color) = req.validate()?;

    let category =
        category_service::create(&state.pool, &name, description.as_deref(), color.as_deref())
            .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /categories/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let id = parse_category_id(&id)?;
    let Json(req) = payload.map_err(bad_json)?;
    let (name, description, color) = req.validate()?;

    let category = category_service::update(
        &state.pool,
        id,
        name.as_deref(),
        description.as_deref(),
        color.as_deref(),
    )
    .await?;
    Ok(Json(category))
}

/// DELETE /categories/:id - blocked while leads reference the category
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_category_id(&id)?;
    category_service::delete(&state.pool, id).await?;
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}

fn category_not_found() -> ApiError {
    ApiError::not_found(
        "Category not found",
        "The requested category does not exist",
    )
}

fn parse_category_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse::<Uuid>().map_err(|_| category_not_found())
}

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{bad_json, validate};
use crate::database::models::{LeadPriority, LeadResponse, LeadStatus};
use crate::error::{ApiError, FieldError};
use crate::filter::{LeadFilter, LeadListParams, Pagination};
use crate::middleware::auth::AuthUser;
use crate::services::{lead_service, stats_service};
use crate::services::lead_service::{LeadChanges, NewLead};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub actions: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub value: Option<f64>,
    pub category_id: Option<String>,
}

impl CreateLeadRequest {
    fn validate(self) -> Result<NewLead, ApiError> {
        let mut details = Vec::new();

        let title = self.title.unwrap_or_default().trim().to_string();
        if title.is_empty() {
            details.push(FieldError::new("title", "Title is required"));
        }

        if let Some(email) = self.email.as_deref() {
            if !validate::email_format(email) {
                details.push(FieldError::new("email", "Invalid email address"));
            }
        }

        if let Some(value) = self.value {
            if value <= 0.0 {
                details.push(FieldError::new("value", "Value must be positive"));
            }
        }

        let status = match self.status.as_deref() {
            Some(raw) => match raw.parse::<LeadStatus>() {
                Ok(status) => status,
                Err(_) => {
                    details.push(FieldError::new("status", "Invalid status"));
                    LeadStatus::New
                }
            },
            None => LeadStatus::New,
        };

        let priority = match self.priority.as_deref() {
            Some(raw) => match raw.parse::<LeadPriority>() {
                Ok(priority) => priority,
                Err(_) => {
                    details.push(FieldError::new("priority", "Invalid priority"));
                    LeadPriority::Medium
                }
            },
            None => LeadPriority::Medium,
        };

        let category_id = match self.category_id.as_deref() {
            Some(raw) => match raw.parse::<Uuid>() {
                Ok(id) => Some(id),
                Err(_) => {
                    details.push(FieldError::new("categoryId", "Category id must be a valid id"));
                    None
                }
            },
            None => {
                details.push(FieldError::new("categoryId", "Category is required"));
                None
            }
        };

        validate::reject_if_invalid(details)?;

        // A missing category always produced a violation above
        let Some(category_id) = category_id else {
            return Err(ApiError::validation(
                "Category is required",
                vec![FieldError::new("categoryId", "Category is required")],
            ));
        };

        Ok(NewLead {
            title,
            description: self.description,
            email: self.email,
            phone: self.phone,
            company: self.company,
            notes: self.notes,
            actions: self.actions,
            status,
            priority,
            value: self.value,
            category_id,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub actions: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub value: Option<f64>,
    pub category_id: Option<String>,
}

impl UpdateLeadRequest {
    fn validate(self) -> Result<LeadChanges, ApiError> {
        let mut details = Vec::new();

        let title = self.title.map(|t| t.trim().to_string());
        if let Some(title) = title.as_deref() {
            if title.is_empty() {
                details.push(FieldError::new("title", "Title cannot be empty"));
            }
        }

        if let Some(email) = self.email.as_deref() {
            if !validate::email_format(email) {
                details.push(FieldError::new("email", "Invalid email address"));
            }
        }

        if let Some(value) = self.value {
            if value <= 0.0 {
                details.push(FieldError::new("value", "Value must be positive"));
            }
        }

        let status = match self.status.as_deref() {
            Some(raw) => match raw.parse::<LeadStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    details.push(FieldError::new("status", "Invalid status"));
                    None
                }
            },
            None => None,
        };

        let priority = match self.priority.as_deref() {
            Some(raw) => match raw.parse::<LeadPriority>() {
                Ok(priority) => Some(priority),
                Err(_) => {
                    details.push(FieldError::new("priority", "Invalid priority"));
                    None
                }
            },
            None => None,
        };

        let category_id = match self.category_id.as_deref() {
            Some(raw) => match raw.parse::<Uuid>() {
                Ok(id) => Some(id),
                Err(_) => {
                    details.push(FieldError::new("categoryId", "Category id must be a valid id"));
                    None
                }
            },
            None => None,
        };

        validate::reject_if_invalid(details)?;

        Ok(LeadChanges {
            title,
            description: self.description,
            email: self.email,
            phone: self.phone,
            company: self.company,
            notes: self.notes,
            actions: self.actions,
            status,
            priority,
            value: self.value,
            category_id,
        })
    }
}

/// GET /leads - filtered, sorted, paginated listing of the caller's leads
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(params): Query<LeadListParams>,
) -> Result<Json<Value>, ApiError> {
    let filter = LeadFilter::from_params(auth_user.id, &params, &state.config.pagination)?;
    let (data, total) = lead_service::list(&state.pool, &filter).await?;
    let pagination = Pagination::new(filter.page, total);

    Ok(Json(json!({
        "data": data,
        "pagination": pagination,
    })))
}

/// GET /leads/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<LeadResponse>, ApiError> {
    let id = parse_lead_id(&id)?;
    let lead = lead_service::find_owned(&state.pool, id, auth_user.id).await?;
    Ok(Json(lead))
}

/// POST /leads
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<CreateLeadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LeadResponse>), ApiError> {
    let Json(req) = payload.map_err(bad_json)?;
    let new_lead = req.validate()?;

    let lead = lead_service::create(&state.pool, auth_user.id, new_lead).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

/// PUT /leads/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLeadRequest>, JsonRejection>,
) -> Result<Json<LeadResponse>, ApiError> {
    let id = parse_lead_id(&id)?;
    let Json(req) = payload.map_err(bad_json)?;
    let changes = req.validate()?;

    let lead = lead_service::update(&state.pool, id, auth_user.id, changes).await?;
    Ok(Json(lead))
}

/// DELETE /leads/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_lead_id(&id)?;
    lead_service::delete(&state.pool, id, auth_user.id).await?;
    Ok(Json(json!({ "message": "Lead deleted successfully" })))
}

/// GET /leads/stats/overview
pub async fn stats_overview(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<stats_service::StatsOverview>, ApiError> {
    let overview = stats_service::overview(&state.pool, auth_user.id).await?;
    Ok(Json(overview))
}

// A malformed id cannot name an existing lead, so it reports the same way
// as an absent one.
fn parse_lead_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse::<Uuid>().map_err(|_| {
        ApiError::not_found(
            "Lead not found",
            "The requested lead does not exist or you do not have access to it",
        )
    })
}

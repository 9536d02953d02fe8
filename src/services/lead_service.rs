use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{LeadPriority, LeadResponse, LeadRow, LeadStatus};
use crate::error::ApiError;
use crate::filter::{bind_values, LeadFilter};

/// Shared SELECT for lead reads: the lead row joined with its category and
/// a reduced owner projection.
pub const LEAD_SELECT: &str = "SELECT l.id, l.title, l.description, l.email, l.phone, \
    l.company, l.notes, l.actions, l.status, l.priority, l.value, l.category_id, \
    l.user_id, l.created_at, l.updated_at, \
    c.name AS category_name, c.description AS category_description, \
    c.color AS category_color, c.created_at AS category_created_at, \
    c.updated_at AS category_updated_at, \
    u.name AS owner_name, u.email AS owner_email \
    FROM leads l \
    JOIN categories c ON c.id = l.category_id \
    JOIN users u ON u.id = l.user_id";

/// Validated input for lead creation; defaults already applied.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub title: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub actions: Option<String>,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub value: Option<f64>,
    pub category_id: Uuid,
}

/// Validated update; absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct LeadChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub actions: Option<String>,
    pub status: Option<LeadStatus>,
    pub priority: Option<LeadPriority>,
    pub value: Option<f64>,
    pub category_id: Option<Uuid>,
}

fn lead_not_found() -> ApiError {
    // Leads owned by other users produce the same response as absent rows
    ApiError::not_found(
        "Lead not found",
        "The requested lead does not exist or you do not have access to it",
    )
}

fn invalid_category() -> ApiError {
    ApiError::conflict("Invalid category", "The specified category does not exist")
}

/// One page of the caller's leads plus the total over the un-paged
/// predicate. The count query skips the joins since the filter only
/// touches lead columns.
pub async fn list(pool: &PgPool, filter: &LeadFilter) -> Result<(Vec<LeadResponse>, i64), ApiError> {
    let (where_sql, params) = filter.where_sql();

    let count_sql = format!("SELECT COUNT(*) FROM leads l WHERE {where_sql}");
    let (total,) = bind_values(sqlx::query_as::<_, (i64,)>(&count_sql), &params)
        .fetch_one(pool)
        .await?;

    let list_sql = format!(
        "{LEAD_SELECT} WHERE {where_sql} {} {}",
        filter.order_sql(),
        filter.limit_sql()
    );
    let leads = bind_values(sqlx::query_as::<_, LeadRow>(&list_sql), &params)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(LeadRow::into_response)
        .collect();

    Ok((leads, total))
}

pub async fn find_owned(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<LeadResponse, ApiError> {
    let row = sqlx::query_as::<_, LeadRow>(&format!(
        "{LEAD_SELECT} WHERE l.id = $1 AND l.user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(LeadRow::into_response).ok_or_else(lead_not_found)
}

async fn exists_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, ApiError> {
    let row = sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM leads WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0 > 0)
}

pub async fn create(pool: &PgPool, user_id: Uuid, lead: NewLead) -> Result<LeadResponse, ApiError> {
    // The category must exist at write time
    if crate::services::category_service::find_by_id(pool, lead.category_id)
        .await?
        .is_none()
    {
        return Err(invalid_category());
    }

    let (id,) = sqlx::query_as::<_, (Uuid,)>(
        "INSERT INTO leads (title, description, email, phone, company, notes, actions, \
         status, priority, value, category_id, user_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING id",
    )
    .bind(&lead.title)
    .bind(&lead.description)
    .bind(&lead.email)
    .bind(&lead.phone)
    .bind(&lead.company)
    .bind(&lead.notes)
    .bind(&lead.actions)
    .bind(lead.status)
    .bind(lead.priority)
    .bind(lead.value)
    .bind(lead.category_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    find_owned(pool, id, user_id).await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    changes: LeadChanges,
) -> Result<LeadResponse, ApiError> {
    if !exists_owned(pool, id, user_id).await? {
        return Err(lead_not_found());
    }

    // Re-check the category reference when it is being changed
    if let Some(category_id) = changes.category_id {
        if crate::services::category_service::find_by_id(pool, category_id)
            .await?
            .is_none()
        {
            return Err(invalid_category());
        }
    }

    sqlx::query(
        "UPDATE leads SET \
         title = COALESCE($3, title), \
         description = COALESCE($4, description), \
         email = COALESCE($5, email), \
         phone = COALESCE($6, phone), \
         company = COALESCE($7, company), \
         notes = COALESCE($8, notes), \
         actions = COALESCE($9, actions), \
         status = COALESCE($10, status), \
         priority = COALESCE($11, priority), \
         value = COALESCE($12, value), \
         category_id = COALESCE($13, category_id), \
         updated_at = now() \
         WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(&changes.email)
    .bind(&changes.phone)
    .bind(&changes.company)
    .bind(&changes.notes)
    .bind(&changes.actions)
    .bind(changes.status)
    .bind(changes.priority)
    .bind(changes.value)
    .bind(changes.category_id)
    .execute(pool)
    .await?;

    find_owned(pool, id, user_id).await
}

pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    if !exists_owned(pool, id, user_id).await? {
        return Err(lead_not_found());
    }

    sqlx::query("DELETE FROM leads WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

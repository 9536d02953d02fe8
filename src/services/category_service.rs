use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Category, CategoryWithCount, LeadResponse, LeadRow};
use crate::error::ApiError;
use crate::services::lead_service::LEAD_SELECT;

fn category_not_found() -> ApiError {
    ApiError::not_found(
        "Category not found",
        "The requested category does not exist",
    )
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Category>, ApiError> {
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(category)
}

pub async fn name_taken(pool: &PgPool, name: &str) -> Result<bool, ApiError> {
    let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM categories WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(row.0 > 0)
}

/// All categories with their lead counts, ordered by name.
pub async fn list(pool: &PgPool) -> Result<Vec<CategoryWithCount>, ApiError> {
    let categories = sqlx::query_as::<_, CategoryWithCount>(
        "SELECT c.id, c.name, c.description, c.color, c.created_at, c.updated_at, \
         COUNT(l.id) AS lead_count \
         FROM categories c LEFT JOIN leads l ON l.category_id = c.id \
         GROUP BY c.id ORDER BY c.name ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Category detail: the row, its lead count, and every lead referencing it
/// (all owners), newest first.
pub async fn detail(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<(CategoryWithCount, Vec<LeadResponse>)>, ApiError> {
    let category = sqlx::query_as::<_, CategoryWithCount>(
        "SELECT c.id, c.name, c.description, c.color, c.created_at, c.updated_at, \
         COUNT(l.id) AS lead_count \
         FROM categories c LEFT JOIN leads l ON l.category_id = c.id \
         WHERE c.id = $1 GROUP BY c.id",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(category) = category else {
        return Ok(None);
    };

    let leads = sqlx::query_as::<_, LeadRow>(&format!(
        "{LEAD_SELECT} WHERE l.category_id = $1 ORDER BY l.created_at DESC"
    ))
    .bind(id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(LeadRow::into_response)
    .collect();

    Ok(Some((category, leads)))
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    color: Option<&str>,
) -> Result<Category, ApiError> {
    if name_taken(pool, name).await? {
        return Err(ApiError::conflict(
            "Category already exists",
            "A category with this name already exists",
        ));
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, description, color) \
         VALUES ($1, $2, COALESCE($3, '#3b82f6')) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(color)
    .fetch_one(pool)
    .await?;
    Ok(category)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
    color: Option<&str>,
) -> Result<Category, ApiError> {
    let existing = find_by_id(pool, id).await?.ok_or_else(category_not_found)?;

    // Renaming onto another category's name is a conflict
    if let Some(new_name) = name {
        if new_name != existing.name && name_taken(pool, new_name).await? {
            return Err(ApiError::conflict(
                "Category name already exists",
                "A category with this name already exists",
            ));
        }
    }

    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = COALESCE($2, name), \
         description = COALESCE($3, description), color = COALESCE($4, color), \
         updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(color)
    .fetch_one(pool)
    .await?;
    Ok(category)
}

/// Deletion is blocked while any lead still references the category; the
/// error names the count so the client can surface it.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    find_by_id(pool, id).await?.ok_or_else(category_not_found)?;

    let (lead_count,) =
        sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM leads WHERE category_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;

    if lead_count > 0 {
        return Err(ApiError::conflict(
            "Cannot delete category",
            format!(
                "This category has {} lead(s) associated with it. Please move or delete the leads first.",
                lead_count
            ),
        ));
    }

    sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{User, UserPublic, UserWithLeadCount};
use crate::error::ApiError;
use crate::filter::{bind_values, Pagination, UserFilter};
use crate::middleware::auth::AuthUser;

const USER_PUBLIC_COLUMNS: &str = "id, email, name, role, created_at, updated_at";

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_public(pool: &PgPool, id: Uuid) -> Result<Option<UserPublic>, ApiError> {
    let user = sqlx::query_as::<_, UserPublic>(&format!(
        "SELECT {USER_PUBLIC_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Per-request identity lookup for the auth middleware. Runs on every
/// request so a credential for a deleted user is rejected even when the
/// signature is still valid.
pub async fn find_auth(pool: &PgPool, id: Uuid) -> Result<Option<AuthUser>, ApiError> {
    let user = sqlx::query_as::<_, AuthUser>("SELECT id, email, role FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn insert(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    name: &str,
) -> Result<UserPublic, ApiError> {
    let user = sqlx::query_as::<_, UserPublic>(&format!(
        "INSERT INTO users (email, password, name) VALUES ($1, $2, $3) \
         RETURNING {USER_PUBLIC_COLUMNS}"
    ))
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

pub async fn email_taken_by_other(
    pool: &PgPool,
    email: &str,
    user_id: Uuid,
) -> Result<bool, ApiError> {
    let row = sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM users WHERE email = $1 AND id <> $2",
    )
    .bind(email)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0 > 0)
}

/// Update name and/or email; absent fields keep their current value.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<UserPublic, ApiError> {
    let user = sqlx::query_as::<_, UserPublic>(&format!(
        "UPDATE users SET name = COALESCE($2, name), email = COALESCE($3, email), \
         updated_at = now() WHERE id = $1 RETURNING {USER_PUBLIC_COLUMNS}"
    ))
    .bind(id)
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

pub async fn update_password(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<(), ApiError> {
    sqlx::query("UPDATE users SET password = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

/// Removes the account; the schema cascades deletion of the user's leads.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn lead_count(pool: &PgPool, user_id: Uuid) -> Result<i64, ApiError> {
    let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM leads WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Admin listing: newest-first page of users with per-user lead counts,
/// optionally narrowed by a name/email search.
pub async fn list(
    pool: &PgPool,
    filter: &UserFilter,
) -> Result<(Vec<UserWithLeadCount>, Pagination), ApiError> {
    let (where_sql, params) = filter.where_sql();

    let count_sql = format!("SELECT COUNT(*) FROM users u WHERE {where_sql}");
    let (total,) = bind_values(sqlx::query_as::<_, (i64,)>(&count_sql), &params)
        .fetch_one(pool)
        .await?;

    let list_sql = format!(
        "SELECT u.id, u.email, u.name, u.role, u.created_at, u.updated_at, \
         COUNT(l.id) AS lead_count \
         FROM users u LEFT JOIN leads l ON l.user_id = u.id \
         WHERE {where_sql} \
         GROUP BY u.id ORDER BY u.created_at DESC {}",
        filter.limit_sql()
    );
    let users = bind_values(sqlx::query_as::<_, UserWithLeadCount>(&list_sql), &params)
        .fetch_all(pool)
        .await?;

    Ok((users, Pagination::new(filter.page, total)))
}

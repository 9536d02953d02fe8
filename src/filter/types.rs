use serde::Serialize;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};
use uuid::Uuid;

use super::error::FilterError;
use crate::config::PaginationConfig;
use crate::database::models::{LeadPriority, LeadStatus};

/// Sort columns exposed by the lead list. Anything else is rejected before
/// SQL generation, so column names never come from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    Title,
    Value,
    UpdatedAt,
}

impl SortField {
    pub fn parse(s: &str) -> Result<Self, FilterError> {
        match s {
            "createdAt" => Ok(SortField::CreatedAt),
            "title" => Ok(SortField::Title),
            "value" => Ok(SortField::Value),
            "updatedAt" => Ok(SortField::UpdatedAt),
            other => Err(FilterError::InvalidSortField(other.to_string())),
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "l.created_at",
            SortField::Title => "l.title",
            SortField::Value => "l.value",
            SortField::UpdatedAt => "l.updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Result<Self, FilterError> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(FilterError::InvalidSortOrder(other.to_string())),
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Validated 1-based page window.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    /// Lenient numeric parsing: garbage or out-of-range input clamps to the
    /// configured defaults instead of erroring, so `pages` can never divide
    /// by zero downstream.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>, config: &PaginationConfig) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(config.default_limit)
            .min(config.max_limit);

        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Pagination envelope returned alongside list data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(params: PageParams, total: i64) -> Self {
        // params.limit is validated >= 1, making the ceiling division safe
        let pages = (total + params.limit - 1) / params.limit;
        Self {
            page: params.page,
            limit: params.limit,
            total,
            pages,
        }
    }
}

/// A typed value destined for a numbered SQL parameter.
#[derive(Debug, Clone)]
pub enum BindValue {
    Uuid(Uuid),
    Text(String),
    Status(LeadStatus),
    Priority(LeadPriority),
}

pub fn bind_values<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    params: &[BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    for p in params {
        q = match p {
            BindValue::Uuid(v) => q.bind(*v),
            BindValue::Text(v) => q.bind(v.clone()),
            BindValue::Status(v) => q.bind(*v),
            BindValue::Priority(v) => q.bind(*v),
        };
    }
    q
}

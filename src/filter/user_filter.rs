use serde::Deserialize;

use super::types::{BindValue, PageParams};
use crate::config::PaginationConfig;

/// Raw query-string input for the admin user listing.
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

/// Validated admin user listing query: optional name/email search plus the
/// page window. Sorting is fixed to newest-first.
#[derive(Debug, Clone)]
pub struct UserFilter {
    pub search: Option<String>,
    pub page: PageParams,
}

impl UserFilter {
    pub fn from_params(params: &UserListParams, config: &PaginationConfig) -> Self {
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            search,
            page: PageParams::from_raw(params.page.as_deref(), params.limit.as_deref(), config),
        }
    }

    pub fn where_sql(&self) -> (String, Vec<BindValue>) {
        match &self.search {
            Some(search) => (
                "(u.name ILIKE $1 OR u.email ILIKE $1)".to_string(),
                vec![BindValue::Text(format!("%{}%", search))],
            ),
            None => ("TRUE".to_string(), vec![]),
        }
    }

    pub fn limit_sql(&self) -> String {
        format!("LIMIT {} OFFSET {}", self.page.limit, self.page.offset())
    }
}

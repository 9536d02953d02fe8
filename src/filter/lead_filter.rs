use serde::Deserialize;
use uuid::Uuid;

use super::error::FilterError;
use super::types::{BindValue, PageParams, SortDirection, SortField};
use crate::config::PaginationConfig;
use crate::database::models::{LeadPriority, LeadStatus};

/// Raw query-string input for `GET /leads`. Everything arrives as optional
/// text; validation happens when this is turned into a `LeadFilter`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Validated lead list query. The owning user id always comes from the
/// authenticated caller and cannot be overridden by request input.
#[derive(Debug, Clone)]
pub struct LeadFilter {
    pub user_id: Uuid,
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub status: Option<LeadStatus>,
    pub priority: Option<LeadPriority>,
    pub sort: SortField,
    pub direction: SortDirection,
    pub page: PageParams,
}

impl LeadFilter {
    pub fn from_params(
        user_id: Uuid,
        params: &LeadListParams,
        config: &PaginationConfig,
    ) -> Result<Self, FilterError> {
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let category_id = match params.category_id.as_deref() {
            Some(raw) => Some(
                raw.parse::<Uuid>()
                    .map_err(|_| FilterError::InvalidCategoryId(raw.to_string()))?,
            ),
            None => None,
        };

        let status = match params.status.as_deref() {
            Some(raw) => Some(
                raw.parse::<LeadStatus>()
                    .map_err(|_| FilterError::InvalidStatus(raw.to_string()))?,
            ),
            None => None,
        };

        let priority = match params.priority.as_deref() {
            Some(raw) => Some(
                raw.parse::<LeadPriority>()
                    .map_err(|_| FilterError::InvalidPriority(raw.to_string()))?,
            ),
            None => None,
        };

        let sort = match params.sort_by.as_deref() {
            Some(raw) => SortField::parse(raw)?,
            None => SortField::CreatedAt,
        };

        let direction = match params.sort_order.as_deref() {
            Some(raw) => SortDirection::parse(raw)?,
            None => SortDirection::Desc,
        };

        Ok(Self {
            user_id,
            search,
            category_id,
            status,
            priority,
            sort,
            direction,
            page: PageParams::from_raw(params.page.as_deref(), params.limit.as_deref(), config),
        })
    }

    /// Lower the filter into a WHERE clause with numbered parameters,
    /// starting at $1. The search term is bound once and referenced from
    /// each of the four searched columns.
    pub fn where_sql(&self) -> (String, Vec<BindValue>) {
        let mut conditions = vec!["l.user_id = $1".to_string()];
        let mut params = vec![BindValue::Uuid(self.user_id)];

        if let Some(search) = &self.search {
            let n = params.len() + 1;
            conditions.push(format!(
                "(l.title ILIKE ${n} OR l.description ILIKE ${n} OR l.company ILIKE ${n} OR l.email ILIKE ${n})"
            ));
            params.push(BindValue::Text(format!("%{}%", search)));
        }

        if let Some(category_id) = self.category_id {
            conditions.push(format!("l.category_id = ${}", params.len() + 1));
            params.push(BindValue::Uuid(category_id));
        }

        if let Some(status) = self.status {
            conditions.push(format!("l.status = ${}", params.len() + 1));
            params.push(BindValue::Status(status));
        }

        if let Some(priority) = self.priority {
            conditions.push(format!("l.priority = ${}", params.len() + 1));
            params.push(BindValue::Priority(priority));
        }

        (conditions.join(" AND "), params)
    }

    pub fn order_sql(&self) -> String {
        format!("ORDER BY {} {}", self.sort.column(), self.direction.to_sql())
    }

    pub fn limit_sql(&self) -> String {
        format!("LIMIT {} OFFSET {}", self.page.limit, self.page.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig {
            default_limit: 10,
            max_limit: 100,
        }
    }

    fn params() -> LeadListParams {
        LeadListParams::default()
    }

    #[test]
    fn bare_filter_scopes_to_owner_only() {
        let user_id = Uuid::new_v4();
        let filter = LeadFilter::from_params(user_id, &params(), &config()).unwrap();

        let (sql, binds) = filter.where_sql();
        assert_eq!(sql, "l.user_id = $1");
        assert_eq!(binds.len(), 1);
        assert_eq!(filter.order_sql(), "ORDER BY l.created_at DESC");
        assert_eq!(filter.limit_sql(), "LIMIT 10 OFFSET 0");
    }

    #[test]
    fn search_binds_one_param_for_four_columns() {
        let mut raw = params();
        raw.search = Some("acme".into());
        let filter = LeadFilter::from_params(Uuid::new_v4(), &raw, &config()).unwrap();

        let (sql, binds) = filter.where_sql();
        assert!(sql.contains("l.title ILIKE $2"));
        assert!(sql.contains("l.description ILIKE $2"));
        assert!(sql.contains("l.company ILIKE $2"));
        assert!(sql.contains("l.email ILIKE $2"));
        assert_eq!(binds.len(), 2);
        match &binds[1] {
            BindValue::Text(s) => assert_eq!(s, "%acme%"),
            other => panic!("expected text bind, got {:?}", other),
        }
    }

    #[test]
    fn all_filters_are_and_conditions_with_sequential_params() {
        let category_id = Uuid::new_v4();
        let mut raw = params();
        raw.search = Some("deal".into());
        raw.category_id = Some(category_id.to_string());
        raw.status = Some("WON".into());
        raw.priority = Some("HIGH".into());
        let filter = LeadFilter::from_params(Uuid::new_v4(), &raw, &config()).unwrap();

        let (sql, binds) = filter.where_sql();
        assert!(sql.contains("l.category_id = $3"));
        assert!(sql.contains("l.status = $4"));
        assert!(sql.contains("l.priority = $5"));
        assert_eq!(sql.matches(" AND ").count(), 4);
        assert_eq!(binds.len(), 5);
    }

    #[test]
    fn blank_search_is_ignored() {
        let mut raw = params();
        raw.search = Some("   ".into());
        let filter = LeadFilter::from_params(Uuid::new_v4(), &raw, &config()).unwrap();
        assert!(filter.search.is_none());
    }

    #[test]
    fn invalid_enum_values_are_rejected() {
        let mut raw = params();
        raw.status = Some("OPEN".into());
        assert!(matches!(
            LeadFilter::from_params(Uuid::new_v4(), &raw, &config()),
            Err(FilterError::InvalidStatus(_))
        ));

        let mut raw = params();
        raw.priority = Some("SEVERE".into());
        assert!(matches!(
            LeadFilter::from_params(Uuid::new_v4(), &raw, &config()),
            Err(FilterError::InvalidPriority(_))
        ));

        let mut raw = params();
        raw.category_id = Some("not-a-uuid".into());
        assert!(matches!(
            LeadFilter::from_params(Uuid::new_v4(), &raw, &config()),
            Err(FilterError::InvalidCategoryId(_))
        ));
    }

    #[test]
    fn sort_order_flips_direction() {
        let mut raw = params();
        raw.sort_by = Some("title".into());
        raw.sort_order = Some("asc".into());
        let filter = LeadFilter::from_params(Uuid::new_v4(), &raw, &config()).unwrap();
        assert_eq!(filter.order_sql(), "ORDER BY l.title ASC");
    }
}

use thiserror::Error;

use crate::error::{ApiError, FieldError};

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("Invalid sort order: {0}")]
    InvalidSortOrder(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Invalid category id: {0}")]
    InvalidCategoryId(String),
}

impl FilterError {
    fn field(&self) -> &'static str {
        match self {
            FilterError::InvalidSortField(_) => "sortBy",
            FilterError::InvalidSortOrder(_) => "sortOrder",
            FilterError::InvalidStatus(_) => "status",
            FilterError::InvalidPriority(_) => "priority",
            FilterError::InvalidCategoryId(_) => "categoryId",
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        let message = err.to_string();
        ApiError::validation(message.clone(), vec![FieldError::new(err.field(), message)])
    }
}

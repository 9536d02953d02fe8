pub mod error;
pub mod lead_filter;
pub mod types;
pub mod user_filter;

pub use error::FilterError;
pub use lead_filter::{LeadFilter, LeadListParams};
pub use types::{bind_values, BindValue, PageParams, Pagination, SortDirection, SortField};
pub use user_filter::{UserFilter, UserListParams};

pub mod category;
pub mod lead;
pub mod user;

pub use category::{Category, CategoryWithCount};
pub use lead::{LeadPriority, LeadResponse, LeadRow, LeadStatus};
pub use user::{Role, User, UserPublic, UserSummary, UserWithLeadCount};

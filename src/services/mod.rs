pub mod category_service;
pub mod lead_service;
pub mod stats_service;
pub mod user_service;

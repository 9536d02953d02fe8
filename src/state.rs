use sqlx::PgPool;

use crate::config::AppConfig;

/// Shared application state handed to every handler through axum's `State`
/// extractor. The pool is the only connection handle to the store; nothing
/// hangs off module-level globals.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pool: PgPool,
}

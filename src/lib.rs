pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::Router;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login));

    let protected = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/verify", post(handlers::auth::verify))
        .route("/leads", get(handlers::leads::list).post(handlers::leads::create))
        .route("/leads/stats/overview", get(handlers::leads::stats_overview))
        .route(
            "/leads/:id",
            get(handlers::leads::get)
                .put(handlers::leads::update)
                .delete(handlers::leads::delete),
        )
        .route(
            "/categories",
            get(handlers::categories::list).post(handlers::categories::create),
        )
        .route(
            "/categories/:id",
            get(handlers::categories::get)
                .put(handlers::categories::update)
                .delete(handlers::categories::delete),
        )
        .route(
            "/users/profile",
            get(handlers::users::profile).put(handlers::users::update_profile),
        )
        .route("/users/change-password", put(handlers::users::change_password))
        .route("/users/account", delete(handlers::users::delete_account))
        .route("/users", get(handlers::users::list))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Connect, migrate, and serve until shutdown.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let pool = database::connect(&config.database).await?;
    database::migrate(&pool).await?;

    let port = config.server.port;
    let state = AppState { config, pool };
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("LeadList API listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "LeadList API",
        "version": version,
        "description": "CRM backend for categorized sales leads",
        "endpoints": {
            "auth": "/auth/register, /auth/login (public), /auth/me, /auth/verify",
            "leads": "/leads[/:id], /leads/stats/overview",
            "categories": "/categories[/:id]",
            "users": "/users/profile, /users/change-password, /users/account, /users (admin)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok",
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string(),
            })),
        ),
    }
}

//! Krishak Mitra - farmer advisory backend
//!
//! Farm records, saved plans, a community forum and mandi price alerts for
//! Indian farmers, plus model-backed advisory flows for crop planning,
//! diagnosis, nutrient and water management, selling and schemes.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;

use external::Integrations;
use services::{PgAlertStore, PriceAlertChecker};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub integrations: Integrations,
}

impl AppState {
    /// Price checker over the database and the configured adapters
    pub fn price_alert_checker(&self) -> PriceAlertChecker {
        PriceAlertChecker::new(
            Arc::new(PgAlertStore::new(self.db.clone())),
            self.integrations.prices.clone(),
            self.integrations.notifier.clone(),
        )
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let media = ServeDir::new(state.integrations.storage.media_dir());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .nest_service("/media", media)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Krishak Mitra API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

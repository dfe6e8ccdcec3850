//! Digital printing backend
//!
//! Item rules for fabrics, print processes and printed designs, the fabric
//! printing summary report, and the HTTP API serving them.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod patches;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;

use config::ItemSettings;
use services::reporting::{ReportingService, SummarySource};
use services::ItemService;
use store::ItemStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<dyn ItemStore>,
    pub summary: Arc<dyn SummarySource>,
    pub item_settings: ItemSettings,
}

impl AppState {
    pub fn new(
        items: Arc<dyn ItemStore>,
        summary: Arc<dyn SummarySource>,
        item_settings: ItemSettings,
    ) -> Self {
        Self {
            items,
            summary,
            item_settings,
        }
    }

    pub fn item_service(&self) -> ItemService {
        ItemService::new(self.items.clone(), self.item_settings)
    }

    pub fn reporting_service(&self) -> ReportingService {
        ReportingService::new(self.summary.clone())
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Digital Printing API v1.0"
}

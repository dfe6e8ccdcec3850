//! Route definitions for the digital printing API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/items", item_routes())
        .nest("/reports", report_routes())
}

/// Item routes
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::save_item))
        .route("/new", get(handlers::new_item))
        .route("/override-fields", get(handlers::get_override_fields))
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/:name", get(handlers::get_item))
}

/// Report routes
fn report_routes() -> Router<AppState> {
    Router::new().route(
        "/fabric-printing-summary",
        get(handlers::get_fabric_printing_summary),
    )
}

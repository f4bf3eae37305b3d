//! Route definitions for the pharmacy alerts server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - inventory alerts
        .nest("/alerts", alert_routes(state.clone()))
        // Protected routes - batch utilities
        .nest("/batches", batch_routes(state))
}

/// Inventory alert routes (protected)
fn alert_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_alerts))
        .route("/all", get(handlers::get_combined_alerts))
        .route("/export.csv", get(handlers::export_alerts_csv))
        .route("/:bucket", get(handlers::get_alert_bucket))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Batch routes (protected)
fn batch_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/classify", post(handlers::classify_batch))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

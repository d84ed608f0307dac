//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Filter controls and raw records
        .route("/filters", get(handlers::get_filters))
        .route("/records", get(handlers::get_records))
        .route("/summary", get(handlers::get_summary))
        // Visualization endpoints
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/charts/{dimension}", get(handlers::get_chart))
        .route("/time-series", get(handlers::get_time_series))
        .route("/panels", post(handlers::post_panels))
        // Diagnostics and download
        .route("/quality", get(handlers::get_quality))
        .route("/export.csv", get(handlers::export_csv));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Dataset;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(Arc::new(Dataset::empty("test")));
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}

//! Climate API Service Library
//!
//! HTTP boundary over the climate extraction pipelines: request parsing,
//! error-to-status mapping, health and Prometheus metrics.

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod state;
pub mod sweeper;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the service router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get_mean_data_bridge", post(handlers::mean_data_handler))
        .route("/get_ts_data_cmip", post(handlers::time_series_handler))
        // Health and metrics
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

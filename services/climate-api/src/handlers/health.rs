//! Health and metrics handlers.

use std::sync::Arc;

use axum::extract::Extension;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub cache_entries: usize,
    pub cache_capacity: usize,
    pub uptime_secs: u64,
}

/// GET /health - Basic health check with cache occupancy
pub async fn health_handler(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        cache_entries: state.cache.len().await,
        cache_capacity: state.cache.capacity(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let Some(handle) = &state.prometheus else {
        return (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed\n")
            .into_response();
    };

    crate::metrics::record_cache_stats(&state.cache.stats().await);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response()
}

//! Annual climatology endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use serde::Deserialize;
use tracing::info;

use super::{recorded, ApiError};
use crate::state::AppState;

/// Body of `POST /get_mean_data_bridge`.
#[derive(Debug, Deserialize)]
pub struct MeanDataRequest {
    pub model_ids: Vec<String>,
    /// `[lat, lon]` pairs, one per model id.
    pub locations: Vec<(f64, f64)>,
    pub variable: String,
}

/// POST /get_mean_data_bridge - one value per (model, location) pair
pub async fn mean_data_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<MeanDataRequest>, JsonRejection>,
) -> Result<Json<Vec<f64>>, ApiError> {
    let started = Instant::now();
    let result = mean_data(&state, payload).await;
    recorded("get_mean_data_bridge", started, result)
}

async fn mean_data(
    state: &AppState,
    payload: Result<Json<MeanDataRequest>, JsonRejection>,
) -> Result<Json<Vec<f64>>, ApiError> {
    let Json(request) = payload?;
    let values = state
        .pipeline
        .annual_climatology(&request.variable, &request.model_ids, &request.locations)
        .await?;

    info!(
        variable = %request.variable,
        count = values.len(),
        "Served climatology"
    );
    Ok(Json(values))
}

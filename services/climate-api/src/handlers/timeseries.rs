//! CMIP6 time-series endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use climate_extract::{ClimateVariable, Frequency, LookupRequest};
use serde::Deserialize;
use tracing::info;

use super::{recorded, ApiError};
use crate::state::AppState;

/// Body of `POST /get_ts_data_cmip`.
#[derive(Debug, Deserialize)]
pub struct TimeSeriesRequest {
    /// Scenario (`ssp126`, `ssp245`, `ssp370`, `ssp585`) or `PI`.
    pub model_id: String,
    /// `[lat, lon]`
    pub location: (f64, f64),
    pub variable: String,
    /// `mm` (monthly) or `ym` (annual)
    pub frequency: String,
}

impl TimeSeriesRequest {
    fn to_lookup(&self) -> Result<LookupRequest, ApiError> {
        let variable: ClimateVariable = self.variable.parse()?;
        let frequency: Frequency = self.frequency.parse()?;
        let (lat, lon) = self.location;
        Ok(LookupRequest::series(self.model_id.as_str(), lat, lon, variable, frequency))
    }
}

/// POST /get_ts_data_cmip - full time axis at one location
pub async fn time_series_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<TimeSeriesRequest>, JsonRejection>,
) -> Result<Json<Vec<f64>>, ApiError> {
    let started = Instant::now();
    let result = time_series(&state, payload).await;
    recorded("get_ts_data_cmip", started, result)
}

async fn time_series(
    state: &AppState,
    payload: Result<Json<TimeSeriesRequest>, JsonRejection>,
) -> Result<Json<Vec<f64>>, ApiError> {
    let Json(request) = payload?;
    let lookup = request.to_lookup()?;
    let series = state.pipeline.time_series(&lookup).await?;

    info!(
        model_id = %lookup.model_id,
        variable = %lookup.variable,
        steps = series.len(),
        "Served time series"
    );
    Ok(Json(series))
}

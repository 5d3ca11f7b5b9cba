//! HTTP request handlers for the climate API.

pub mod climatology;
pub mod error;
pub mod health;
pub mod timeseries;

pub use climatology::mean_data_handler;
pub use error::ApiError;
pub use health::{health_handler, metrics_handler};
pub use timeseries::time_series_handler;

use std::time::Instant;

/// Record the outcome of a request on `endpoint` and pass it through.
fn recorded<T>(
    endpoint: &'static str,
    started: Instant,
    result: Result<T, ApiError>,
) -> Result<T, ApiError> {
    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status().as_u16(),
    };
    crate::metrics::record_request(endpoint, status, started.elapsed());
    result
}

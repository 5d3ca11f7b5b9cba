//! Typed extraction requests and results.

use serde::Serialize;

use crate::archive::{validate_model_id, Frequency};
use crate::coords::{normalize_longitude, validate_location};
use crate::error::{ExtractionError, Result};
use crate::variables::ClimateVariable;

/// One point extraction.
///
/// A request with a frequency asks for a time series; one without asks for
/// an annual climatology value.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub model_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub variable: ClimateVariable,
    pub frequency: Option<Frequency>,
}

impl LookupRequest {
    pub fn climatology(
        model_id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        variable: ClimateVariable,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            latitude,
            longitude,
            variable,
            frequency: None,
        }
    }

    pub fn series(
        model_id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        variable: ClimateVariable,
        frequency: Frequency,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            latitude,
            longitude,
            variable,
            frequency: Some(frequency),
        }
    }

    /// Check the model id and location before any file is touched.
    pub fn validate(&self) -> Result<()> {
        validate_model_id(&self.model_id)?;
        validate_location(self.latitude, self.longitude).map_err(ExtractionError::Validation)
    }

    /// Longitude in the archive's [0, 360) convention.
    pub fn archive_longitude(&self) -> f64 {
        normalize_longitude(self.longitude)
    }
}

/// Converted values for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionResult {
    Scalar(f64),
    Series(Vec<f64>),
}

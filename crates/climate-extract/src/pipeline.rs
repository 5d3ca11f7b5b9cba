//! Annual-climatology and time-series extraction.
//!
//! Both pipelines resolve a file from the archive layout, borrow the dataset
//! from the shared [`DatasetCache`], sample the nearest grid cell and convert
//! the values to display units.

use std::path::Path;
use std::sync::Arc;

use dataset_cache::{DatasetCache, DatasetLoader};
use futures::future::try_join_all;
use netcdf_grid::GridDataset;
use tracing::{debug, error, instrument};

use crate::archive::{Archive, Scenario};
use crate::error::{ExtractionError, Result};
use crate::request::{ExtractionResult, LookupRequest};
use crate::units::UnitConversion;
use crate::variables::ClimateVariable;

/// Extraction over one archive, backed by a shared dataset cache.
pub struct ExtractionPipeline<L: DatasetLoader> {
    cache: Arc<DatasetCache<L>>,
    archive: Archive,
}

impl<L: DatasetLoader> ExtractionPipeline<L> {
    pub fn new(cache: Arc<DatasetCache<L>>, archive: Archive) -> Self {
        Self { cache, archive }
    }

    pub fn cache(&self) -> &Arc<DatasetCache<L>> {
        &self.cache
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    /// Annual climatology values for paired model ids and locations.
    ///
    /// The result mirrors the input order. Every element is validated before
    /// any file is opened, and the first failing element fails the batch.
    #[instrument(skip(self, model_ids, locations), fields(count = model_ids.len()))]
    pub async fn annual_climatology(
        &self,
        variable: &str,
        model_ids: &[String],
        locations: &[(f64, f64)],
    ) -> Result<Vec<f64>> {
        let variable: ClimateVariable = variable.parse()?;
        if model_ids.len() != locations.len() {
            return Err(ExtractionError::validation(format!(
                "model_ids has {} entries but locations has {}",
                model_ids.len(),
                locations.len()
            )));
        }

        let requests: Vec<LookupRequest> = model_ids
            .iter()
            .zip(locations)
            .map(|(model_id, &(lat, lon))| {
                LookupRequest::climatology(model_id.as_str(), lat, lon, variable)
            })
            .collect();
        for request in &requests {
            request.validate()?;
        }

        try_join_all(requests.iter().map(|request| self.climatology_value(request))).await
    }

    /// Annual climatology value for a single model and location.
    pub async fn climatology_value(&self, request: &LookupRequest) -> Result<f64> {
        request.validate()?;
        let path = self.archive.climatology_path(&request.model_id);
        let values = self
            .sample(&request.model_id, &path, request.variable.bridge_name(), request)
            .await?;

        match values.as_slice() {
            [value] => Ok(*value),
            _ => Err(self.fail(ExtractionError::processing(
                path.display().to_string(),
                format!(
                    "expected a single value for {}, got {}",
                    request.variable.bridge_name(),
                    values.len()
                ),
            ))),
        }
    }

    /// Time series for a CMIP6 scenario (or `PI`) in chronological order.
    #[instrument(
        skip(self, request),
        fields(model_id = %request.model_id, variable = %request.variable)
    )]
    pub async fn time_series(&self, request: &LookupRequest) -> Result<Vec<f64>> {
        let scenario: Scenario = request.model_id.parse()?;
        let frequency = request
            .frequency
            .ok_or_else(|| ExtractionError::validation("frequency is required for a time series"))?;
        request.validate()?;

        let path = self.archive.series_path(request.variable, scenario, frequency);
        self.sample(&request.model_id, &path, request.variable.cmip_name(), request)
            .await
    }

    /// Run a request through the pipeline its shape selects.
    pub async fn extract(&self, request: &LookupRequest) -> Result<ExtractionResult> {
        match request.frequency {
            Some(_) => self.time_series(request).await.map(ExtractionResult::Series),
            None => self
                .climatology_value(request)
                .await
                .map(ExtractionResult::Scalar),
        }
    }

    /// Borrow the dataset at `path` and read converted values at the
    /// request's nearest grid cell.
    async fn sample(
        &self,
        model_id: &str,
        path: &Path,
        variable: &str,
        request: &LookupRequest,
    ) -> Result<Vec<f64>> {
        let dataset = self
            .cache
            .get(path)
            .await
            .map_err(|e| self.fail(ExtractionError::from_cache(model_id, e)))?;
        let key = dataset.key();

        if !dataset.has_variable(variable) {
            return Err(ExtractionError::VariableNotFound {
                variable: variable.to_string(),
                path: key.to_string(),
            });
        }

        let lon = request.archive_longitude();
        let mut values = dataset
            .sample(variable, request.latitude, lon)
            .map_err(|e| self.fail(ExtractionError::from_grid(key, e)))?;
        UnitConversion::for_variable(variable).apply_all(&mut values);

        debug!(
            path = %key,
            variable,
            lat = request.latitude,
            lon,
            values = values.len(),
            "Sampled dataset"
        );
        Ok(values)
    }

    fn fail(&self, err: ExtractionError) -> ExtractionError {
        if let ExtractionError::Processing { path, message } = &err {
            error!(path = %path, error = %message, "Extraction failed");
        }
        err
    }
}

//! Application state for the climate API.

use std::sync::Arc;
use std::time::Instant;

use climate_extract::ExtractionPipeline;
use dataset_cache::{DatasetCache, NetCdfLoader};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use crate::config::ServiceConfig;

/// Shared application state.
pub struct AppState {
    /// Extraction pipelines over the archive.
    pub pipeline: ExtractionPipeline<NetCdfLoader>,

    /// Process-wide dataset cache, also owned by the pipeline.
    pub cache: Arc<DatasetCache<NetCdfLoader>>,

    /// Renders `/metrics`; absent when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,

    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: &ServiceConfig, prometheus: Option<PrometheusHandle>) -> Self {
        let cache = Arc::new(DatasetCache::new(NetCdfLoader::new(), config.cache.clone()));
        let pipeline = ExtractionPipeline::new(Arc::clone(&cache), config.archive.clone());

        info!(data_dir = %config.archive.root().display(), "Application state initialized");

        Self {
            pipeline,
            cache,
            prometheus,
            started_at: Instant::now(),
        }
    }

    /// Release every open dataset.
    pub async fn shutdown(&self) {
        let released = self.cache.clear().await;
        info!(released, "Released open datasets");
    }
}

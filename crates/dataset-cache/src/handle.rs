//! Reference-counted dataset handles.
//!
//! The cache and every in-flight lookup hold an `Arc<DatasetHandle<D>>`.
//! Evicting or expiring an entry only drops the cache's reference; the
//! dataset is closed when the last holder lets go, so a lookup that is still
//! running never sees a closed dataset.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use metrics::counter;
use netcdf_grid::GridDataset;
use tokio::time::Instant;
use tracing::{debug, warn};

/// An opened dataset owned jointly by the cache and its borrowers.
pub struct DatasetHandle<D: GridDataset> {
    key: String,
    opened_at: Instant,
    dataset: D,
    close_errors: Arc<AtomicU64>,
}

impl<D: GridDataset> DatasetHandle<D> {
    pub(crate) fn new(key: String, dataset: D, close_errors: Arc<AtomicU64>) -> Self {
        Self {
            key,
            opened_at: Instant::now(),
            dataset,
            close_errors,
        }
    }

    /// File identifier this handle was opened from.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<D: GridDataset> Deref for DatasetHandle<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.dataset
    }
}

impl<D: GridDataset> Drop for DatasetHandle<D> {
    fn drop(&mut self) {
        match self.dataset.close() {
            Ok(()) => {
                debug!(
                    path = %self.key,
                    held_secs = self.opened_at.elapsed().as_secs(),
                    "Closed dataset"
                );
            }
            Err(e) => {
                self.close_errors.fetch_add(1, Ordering::Relaxed);
                counter!("dataset_cache_close_errors_total").increment(1);
                warn!(path = %self.key, error = %e, "Failed to close dataset");
            }
        }
    }
}

impl<D: GridDataset> std::fmt::Debug for DatasetHandle<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetHandle")
            .field("key", &self.key)
            .field("source", &self.dataset.source())
            .finish()
    }
}

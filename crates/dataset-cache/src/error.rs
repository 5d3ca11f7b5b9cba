//! Error types for dataset cache operations.

use netcdf_grid::GridError;
use thiserror::Error;

/// Errors returned by [`DatasetCache::get`](crate::DatasetCache::get).
///
/// Cloneable so that every caller waiting on the same open observes the
/// same failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The backing file does not exist.
    #[error("dataset not found: {0}")]
    NotFound(String),

    /// The file exists but could not be opened as a grid.
    #[error("failed to open dataset {path}: {message}")]
    Open { path: String, message: String },
}

impl CacheError {
    /// Classify a loader failure for `path`.
    pub fn from_grid(path: &str, err: GridError) -> Self {
        match err {
            GridError::FileNotFound(_) => Self::NotFound(path.to_string()),
            other => Self::Open {
                path: path.to_string(),
                message: other.to_string(),
            },
        }
    }

    /// The file identifier the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound(path) => path,
            Self::Open { path, .. } => path,
        }
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

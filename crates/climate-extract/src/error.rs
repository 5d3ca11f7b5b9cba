//! Error types for climate extraction.

use dataset_cache::CacheError;
use netcdf_grid::GridError;
use thiserror::Error;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur while serving a point extraction.
///
/// Nothing here is retried; a failing element fails the whole request.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractionError {
    /// Malformed or missing request fields.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The variable name has no archive mapping.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// No backing file exists for the requested model or scenario.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The dataset was opened but does not contain the variable.
    #[error("variable {variable} not found in {path}")]
    VariableNotFound { variable: String, path: String },

    /// Any other failure while opening or reading a dataset.
    #[error("failed to process {path}: {message}")]
    Processing { path: String, message: String },
}

impl ExtractionError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn processing(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Processing {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Map a cache failure for `model_id`.
    pub fn from_cache(model_id: &str, err: CacheError) -> Self {
        match err {
            CacheError::NotFound(_) => Self::ModelNotFound(model_id.to_string()),
            CacheError::Open { path, message } => Self::Processing { path, message },
        }
    }

    /// Map a sampling failure on the dataset at `path`.
    pub fn from_grid(path: &str, err: GridError) -> Self {
        match err {
            GridError::VariableNotFound(variable) => Self::VariableNotFound {
                variable,
                path: path.to_string(),
            },
            other => Self::processing(path, other.to_string()),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::UnknownVariable(_) => 400,
            Self::ModelNotFound(_) => 400,
            Self::VariableNotFound { .. } => 400,
            Self::Processing { .. } => 500,
        }
    }

    /// Whether this error is caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

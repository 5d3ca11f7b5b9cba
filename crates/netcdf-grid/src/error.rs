//! Error types for gridded dataset access.

use thiserror::Error;

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Error types for opening and sampling gridded datasets.
#[derive(Error, Debug)]
pub enum GridError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The backing file does not exist
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// Missing required dimension, coordinate or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format or inconsistent shape
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// The requested variable is not present in the dataset
    #[error("variable not found: {0}")]
    VariableNotFound(String),
}

impl From<netcdf::Error> for GridError {
    fn from(err: netcdf::Error) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}

//! Opening datasets on a cache miss.

use std::path::Path;

use netcdf_grid::{open_grid, silence_hdf5_errors, GridData, GridDataset, GridResult};

/// Opens the dataset behind a file identifier.
///
/// `open` is blocking and is always run on tokio's blocking pool. It must
/// report a missing file as [`GridError::FileNotFound`](netcdf_grid::GridError::FileNotFound)
/// so the cache can tell "absent" apart from "unreadable".
pub trait DatasetLoader: Send + Sync + 'static {
    type Dataset: GridDataset;

    fn open(&self, path: &Path) -> GridResult<Self::Dataset>;
}

/// Loads NetCDF files fully into memory.
#[derive(Debug, Clone, Copy)]
pub struct NetCdfLoader;

impl NetCdfLoader {
    pub fn new() -> Self {
        silence_hdf5_errors();
        Self
    }
}

impl Default for NetCdfLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader for NetCdfLoader {
    type Dataset = GridData;

    fn open(&self, path: &Path) -> GridResult<GridData> {
        open_grid(path)
    }
}

//! Gridded dataset access for climate archives.
//!
//! This crate provides the [`GridDataset`] abstraction used by the dataset
//! cache, an in-memory grid model ([`GridData`]) and a reader that loads
//! NetCDF files (HadCM3 climatologies, CMIP6 time series) into it.
//!
//! # Lookup semantics
//!
//! Sampling a variable at (lat, lon) selects the nearest index on each
//! spatial axis independently and returns every value along the remaining
//! dimensions in native order. Longitudes are matched as given; callers are
//! expected to bring them into the grid's convention first (0-360 for the
//! archives served here).

pub mod error;
pub mod grid;
pub mod native;
pub mod nearest;

pub use error::{GridError, GridResult};
pub use grid::{is_latitude_dim, is_longitude_dim, GridData, GridDataset, GridVariable};
pub use native::{open_grid, silence_hdf5_errors, Packing};
pub use nearest::nearest_index;

//! Bounded pool of opened gridded datasets.
//!
//! [`DatasetCache`] maps a file path to an opened [`GridDataset`](netcdf_grid::GridDataset)
//! and keeps at most `max_entries` of them resident. Entries idle for longer
//! than the TTL are released on the next access, and inserting into a full
//! pool releases the least-recently-accessed entry.
//!
//! ```ignore
//! use dataset_cache::{CacheConfig, DatasetCache, NetCdfLoader};
//!
//! let cache = DatasetCache::new(NetCdfLoader::new(), CacheConfig::default());
//! let dataset = cache.get("/data/bridge_hadcm3/tfgbi/climate/tfgbia.pdclann.nc").await?;
//! let values = dataset.sample("temp_mm_1_5m", 51.5, 359.9)?;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod handle;
pub mod loader;

pub use cache::{CacheStats, DatasetCache, SharedDataset};
pub use config::{CacheConfig, DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};
pub use error::{CacheError, Result};
pub use handle::DatasetHandle;
pub use loader::{DatasetLoader, NetCdfLoader};

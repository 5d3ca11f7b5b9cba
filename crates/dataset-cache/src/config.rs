//! Configuration for the dataset cache.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default maximum number of open datasets.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Default idle time before a dataset is released.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Bounds for the dataset cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of datasets held open at once.
    pub max_entries: usize,

    /// Maximum idle time since last access before an entry is expired.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
        }
    }
}

impl CacheConfig {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self { max_entries, ttl }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_entries == 0 {
            return Err("max_entries must be > 0".to_string());
        }

        if self.ttl.is_zero() {
            return Err("ttl must be > 0".to_string());
        }

        Ok(())
    }
}

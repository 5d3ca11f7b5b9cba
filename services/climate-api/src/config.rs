//! Service configuration from command-line flags and environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use climate_extract::{Archive, DEFAULT_FUTURE_PERIOD, DEFAULT_PI_PERIOD};
use dataset_cache::CacheConfig;

/// Climate point lookup server
#[derive(Parser, Debug, Clone)]
#[command(name = "climate-api")]
#[command(about = "Point lookups of climate model values over HTTP")]
pub struct ServiceArgs {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:4000", env = "CLIMATE_LISTEN_ADDR")]
    pub listen: String,

    /// Root of the mounted model archive
    #[arg(long, default_value = "/data", env = "CLIMATE_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Maximum number of datasets kept open
    #[arg(long, default_value_t = dataset_cache::DEFAULT_MAX_ENTRIES, env = "CACHE_MAX_ENTRIES")]
    pub cache_max_entries: usize,

    /// Idle seconds before an open dataset is released
    #[arg(long, default_value_t = dataset_cache::DEFAULT_TTL_SECS, env = "CACHE_TTL_SECONDS")]
    pub cache_ttl_secs: u64,

    /// Seconds between background expiry sweeps (0 disables)
    #[arg(long, default_value_t = 300, env = "CACHE_SWEEP_INTERVAL_SECS")]
    pub cache_sweep_interval_secs: u64,

    /// Period label of pre-industrial (PI) time-series files
    #[arg(long, default_value = DEFAULT_PI_PERIOD, env = "CMIP_PI_PERIOD")]
    pub cmip_pi_period: String,

    /// Period label of scenario time-series files
    #[arg(long, default_value = DEFAULT_FUTURE_PERIOD, env = "CMIP_FUTURE_PERIOD")]
    pub cmip_future_period: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Number of worker threads
    #[arg(long, env = "CLIMATE_WORKER_THREADS")]
    pub worker_threads: Option<usize>,
}

/// Validated service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen: SocketAddr,
    pub archive: Archive,
    pub cache: CacheConfig,
    /// `None` disables the background sweeper.
    pub sweep_interval: Option<Duration>,
}

impl ServiceConfig {
    /// Configuration for an archive at `data_dir` with default bounds.
    pub fn for_archive(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 4000)),
            archive: Archive::new(data_dir),
            cache: CacheConfig::default(),
            sweep_interval: None,
        }
    }
}

impl TryFrom<&ServiceArgs> for ServiceConfig {
    type Error = anyhow::Error;

    fn try_from(args: &ServiceArgs) -> Result<Self> {
        let listen: SocketAddr = args
            .listen
            .parse()
            .with_context(|| format!("invalid listen address {:?}", args.listen))?;

        let cache = CacheConfig::new(
            args.cache_max_entries,
            Duration::from_secs(args.cache_ttl_secs),
        );
        cache.validate().map_err(|e| anyhow!("invalid cache configuration: {}", e))?;

        if args.cmip_pi_period.is_empty() || args.cmip_future_period.is_empty() {
            return Err(anyhow!("CMIP period labels must not be empty"));
        }

        let sweep_interval = match args.cache_sweep_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            listen,
            archive: Archive::new(args.data_dir.clone())
                .with_periods(&args.cmip_pi_period, &args.cmip_future_period),
            cache,
            sweep_interval,
        })
    }
}

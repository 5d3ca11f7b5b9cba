//! Climate API Server
//!
//! Serves point lookups from HadCM3 climatologies and CMIP6 time series.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use climate_api::config::{ServiceArgs, ServiceConfig};
use climate_api::state::AppState;
use climate_api::{build_router, sweeper};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = ServiceArgs::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("failed to create Tokio runtime")?;
    runtime.block_on(run_server(args))
}

async fn run_server(args: ServiceArgs) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let config = ServiceConfig::try_from(&args)?;

    let prometheus = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    info!(
        data_dir = %config.archive.root().display(),
        max_entries = config.cache.max_entries,
        ttl_secs = config.cache.ttl.as_secs(),
        "Starting climate API server"
    );

    let state = Arc::new(AppState::new(&config, Some(prometheus)));

    let sweeper = config
        .sweep_interval
        .map(|period| sweeper::spawn_sweeper(Arc::clone(&state.cache), period));

    let app = build_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!(address = %config.listen, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    if let Some(task) = sweeper {
        task.abort();
    }
    state.shutdown().await;
    info!("Climate API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

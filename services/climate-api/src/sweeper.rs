//! Periodic release of idle datasets.

use std::sync::Arc;
use std::time::Duration;

use dataset_cache::{DatasetCache, DatasetLoader};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Spawn a task that expires idle cache entries every `period`.
///
/// Lookups already sweep on access; this releases datasets on an idle
/// service. The task runs until aborted.
pub fn spawn_sweeper<L: DatasetLoader>(
    cache: Arc<DatasetCache<L>>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let expired = cache.sweep().await;
            if expired > 0 {
                debug!(expired, "Background sweep released datasets");
            }
        }
    })
}

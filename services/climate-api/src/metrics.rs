//! Request and cache metrics.

use std::time::Duration;

use dataset_cache::CacheStats;
use metrics::{counter, gauge, histogram};

/// Record one handled request.
pub fn record_request(endpoint: &'static str, status: u16, elapsed: Duration) {
    counter!("climate_requests_total", "endpoint" => endpoint, "status" => status.to_string())
        .increment(1);
    histogram!("climate_request_duration_seconds", "endpoint" => endpoint)
        .record(elapsed.as_secs_f64());
    if status >= 500 {
        counter!("climate_request_errors_total", "endpoint" => endpoint).increment(1);
    }
}

/// Publish a cache snapshot as gauges.
pub fn record_cache_stats(stats: &CacheStats) {
    gauge!("dataset_cache_entries").set(stats.entries as f64);
    gauge!("dataset_cache_capacity").set(stats.capacity as f64);
    gauge!("dataset_cache_pending_opens").set(stats.pending_opens as f64);
    gauge!("dataset_cache_hit_rate_percent").set(stats.hit_rate());
}

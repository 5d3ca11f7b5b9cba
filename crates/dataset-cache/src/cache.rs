//! Bounded pool of opened datasets keyed by file path.
//!
//! # Eviction Strategy
//! - TTL sweep on every access: entries idle for longer than the TTL are
//!   released before the request is served.
//! - Capacity eviction on insert: when the pool is full, the entry with the
//!   oldest last-access time is released to make room.
//!
//! # Concurrency
//! All index mutations happen under one async mutex. The first miss for a
//! path parks a [`watch`] receiver in the index and spawns the open as its
//! own task; later misses subscribe to the same receiver. The task owns the
//! open, so a caller that is dropped mid-request never abandons or repeats
//! it. Released entries are dropped only after the lock is let go, and the
//! datasets themselves close when their last [`DatasetHandle`] is dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use metrics::{counter, gauge};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::handle::DatasetHandle;
use crate::loader::DatasetLoader;

/// Shared handle to a cached dataset.
pub type SharedDataset<D> = Arc<DatasetHandle<D>>;

type OpenOutcome<D> = Result<SharedDataset<D>>;

/// Resolves to `Some` once the open task for a key has finished.
type OpenSignal<D> = watch::Receiver<Option<OpenOutcome<D>>>;

struct CacheEntry<D: netcdf_grid::GridDataset> {
    handle: SharedDataset<D>,
    opened_at: Instant,
    last_accessed_at: Instant,
}

struct CacheState<D: netcdf_grid::GridDataset> {
    entries: HashMap<String, CacheEntry<D>>,
    /// Opens in progress; removed by the open task when it publishes.
    opening: HashMap<String, OpenSignal<D>>,
}

enum Lookup<D: netcdf_grid::GridDataset> {
    Hit(SharedDataset<D>),
    Miss(OpenSignal<D>),
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    opens: AtomicU64,
    open_failures: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
    close_errors: Arc<AtomicU64>,
}

/// Snapshot of cache activity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub opens: u64,
    pub open_failures: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub close_errors: u64,
    pub entries: usize,
    /// Opens started but not yet published.
    pub pending_opens: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Process-wide pool of opened datasets.
///
/// Constructed once at service start and shared behind an `Arc`; call
/// [`clear`](Self::clear) at shutdown to release every dataset. Must be used
/// from within a tokio runtime.
pub struct DatasetCache<L: DatasetLoader> {
    inner: Arc<Inner<L>>,
}

/// State shared between the cache and its open tasks.
struct Inner<L: DatasetLoader> {
    loader: Arc<L>,
    config: CacheConfig,
    state: Mutex<CacheState<L::Dataset>>,
    counters: Counters,
}

impl<L: DatasetLoader> DatasetCache<L> {
    /// Create a new dataset cache.
    ///
    /// # Arguments
    /// * `loader` - Opens backing files on a miss
    /// * `config` - Capacity and TTL bounds
    pub fn new(loader: L, config: CacheConfig) -> Self {
        info!(
            max_entries = config.max_entries,
            ttl_secs = config.ttl.as_secs(),
            "DatasetCache initialized"
        );

        Self {
            inner: Arc::new(Inner {
                loader: Arc::new(loader),
                config,
                state: Mutex::new(CacheState {
                    entries: HashMap::new(),
                    opening: HashMap::new(),
                }),
                counters: Counters::default(),
            }),
        }
    }

    /// Get the dataset for `path`, opening it on a miss.
    ///
    /// Every call first expires idle entries. Fails with
    /// [`CacheError::NotFound`] if the file does not exist and
    /// [`CacheError::Open`] if it cannot be read as a grid; failures are not
    /// cached.
    pub async fn get(&self, path: impl AsRef<Path>) -> Result<SharedDataset<L::Dataset>> {
        let key = path.as_ref().to_string_lossy().into_owned();

        let (lookup, released) = {
            let mut guard = self.inner.state.lock().await;
            let state = &mut *guard;
            let now = Instant::now();
            let released = self.inner.sweep_locked(state, now);

            let lookup = if let Some(entry) = state.entries.get_mut(&key) {
                entry.last_accessed_at = now;
                Lookup::Hit(Arc::clone(&entry.handle))
            } else if let Some(signal) = state.opening.get(&key) {
                Lookup::Miss(signal.clone())
            } else {
                let (done, signal) = watch::channel(None);
                state.opening.insert(key.clone(), signal.clone());
                tokio::spawn(Arc::clone(&self.inner).run_open(key.clone(), done));
                Lookup::Miss(signal)
            };
            (lookup, released)
        };
        drop(released);

        match lookup {
            Lookup::Hit(handle) => {
                self.inner.counters.hits.fetch_add(1, Ordering::Relaxed);
                counter!("dataset_cache_hits_total").increment(1);
                Ok(handle)
            }
            Lookup::Miss(signal) => {
                self.inner.counters.misses.fetch_add(1, Ordering::Relaxed);
                counter!("dataset_cache_misses_total").increment(1);
                wait_for_open(&key, signal).await
            }
        }
    }

    /// Expire idle entries now. Returns the number removed.
    pub async fn sweep(&self) -> usize {
        let released = {
            let mut state = self.inner.state.lock().await;
            self.inner.sweep_locked(&mut state, Instant::now())
        };
        released.len()
    }

    /// Remove every entry. Returns the number removed.
    ///
    /// Opens still in flight publish their entry when they finish.
    pub async fn clear(&self) -> usize {
        let released: Vec<CacheEntry<L::Dataset>> = {
            let mut state = self.inner.state.lock().await;
            state.entries.drain().map(|(_, entry)| entry).collect()
        };
        gauge!("dataset_cache_entries").set(0.0);
        info!(released = released.len(), "DatasetCache cleared");
        released.len()
    }

    /// Whether `path` currently has an entry (does not touch its access time).
    pub async fn contains(&self, path: impl AsRef<Path>) -> bool {
        let key = path.as_ref().to_string_lossy();
        self.inner.state.lock().await.entries.contains_key(key.as_ref())
    }

    /// Get current number of entries in cache.
    pub async fn len(&self) -> usize {
        self.inner.state.lock().await.entries.len()
    }

    /// Check if cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.state.lock().await.entries.is_empty()
    }

    /// Get cache capacity.
    pub fn capacity(&self) -> usize {
        self.inner.config.max_entries
    }

    pub fn loader(&self) -> &L {
        &self.inner.loader
    }

    /// Get current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let (entries, pending_opens) = {
            let state = self.inner.state.lock().await;
            (state.entries.len(), state.opening.len())
        };
        let c = &self.inner.counters;
        CacheStats {
            hits: c.hits.load(Ordering::Relaxed),
            misses: c.misses.load(Ordering::Relaxed),
            opens: c.opens.load(Ordering::Relaxed),
            open_failures: c.open_failures.load(Ordering::Relaxed),
            evictions: c.evictions.load(Ordering::Relaxed),
            expirations: c.expirations.load(Ordering::Relaxed),
            close_errors: c.close_errors.load(Ordering::Relaxed),
            entries,
            pending_opens,
            capacity: self.inner.config.max_entries,
        }
    }
}

/// Wait for the open task of `key` to publish its outcome.
async fn wait_for_open<D: netcdf_grid::GridDataset>(
    key: &str,
    mut signal: OpenSignal<D>,
) -> OpenOutcome<D> {
    let lost = || CacheError::Open {
        path: key.to_string(),
        message: "open task ended without a result".to_string(),
    };
    match signal.wait_for(Option::is_some).await {
        Ok(outcome) => (*outcome).clone().unwrap_or_else(|| Err(lost())),
        Err(_) => Err(lost()),
    }
}

impl<L: DatasetLoader> Inner<L> {
    /// Body of the task spawned by the first miss for `key`.
    async fn run_open(
        self: Arc<Self>,
        key: String,
        done: watch::Sender<Option<OpenOutcome<L::Dataset>>>,
    ) {
        let outcome = self.open_and_insert(key).await;
        done.send_replace(Some(outcome));
    }

    /// Open `key` on the blocking pool and publish it in the index.
    ///
    /// The opening marker is removed in the same critical section that
    /// inserts the result, so later callers either find the entry or start a
    /// fresh open.
    async fn open_and_insert(&self, key: String) -> OpenOutcome<L::Dataset> {
        let loader = Arc::clone(&self.loader);
        let path = PathBuf::from(&key);
        let started = Instant::now();
        let opened = tokio::task::spawn_blocking(move || loader.open(&path)).await;

        let mut state = self.state.lock().await;
        state.opening.remove(&key);

        let dataset = match opened {
            Ok(Ok(dataset)) => dataset,
            Ok(Err(e)) => return Err(self.record_open_failure(CacheError::from_grid(&key, e))),
            Err(e) => {
                return Err(self.record_open_failure(CacheError::Open {
                    path: key,
                    message: format!("open task failed: {}", e),
                }))
            }
        };

        let now = Instant::now();
        let mut released = self.sweep_locked(&mut state, now);
        if state.entries.len() >= self.config.max_entries {
            released.extend(self.evict_lru_locked(&mut state, now));
        }

        let handle = Arc::new(DatasetHandle::new(
            key.clone(),
            dataset,
            Arc::clone(&self.counters.close_errors),
        ));
        let entry = CacheEntry {
            handle: Arc::clone(&handle),
            opened_at: now,
            last_accessed_at: now,
        };
        released.extend(state.entries.insert(key.clone(), entry));

        let entries = state.entries.len();
        drop(state);
        drop(released);

        self.counters.opens.fetch_add(1, Ordering::Relaxed);
        counter!("dataset_cache_opens_total").increment(1);
        gauge!("dataset_cache_entries").set(entries as f64);
        info!(
            path = %key,
            open_ms = started.elapsed().as_millis() as u64,
            entries,
            "Opened dataset"
        );

        Ok(handle)
    }

    fn record_open_failure(&self, err: CacheError) -> CacheError {
        self.counters.open_failures.fetch_add(1, Ordering::Relaxed);
        counter!("dataset_cache_open_failures_total").increment(1);
        match &err {
            CacheError::NotFound(path) => debug!(path = %path, "Dataset file not found"),
            CacheError::Open { path, message } => {
                warn!(path = %path, error = %message, "Failed to open dataset")
            }
        }
        err
    }

    /// Remove entries idle for longer than the TTL.
    fn sweep_locked(
        &self,
        state: &mut CacheState<L::Dataset>,
        now: Instant,
    ) -> Vec<CacheEntry<L::Dataset>> {
        let ttl = self.config.ttl;
        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_accessed_at) > ttl)
            .map(|(key, _)| key.clone())
            .collect();

        let mut released = Vec::with_capacity(expired.len());
        for key in expired {
            if let Some(entry) = state.entries.remove(&key) {
                debug!(
                    path = %key,
                    idle_secs = now.duration_since(entry.last_accessed_at).as_secs(),
                    "Expired dataset"
                );
                released.push(entry);
            }
        }

        if !released.is_empty() {
            let count = released.len() as u64;
            self.counters.expirations.fetch_add(count, Ordering::Relaxed);
            counter!("dataset_cache_expirations_total").increment(count);
            gauge!("dataset_cache_entries").set(state.entries.len() as f64);
        }
        released
    }

    /// Remove the single least-recently-accessed entry.
    fn evict_lru_locked(
        &self,
        state: &mut CacheState<L::Dataset>,
        now: Instant,
    ) -> Option<CacheEntry<L::Dataset>> {
        let key = state
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed_at)
            .map(|(key, _)| key.clone())?;
        let entry = state.entries.remove(&key)?;

        self.counters.evictions.fetch_add(1, Ordering::Relaxed);
        counter!("dataset_cache_evictions_total").increment(1);
        debug!(
            path = %key,
            age_secs = now.duration_since(entry.opened_at).as_secs(),
            "Evicted dataset"
        );
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcdf_grid::{GridDataset, GridError, GridResult};
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    struct StubDataset {
        source: String,
        closes: Arc<AtomicUsize>,
        fail_close: bool,
    }

    impl GridDataset for StubDataset {
        fn source(&self) -> &str {
            &self.source
        }

        fn has_variable(&self, variable: &str) -> bool {
            variable == "tas"
        }

        fn sample(&self, variable: &str, _lat: f64, _lon: f64) -> GridResult<Vec<f64>> {
            if self.has_variable(variable) {
                Ok(vec![288.15])
            } else {
                Err(GridError::VariableNotFound(variable.to_string()))
            }
        }

        fn close(&mut self) -> GridResult<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                Err(GridError::InvalidFormat("close failed".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct StubLoader {
        opens: Arc<AtomicUsize>,
        closes: Arc<AtomicUsize>,
        missing: HashSet<String>,
        corrupt: HashSet<String>,
        delay: Duration,
        fail_close: bool,
    }

    impl DatasetLoader for StubLoader {
        type Dataset = StubDataset;

        fn open(&self, path: &Path) -> GridResult<StubDataset> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
            let source = path.to_string_lossy().into_owned();
            if self.missing.contains(&source) {
                return Err(GridError::FileNotFound(source));
            }
            if self.corrupt.contains(&source) {
                return Err(GridError::InvalidFormat("not a grid".to_string()));
            }
            Ok(StubDataset {
                source,
                closes: Arc::clone(&self.closes),
                fail_close: self.fail_close,
            })
        }
    }

    fn cache_with(
        loader: StubLoader,
        max_entries: usize,
        ttl_secs: u64,
    ) -> DatasetCache<StubLoader> {
        let config = CacheConfig::new(max_entries, Duration::from_secs(ttl_secs));
        DatasetCache::new(loader, config)
    }

    fn opens(cache: &DatasetCache<StubLoader>) -> usize {
        cache.loader().opens.load(Ordering::SeqCst)
    }

    fn closes(cache: &DatasetCache<StubLoader>) -> usize {
        cache.loader().closes.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn test_hit_returns_same_handle() {
        let cache = cache_with(StubLoader::default(), 4, 3600);

        let first = cache.get("/data/a.nc").await.unwrap();
        let second = cache.get("/data/a.nc").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.source(), "/data/a.nc");
        assert_eq!(opens(&cache), 1);

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.opens, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hit_rate(), 50.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_size_never_exceeds_capacity() {
        let cache = cache_with(StubLoader::default(), 3, 3600);

        for i in 0..10 {
            cache.get(format!("/data/{}.nc", i)).await.unwrap();
            assert!(cache.len().await <= 3);
            tokio::time::advance(Duration::from_millis(10)).await;
        }

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.evictions, 7);
        assert_eq!(closes(&cache), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_eviction_removes_least_recently_accessed() {
        let cache = cache_with(StubLoader::default(), 2, 3600);

        cache.get("/data/a.nc").await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.get("/data/b.nc").await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        // Touch a so that b becomes the oldest
        cache.get("/data/a.nc").await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.get("/data/c.nc").await.unwrap();

        assert!(cache.contains("/data/a.nc").await);
        assert!(!cache.contains("/data/b.nc").await);
        assert!(cache.contains("/data/c.nc").await);
        assert_eq!(cache.stats().await.evictions, 1);
        assert_eq!(closes(&cache), 1);
    }

    #[tokio::test]
    async fn test_eviction_on_clock_ties_removes_exactly_one() {
        // Back-to-back inserts may share an access instant
        let cache = cache_with(StubLoader::default(), 2, 3600);

        cache.get("/data/a.nc").await.unwrap();
        cache.get("/data/b.nc").await.unwrap();
        cache.get("/data/c.nc").await.unwrap();

        assert_eq!(cache.len().await, 2);
        assert!(cache.contains("/data/c.nc").await);
        assert_eq!(cache.stats().await.evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_entries_expire_on_next_get() {
        let cache = cache_with(StubLoader::default(), 10, 60);

        cache.get("/data/a.nc").await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        cache.get("/data/b.nc").await.unwrap();

        assert!(!cache.contains("/data/a.nc").await);
        assert!(cache.contains("/data/b.nc").await);

        let stats = cache.stats().await;
        assert_eq!(stats.expirations, 1);
        assert_eq!(closes(&cache), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_access_refreshes_ttl() {
        let cache = cache_with(StubLoader::default(), 10, 60);

        cache.get("/data/a.nc").await.unwrap();
        tokio::time::advance(Duration::from_secs(40)).await;
        cache.get("/data/a.nc").await.unwrap();
        tokio::time::advance(Duration::from_secs(40)).await;
        cache.get("/data/b.nc").await.unwrap();

        assert!(cache.contains("/data/a.nc").await);
        assert_eq!(opens(&cache), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_key_is_reopened() {
        let cache = cache_with(StubLoader::default(), 10, 60);

        let first = cache.get("/data/a.nc").await.unwrap();
        drop(first);
        tokio::time::advance(Duration::from_secs(120)).await;
        cache.get("/data/a.nc").await.unwrap();

        assert_eq!(opens(&cache), 2);
        assert_eq!(closes(&cache), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_sweep() {
        let cache = cache_with(StubLoader::default(), 10, 60);

        cache.get("/data/a.nc").await.unwrap();
        cache.get("/data/b.nc").await.unwrap();
        assert_eq!(cache.sweep().await, 0);

        tokio::time::advance(Duration::from_secs(3600)).await;
        assert_eq!(cache.sweep().await, 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_open_once() {
        let loader = StubLoader {
            delay: Duration::from_millis(50),
            ..Default::default()
        };
        let cache = Arc::new(cache_with(loader, 4, 3600));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get("/data/shared.nc").await })
            })
            .collect();

        let handles: Vec<_> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        assert_eq!(opens(&cache), 1);
        for handle in &handles[1..] {
            assert!(Arc::ptr_eq(&handles[0], handle));
        }
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_failed_open_is_shared_and_not_cached() {
        let loader = StubLoader {
            delay: Duration::from_millis(50),
            corrupt: HashSet::from(["/data/bad.nc".to_string()]),
            ..Default::default()
        };
        let cache = Arc::new(cache_with(loader, 4, 3600));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get("/data/bad.nc").await })
            })
            .collect();

        let errors: Vec<CacheError> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap_err())
            .collect();

        assert_eq!(opens(&cache), 1);
        assert!(errors.iter().all(|e| e == &errors[0]));
        assert!(matches!(errors[0], CacheError::Open { .. }));
        assert!(cache.is_empty().await);

        // A later request tries again
        assert_err!(cache.get("/data/bad.nc").await);
        assert_eq!(opens(&cache), 2);
        assert_eq!(cache.stats().await.open_failures, 2);
    }

    async fn wait_until_settled(cache: &DatasetCache<StubLoader>) -> CacheStats {
        for _ in 0..500 {
            let stats = cache.stats().await;
            if stats.pending_opens == 0 {
                return stats;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("open never settled");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cancelled_first_caller_does_not_restart_open() {
        let loader = StubLoader {
            delay: Duration::from_millis(300),
            ..Default::default()
        };
        let cache = Arc::new(cache_with(loader, 4, 3600));

        let first = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get("/data/slow.nc").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get("/data/slow.nc").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        first.abort();
        assert!(first.await.unwrap_err().is_cancelled());

        let handle = second.await.unwrap().unwrap();
        assert_eq!(handle.key(), "/data/slow.nc");
        assert_eq!(opens(&cache), 1);

        let stats = cache.stats().await;
        assert_eq!(stats.opens, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.pending_opens, 0);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cancelled_sole_caller_still_publishes_entry() {
        let loader = StubLoader {
            delay: Duration::from_millis(200),
            ..Default::default()
        };
        let cache = Arc::new(cache_with(loader, 4, 3600));

        let only = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get("/data/slow.nc").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.stats().await.pending_opens, 1);
        only.abort();

        let stats = wait_until_settled(&cache).await;
        assert_eq!(stats.opens, 1);
        assert_eq!(stats.entries, 1);
        assert!(cache.contains("/data/slow.nc").await);

        assert_ok!(cache.get("/data/slow.nc").await);
        assert_eq!(opens(&cache), 1);
        assert_eq!(cache.stats().await.hits, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cancelled_failed_open_clears_marker() {
        let loader = StubLoader {
            delay: Duration::from_millis(200),
            missing: HashSet::from(["/data/none.nc".to_string()]),
            ..Default::default()
        };
        let cache = Arc::new(cache_with(loader, 4, 3600));

        let only = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get("/data/none.nc").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        only.abort();

        let stats = wait_until_settled(&cache).await;
        assert_eq!(stats.open_failures, 1);
        assert!(cache.is_empty().await);

        let err = cache.get("/data/none.nc").await.unwrap_err();
        assert_eq!(err, CacheError::NotFound("/data/none.nc".to_string()));
        assert_eq!(opens(&cache), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let loader = StubLoader {
            missing: HashSet::from(["/data/none.nc".to_string()]),
            ..Default::default()
        };
        let cache = cache_with(loader, 4, 3600);

        let err = cache.get("/data/none.nc").await.unwrap_err();
        assert_eq!(err, CacheError::NotFound("/data/none.nc".to_string()));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_evicted_handle_stays_open_while_borrowed() {
        let cache = cache_with(StubLoader::default(), 1, 3600);

        let borrowed = cache.get("/data/a.nc").await.unwrap();
        assert_ok!(cache.get("/data/b.nc").await);

        assert!(!cache.contains("/data/a.nc").await);
        assert_eq!(closes(&cache), 0);
        assert_eq!(borrowed.sample("tas", 0.0, 0.0).unwrap(), vec![288.15]);

        drop(borrowed);
        assert_eq!(closes(&cache), 1);
    }

    #[tokio::test]
    async fn test_close_failure_is_counted_and_entry_removed() {
        let loader = StubLoader {
            fail_close: true,
            ..Default::default()
        };
        let cache = cache_with(loader, 1, 3600);

        cache.get("/data/a.nc").await.unwrap();
        cache.get("/data/b.nc").await.unwrap();

        let stats = cache.stats().await;
        assert_eq!(stats.close_errors, 1);
        assert_eq!(stats.entries, 1);
        assert!(!cache.contains("/data/a.nc").await);
    }

    #[tokio::test]
    async fn test_clear_releases_everything() {
        let cache = cache_with(StubLoader::default(), 4, 3600);

        cache.get("/data/a.nc").await.unwrap();
        cache.get("/data/b.nc").await.unwrap();

        assert_eq!(cache.clear().await, 2);
        assert!(cache.is_empty().await);
        assert_eq!(closes(&cache), 2);
    }
}

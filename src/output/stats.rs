//! Aggregate crawl statistics and the periodic CLI output flusher
//!
//! Fetch workers report counter mutations through [`StatsManager`]; the
//! flusher renders the aggregate to stdout on a fixed cadence until the
//! crawl signals shutdown.

use chrono::Local;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Aggregate counters for a crawl in progress
#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    /// Fetch attempts that completed an HTTP exchange, whatever the status
    pub pages_fetched: u64,

    /// Fetch attempts that failed before any HTTP status was observed
    pub pages_failed: u64,

    /// Links seen on fetched pages, duplicates included
    pub links_discovered: u64,

    /// Unique records added to the discovery graph
    pub records_added: u64,

    /// Fetches waiting in the frontier queue
    pub frontier_size: u64,

    /// Deepest page fetched so far
    pub max_depth_seen: u32,

    /// Summed round-trip latency of completed fetches
    pub total_latency: Duration,
}

impl StatsSnapshot {
    /// Mean round-trip latency over completed fetches
    pub fn mean_latency(&self) -> Duration {
        if self.pages_fetched == 0 {
            Duration::ZERO
        } else {
            self.total_latency / self.pages_fetched as u32
        }
    }
}

/// A single deferred mutation of the aggregate counters
pub type StatsUpdate = Box<dyn FnOnce(&mut StatsSnapshot) + Send>;

/// Capability interface for the statistics backend
///
/// Safe for concurrent invocation from any number of fetch workers.
pub trait StatsManager: Send + Sync + 'static {
    /// Applies a batch of counter mutations as one atomic step
    fn update_stats(&self, updates: Vec<StatsUpdate>);

    /// Returns a copy of the current aggregate
    fn snapshot(&self) -> StatsSnapshot;

    /// Renders the aggregate periodically until `shutdown` flips to true,
    /// then renders one final line
    fn run_output_flusher(
        self: Arc<Self>,
        shutdown: watch::Receiver<bool>,
    ) -> impl Future<Output = ()> + Send;
}

/// Mutex-guarded stats aggregate shared between crawl workers and the
/// output flusher
pub struct StatsCollector {
    inner: Mutex<StatsSnapshot>,
    flush_interval: Duration,
}

impl StatsCollector {
    pub fn new(flush_interval: Duration) -> Self {
        Self {
            inner: Mutex::new(StatsSnapshot::default()),
            flush_interval,
        }
    }

    fn render(stats: &StatsSnapshot) {
        println!(
            "[{}] fetched: {}  failed: {}  queued: {}  unique: {}  links: {}  depth: {}  avg: {}ms",
            Local::now().format("%H:%M:%S"),
            stats.pages_fetched,
            stats.pages_failed,
            stats.frontier_size,
            stats.records_added,
            stats.links_discovered,
            stats.max_depth_seen,
            stats.mean_latency().as_millis(),
        );
    }
}

impl StatsManager for StatsCollector {
    fn update_stats(&self, updates: Vec<StatsUpdate>) {
        let mut stats = self.inner.lock().expect("stats lock poisoned");
        for update in updates {
            update(&mut stats);
        }
    }

    fn snapshot(&self) -> StatsSnapshot {
        self.inner.lock().expect("stats lock poisoned").clone()
    }

    async fn run_output_flusher(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.flush_interval);
        // A tokio interval fires immediately on its first tick; skip it so
        // a crawl that finishes within one interval prints exactly one
        // (final) line
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => Self::render(&self.snapshot()),
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        Self::render(&self.snapshot());
    }
}

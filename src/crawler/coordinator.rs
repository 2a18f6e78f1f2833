//! Crawl coordination: worker dispatch, dedupe, and checkpointing
//!
//! The coordinator is the scheduling loop of the crawler. It keeps a
//! frontier of URLs whose records exist but whose fetches have not
//! happened, runs up to `workers` concurrent fetch tasks, and feeds every
//! link those fetches discover through the record store's atomic
//! insert-if-absent, so each canonical URL ends up with exactly one record
//! no matter how many pages link to it.

use crate::config::Config;
use crate::crawler::connector::{Connector, FetchedPage};
use crate::output::{StatsManager, StatsSnapshot};
use crate::records::{Inserted, RecordEntry, RecordManager};
use crate::url::{extract_url, UrlEntity};
use crate::Result;
use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

/// The snapshot is rewritten after this many completed fetches
const CHECKPOINT_PAGES: u64 = 50;

/// One unit of crawl work: a URL that has a record but no fetch yet
#[derive(Debug, Clone)]
struct CrawlTask {
    url: UrlEntity,
    depth: u32,
}

/// Result of one fetch task, reported back to the dispatch loop
struct PageOutcome {
    task: CrawlTask,
    result: Result<FetchedPage>,
}

/// Main crawl orchestrator
pub struct Coordinator<C, S> {
    config: Arc<Config>,
    records: Arc<RecordManager>,
    connector: Arc<C>,
    stats: Arc<S>,
}

impl<C: Connector, S: StatsManager> Coordinator<C, S> {
    /// Creates a coordinator over a (possibly pre-loaded) record store
    pub fn new(
        config: Config,
        records: Arc<RecordManager>,
        connector: Arc<C>,
        stats: Arc<S>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            records,
            connector,
            stats,
        }
    }

    /// Runs the crawl to completion
    ///
    /// Terminates when the frontier is empty and no fetch is in flight.
    /// The snapshot is checkpointed periodically and once at the end.
    pub async fn run(&self) -> Result<()> {
        let max_depth = self.config.crawler.max_depth;
        let workers = self.config.crawler.workers.max(1) as usize;

        let mut frontier = self.build_frontier()?;
        tracing::info!(
            "Starting crawl: {} workers, {} queued fetches, max depth {}",
            workers,
            frontier.len(),
            max_depth
        );

        let (tx, mut rx) = mpsc::channel::<PageOutcome>(workers);
        let mut in_flight = 0usize;
        let mut completed: u64 = 0;

        loop {
            // Keep the worker pool full
            while in_flight < workers {
                let Some(task) = frontier.pop_front() else { break };
                self.spawn_fetch(task, tx.clone());
                in_flight += 1;
            }

            if in_flight == 0 {
                break;
            }

            // A sender clone exists for every in-flight fetch, so recv
            // cannot return None here
            let Some(outcome) = rx.recv().await else { break };
            in_flight -= 1;
            completed += 1;

            self.handle_outcome(outcome, max_depth, &mut frontier);

            if completed % CHECKPOINT_PAGES == 0 {
                if let Err(e) = self.save_snapshot() {
                    tracing::warn!("Checkpoint failed: {}", e);
                }
            }
        }

        self.save_snapshot()?;
        tracing::info!(
            "Crawl complete: {} fetches, {} records",
            completed,
            self.records.len()
        );

        Ok(())
    }

    /// Seeds a fresh store, or rebuilds the frontier of a loaded one
    fn build_frontier(&self) -> Result<VecDeque<CrawlTask>> {
        let max_depth = self.config.crawler.max_depth;
        let mut frontier = VecDeque::new();

        if self.records.is_empty() {
            let seed = &self.config.crawler.seed_url;
            // Resolving the seed against itself canonicalizes it
            let entity = extract_url(seed, seed)?;
            tracing::info!("Seeding crawl at {}", entity.raw);

            self.records
                .add_record(RecordEntry::discovered(String::new(), entity.clone(), 0))?;
            frontier.push_back(CrawlTask {
                url: entity,
                depth: 0,
            });
        } else {
            for record in self.records.pending_fetches(max_depth) {
                frontier.push_back(CrawlTask {
                    url: record.url,
                    depth: record.depth,
                });
            }
            tracing::info!("Resuming crawl: {} unfetched records", frontier.len());
        }

        Ok(frontier)
    }

    /// Spawns one fetch task that reports back over the outcome channel
    fn spawn_fetch(&self, task: CrawlTask, tx: mpsc::Sender<PageOutcome>) {
        let connector = Arc::clone(&self.connector);
        tokio::spawn(async move {
            let result = connector.get_links(&task.url.raw).await;
            if tx.send(PageOutcome { task, result }).await.is_err() {
                tracing::warn!("Crawl loop gone before a fetch outcome could be reported");
            }
        });
    }

    /// Folds one fetch outcome into the store, the frontier, and the stats
    ///
    /// Every link a page yielded is recorded in the graph; only links
    /// within the depth limit are enqueued for fetching. Exactly one stats
    /// update is reported per completed fetch attempt.
    fn handle_outcome(
        &self,
        outcome: PageOutcome,
        max_depth: u32,
        frontier: &mut VecDeque<CrawlTask>,
    ) {
        let PageOutcome { task, result } = outcome;

        match result {
            Ok(page) => {
                self.records
                    .record_fetch(&task.url.raw, page.status_code, "");

                let links_found = page.links.len() as u64;
                let mut new_records: u64 = 0;

                for link in page.links {
                    let child_depth = task.depth + 1;
                    let entry =
                        RecordEntry::discovered(task.url.raw.clone(), link.clone(), child_depth);

                    match self.records.insert_if_absent(entry) {
                        Ok(Inserted::New(_)) => {
                            new_records += 1;
                            if child_depth <= max_depth {
                                frontier.push_back(CrawlTask {
                                    url: link,
                                    depth: child_depth,
                                });
                            }
                        }
                        Ok(Inserted::Existing(_)) => {}
                        Err(e) => {
                            // The store only grows, so a missing parent here
                            // would be a bug; keep crawling regardless
                            tracing::error!("Failed to record {}: {}", link.raw, e);
                        }
                    }
                }

                tracing::debug!(
                    "Fetched {} (status {}, {} links, {} new)",
                    task.url.raw,
                    page.status_code,
                    links_found,
                    new_records
                );

                let depth = task.depth;
                let latency = page.latency;
                let frontier_size = frontier.len() as u64;
                self.stats.update_stats(vec![Box::new(
                    move |s: &mut StatsSnapshot| {
                        s.pages_fetched += 1;
                        s.links_discovered += links_found;
                        s.records_added += new_records;
                        s.total_latency += latency;
                        s.frontier_size = frontier_size;
                        if depth > s.max_depth_seen {
                            s.max_depth_seen = depth;
                        }
                    },
                )]);
            }
            Err(e) => {
                let err_string = e.to_string();
                tracing::warn!("Fetch failed for {}: {}", task.url.raw, err_string);
                self.records.record_fetch(&task.url.raw, 0, &err_string);

                let frontier_size = frontier.len() as u64;
                self.stats
                    .update_stats(vec![Box::new(move |s: &mut StatsSnapshot| {
                        s.pages_failed += 1;
                        s.frontier_size = frontier_size;
                    })]);
            }
        }
    }

    /// Writes the snapshot to the configured path
    fn save_snapshot(&self) -> Result<()> {
        let path = Path::new(&self.config.output.snapshot_path);
        let mut file = File::create(path)?;
        self.records
            .save_to_writer(&mut file, self.config.output.pretty_snapshot)?;
        tracing::debug!(
            "Checkpointed {} records to {}",
            self.records.len(),
            path.display()
        );
        Ok(())
    }
}

//! Crawler module: fetching, link extraction, and crawl coordination
//!
//! This module contains the crawling machinery built around the record
//! store:
//! - HTTP fetching and per-page link resolution ([`WebClient`])
//! - Hyperlink extraction from HTML bodies
//! - The worker dispatch loop that dedupes discoveries into the graph

mod connector;
mod coordinator;
mod parser;

pub use connector::{Connector, FetchedPage, WebClient};
pub use coordinator::Coordinator;
pub use parser::extract_hrefs;

use crate::config::Config;
use crate::output::{StatsCollector, StatsManager};
use crate::records::RecordManager;
use crate::Result;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Create the record store, loading the snapshot first when resuming
/// 2. Build the HTTP connector from the user-agent config
/// 3. Start the statistics output flusher
/// 4. Run the coordinator until the frontier drains
/// 5. Stop the flusher and leave the final snapshot on disk
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `resume` - Load the existing snapshot and continue its unfetched
///   records instead of starting from the seed
pub async fn crawl(config: Config, resume: bool) -> Result<()> {
    let records = Arc::new(RecordManager::new());

    if resume {
        let path = Path::new(&config.output.snapshot_path);
        let mut file = File::open(path)?;
        records.load_from_reader(&mut file)?;
        tracing::info!(
            "Loaded {} records from {}",
            records.len(),
            path.display()
        );
    }

    let connector = Arc::new(WebClient::from_config(
        &config.user_agent,
        config.crawler.request_timeout,
    )?);
    let stats = Arc::new(StatsCollector::new(Duration::from_secs(
        config.output.stats_interval,
    )));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let flusher = tokio::spawn(Arc::clone(&stats).run_output_flusher(shutdown_rx));

    let coordinator = Coordinator::new(config, records, connector, stats);
    let result = coordinator.run().await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = flusher.await {
        tracing::warn!("Stats flusher task failed: {}", e);
    }

    result
}

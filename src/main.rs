//! Kumo main entry point
//!
//! This is the command-line interface for the Kumo link-graph crawler.

use clap::Parser;
use kumo::config::{load_config_with_hash, Config};
use kumo::output::{print_summary, summarize};
use kumo::records::RecordManager;
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Kumo: a link-graph web crawler
///
/// Kumo crawls the web outward from a seed URL, deduplicating every
/// discovered link into a depth-ranked discovery graph. The graph is
/// checkpointed to a JSON snapshot that later runs can resume from.
#[derive(Parser, Debug)]
#[command(name = "kumo")]
#[command(version = "1.0.0")]
#[command(about = "A link-graph web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume from the existing snapshot instead of starting fresh
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a fresh crawl, overwriting any previous snapshot (default)
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["stats", "resume"])]
    dry_run: bool,

    /// Show a summary of the snapshot and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash, cli.resume).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kumo=info,warn"),
            1 => EnvFilter::new("kumo=debug,info"),
            2 => EnvFilter::new("kumo=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be
/// crawled
fn handle_dry_run(config: &Config) {
    println!("=== Kumo Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Request timeout: {}s", config.crawler.request_timeout);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Snapshot: {}", config.output.snapshot_path);
    println!("  Pretty: {}", config.output.pretty_snapshot);
    println!("  Stats interval: {}s", config.output.stats_interval);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", config.crawler.seed_url);
}

/// Handles the --stats mode: summarizes the snapshot on disk
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Snapshot: {}\n", config.output.snapshot_path);

    let records = RecordManager::new();
    let mut file = File::open(&config.output.snapshot_path)?;
    records.load_from_reader(&mut file)?;

    let summary = summarize(&records.all_records());
    print_summary(&summary);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str, resume: bool) -> anyhow::Result<()> {
    let hash_path = format!("{}.confighash", config.output.snapshot_path);

    if resume {
        tracing::info!("Resuming crawl from {}", config.output.snapshot_path);
        match std::fs::read_to_string(&hash_path) {
            Ok(previous) if previous.trim() != config_hash => {
                tracing::warn!(
                    "Configuration changed since the snapshot was written; resuming anyway"
                );
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    } else {
        tracing::info!("Starting fresh crawl at {}", config.crawler.seed_url);
    }

    std::fs::write(&hash_path, format!("{}\n", config_hash))?;

    match kumo::crawler::crawl(config, resume).await {
        Ok(()) => {
            tracing::info!("Crawl completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

//! Snapshot summary report
//!
//! Aggregates a loaded discovery graph into the figures the `--stats` CLI
//! mode prints: totals, depth and status breakdowns, and fetch errors.

use crate::records::DiscoveryRecord;
use std::collections::{BTreeMap, HashSet};

/// Aggregated view of a persisted discovery graph
#[derive(Debug, Clone, Default)]
pub struct SnapshotSummary {
    /// Total number of discovery records
    pub total_records: u64,

    /// Records with an observed HTTP status
    pub fetched: u64,

    /// Records that were discovered but never fetched
    pub unfetched: u64,

    /// Records whose fetch failed before a status was observed
    pub failed: u64,

    /// Distinct hosts across all records
    pub unique_hosts: u64,

    /// Total number of parent-to-child edges
    pub total_edges: u64,

    /// Record count per depth level
    pub records_by_depth: BTreeMap<u32, u64>,

    /// Record count per observed HTTP status
    pub records_by_status: BTreeMap<u16, u64>,

    /// Fetch errors, as (url, error text) pairs in insertion order
    pub errors: Vec<(String, String)>,
}

/// Builds a summary over records, typically from a loaded snapshot
pub fn summarize(records: &[DiscoveryRecord]) -> SnapshotSummary {
    let mut summary = SnapshotSummary {
        total_records: records.len() as u64,
        ..Default::default()
    };

    let mut hosts: HashSet<&str> = HashSet::new();

    for record in records {
        hosts.insert(record.url.host.as_str());
        summary.total_edges += record.edges.len() as u64;
        *summary.records_by_depth.entry(record.depth).or_insert(0) += 1;

        if !record.err_string.is_empty() {
            summary.failed += 1;
            summary
                .errors
                .push((record.url.raw.clone(), record.err_string.clone()));
        } else if record.status_code != 0 {
            summary.fetched += 1;
            *summary
                .records_by_status
                .entry(record.status_code)
                .or_insert(0) += 1;
        } else {
            summary.unfetched += 1;
        }
    }

    summary.unique_hosts = hosts.len() as u64;
    summary
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &SnapshotSummary) {
    println!("=== Crawl Snapshot Summary ===\n");

    println!("Overview:");
    println!("  Total records: {}", summary.total_records);
    println!("  Unique hosts: {}", summary.unique_hosts);
    println!("  Edges: {}", summary.total_edges);
    println!();

    println!("Fetch outcomes:");
    for (label, count) in [
        ("Fetched", summary.fetched),
        ("Unfetched", summary.unfetched),
        ("Failed", summary.failed),
    ] {
        let percentage = if summary.total_records > 0 {
            (count as f64 / summary.total_records as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
    println!();

    if !summary.records_by_status.is_empty() {
        println!("Records by HTTP status:");
        for (status, count) in &summary.records_by_status {
            println!("  {}: {}", status, count);
        }
        println!();
    }

    println!("Records by depth:");
    for (depth, count) in &summary.records_by_depth {
        println!("  {}: {}", depth, count);
    }
    println!();

    if !summary.errors.is_empty() {
        println!("Fetch errors ({}):", summary.errors.len());
        for (url, err) in &summary.errors {
            println!("  - {}: {}", url, err);
        }
        println!();
    }
}

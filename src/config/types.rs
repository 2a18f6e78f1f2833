use serde::Deserialize;

/// Main configuration structure for Kumo
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Absolute http(s) URL the crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Number of concurrent fetch tasks
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Maximum link distance from the seed that will be fetched; links
    /// discovered past it are still recorded in the graph
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path the JSON snapshot is written to
    #[serde(rename = "snapshot-path")]
    pub snapshot_path: String,

    /// Indent the snapshot for human readability
    #[serde(rename = "pretty-snapshot", default)]
    pub pretty_snapshot: bool,

    /// Seconds between statistics output lines
    #[serde(rename = "stats-interval", default = "default_stats_interval")]
    pub stats_interval: u64,
}

fn default_workers() -> u32 {
    4
}

fn default_request_timeout() -> u64 {
    30
}

fn default_stats_interval() -> u64 {
    2
}

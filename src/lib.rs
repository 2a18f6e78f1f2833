//! Kumo: a link-graph web crawler
//!
//! This crate implements a web crawler that records every uniquely discovered
//! URL in a deduplicated, depth-ranked discovery graph. The graph is
//! checkpointed to a deterministic JSON snapshot that can be reloaded to
//! resume an interrupted crawl.

pub mod config;
pub mod crawler;
pub mod output;
pub mod records;
pub mod url;

use thiserror::Error;

/// Main error type for Kumo operations
#[derive(Debug, Error)]
pub enum KumoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors from the URL resolution engine
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL is not in a valid format: {0}")]
    Invalid(String),

    #[error("URL provided is not absolute")]
    NotAbsolute,

    #[error("URL is not in a supported format: {0}")]
    UnsupportedScheme(String),
}

/// Errors from the discovery record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Parent record not found: {0}")]
    ParentNotFound(String),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Kumo operations
pub type Result<T> = std::result::Result<T, KumoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL resolution operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use records::{DiscoveryRecord, Inserted, RecordEntry, RecordManager};
pub use url::{extract_parent_url, extract_url, is_absolute_url, UrlEntity};

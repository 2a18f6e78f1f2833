//! HTTP connector: fetches pages and extracts resolved links
//!
//! The [`Connector`] trait is the capability seam between the crawl loop
//! and whatever performs the actual fetching; [`WebClient`] is the
//! reqwest-backed production implementation.

use crate::config::UserAgentConfig;
use crate::crawler::parser::extract_hrefs;
use crate::url::{extract_parent_url, extract_url, UrlEntity};
use crate::{KumoError, Result};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::future::Future;
use std::time::{Duration, Instant};

/// Everything one fetch attempt produced
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status of the final response
    pub status_code: u16,

    /// Canonicalized links found in the body, in order of appearance;
    /// duplicates within the page are kept
    pub links: Vec<UrlEntity>,

    /// Wall-clock duration of the round trip
    pub latency: Duration,
}

/// Capability interface for the fetch/link-extraction backend
pub trait Connector: Send + Sync + 'static {
    /// Fetches `raw_url` once and returns the observed status code, the
    /// hyperlinks extracted from the body (already resolved against the
    /// fetched page's own canonical address), and the round-trip latency.
    ///
    /// Links that fail resolution are silently dropped from the returned
    /// sequence; one bad link must not abort the page's whole link list.
    fn get_links(&self, raw_url: &str) -> impl Future<Output = Result<FetchedPage>> + Send;
}

/// reqwest-backed [`Connector`] implementation
pub struct WebClient {
    client: Client,
}

impl WebClient {
    /// Wraps an already-built HTTP client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a WebClient identified by the crawler's user agent string
    ///
    /// The user agent follows the `CrawlerName/Version (+ContactURL; Email)`
    /// convention so site operators can find out who is crawling them.
    pub fn from_config(config: &UserAgentConfig, timeout_secs: u64) -> Result<Self> {
        let user_agent = format!(
            "{}/{} (+{}; {})",
            config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
        );

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

impl Connector for WebClient {
    async fn get_links(&self, raw_url: &str) -> Result<FetchedPage> {
        let start = Instant::now();

        let response = self
            .client
            .get(raw_url)
            .send()
            .await
            .map_err(|source| KumoError::Http {
                url: raw_url.to_string(),
                source,
            })?;

        let status_code = response.status().as_u16();
        let is_success = response.status().is_success();
        let final_url = response.url().to_string();

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // Only successful HTML responses yield links; everything else still
        // reports its status so the record keeps what was observed.
        if !is_success || !content_type.contains("text/html") {
            return Ok(FetchedPage {
                status_code,
                links: Vec::new(),
                latency: start.elapsed(),
            });
        }

        let body = response.text().await.map_err(|source| KumoError::Http {
            url: raw_url.to_string(),
            source,
        })?;
        let latency = start.elapsed();

        // Relative links resolve against the page we actually ended up on,
        // so redirects rebase them correctly.
        let base = extract_parent_url(&final_url)?;

        let mut links = Vec::new();
        for href in extract_hrefs(&body) {
            match extract_url(&base, &href) {
                Ok(entity) => links.push(entity),
                Err(e) => {
                    tracing::debug!("Dropping link {:?} found on {}: {}", href, base, e);
                }
            }
        }

        Ok(FetchedPage {
            status_code,
            links,
            latency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_from_config_builds_client() {
        let config = create_test_config();
        assert!(WebClient::from_config(&config, 30).is_ok());
    }

    // Fetch behavior is covered by the wiremock tests in tests/, where a
    // real server is available.
}

use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::url::is_absolute_url;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if !is_absolute_url(&config.seed_url) {
        return Err(ConfigError::Validation(format!(
            "seed-url must be an absolute http(s) URL, got '{}'",
            config.seed_url
        )));
    }

    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout must be >= 1 second, got {}",
            config.request_timeout
        )));
    }

    // max_depth >= 0 is always true for u32, so no check needed

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    // Validate contact URL
    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::Validation(format!("Invalid contact-url: {}", e)))?;

    // Validate contact email (basic validation)
    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.snapshot_path.is_empty() {
        return Err(ConfigError::Validation(
            "snapshot-path cannot be empty".to_string(),
        ));
    }

    if config.stats_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "stats-interval must be >= 1 second, got {}",
            config.stats_interval
        )));
    }

    Ok(())
}

/// Basic email validation: one '@' with non-empty local part and a dotted
/// domain
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = email.split('@').collect();

    let valid = parts.len() == 2
        && !parts[0].is_empty()
        && parts[1].contains('.')
        && !parts[1].starts_with('.')
        && !parts[1].ends_with('.');

    if !valid {
        return Err(ConfigError::Validation(format!(
            "contact-email '{}' is not a valid email address",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{CrawlerConfig, OutputConfig, UserAgentConfig};

    fn create_test_config() -> Config {
        Config {
            crawler: CrawlerConfig {
                seed_url: "https://example.com/".to_string(),
                workers: 4,
                max_depth: 3,
                request_timeout: 10,
            },
            user_agent: UserAgentConfig {
                crawler_name: "TestCrawler".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com/about".to_string(),
                contact_email: "admin@example.com".to_string(),
            },
            output: OutputConfig {
                snapshot_path: "./crawl.json".to_string(),
                pretty_snapshot: false,
                stats_interval: 2,
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&create_test_config()).is_ok());
    }

    #[test]
    fn test_relative_seed_url_rejected() {
        let mut config = create_test_config();
        config.crawler.seed_url = "/just/a/path".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_non_http_seed_url_rejected() {
        let mut config = create_test_config();
        config.crawler.seed_url = "ftp://example.com/".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = create_test_config();
        config.crawler.workers = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = create_test_config();
        config.crawler.request_timeout = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_crawler_name_rejected() {
        let mut config = create_test_config();
        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_crawler_name_with_spaces_rejected() {
        let mut config = create_test_config();
        config.user_agent.crawler_name = "Test Crawler".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_email_rejected() {
        for email in ["no-at-sign", "@example.com", "a@b", "a@.com"] {
            let mut config = create_test_config();
            config.user_agent.contact_email = email.to_string();
            assert!(validate(&config).is_err(), "expected rejection for {email}");
        }
    }

    #[test]
    fn test_empty_snapshot_path_rejected() {
        let mut config = create_test_config();
        config.output.snapshot_path = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_stats_interval_rejected() {
        let mut config = create_test_config();
        config.output.stats_interval = 0;
        assert!(validate(&config).is_err());
    }
}

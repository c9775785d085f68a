//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{EndpointSpec, PageMarkers};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and upstream site settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Page classifier markers
    #[serde(default)]
    pub markers: PageMarkers,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Endpoint table override (built-in table when empty)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<EndpointSpec>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::config("scraper.user_agent is empty"));
        }
        if self.scraper.referer.trim().is_empty() {
            return Err(AppError::config("scraper.referer is empty"));
        }
        if self.scraper.timeout_secs == Some(0) {
            return Err(AppError::config("scraper.timeout_secs must be > 0"));
        }
        let base = url::Url::parse(&self.scraper.base_url)?;
        if base.cannot_be_a_base() || !base.path().ends_with('/') {
            return Err(AppError::config(
                "scraper.base_url must be an origin ending with '/'",
            ));
        }
        if self.markers.not_found_text.trim().is_empty() {
            return Err(AppError::config("markers.not_found_text is empty"));
        }
        Ok(())
    }
}

/// HTTP client and upstream site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Origin every endpoint template is resolved against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Referer header for HTTP requests
    #[serde(default = "defaults::referer")]
    pub referer: String,

    /// Request timeout in seconds; transport default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            referer: defaults::referer(),
            timeout_secs: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter for the logger (`error`, `warn`, `info`, `debug`)
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://filmarks.com/".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/124.0 Safari/537.36"
            .into()
    }
    pub fn referer() -> String {
        "https://filmarks.com/".into()
    }
    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::Binding;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.scraper.user_agent = "  ".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.scraper.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_base_without_trailing_slash() {
        let mut config = Config::default();
        config.scraper.base_url = "https://filmarks.com/api".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[scraper]
timeout_secs = 15

[logging]
level = "debug"

[[endpoints]]
name = "trend_dramas"
path = "list-drama/trend"
binding = "query"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.scraper.timeout_secs, Some(15));
        assert_eq!(config.scraper.base_url, "https://filmarks.com/");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.endpoints.len(), 1);
        assert_eq!(config.endpoints[0].binding, Binding::Query);
    }
}

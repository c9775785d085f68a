// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};

use crate::error::{AppError, Result};
use crate::models::ScraperConfig;

/// Create a configured asynchronous HTTP client.
///
/// Every request carries the configured `Referer` and `User-Agent`.
pub fn create_async_client(config: &ScraperConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(REFERER, header_value("referer", &config.referer)?);
    headers.insert(USER_AGENT, header_value("user_agent", &config.user_agent)?);

    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::config(format!("scraper.{name} is not a valid header: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        assert!(create_async_client(&ScraperConfig::default()).is_ok());
    }

    #[test]
    fn rejects_header_with_newline() {
        let config = ScraperConfig {
            referer: "https://filmarks.com/\r\nX: y".to_string(),
            ..ScraperConfig::default()
        };
        assert!(matches!(
            create_async_client(&config),
            Err(AppError::Config(_))
        ));
    }
}

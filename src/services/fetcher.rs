// src/services/fetcher.rs

//! Page fetcher.
//!
//! One GET per call, no retries and no caching. HTTP status is not
//! inspected here; error pages are recognised by the page classifier.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::Result;
use crate::models::ScraperConfig;
use crate::utils::http::create_async_client;

/// Transport that turns a URL into raw markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the markup at `url`.
    ///
    /// Transport failures surface as [`AppError::Http`](crate::error::AppError::Http).
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// `reqwest`-backed fetcher sending the configured identifying headers.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        log::debug!("GET {url}");
        let response = self.client.get(url.clone()).send().await?;
        log::debug!("{} {url}", response.status());
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, ErrorKind};

    #[tokio::test]
    async fn connection_refused_is_http_error() {
        let fetcher = HttpFetcher::new(&ScraperConfig::default()).unwrap();
        // Port 9 (discard) is closed on any sane test host.
        let url = Url::parse("http://127.0.0.1:9/search/dramas").unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    }
}

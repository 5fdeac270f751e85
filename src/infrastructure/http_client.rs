//! HTTP fetching for product pages
//!
//! A thin reqwest wrapper with a browser-identifying user agent and a
//! bounded timeout. There is deliberately no retry loop and no rate
//! limiting here: a failed fetch is reported to the caller (which logs and
//! skips the URL), and pacing between requests is the export flow's
//! responsibility.

use std::time::Duration;

use anyhow::{Result, anyhow};
use reqwest::{Client, ClientBuilder};
use tracing::debug;

use crate::infrastructure::config::FetchConfig;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string sent with every request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    /// Create HttpClientConfig from the application's fetch settings
    pub fn from_fetch_config(fetch: &FetchConfig) -> Self {
        Self {
            user_agent: fetch.user_agent.clone(),
            timeout_seconds: fetch.timeout_seconds,
            follow_redirects: true,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_fetch_config(&FetchConfig::default())
    }
}

/// HTTP client for fetching raw product-page text
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    /// Fetch the raw page text from a URL.
    ///
    /// Non-success statuses, transport errors and empty bodies are all
    /// reported as errors; the caller decides whether to skip or abort.
    pub async fn fetch_html_string(&self, url: &str) -> Result<String> {
        debug!("HTTP GET: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error {}: {}", response.status(), url));
        }

        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body: {}", e))?;

        if body.is_empty() {
            return Err(anyhow!("Empty response from {}", url));
        }

        Ok(body)
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

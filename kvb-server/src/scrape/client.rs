//! KVB website HTTP client.
//!
//! Fetches raw HTML pages from the KVB site. The site blocks requests that
//! don't look like a desktop browser, so every request carries a fixed
//! user-agent.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tokio::sync::Semaphore;

use super::error::ScrapeError;

/// Default base URL for the KVB website.
pub const DEFAULT_BASE_URL: &str = "https://www.kvb.koeln";

/// Desktop browser user-agent expected by the site.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_3) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/34.0.1847.137 Safari/537.36";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// A source of raw HTML pages, addressed by site path.
///
/// Implemented by [`KvbClient`] for the live site; tests substitute canned
/// pages.
pub trait PageSource: Send + Sync + 'static {
    /// Fetch the page at `path` (e.g. `/qr/1/`).
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, ScrapeError>> + Send;

    /// Absolute URL for a site path.
    fn absolute_url(&self, path: &str) -> String;
}

/// Configuration for the KVB client.
#[derive(Debug, Clone)]
pub struct KvbConfig {
    /// Base URL of the site (no trailing slash)
    pub base_url: String,
    /// User-agent header sent with every request
    pub user_agent: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl KvbConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for KvbConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the KVB website.
///
/// Uses a semaphore to limit concurrent requests; the site is slow and
/// rate-limits aggressive clients.
#[derive(Debug, Clone)]
pub struct KvbClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl KvbClient {
    /// Create a new client with the given configuration.
    pub fn new(config: KvbConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        if let Ok(ua) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, ua);
        } else {
            tracing::warn!(user_agent = %config.user_agent, "invalid user-agent, using reqwest default");
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PageSource for KvbClient {
    async fn fetch(&self, path: &str) -> Result<String, ScrapeError> {
        // The semaphore is never closed, so a failed acquire can't happen.
        let _permit = self.semaphore.acquire().await.ok();

        let url = self.absolute_url(path);
        tracing::debug!(%url, "fetching page");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ScrapeError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UpstreamStatus {
                url,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| ScrapeError::Transport { url, source })
    }

    fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

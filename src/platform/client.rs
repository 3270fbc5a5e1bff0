//! HTTP client for share-page and media requests

use crate::error::RtkError;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::debug;

/// Desktop browser User-Agent used for both page and media requests.
/// Share pages serve the rehydration JSON only to browser-looking clients.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent override
    pub user_agent: Option<String>,
    /// Proxy URL
    pub proxy_url: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: None,
            proxy_url: None,
        }
    }
}

/// HTTP client wrapper that issues browser-like requests.
///
/// Redirects (HTTP and TLS) are followed transparently by the underlying
/// client, which matters for `vm.tiktok.com` short links that bounce to the
/// canonical share page.
pub struct PageClient {
    client: Client,
    config: HttpClientConfig,
}

impl PageClient {
    /// Create a new client with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Self {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .gzip(true)
            .brotli(true)
            .cookie_store(true);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        } else {
            builder = builder.user_agent(DESKTOP_USER_AGENT);
        }

        if let Some(proxy_url) = &config.proxy_url {
            if let Ok(proxy) = reqwest::Proxy::all(proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder.build().expect("Failed to build HTTP client");

        Self { client, config }
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Create a navigation-style GET request for a share page
    pub fn create_page_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Connection", "keep-alive")
            .header("Upgrade-Insecure-Requests", "1")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Cache-Control", "max-age=0")
    }

    /// Create a GET request for a media URL. Many CDNs reject hot-linked
    /// requests without a platform Referer.
    pub fn create_media_request(&self, url: &str, referer: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("Accept", "*/*")
            .header("Referer", referer)
    }

    /// Fetch a share page and return its HTML.
    ///
    /// One GET, no retries. Retry policy is the caller's responsibility.
    pub async fn fetch_page(&self, url: &str) -> Result<String, RtkError> {
        debug!("Fetching page: {}", url);

        let response = self.create_page_request(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(RtkError::PageFetchStatus(status.as_u16()));
        }

        let html = response.text().await?;
        if html.is_empty() {
            return Err(RtkError::EmptyPage);
        }

        debug!("Fetched HTML, length: {}", html.len());
        Ok(html)
    }
}

impl Default for PageClient {
    fn default() -> Self {
        Self::new()
    }
}

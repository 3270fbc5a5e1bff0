//! Main download pipeline

use crate::core::media_info::MediaInfo;
use crate::core::progress::Progress;
use crate::download::{DownloaderConfig, StreamingDownloader};
use crate::error::RtkError;
use crate::platform::client::{HttpClientConfig, PageClient};
use crate::platform::scrape::PageScraper;
use crate::utils::filename::{generate_unique_filename, media_filename};
use crate::utils::url::{detect_platform, extract_video_id, normalize_page_url};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Output extension is fixed to mp4 even when the resolved media URL points
/// at another container. Matches observed real-world file outputs; do not
/// change without re-verifying them.
const OUTPUT_EXTENSION: &str = "mp4";

/// How much HTML to log when every scrape strategy misses
const HTML_SAMPLE_LEN: usize = 2000;

/// Main downloader configuration
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Directory downloaded files are written into
    pub output_dir: PathBuf,
    /// HTTP timeout
    pub timeout: Duration,
    /// Rate limit in bytes per second
    pub rate_limit_bps: Option<u64>,
    /// User-Agent override
    pub user_agent: Option<String>,
    /// Proxy URL
    pub proxy_url: Option<String>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            timeout: Duration::from_secs(30),
            rate_limit_bps: None,
            user_agent: None,
            proxy_url: None,
        }
    }
}

/// Main downloader struct.
///
/// Each call runs a fresh fetch → scrape → download pipeline with no shared
/// mutable state, so concurrent calls on clones are safe; the caller bounds
/// concurrency.
pub struct Downloader {
    options: DownloadOptions,
    scraper: PageScraper,
    progress_callback: Option<Arc<dyn Fn(Progress) + Send + Sync>>,
}

impl Downloader {
    /// Create a new downloader with default options
    pub fn new() -> Self {
        Self {
            options: DownloadOptions::default(),
            scraper: PageScraper::new(),
            progress_callback: None,
        }
    }

    /// Set output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.output_dir = dir.into();
        self
    }

    /// Set HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set rate limit
    pub fn with_rate_limit(mut self, bytes_per_second: u64) -> Self {
        self.options.rate_limit_bps = Some(bytes_per_second);
        self
    }

    /// Set User-Agent override
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.user_agent = Some(user_agent.into());
        self
    }

    /// Set proxy URL
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.options.proxy_url = Some(proxy_url.into());
        self
    }

    /// Set progress callback
    pub fn with_progress(
        mut self,
        callback: impl Fn(Progress) + Send + Sync + 'static,
    ) -> Self {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Resolve a share-page URL to a direct media URL without downloading
    pub async fn resolve_url(&self, page_url: &str) -> Result<MediaInfo, RtkError> {
        let trimmed = page_url.trim();

        let platform = detect_platform(trimmed)?;
        let video_id = extract_video_id(trimmed)?;
        info!(
            "Resolving {} video {} from share page",
            platform.as_str(),
            video_id
        );

        let normalized = normalize_page_url(trimmed);
        // Guarantee an absolute, parseable URL before any request goes out
        url::Url::parse(&normalized)?;

        let client = PageClient::with_config(self.http_config());
        let html = client.fetch_page(&normalized).await?;

        let media_url = match self.scraper.resolve(&html) {
            Some(url) => url,
            None => {
                let sample: String = html.chars().take(HTML_SAMPLE_LEN).collect();
                warn!("Could not find media URL. HTML sample: {}", sample);
                return Err(RtkError::NoMediaUrl);
            }
        };

        debug!("Resolved media URL: {}", media_url);
        Ok(MediaInfo::resolved(video_id, platform, normalized, media_url))
    }

    /// Download a video to `{video_id}.mp4` under the output directory and
    /// return its metadata, including the absolute file path.
    pub async fn download(&self, page_url: &str) -> Result<MediaInfo, RtkError> {
        let mut info = self.resolve_url(page_url).await?;

        let filename = media_filename(&info.id, OUTPUT_EXTENSION);
        // A repeat download for the same id gets a counter suffix instead of
        // overwriting the earlier file
        let filename = generate_unique_filename(&self.options.output_dir, &filename)?;
        let output_path = self.options.output_dir.join(filename);
        debug!("Output path: {:?}", output_path);

        let downloader = self.streaming_downloader();
        let written = downloader
            .download(&info.media_url, info.platform.referer(), &output_path)
            .await?;

        let absolute_path = tokio::fs::canonicalize(&output_path).await?;
        info!(
            "Download completed: {:?} ({} bytes)",
            absolute_path, written
        );

        info.file_path = Some(absolute_path);
        info.size_bytes = Some(written);
        Ok(info)
    }

    fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: self.options.timeout,
            user_agent: self.options.user_agent.clone(),
            proxy_url: self.options.proxy_url.clone(),
        }
    }

    fn streaming_downloader(&self) -> StreamingDownloader {
        let config = DownloaderConfig {
            rate_limit_bps: self.options.rate_limit_bps,
            progress_callback: self.progress_callback.clone(),
        };
        StreamingDownloader::with_http_config(config, self.http_config())
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

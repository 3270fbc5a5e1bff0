//! Streaming media downloader

use crate::core::progress::Progress;
use crate::error::RtkError;
use crate::platform::client::{HttpClientConfig, PageClient};
use futures_util::StreamExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Streaming downloader configuration
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Rate limit in bytes per second
    pub rate_limit_bps: Option<u64>,
    /// Progress callback
    pub progress_callback: Option<Arc<dyn Fn(Progress) + Send + Sync>>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            rate_limit_bps: None,
            progress_callback: None,
        }
    }
}

/// Streaming downloader.
///
/// Media files are streamed to a `.tmp` sibling and renamed into place only
/// after a non-empty body has been fully written, so a failed download never
/// leaves a zero-byte file behind as an apparent success.
pub struct StreamingDownloader {
    client: PageClient,
    config: DownloaderConfig,
    rate_limiter: Option<Arc<Mutex<RateLimiter>>>,
}

/// Rate limiter for controlling download speed.
///
/// Paces the cumulative byte count against the time elapsed since the first
/// chunk, so the effective rate stays at the configured value over the whole
/// transfer instead of drifting as more bytes accumulate.
struct RateLimiter {
    bytes_per_second: u64,
    started: Option<std::time::Instant>,
    bytes_sent: u64,
}

impl RateLimiter {
    fn new(bytes_per_second: u64) -> Self {
        Self {
            bytes_per_second,
            started: None,
            bytes_sent: 0,
        }
    }

    async fn wait_if_needed(&mut self, bytes: u64) {
        let started = *self
            .started
            .get_or_insert_with(std::time::Instant::now);

        self.bytes_sent += bytes;
        let target =
            Duration::from_secs_f64(self.bytes_sent as f64 / self.bytes_per_second as f64);
        let elapsed = started.elapsed();

        if target > elapsed {
            let wait_time = target - elapsed;
            if wait_time > Duration::from_millis(1) {
                tokio::time::sleep(wait_time).await;
            }
        }
    }
}

impl StreamingDownloader {
    /// Create a new streaming downloader
    pub fn new() -> Self {
        Self::with_config(DownloaderConfig::default())
    }

    /// Create a new streaming downloader with configuration
    pub fn with_config(config: DownloaderConfig) -> Self {
        Self::with_http_config(config, HttpClientConfig::default())
    }

    /// Create a new streaming downloader with both downloader and HTTP config
    pub fn with_http_config(config: DownloaderConfig, http_config: HttpClientConfig) -> Self {
        let rate_limiter = config
            .rate_limit_bps
            .map(|bps| Arc::new(Mutex::new(RateLimiter::new(bps))));

        Self {
            client: PageClient::with_config(http_config),
            config,
            rate_limiter,
        }
    }

    /// Set progress callback
    pub fn with_progress_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.config.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Set rate limit
    pub fn with_rate_limit(mut self, bytes_per_second: u64) -> Self {
        self.config.rate_limit_bps = Some(bytes_per_second);
        self.rate_limiter = Some(Arc::new(Mutex::new(RateLimiter::new(bytes_per_second))));
        self
    }

    /// Download a media URL to a local file, returning the number of bytes
    /// written. The `referer` must point at the source platform's root.
    pub async fn download(
        &self,
        media_url: &str,
        referer: &str,
        output_path: &Path,
    ) -> Result<u64, RtkError> {
        info!("Starting media download from: {}", media_url);

        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self
            .client
            .create_media_request(media_url, referer)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RtkError::MediaFetchStatus(status.as_u16()));
        }

        let total_size = response.content_length().unwrap_or(0);
        debug!("Media response OK, content length: {}", total_size);

        let tmp_path = output_path.with_extension("tmp");
        let mut file = File::create(&tmp_path).await?;

        match self.stream_to_file(response, total_size, &mut file).await {
            Ok(downloaded) if downloaded > 0 => {
                file.flush().await?;
                drop(file);
                tokio::fs::rename(&tmp_path, output_path).await?;
                info!("Media download completed: {} bytes", downloaded);
                Ok(downloaded)
            }
            Ok(_) => {
                warn!("Media response body was empty, cleaning up temp file");
                drop(file);
                let _ = tokio::fs::remove_file(&tmp_path).await;
                Err(RtkError::EmptyDownload)
            }
            Err(e) => {
                warn!("Streaming download failed: {}, cleaning up temp file", e);
                drop(file);
                let _ = tokio::fs::remove_file(&tmp_path).await;
                Err(e)
            }
        }
    }

    /// Stream a response body to an open file with a buffered copy
    async fn stream_to_file(
        &self,
        response: reqwest::Response,
        total_size: u64,
        file: &mut File,
    ) -> Result<u64, RtkError> {
        let mut stream = response.bytes_stream();
        let mut downloaded = 0u64;
        let mut progress = Progress::new(total_size);

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            let chunk_size = chunk.len() as u64;

            file.write_all(&chunk).await?;
            downloaded += chunk_size;

            if let Some(callback) = &self.config.progress_callback {
                progress.update(downloaded);
                callback(progress.clone());
            }

            if let Some(rate_limiter) = &self.rate_limiter {
                let mut limiter = rate_limiter.lock().await;
                limiter.wait_if_needed(chunk_size).await;
            }
        }

        file.sync_all().await?;
        Ok(downloaded)
    }
}

impl Default for StreamingDownloader {
    fn default() -> Self {
        Self::new()
    }
}

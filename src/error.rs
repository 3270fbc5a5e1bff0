//! Error types for rtk

use thiserror::Error;

/// Main error type for rtk operations
#[derive(Debug, Error)]
pub enum RtkError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Page fetch failed with status {0}")]
    PageFetchStatus(u16),

    #[error("Page response had no body")]
    EmptyPage,

    #[error("No media URL found in page")]
    NoMediaUrl,

    #[error("Media fetch failed with status {0}")]
    MediaFetchStatus(u16),

    #[error("Downloaded file is empty or missing")]
    EmptyDownload,

    #[error("Download failed: {0}")]
    DownloadFailed(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl RtkError {
    /// Check if error is retryable (whole-pipeline retry in the caller)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RtkError::DownloadFailed(_)
                | RtkError::TimeoutError(_)
                | RtkError::PageFetchStatus(_)
                | RtkError::MediaFetchStatus(_)
                | RtkError::EmptyDownload
        )
    }

    /// Check if error means the page simply had no usable media
    pub fn is_scrape_miss(&self) -> bool {
        matches!(self, RtkError::NoMediaUrl)
    }
}

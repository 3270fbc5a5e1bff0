//! Result metadata for a pipeline run

use crate::utils::url::Platform;
use serde::Serialize;
use std::path::PathBuf;

/// Metadata describing a resolved (and possibly downloaded) video.
///
/// Built fresh per request; nothing here is mutated after the pipeline
/// returns it.
#[derive(Debug, Clone, Serialize)]
pub struct MediaInfo {
    /// Video ID token extracted from the page URL
    pub id: String,
    /// Source platform
    pub platform: Platform,
    /// Normalized page URL that was fetched
    pub page_url: String,
    /// Direct media URL resolved from the page
    pub media_url: String,
    /// Absolute path of the downloaded file, when a download ran
    pub file_path: Option<PathBuf>,
    /// Size of the downloaded file in bytes, when a download ran
    pub size_bytes: Option<u64>,
}

impl MediaInfo {
    /// Create metadata for a resolved-but-not-downloaded video
    pub fn resolved(id: String, platform: Platform, page_url: String, media_url: String) -> Self {
        Self {
            id,
            platform,
            page_url,
            media_url,
            file_path: None,
            size_bytes: None,
        }
    }
}

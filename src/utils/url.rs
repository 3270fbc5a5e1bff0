//! URL utilities for extracting video IDs and parsing share-page URLs

use crate::error::RtkError;
use regex::Regex;
use std::sync::LazyLock;

/// Supported source platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    TikTok,
    Instagram,
}

impl Platform {
    /// Root page URL, used as Referer for media downloads
    pub fn referer(&self) -> &'static str {
        match self {
            Platform::TikTok => "https://www.tiktok.com/",
            Platform::Instagram => "https://www.instagram.com/",
        }
    }

    /// Short tag used in logs and result metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::TikTok => "tiktok",
            Platform::Instagram => "instagram",
        }
    }
}

/// ID patterns in priority order. First match wins.
static ID_PATTERNS: LazyLock<Vec<(Regex, Platform)>> = LazyLock::new(|| {
    [
        (r"tiktok\.com/.+?/video/(\d+)", Platform::TikTok),
        (r"tiktok\.com/t/([A-Za-z0-9]+)", Platform::TikTok),
        (r"vm\.tiktok\.com/([A-Za-z0-9]+)", Platform::TikTok),
        (r"instagram\.com/reel/([A-Za-z0-9_-]+)", Platform::Instagram),
        (r"instagram\.com/p/([A-Za-z0-9_-]+)", Platform::Instagram),
    ]
    .into_iter()
    .map(|(pattern, platform)| (Regex::new(pattern).unwrap(), platform))
    .collect()
});

/// Extract the video ID token from a share-page URL.
///
/// Recognized shapes:
/// - `https://www.tiktok.com/@user/video/1234567890`
/// - `https://www.tiktok.com/t/ZThJMSDvK/`
/// - `https://vm.tiktok.com/ZThJMSDvK/`
/// - `https://www.instagram.com/reel/Cxyz_123/`
/// - `https://www.instagram.com/p/Cxyz_123/`
pub fn extract_video_id(url: &str) -> Result<String, RtkError> {
    for (re, _) in ID_PATTERNS.iter() {
        if let Some(caps) = re.captures(url) {
            if let Some(id) = caps.get(1) {
                return Ok(id.as_str().to_string());
            }
        }
    }

    Err(RtkError::InvalidUrl(
        "Could not extract video ID from URL".to_string(),
    ))
}

/// Detect which platform a share URL belongs to
pub fn detect_platform(url: &str) -> Result<Platform, RtkError> {
    if url.contains("tiktok.com") {
        Ok(Platform::TikTok)
    } else if url.contains("instagram.com") {
        Ok(Platform::Instagram)
    } else {
        Err(RtkError::InvalidUrl(
            "Not a supported share-page URL".to_string(),
        ))
    }
}

/// Normalize a page URL before fetching: trim whitespace and prepend an
/// `https://` scheme when none is present.
pub fn normalize_page_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Check if URL looks like a supported share-page URL
pub fn is_share_url(url: &str) -> bool {
    detect_platform(url).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id_tiktok() {
        assert_eq!(
            extract_video_id("https://www.tiktok.com/@someuser/video/7234567890123456789").unwrap(),
            "7234567890123456789"
        );

        assert_eq!(
            extract_video_id("https://www.tiktok.com/t/ZThJMSDvK/").unwrap(),
            "ZThJMSDvK"
        );

        assert_eq!(
            extract_video_id("https://vm.tiktok.com/ZThJMSDvK/").unwrap(),
            "ZThJMSDvK"
        );
    }

    #[test]
    fn test_extract_video_id_instagram() {
        assert_eq!(
            extract_video_id("https://www.instagram.com/reel/Cxyz_12-ab/").unwrap(),
            "Cxyz_12-ab"
        );

        assert_eq!(
            extract_video_id("https://www.instagram.com/p/Cabc123/").unwrap(),
            "Cabc123"
        );
    }

    #[test]
    fn test_id_patterns_compile_once() {
        // Forces the LazyLock to initialize; a bad pattern panics here
        // instead of inside every extraction call
        assert_eq!(ID_PATTERNS.len(), 5);
    }

    #[test]
    fn test_extract_video_id_priority_order() {
        // Canonical /video/ path takes priority over the short-link pattern
        assert_eq!(
            extract_video_id("https://www.tiktok.com/@u/video/123?from=vm.tiktok.com/ZZZ").unwrap(),
            "123"
        );
    }

    #[test]
    fn test_extract_video_id_errors() {
        assert!(extract_video_id("https://example.com/video/123").is_err());
        assert!(extract_video_id("https://www.tiktok.com/@someuser").is_err());
        assert!(extract_video_id("not-a-url").is_err());
        assert!(extract_video_id("").is_err());
    }

    #[test]
    fn test_extract_video_id_no_scheme() {
        // Patterns match on the host substring, scheme is not required
        assert_eq!(
            extract_video_id("www.tiktok.com/@u/video/42").unwrap(),
            "42"
        );
        assert_eq!(extract_video_id("vm.tiktok.com/AbC9/").unwrap(), "AbC9");
    }

    #[test]
    fn test_detect_platform() {
        assert_eq!(
            detect_platform("https://www.tiktok.com/@u/video/1").unwrap(),
            Platform::TikTok
        );
        assert_eq!(
            detect_platform("https://www.instagram.com/reel/X/").unwrap(),
            Platform::Instagram
        );
        assert!(detect_platform("https://example.com").is_err());
    }

    #[test]
    fn test_normalize_page_url() {
        assert_eq!(
            normalize_page_url("  www.tiktok.com/t/AbC/ "),
            "https://www.tiktok.com/t/AbC/"
        );
        assert_eq!(
            normalize_page_url("vm.tiktok.com/AbC/"),
            "https://vm.tiktok.com/AbC/"
        );
        // Explicit schemes pass through untouched
        assert_eq!(
            normalize_page_url("http://www.tiktok.com/t/AbC/"),
            "http://www.tiktok.com/t/AbC/"
        );
        assert_eq!(
            normalize_page_url("https://vm.tiktok.com/AbC/"),
            "https://vm.tiktok.com/AbC/"
        );
    }

    #[test]
    fn test_is_share_url() {
        assert!(is_share_url("https://vm.tiktok.com/AbC/"));
        assert!(is_share_url("https://www.instagram.com/p/AbC/"));
        assert!(!is_share_url("https://www.youtube.com/watch?v=xxx"));
    }

    #[test]
    fn test_platform_referer() {
        assert_eq!(Platform::TikTok.referer(), "https://www.tiktok.com/");
        assert_eq!(Platform::Instagram.referer(), "https://www.instagram.com/");
    }
}

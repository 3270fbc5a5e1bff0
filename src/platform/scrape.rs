//! Share-page HTML scraping strategies
//!
//! The platforms embed the same video metadata in several redundant places
//! (script tags, inline window assignments, raw escaped JSON) depending on
//! render path. Each extraction strategy is tried in a fixed order and the
//! first hit wins; a strategy that fails to parse just means "try the next".

use crate::platform::json_finder::find_media_url;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Raw-HTML key/value patterns for strategy 2, in priority order
const RAW_URL_PATTERNS: &[&str] = &[
    r#""downloadAddr"\s*:\s*"([^"]+)""#,
    r#""playAddr"\s*:\s*"([^"]+)""#,
    r#""videoUrl"\s*:\s*"([^"]+)""#,
    r#""download_url"\s*:\s*"([^"]+)""#,
    r#""play_url"\s*:\s*"([^"]+)""#,
    r#"downloadAddr":"([^"]+)""#,
    r#"playAddr":"([^"]+)""#,
];

/// Scraper that resolves a direct media URL from share-page HTML
pub struct PageScraper {
    universal_script: Regex,
    window_assignment: Regex,
    window_assignment_loose: Regex,
    sigi_script: Regex,
    raw_patterns: Vec<Regex>,
}

impl PageScraper {
    /// Create a new scraper with precompiled patterns
    pub fn new() -> Self {
        Self {
            universal_script: Regex::new(
                r#"(?is)<script[^>]*id="__UNIVERSAL_DATA_FOR_REHYDRATION__"[^>]*>(.+?)</script>"#,
            )
            .unwrap(),
            window_assignment: Regex::new(
                r"(?is)window\.__UNIVERSAL_DATA_FOR_REHYDRATION__\s*=\s*(\{[\s\S]*?\});",
            )
            .unwrap(),
            window_assignment_loose: Regex::new(
                r"(?is)window\.__UNIVERSAL_DATA_FOR_REHYDRATION__\s*=\s*([^;]+);",
            )
            .unwrap(),
            sigi_script: Regex::new(r#"(?is)<script[^>]*id="SIGI_STATE"[^>]*>(.+?)</script>"#)
                .unwrap(),
            raw_patterns: RAW_URL_PATTERNS
                .iter()
                .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
                .collect(),
        }
    }

    /// Resolve a media URL from HTML, trying strategies in order:
    /// 1. `__UNIVERSAL_DATA_FOR_REHYDRATION__` script tag
    /// 2. raw key/value patterns in the HTML
    /// 3. inline `window.__UNIVERSAL_DATA_FOR_REHYDRATION__ = {...};`
    /// 4. `SIGI_STATE` script tag
    pub fn resolve(&self, html: &str) -> Option<String> {
        if let Some(url) = self.from_universal_script(html) {
            debug!("Found media URL via rehydration script tag");
            return Some(url);
        }

        if let Some(url) = self.from_raw_patterns(html) {
            debug!("Found media URL via raw pattern");
            return Some(url);
        }

        if let Some(url) = self.from_window_assignment(html) {
            debug!("Found media URL via window assignment");
            return Some(url);
        }

        if let Some(url) = self.from_sigi_state(html) {
            debug!("Found media URL via SIGI_STATE");
            return Some(url);
        }

        None
    }

    /// Strategy 1: parse the rehydration script tag body as JSON
    fn from_universal_script(&self, html: &str) -> Option<String> {
        let caps = self.universal_script.captures(html)?;
        let json_str = caps.get(1)?.as_str().trim();

        match serde_json::from_str::<Value>(json_str) {
            Ok(json) => find_media_url(&json),
            Err(e) => {
                debug!("Rehydration script tag did not parse as JSON: {}", e);
                None
            }
        }
    }

    /// Strategy 2: match known key/value substrings directly in the HTML,
    /// unescape the captured value and accept it only if it is an http(s) URL
    fn from_raw_patterns(&self, html: &str) -> Option<String> {
        for pattern in &self.raw_patterns {
            if let Some(caps) = pattern.captures(html) {
                if let Some(m) = caps.get(1) {
                    let url = unescape_json_url(m.as_str());
                    if url.starts_with("http://") || url.starts_with("https://") {
                        return Some(url);
                    }
                }
            }
        }
        None
    }

    /// Strategy 3: inline window assignment. The non-greedy brace match is
    /// tried first; if its capture does not parse, fall back to a loose
    /// up-to-semicolon match with the braces stripped and re-added.
    fn from_window_assignment(&self, html: &str) -> Option<String> {
        if let Some(caps) = self.window_assignment.captures(html) {
            if let Some(m) = caps.get(1) {
                if let Ok(json) = serde_json::from_str::<Value>(m.as_str()) {
                    if let Some(url) = find_media_url(&json) {
                        return Some(url);
                    }
                }
            }
        }

        let caps = self.window_assignment_loose.captures(html)?;
        let mut json_str = caps.get(1)?.as_str().trim();
        json_str = json_str.strip_prefix('{').unwrap_or(json_str);
        json_str = json_str.strip_suffix('}').unwrap_or(json_str);
        let rewrapped = format!("{{{}}}", json_str);

        match serde_json::from_str::<Value>(&rewrapped) {
            Ok(json) => find_media_url(&json),
            Err(e) => {
                debug!("Window assignment did not parse as JSON: {}", e);
                None
            }
        }
    }

    /// Strategy 4: parse the SIGI_STATE script tag body as JSON
    fn from_sigi_state(&self, html: &str) -> Option<String> {
        let caps = self.sigi_script.captures(html)?;
        let json_str = caps.get(1)?.as_str().trim();

        match serde_json::from_str::<Value>(json_str) {
            Ok(json) => find_media_url(&json),
            Err(e) => {
                debug!("SIGI_STATE did not parse as JSON: {}", e);
                None
            }
        }
    }
}

impl Default for PageScraper {
    fn default() -> Self {
        Self::new()
    }
}

/// Unescape the JSON escape sequences these pages use inside URL values
pub fn unescape_json_url(url: &str) -> String {
    url.replace("\\u002F", "/")
        .replace("\\/", "/")
        .replace("\\\"", "\"")
        .replace("\\\\", "\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universal_page(play_addr: &str) -> String {
        format!(
            r#"<html><head></head><body>
            <script id="__UNIVERSAL_DATA_FOR_REHYDRATION__" type="application/json">
            {{"__DEFAULT_SCOPE__":{{"webapp.video-detail":{{"itemInfo":{{"itemStruct":{{"video":{{"playAddr":"{}"}}}}}}}}}}}}
            </script></body></html>"#,
            play_addr
        )
    }

    #[test]
    fn test_strategy_1_universal_script() {
        let scraper = PageScraper::new();
        let html = universal_page("https://cdn.example.com/v.mp4");

        assert_eq!(
            scraper.resolve(&html).unwrap(),
            "https://cdn.example.com/v.mp4"
        );
    }

    #[test]
    fn test_strategy_2_raw_pattern_with_escapes() {
        let scraper = PageScraper::new();
        let html = r#"<html><script>var x = {"playAddr":"https:\/\/cdn.example.com\/a.mp4"};</script></html>"#;

        assert_eq!(
            scraper.resolve(html).unwrap(),
            "https://cdn.example.com/a.mp4"
        );
    }

    #[test]
    fn test_strategy_2_u002f_escapes() {
        let scraper = PageScraper::new();
        let html = r#"<div>"downloadAddr":"https://cdn.example.com/b.mp4"</div>"#;

        assert_eq!(
            scraper.resolve(html).unwrap(),
            "https://cdn.example.com/b.mp4"
        );
    }

    #[test]
    fn test_strategy_2_rejects_non_http() {
        let scraper = PageScraper::new();
        let html = r#"<div>"playAddr":"blob:internal-ref"</div>"#;

        assert!(scraper.resolve(html).is_none());
    }

    #[test]
    fn test_strategy_3_window_assignment() {
        // video_url is not a raw-pattern key, so strategy 2 cannot match it
        // textually; only the inline assignment path can resolve this page
        let scraper = PageScraper::new();
        let html = r#"<script>
            window.__UNIVERSAL_DATA_FOR_REHYDRATION__ = {"video":{"video_url":"https://cdn.example.com/w.mp4"}};
        </script>"#;

        assert_eq!(
            scraper.resolve(html).unwrap(),
            "https://cdn.example.com/w.mp4"
        );
    }

    #[test]
    fn test_strategy_4_sigi_state_only() {
        // A page with only a SIGI_STATE block and no markers earlier
        // strategies recognize must still resolve, via strategy 4
        let scraper = PageScraper::new();
        let html = r#"<html><body>
            <script id="SIGI_STATE" type="application/json">{"ItemModule":{"123":{"video":{"video_url":"https://cdn.example.com/s.mp4"}}}}</script>
        </body></html>"#;

        assert_eq!(
            scraper.resolve(html).unwrap(),
            "https://cdn.example.com/s.mp4"
        );
    }

    #[test]
    fn test_strategy_order() {
        // Both a rehydration tag and a raw pattern present: strategy 1 wins
        let scraper = PageScraper::new();
        let mut html = universal_page("https://cdn.example.com/first.mp4");
        html.push_str(r#"<div>"downloadAddr":"https://cdn.example.com/second.mp4"</div>"#);

        assert_eq!(
            scraper.resolve(&html).unwrap(),
            "https://cdn.example.com/first.mp4"
        );
    }

    #[test]
    fn test_broken_json_falls_through() {
        // Malformed rehydration JSON is swallowed, strategy 2 still runs
        let scraper = PageScraper::new();
        let html = r#"<html>
            <script id="__UNIVERSAL_DATA_FOR_REHYDRATION__">{not json at all</script>
            <div>"playAddr":"https://cdn.example.com/fallback.mp4"</div>
        </html>"#;

        assert_eq!(
            scraper.resolve(html).unwrap(),
            "https://cdn.example.com/fallback.mp4"
        );
    }

    #[test]
    fn test_nothing_found() {
        let scraper = PageScraper::new();
        let html = "<html><body><p>Video unavailable</p></body></html>";

        assert!(scraper.resolve(html).is_none());
    }

    #[test]
    fn test_unescape_json_url() {
        assert_eq!(
            unescape_json_url(r"https:\/\/cdn.example.com\/a.mp4"),
            "https://cdn.example.com/a.mp4"
        );
        assert_eq!(
            unescape_json_url(r"https://host/x"),
            "https://host/x"
        );
        assert_eq!(unescape_json_url(r#"a\"b"#), r#"a"b"#);
        assert_eq!(unescape_json_url(r"a\\b"), r"a\b");
    }
}

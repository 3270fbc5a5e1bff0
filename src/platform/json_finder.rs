//! Recursive media-URL search over scraped JSON blobs

use serde_json::Value;

/// Hard recursion cap. Share-page state objects are deeply nested and the
/// payload is not under our control.
const MAX_DEPTH: usize = 10;

/// Keys probed first, in priority order. Leading entries hold the URL
/// directly; trailing entries are containers worth descending into early.
const PRIORITY_KEYS: &[&str] = &[
    "downloadAddr",
    "playAddr",
    "videoUrl",
    "url",
    "src",
    "download_url",
    "play_url",
    "video_url",
    "videoUrlNoWaterMark",
    "downloadAddrNoWaterMark",
    "playAddrNoWaterMark",
    "video",
    "videoMeta",
    "itemInfo",
    "itemList",
    "videoData",
];

/// Search a JSON tree for a plausible media URL.
///
/// Objects are probed by the priority key list first, then scanned
/// exhaustively in insertion order. The first hit short-circuits all
/// remaining traversal.
pub fn find_media_url(node: &Value) -> Option<String> {
    find_at_depth(node, 0)
}

fn find_at_depth(node: &Value, depth: usize) -> Option<String> {
    if depth > MAX_DEPTH {
        return None;
    }

    match node {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                match map.get(*key) {
                    Some(Value::String(s)) => {
                        if is_media_url(s) {
                            return Some(s.clone());
                        }
                    }
                    Some(value @ Value::Object(_)) => {
                        if let Some(url) = find_at_depth(value, depth + 1) {
                            return Some(url);
                        }
                    }
                    _ => {}
                }
            }

            // Fall through to every remaining value in insertion order
            for value in map.values() {
                if let Some(url) = find_at_depth(value, depth + 1) {
                    return Some(url);
                }
            }
            None
        }
        Value::Array(items) => {
            for item in items {
                if let Some(url) = find_at_depth(item, depth + 1) {
                    return Some(url);
                }
            }
            None
        }
        Value::String(s) => {
            if is_media_url(s) {
                Some(s.clone())
            } else {
                None
            }
        }
        _ => None,
    }
}

/// A candidate must be an http(s) URL with a video-looking marker.
/// Thumbnails and avatar URLs on these pages are also absolute http URLs.
fn is_media_url(s: &str) -> bool {
    s.starts_with("http") && (s.contains(".mp4") || s.contains("video") || s.contains("cdn"))
}

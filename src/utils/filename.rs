//! Output filename helpers

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).unwrap());

/// Build the output filename for a video ID.
///
/// IDs from supported URL shapes are already alphanumeric, but short-link
/// tokens come from user input so anything outside the safe set is replaced.
pub fn media_filename(video_id: &str, extension: &str) -> String {
    let mut safe_id = INVALID_CHARS.replace_all(video_id, "_").to_string();

    safe_id = safe_id
        .trim_matches(|c: char| c == '.' || c == ' ')
        .to_string();

    if safe_id.is_empty() {
        safe_id = "video".to_string();
    }

    let ext = extension.trim_start_matches('.');
    format!("{}.{}", safe_id, ext)
}

/// Generate a unique filename by appending a counter if the file already exists
pub fn generate_unique_filename(base_path: &Path, filename: &str) -> std::io::Result<String> {
    let mut counter = 1;
    let mut final_filename = filename.to_string();

    while base_path.join(&final_filename).exists() {
        let path = Path::new(filename);
        let stem = path.file_stem().unwrap_or_default();
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        final_filename = format!("{} ({}){}", stem.to_string_lossy(), counter, extension);
        counter += 1;

        if counter > 10000 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "Too many files with similar names",
            ));
        }
    }

    Ok(final_filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_filename() {
        assert_eq!(media_filename("7234567890", "mp4"), "7234567890.mp4");
        assert_eq!(media_filename("ZThJMSDvK", "mp4"), "ZThJMSDvK.mp4");
        assert_eq!(media_filename("bad/id", "mp4"), "bad_id.mp4");
        assert_eq!(media_filename("", "mp4"), "video.mp4");
        assert_eq!(media_filename("abc", ".mp4"), "abc.mp4");
    }

    #[test]
    fn test_generate_unique_filename() {
        let temp_dir = tempfile::tempdir().unwrap();

        let first = generate_unique_filename(temp_dir.path(), "clip.mp4").unwrap();
        assert_eq!(first, "clip.mp4");

        std::fs::write(temp_dir.path().join("clip.mp4"), b"x").unwrap();
        let second = generate_unique_filename(temp_dir.path(), "clip.mp4").unwrap();
        assert_eq!(second, "clip (1).mp4");
    }
}

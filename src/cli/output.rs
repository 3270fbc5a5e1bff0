//! Output formatting and progress display

use crate::cli::args::VerbosityLevel;
use crate::core::media_info::MediaInfo;
use crate::core::progress::{format_bytes, format_duration, Progress};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Output formatter for rtk
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    progress_bar: Option<ProgressBar>,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            progress_bar: None,
        }
    }

    /// Create a progress bar for downloads
    pub fn create_progress_bar(&mut self, total_size: u64) -> Option<ProgressBar> {
        if self.verbosity == VerbosityLevel::Quiet {
            return None;
        }

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-");

        let progress_bar = ProgressBar::new(total_size);
        progress_bar.set_style(style);
        progress_bar.set_message("Downloading...");

        self.progress_bar = Some(progress_bar.clone());
        Some(progress_bar)
    }

    /// Update progress bar
    pub fn update_progress(&self, progress: &Progress) {
        if let Some(progress_bar) = &self.progress_bar {
            progress_bar.set_position(progress.downloaded_size);
            progress_bar.set_length(progress.total_size);

            if let Some(speed) = progress.speed {
                progress_bar.set_message(format!("{}/s", format_bytes(speed as u64)));
            }
        }
    }

    /// Finish progress bar
    pub fn finish_progress(&self, message: &str) {
        if let Some(progress_bar) = &self.progress_bar {
            progress_bar.finish_with_message(message.to_string());
        }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("ℹ️  {}", message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("✅ {}", message);
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            eprintln!("⚠️  {}", message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }

    /// Print download start message
    pub fn print_download_start(&self, url: &str) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        println!("🚀 Starting download...");
        println!("🔗 URL: {}", url);
        println!();
    }

    /// Print download result
    pub fn print_download_complete(&self, info: &MediaInfo, duration: Duration) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        println!();
        println!("✅ Download completed!");
        println!("🎬 {} video {}", info.platform.as_str(), info.id);
        if let Some(path) = &info.file_path {
            println!("💾 Saved to: {}", path.display());
        }
        if let Some(size) = info.size_bytes {
            println!("📊 Size: {}", format_bytes(size));
        }
        println!("⏱️  Time: {}", format_duration(duration));
    }
}

/// Create a progress callback for the downloader
pub fn create_progress_callback(
    formatter: Arc<OutputFormatter>,
) -> impl Fn(Progress) + Send + Sync + 'static {
    move |progress: Progress| {
        formatter.update_progress(&progress);
    }
}

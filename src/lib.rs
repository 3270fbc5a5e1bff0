//! # rtk - Rust TikTok Downloader
//!
//! Fast and reliable TikTok/Instagram video downloader written in Rust.
//!
//! ## Features
//!
//! - Share-page scraping with layered fallback strategies
//! - Recursive media-URL search over embedded JSON state
//! - Streaming downloads with progress reporting
//! - Short-link (`vm.tiktok.com`) redirect handling
//! - Rate limiting and caller-side retry logic
//!
//! ## Example
//!
//! ```rust,no_run
//! use rtk::Downloader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = Downloader::new().with_output_dir("./downloads");
//!
//!     let info = downloader
//!         .download("https://www.tiktok.com/@user/video/1234567890")
//!         .await?;
//!     println!("Saved: {:?}", info.file_path);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod download;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use core::{DownloadOptions, Downloader, MediaInfo, Progress};
pub use error::RtkError;
pub use utils::url::Platform;

/// Result type alias for rtk operations
pub type Result<T> = std::result::Result<T, RtkError>;

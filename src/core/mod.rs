//! Core functionality for rtk

pub mod downloader;
pub mod media_info;
pub mod progress;

pub use downloader::*;
pub use media_info::*;
pub use progress::*;

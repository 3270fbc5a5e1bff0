//! Download system for rtk

pub mod downloader;
pub mod retry;

pub use downloader::*;
pub use retry::*;

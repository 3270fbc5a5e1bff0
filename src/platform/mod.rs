//! Share-page fetching and scraping

pub mod client;
pub mod json_finder;
pub mod scrape;

pub use client::*;
pub use json_finder::*;
pub use scrape::*;

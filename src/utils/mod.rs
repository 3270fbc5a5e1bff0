//! Utility functions for rtk

pub mod filename;
pub mod url;

pub use filename::*;
pub use url::*;

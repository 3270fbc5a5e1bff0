//! Command line interface for rtk

pub mod args;
pub mod output;

pub use args::*;
pub use output::*;

//! Command line argument parsing

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Rust TikTok Downloader - Fast and reliable TikTok/Instagram video downloader
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TikTok or Instagram video URL
    pub url: String,

    /// Output directory for downloaded files
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Disable progress output
    #[arg(long)]
    pub no_progress: bool,

    /// HTTP timeout (e.g., 30s, 1m)
    #[arg(long, value_name = "DURATION", default_value = "30s")]
    pub timeout: humantime::Duration,

    /// Whole-pipeline retries for transient errors
    #[arg(long, default_value = "3")]
    pub retries: u32,

    /// Download rate limit (e.g., 2MiB/s, 500KiB/s)
    #[arg(long, value_name = "RATE")]
    pub rate_limit: Option<String>,

    /// Print resolved media URL and exit (no download)
    #[arg(short = 'g', long)]
    pub print_url: bool,

    /// Override User-Agent header
    #[arg(long, value_name = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Proxy URL (http/https/socks)
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Get HTTP timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        self.timeout.into()
    }

    /// Parse rate limit string to bytes per second
    pub fn parse_rate_limit(&self) -> Option<u64> {
        self.rate_limit
            .as_ref()
            .and_then(|rate| parse_rate_limit(rate))
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

/// Parse rate limit string to bytes per second
pub fn parse_rate_limit(rate: &str) -> Option<u64> {
    let rate = rate.trim().to_uppercase();
    if rate.is_empty() {
        return None;
    }

    // Remove /s suffix if present
    let rate = rate.trim_end_matches("/S");

    // Find the number and unit
    let mut number_end = 0;
    for (i, c) in rate.char_indices() {
        if c.is_ascii_digit() || c == '.' {
            number_end = i + 1;
        } else {
            break;
        }
    }

    if number_end == 0 {
        return None;
    }

    let number_str = &rate[..number_end];
    let unit = &rate[number_end..].trim();

    let number: f64 = number_str.parse().ok()?;
    if number <= 0.0 {
        return None;
    }

    let multiplier = match *unit {
        "B" | "" => 1,
        "KB" => 1000,
        "KIB" => 1024,
        "MB" => 1000 * 1000,
        "MIB" => 1024 * 1024,
        "GB" => 1000 * 1000 * 1000,
        "GIB" => 1024 * 1024 * 1024,
        _ => return None,
    };

    Some((number * multiplier as f64) as u64)
}


// Implement Default for Args to make tests work
impl Default for Args {
    fn default() -> Self {
        Self {
            url: String::new(),
            output: None,
            no_progress: false,
            timeout: humantime::Duration::from(Duration::from_secs(30)),
            retries: 3,
            rate_limit: None,
            print_url: false,
            user_agent: None,
            proxy: None,
            verbose: false,
            quiet: false,
        }
    }
}

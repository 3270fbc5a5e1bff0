//! Main entry point for rtk CLI

use clap::Parser;
use rtk::cli::output::{create_progress_callback, OutputFormatter};
use rtk::cli::Args;
use rtk::core::progress::format_duration;
use rtk::core::Downloader;
use rtk::download::{RetryConfig, RetryExecutor};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let args = Args::parse();
    info!("Starting rtk with args: {:?}", args);

    // Initialize output formatter; a bar with unknown length picks up the
    // real total from the first progress callback
    let mut formatter = OutputFormatter::new(args.verbosity_level());
    if !args.no_progress && !args.print_url {
        formatter.create_progress_bar(0);
    }
    let formatter = Arc::new(formatter);

    // Create downloader
    let mut downloader = Downloader::new().with_timeout(args.timeout_duration());

    if let Some(output) = &args.output {
        downloader = downloader.with_output_dir(output);
    }

    if let Some(rate_limit) = args.parse_rate_limit() {
        downloader = downloader.with_rate_limit(rate_limit);
    }

    if let Some(user_agent) = &args.user_agent {
        downloader = downloader.with_user_agent(user_agent);
    }

    if let Some(proxy) = &args.proxy {
        downloader = downloader.with_proxy(proxy);
    }

    if !args.no_progress {
        downloader = downloader.with_progress(create_progress_callback(formatter.clone()));
    }

    let downloader = Arc::new(downloader);

    // Print URL only mode: resolve and exit, no retry wrapping
    if args.print_url {
        let info = downloader.resolve_url(&args.url).await?;
        println!("{}", info.media_url);
        return Ok(());
    }

    formatter.print_download_start(&args.url);
    let start_time = Instant::now();

    // The pipeline is single-pass; transient failures are retried here
    let executor = RetryExecutor::with_config(RetryConfig::with_max_retries(args.retries));
    let result = executor
        .execute({
            let downloader = downloader.clone();
            let url = args.url.clone();
            move || {
                let downloader = downloader.clone();
                let url = url.clone();
                Box::pin(async move { downloader.download(&url).await })
            }
        })
        .await;

    match result {
        Ok(media_info) => {
            let duration = start_time.elapsed();
            formatter.finish_progress("done");
            formatter.print_download_complete(&media_info, duration);
            info!(
                "Download completed in {}",
                format_duration(duration)
            );
            Ok(())
        }
        Err(e) => {
            formatter.error(&format!("Download failed: {}", e));
            Err(e.into())
        }
    }
}

/// Initialize logging system
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    // Get log level from environment or default to info
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();

    Ok(())
}

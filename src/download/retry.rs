//! Whole-pipeline retry logic
//!
//! The extraction pipeline itself makes a single pass per call; retrying a
//! failed run is the caller's decision. The CLI wraps the pipeline with this
//! executor, driven by `--retries`.

use crate::error::RtkError;
use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier
    pub backoff_multiplier: f64,
    /// Jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    /// Config that retries a fixed number of times with default backoff
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }
}

/// Retry executor with exponential backoff and jitter
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Create a new retry executor
    pub fn new() -> Self {
        Self::with_config(RetryConfig::default())
    }

    /// Create a new retry executor with configuration
    pub fn with_config(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Execute a function, retrying retryable errors with backoff.
    /// Non-retryable errors (bad URL, no media found) break out immediately.
    pub async fn execute<F, T>(&self, mut func: F) -> Result<T, RtkError>
    where
        F: FnMut() -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<T, RtkError>> + Send>,
        >,
    {
        let mut last_error = None;
        let mut delay = self.config.initial_delay;

        for attempt in 0..=self.config.max_retries {
            match func().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    let retryable = error.is_retryable();
                    last_error = Some(error);

                    if !retryable {
                        break;
                    }

                    if attempt < self.config.max_retries {
                        let jitter = if self.config.jitter_factor > 0.0 {
                            let jitter_range =
                                delay.as_millis() as f64 * self.config.jitter_factor;
                            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
                            Duration::from_millis(jitter.abs() as u64)
                        } else {
                            Duration::from_millis(0)
                        };

                        tokio::time::sleep(delay + jitter).await;

                        delay = Duration::from_millis(
                            (delay.as_millis() as f64 * self.config.backoff_multiplier) as u64,
                        );
                        if delay > self.config.max_delay {
                            delay = self.config.max_delay;
                        }
                    }
                }
            }
        }

        Err(last_error.unwrap_or(RtkError::Generic("All retry attempts failed".to_string())))
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

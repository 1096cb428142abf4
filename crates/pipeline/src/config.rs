use std::time::Duration;

use academy_core::retry::{RetryPolicy, DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS};

/// Tuning knobs for the progress pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Retry policy for progress-aggregate reads.
    pub progress_retry: RetryPolicy,
    /// Pause between recording a completion and re-reading the progress
    /// aggregate. Zero for PostgreSQL, where the aggregate trigger runs in
    /// the inserting transaction; raise it for stores that recompute the
    /// aggregate asynchronously.
    pub settle_delay: Duration,
}

impl PipelineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default |
    /// |-----------------------------|---------|
    /// | `PROGRESS_READ_ATTEMPTS`    | `2`     |
    /// | `PROGRESS_RETRY_BACKOFF_MS` | `500`   |
    /// | `PROGRESS_SETTLE_DELAY_MS`  | `0`     |
    pub fn from_env() -> Self {
        let attempts: u32 = std::env::var("PROGRESS_READ_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
            .parse()
            .expect("PROGRESS_READ_ATTEMPTS must be a valid u32");

        let backoff_ms: u64 = std::env::var("PROGRESS_RETRY_BACKOFF_MS")
            .unwrap_or_else(|_| (DEFAULT_BACKOFF.as_millis() as u64).to_string())
            .parse()
            .expect("PROGRESS_RETRY_BACKOFF_MS must be a valid u64");

        let settle_ms: u64 = std::env::var("PROGRESS_SETTLE_DELAY_MS")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("PROGRESS_SETTLE_DELAY_MS must be a valid u64");

        Self {
            progress_retry: RetryPolicy::new(attempts, Duration::from_millis(backoff_ms)),
            settle_delay: Duration::from_millis(settle_ms),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            progress_retry: RetryPolicy::default(),
            settle_delay: Duration::ZERO,
        }
    }
}

//! Classification of transient infrastructure errors and the retry policy
//! used for progress reads.

use std::time::Duration;

/// Error-text fragments that indicate a connectivity problem rather than a
/// problem with the request itself.
const TRANSIENT_MARKERS: &[&str] = &[
    "NetworkError",
    "Content-Length",
    "fetch",
    "connection refused",
    "connection reset",
    "connection closed",
    "broken pipe",
    "timed out",
];

/// Whether an error message looks like a transient network failure.
pub fn is_transient_message(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    TRANSIENT_MARKERS
        .iter()
        .any(|m| message.contains(m) || lowered.contains(&m.to_ascii_lowercase()))
}

/// Bounded fixed-backoff retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Always at least 1.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

/// Default number of attempts for progress reads.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
/// Default pause between progress-read attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Whether another attempt is allowed after `attempt` (1-based) failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF)
    }
}

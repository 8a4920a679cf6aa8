//! Governor configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the request governor.
///
/// Controls the sliding rate-limit window, the concurrency ceiling, and the
/// retry/backoff behavior. Immutable once the governor is constructed; there
/// is no ambient or process-wide default instance.
///
/// # Defaults
///
/// - `max_requests_per_window`: 300
/// - `window`: 60 seconds
/// - `max_concurrent_requests`: 50 (never above `max_requests_per_window`)
/// - `max_retry_attempts`: 3
/// - `initial_backoff`: 1 second
/// - `max_backoff`: 30 seconds
/// - `jitter_factor`: 0.1
/// - `respect_retry_after`: true
///
/// # Example
///
/// ```
/// use paylane::governor::GovernorConfig;
/// use std::time::Duration;
///
/// // Create with defaults
/// let config = GovernorConfig::default();
///
/// // Or customize via builder
/// let custom = GovernorConfig::new()
///     .with_max_requests_per_window(120)
///     .with_max_retry_attempts(5)
///     .with_initial_backoff(Duration::from_millis(500))
///     .with_jitter_factor(0.25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// Maximum admissions within any rolling `window` interval.
    pub max_requests_per_window: u32,

    /// Length of the rolling rate-limit window.
    pub window: Duration,

    /// Maximum simultaneous in-flight requests.
    pub max_concurrent_requests: u32,

    /// Maximum number of retries after the initial attempt.
    ///
    /// A value of 0 means no retries; the total attempt count is always
    /// `max_retry_attempts + 1`.
    pub max_retry_attempts: u32,

    /// Backoff delay before the first retry.
    ///
    /// Subsequent delays double per attempt, capped at `max_backoff`.
    pub initial_backoff: Duration,

    /// Upper bound on any computed backoff delay (before jitter).
    pub max_backoff: Duration,

    /// Fraction of the backoff delay added as random jitter (0.0–1.0).
    pub jitter_factor: f64,

    /// Whether a server-provided `Retry-After` hint overrides the
    /// exponential backoff formula.
    pub respect_retry_after: bool,
}

impl GovernorConfig {
    /// Default admissions per window.
    pub const DEFAULT_MAX_REQUESTS_PER_WINDOW: u32 = 300;

    /// Default window length (60 seconds).
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

    /// Default concurrency ceiling.
    pub const DEFAULT_MAX_CONCURRENT_REQUESTS: u32 = 50;

    /// Default retry budget.
    pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 3;

    /// Default initial backoff (1 second).
    pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

    /// Default backoff cap (30 seconds).
    pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(30);

    /// Default jitter factor.
    pub const DEFAULT_JITTER_FACTOR: f64 = 0.1;

    /// Creates a new configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_requests_per_window: Self::DEFAULT_MAX_REQUESTS_PER_WINDOW,
            window: Self::DEFAULT_WINDOW,
            max_concurrent_requests: Self::DEFAULT_MAX_CONCURRENT_REQUESTS,
            max_retry_attempts: Self::DEFAULT_MAX_RETRY_ATTEMPTS,
            initial_backoff: Self::DEFAULT_INITIAL_BACKOFF,
            max_backoff: Self::DEFAULT_MAX_BACKOFF,
            jitter_factor: Self::DEFAULT_JITTER_FACTOR,
            respect_retry_after: true,
        }
    }

    /// Sets the admissions allowed per rolling window.
    ///
    /// Also lowers `max_concurrent_requests` to the new value when it would
    /// otherwise exceed it, preserving the `min(50, per-window quota)`
    /// default relationship. Set the concurrency ceiling afterwards to
    /// override.
    ///
    /// # Panics
    ///
    /// Panics if `max_requests_per_window` is 0.
    #[must_use]
    pub fn with_max_requests_per_window(mut self, max_requests_per_window: u32) -> Self {
        assert!(
            max_requests_per_window >= 1,
            "max_requests_per_window must be at least 1"
        );
        self.max_requests_per_window = max_requests_per_window;
        self.max_concurrent_requests = self.max_concurrent_requests.min(max_requests_per_window);
        self
    }

    /// Sets the rolling window length.
    ///
    /// # Panics
    ///
    /// Panics if `window` is zero.
    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        assert!(!window.is_zero(), "window must be non-zero");
        self.window = window;
        self
    }

    /// Sets the concurrency ceiling.
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrent_requests` is 0.
    #[must_use]
    pub fn with_max_concurrent_requests(mut self, max_concurrent_requests: u32) -> Self {
        assert!(
            max_concurrent_requests >= 1,
            "max_concurrent_requests must be at least 1"
        );
        self.max_concurrent_requests = max_concurrent_requests;
        self
    }

    /// Sets the retry budget (retries after the initial attempt).
    #[must_use]
    pub const fn with_max_retry_attempts(mut self, max_retry_attempts: u32) -> Self {
        self.max_retry_attempts = max_retry_attempts;
        self
    }

    /// Sets the backoff delay before the first retry.
    ///
    /// Zero delay is supported (useful for testing) but not recommended for
    /// production as it creates a tight retry loop.
    #[must_use]
    pub const fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    /// Sets the upper bound on computed backoff delays.
    #[must_use]
    pub const fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Sets the jitter factor.
    ///
    /// # Panics
    ///
    /// Panics if `jitter_factor` is outside `0.0..=1.0`.
    #[must_use]
    pub fn with_jitter_factor(mut self, jitter_factor: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&jitter_factor),
            "jitter_factor must be within 0.0..=1.0"
        );
        self.jitter_factor = jitter_factor;
        self
    }

    /// Sets whether `Retry-After` hints override exponential backoff.
    #[must_use]
    pub const fn with_respect_retry_after(mut self, respect_retry_after: bool) -> Self {
        self.respect_retry_after = respect_retry_after;
        self
    }
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self::new()
    }
}

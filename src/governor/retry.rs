//! Retry classification and backoff computation.

use std::time::Duration;

use rand::Rng;

use super::GovernorConfig;

/// Margin added on top of a server-provided `Retry-After` hint so the retry
/// lands safely past the provider's own window boundary.
pub(crate) const RETRY_AFTER_BUFFER: Duration = Duration::from_millis(100);

/// Status codes treated as transient provider states worth retrying.
///
/// Everything else (other 4xx, and any 2xx/3xx) is terminal: the response is
/// handed back to the caller as-is.
const RETRYABLE_STATUSES: [u16; 10] = [408, 409, 412, 423, 424, 429, 500, 502, 503, 504];

/// Returns true if a response with this status should be retried.
#[must_use]
pub fn is_retryable_status(status: http::StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status.as_u16())
}

/// Per-call retry state.
///
/// Created when a governed send starts, updated once per completed attempt,
/// and discarded when the call terminates.
#[derive(Debug, Clone)]
pub struct RetryContext {
    attempt: u32,
    last_status: Option<http::StatusCode>,
    transport_transient: Option<bool>,
    retry_after: Option<Duration>,
}

impl RetryContext {
    /// Creates the context for a new logical call, positioned at attempt 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attempt: 1,
            last_status: None,
            transport_transient: None,
            retry_after: None,
        }
    }

    /// Records that the current attempt completed with a response.
    pub fn record_response(&mut self, status: http::StatusCode, retry_after: Option<Duration>) {
        self.last_status = Some(status);
        self.transport_transient = None;
        self.retry_after = retry_after;
    }

    /// Records that the current attempt failed at the transport level.
    pub const fn record_transport_failure(&mut self, transient: bool) {
        self.last_status = None;
        self.transport_transient = Some(transient);
        self.retry_after = None;
    }

    /// Advances to the next attempt, clearing the previous observation.
    pub const fn next_attempt(&mut self) {
        self.attempt += 1;
        self.last_status = None;
        self.transport_transient = None;
        self.retry_after = None;
    }

    /// Returns the 1-based attempt number.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns the status code of the last completed attempt, if a response
    /// was received.
    #[must_use]
    pub const fn last_status(&self) -> Option<http::StatusCode> {
        self.last_status
    }

    /// Returns the `Retry-After` hint carried by the last response, if any.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Verdict for a completed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Terminal: hand the response or failure back to the caller.
    Stop,
    /// Transient: wait the given delay, then send a fresh snapshot.
    RetryAfter(Duration),
}

/// Pure decision logic for the retry loop.
///
/// Classifies completed attempts as retryable or terminal and computes the
/// next backoff delay. Holds no shared state; the governor consults one
/// instance from any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct RetryOrchestrator {
    max_retry_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
    jitter_factor: f64,
    respect_retry_after: bool,
}

impl RetryOrchestrator {
    /// Builds the orchestrator from the governor configuration.
    #[must_use]
    pub const fn from_config(config: &GovernorConfig) -> Self {
        Self {
            max_retry_attempts: config.max_retry_attempts,
            initial_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            jitter_factor: config.jitter_factor,
            respect_retry_after: config.respect_retry_after,
        }
    }

    /// Decides whether the attempt recorded in `context` warrants a retry.
    ///
    /// Returns [`RetryDecision::Stop`] for terminal outcomes and whenever
    /// the attempt budget is exhausted, regardless of retryability; the
    /// orchestrator never retries indefinitely.
    #[must_use]
    pub fn decide(&self, context: &RetryContext) -> RetryDecision {
        if !self.is_retryable(context) {
            return RetryDecision::Stop;
        }
        if context.attempt() > self.max_retry_attempts {
            return RetryDecision::Stop;
        }

        RetryDecision::RetryAfter(self.backoff_delay(context))
    }

    /// Returns true if the recorded outcome is transient.
    #[must_use]
    pub fn is_retryable(&self, context: &RetryContext) -> bool {
        if let Some(transient) = context.transport_transient {
            return transient;
        }

        context.last_status.is_some_and(is_retryable_status)
    }

    /// Computes the wait before the next attempt.
    ///
    /// A server-provided `Retry-After` hint takes precedence when
    /// configured, capped at the backoff ceiling plus a small fixed margin.
    /// Otherwise the exponential schedule applies with multiplicative
    /// jitter.
    #[must_use]
    pub fn backoff_delay(&self, context: &RetryContext) -> Duration {
        if self.respect_retry_after {
            if let Some(hint) = context.retry_after() {
                return hint.min(self.max_backoff) + RETRY_AFTER_BUFFER;
            }
        }

        let base = self.exponential_delay(context.attempt());
        let jitter = base.mul_f64(self.jitter_factor * rand::rng().random::<f64>());

        base + jitter
    }

    /// Exponential delay for the given 1-based attempt, without jitter:
    /// `min(initial_backoff * 2^(attempt-1), max_backoff)`.
    #[must_use]
    pub fn exponential_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let factor = 2_u32.saturating_pow(exponent);

        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

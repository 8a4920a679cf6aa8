//! The governed send path.

use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{ApiRequest, ApiResponse, RequestSnapshot, Transport};

use super::concurrency::ConcurrencyLimiter;
use super::retry::{RetryContext, RetryDecision, RetryOrchestrator};
use super::window::SlidingWindowRateLimiter;
use super::{GovernorConfig, GovernorError};

/// Throttled, retrying entry point for every outbound API call.
///
/// Composes the sliding-window rate limiter, the concurrency permit pool,
/// and the retry orchestrator around a [`Transport`]. One governor instance
/// is shared (`&self`, typically behind `Arc`) by all API wrapper methods;
/// its internal state is safe under concurrent callers.
///
/// # Cancellation
///
/// Every suspension point (rate-limit wait, permit acquisition, backoff
/// sleep, network I/O) is a plain future: dropping the `send` future aborts
/// the call, returning any held permit and recording no phantom admission.
/// The governor imposes no deadline of its own; wrap `send` in the caller's
/// timeout when one is required.
///
/// # Type Parameters
///
/// - `T`: The transport implementation
/// - `S`: The sleeper used for backoff delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use paylane::governor::{GovernorConfig, RequestGovernor};
/// use paylane::transport::{ApiRequest, ReqwestTransport};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let governor = RequestGovernor::new(ReqwestTransport::new(), GovernorConfig::default());
/// let request = ApiRequest::get(Url::parse("https://api.example.com/v1/charges")?);
/// let response = governor.send(&request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RequestGovernor<T, S = TokioSleeper> {
    transport: T,
    sleeper: S,
    config: GovernorConfig,
    window: SlidingWindowRateLimiter,
    permits: ConcurrencyLimiter,
    orchestrator: RetryOrchestrator,
}

impl<T> RequestGovernor<T, TokioSleeper> {
    /// Creates a governor over the given transport and configuration.
    #[must_use]
    pub fn new(transport: T, config: GovernorConfig) -> Self {
        let window =
            SlidingWindowRateLimiter::new(config.max_requests_per_window, config.window);
        let permits = ConcurrencyLimiter::new(config.max_concurrent_requests);
        let orchestrator = RetryOrchestrator::from_config(&config);

        Self {
            transport,
            sleeper: TokioSleeper,
            config,
            window,
            permits,
            orchestrator,
        }
    }
}

impl<T, S> RequestGovernor<T, S> {
    /// Sets a custom sleeper for backoff delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RequestGovernor<T, S2> {
        RequestGovernor {
            transport: self.transport,
            sleeper,
            config: self.config,
            window: self.window,
            permits: self.permits,
            orchestrator: self.orchestrator,
        }
    }

    /// Returns the governor's configuration.
    #[must_use]
    pub const fn config(&self) -> &GovernorConfig {
        &self.config
    }
}

impl<T: Transport, S: Sleeper> RequestGovernor<T, S> {
    /// Sends a logical request through rate limiting, concurrency limiting,
    /// and the retry loop.
    ///
    /// Each attempt waits for a rate-limit slot and a concurrency permit,
    /// captures a fresh [`RequestSnapshot`], and dispatches it. Attempts
    /// that are later retried still consumed their rate-limit slot. The
    /// permit is held only across the dispatch, never across a backoff
    /// sleep.
    ///
    /// # Errors
    ///
    /// - [`GovernorError::RetryExhausted`] once `max_retry_attempts + 1`
    ///   attempts have been consumed by transient failures.
    /// - [`GovernorError::Transport`] immediately for non-transient
    ///   transport failures.
    ///
    /// A response with a terminal status code — including 4xx statuses that
    /// are never retried — is returned as `Ok`; inspecting the status is the
    /// caller's concern.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, GovernorError> {
        let mut context = RetryContext::new();

        loop {
            let outcome = {
                let admission = self.window.admit().await;
                let _permit = self.permits.acquire().await;
                let snapshot = RequestSnapshot::capture(request);

                // The slot is only charged once the request actually goes
                // out: cancellation while waiting for the permit retracts
                // the admission instead of throttling later traffic.
                admission.commit();
                self.transport.dispatch(snapshot).await
            };

            match outcome {
                Ok(response) => {
                    context.record_response(response.status, response.retry_after());

                    match self.orchestrator.decide(&context) {
                        RetryDecision::Stop => {
                            if self.orchestrator.is_retryable(&context) {
                                // Transient status, but the budget is spent.
                                tracing::warn!(
                                    attempts = context.attempt(),
                                    status = response.status.as_u16(),
                                    "Retry budget exhausted"
                                );
                                return Err(GovernorError::RetryExhausted {
                                    attempts: context.attempt(),
                                    last_status: Some(response.status),
                                    source: None,
                                });
                            }
                            return Ok(response);
                        }
                        RetryDecision::RetryAfter(delay) => {
                            tracing::debug!(
                                attempt = context.attempt(),
                                status = response.status.as_u16(),
                                delay_ms = delay.as_millis(),
                                "Transient response, retrying after backoff"
                            );
                            drop(response);
                            self.sleeper.sleep(delay).await;
                            context.next_attempt();
                        }
                    }
                }
                Err(error) => {
                    context.record_transport_failure(error.is_transient());

                    if !error.is_transient() {
                        return Err(GovernorError::Transport(error));
                    }

                    match self.orchestrator.decide(&context) {
                        RetryDecision::Stop => {
                            tracing::warn!(
                                attempts = context.attempt(),
                                error = %error,
                                "Retry budget exhausted"
                            );
                            return Err(GovernorError::RetryExhausted {
                                attempts: context.attempt(),
                                last_status: None,
                                source: Some(error),
                            });
                        }
                        RetryDecision::RetryAfter(delay) => {
                            tracing::debug!(
                                attempt = context.attempt(),
                                error = %error,
                                delay_ms = delay.as_millis(),
                                "Transport failure, retrying after backoff"
                            );
                            self.sleeper.sleep(delay).await;
                            context.next_attempt();
                        }
                    }
                }
            }
        }
    }
}

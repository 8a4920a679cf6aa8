//! Outbound request governance.
//!
//! This module provides the components that throttle, bound, and retry
//! outgoing API calls:
//! - Configuration ([`GovernorConfig`])
//! - Sliding-window rate limiting ([`SlidingWindowRateLimiter`])
//! - Concurrency bounding ([`ConcurrencyLimiter`])
//! - Retry classification and backoff ([`RetryOrchestrator`], [`RetryContext`])
//! - The composed send path ([`RequestGovernor`])

mod concurrency;
mod config;
mod error;
mod retry;
mod send;
mod window;

#[cfg(test)]
mod concurrency_tests;
#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod retry_tests;

pub use concurrency::{ConcurrencyLimiter, ConcurrencyPermit};
pub use config::GovernorConfig;
pub use error::GovernorError;
pub use retry::{RetryContext, RetryDecision, RetryOrchestrator, is_retryable_status};
pub use send::RequestGovernor;
pub use window::{Admission, SlidingWindowRateLimiter};

//! Time abstractions for testability.
//!
//! This module provides a [`Clock`] trait for reading wall-clock time and a
//! [`Sleeper`] trait for inserting delays, allowing tests to inject controlled
//! time values and zero-cost sleeps instead of relying on real time.

use std::time::{Duration, SystemTime};

/// Abstraction over system time for testability.
///
/// Implementations provide the current time, allowing tests to inject
/// controlled time values instead of relying on actual system time.
///
/// # Example
///
/// ```
/// use paylane::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now >= std::time::SystemTime::UNIX_EPOCH);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;

    /// Returns the current time as whole seconds since the Unix epoch.
    ///
    /// Pre-epoch times (which do not occur on correctly configured hosts)
    /// clamp to 0.
    fn unix_seconds(&self) -> i64 {
        self.now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
    }
}

/// Production clock using actual system time.
///
/// This is the default clock implementation that delegates to
/// [`SystemTime::now()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Abstraction over delay insertion for testability.
///
/// Retry backoff and other deliberate waits go through a `Sleeper` so tests
/// can substitute [`InstantSleeper`] and run without real delays.
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    ///
    /// The returned future must be cancellable: dropping it aborts the wait
    /// with no side effects.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
///
/// Respects tokio's paused test clock, so tests using
/// `#[tokio::test(start_paused = true)]` can advance time manually.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately regardless of the requested duration.
///
/// Intended for tests that exercise retry loops without waiting out the
/// configured backoff.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

//! Concurrency limiting via a counting permit pool.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds the number of simultaneous in-flight requests.
///
/// A thin wrapper around [`tokio::sync::Semaphore`] sized to the configured
/// ceiling. Permits are RAII guards, so every exit path of a governed send
/// (success, error, or cancellation) returns its permit when the guard
/// drops. Waiters are queued with the semaphore's own FIFO ordering; no
/// stronger fairness is guaranteed.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
}

impl ConcurrencyLimiter {
    /// Creates a pool of `max_concurrent` permits.
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrent` is 0.
    #[must_use]
    pub fn new(max_concurrent: u32) -> Self {
        assert!(max_concurrent >= 1, "max_concurrent must be at least 1");

        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent as usize)),
        }
    }

    /// Waits for a free permit and returns its guard.
    ///
    /// Cancellation (dropping the returned future) while queued acquires
    /// nothing and leaks nothing.
    pub async fn acquire(&self) -> ConcurrencyPermit {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("semaphore is owned by the limiter and never closed");

        ConcurrencyPermit { _permit: permit }
    }

    /// Returns the number of currently free permits.
    #[must_use]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// RAII guard for one in-flight request slot.
///
/// The slot is returned to the pool when the guard drops.
#[derive(Debug)]
pub struct ConcurrencyPermit {
    _permit: OwnedSemaphorePermit,
}

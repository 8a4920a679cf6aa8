//! Sliding-window rate limiting over a shared timestamp log.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Safety margin added to the computed wake-up time so a woken waiter does
/// not land exactly on the window boundary and immediately re-block.
pub(crate) const ADMIT_REENTRY_BUFFER: Duration = Duration::from_millis(50);

/// Sliding-window rate limiter shared by all callers of one governor.
///
/// Tracks admission instants in a mutex-guarded log and blocks new
/// admissions once the rolling window's quota is exhausted. Entries older
/// than the window are purged lazily on the next admission check, never by a
/// background task, so the log may transiently hold stale entries between
/// checks; only in-window entries are ever counted.
///
/// [`admit`](Self::admit) hands back an [`Admission`] guard: the recorded
/// slot only becomes final once the guard is
/// [committed](Admission::commit). A guard dropped uncommitted — typically
/// because the caller was cancelled between admission and dispatch —
/// retracts its entry, so no slot is ever charged for a request that was
/// never sent.
///
/// The purge is O(n) in log size under a coarse lock per check. Adequate at
/// the hundreds-per-minute quotas this limiter is configured for; a
/// different structure would be needed at much higher throughput.
///
/// # Invariant
///
/// After any successful [`admit`](Self::admit), no trailing interval of
/// `window` length contains more than `max_per_window` admissions.
#[derive(Debug)]
pub struct SlidingWindowRateLimiter {
    max_per_window: usize,
    window: Duration,
    log: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowRateLimiter {
    /// Creates a limiter allowing `max_per_window` admissions per rolling
    /// `window`.
    ///
    /// # Panics
    ///
    /// Panics if `max_per_window` is 0 or `window` is zero.
    #[must_use]
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        assert!(max_per_window >= 1, "max_per_window must be at least 1");
        assert!(!window.is_zero(), "window must be non-zero");

        let max_per_window = max_per_window as usize;

        Self {
            max_per_window,
            window,
            log: Mutex::new(VecDeque::with_capacity(max_per_window)),
        }
    }

    /// Waits until a rate-limit slot is available, then records the
    /// admission and returns its guard.
    ///
    /// Suspends while the window is at capacity, waking shortly after the
    /// oldest in-window admission ages out. Cancellation (dropping the
    /// returned future) during the wait aborts cleanly without recording an
    /// admission; dropping the returned [`Admission`] without committing it
    /// retracts the recorded entry.
    pub async fn admit(&self) -> Admission<'_> {
        loop {
            let wake_at = match self.try_admit(Instant::now()) {
                Ok(at) => {
                    return Admission {
                        limiter: self,
                        at,
                        committed: false,
                    };
                }
                Err(wake_at) => wake_at,
            };

            tracing::debug!(
                wait_ms = wake_at.saturating_duration_since(Instant::now()).as_millis(),
                "Rate-limit window at capacity, waiting for a slot"
            );
            tokio::time::sleep_until(wake_at).await;
        }
    }

    /// Single admission check: purge stale entries, then either record `now`
    /// or report the instant at which the next re-check should run.
    fn try_admit(&self, now: Instant) -> Result<Instant, Instant> {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);

        while log
            .front()
            .is_some_and(|&oldest| now.duration_since(oldest) >= self.window)
        {
            log.pop_front();
        }

        if log.len() < self.max_per_window {
            log.push_back(now);
            tracing::trace!(in_window = log.len(), "Rate-limit slot admitted");
            return Ok(now);
        }

        // At capacity: wait for the oldest in-window entry to age out. A
        // drained log at apparent capacity means a slot is free; proceed
        // rather than deadlock.
        match log.front() {
            Some(&oldest) => Err(oldest + self.window + ADMIT_REENTRY_BUFFER),
            None => {
                log.push_back(now);
                Ok(now)
            }
        }
    }

    /// Removes one log entry recorded at `at`, if still present.
    fn retract(&self, at: Instant) {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(index) = log.iter().position(|&entry| entry == at) {
            log.remove(index);
            tracing::trace!(in_window = log.len(), "Rate-limit admission retracted");
        }
    }

    /// Returns the number of admissions currently inside the window.
    ///
    /// Stale entries not yet purged are excluded from the count.
    #[must_use]
    pub fn in_window(&self) -> usize {
        let now = Instant::now();
        let log = self.log.lock().unwrap_or_else(PoisonError::into_inner);

        log.iter()
            .filter(|&&t| now.duration_since(t) < self.window)
            .count()
    }
}

/// Guard for one recorded admission.
///
/// The slot is provisional until [`commit`](Self::commit) is called, which
/// the governor does immediately before handing the snapshot to the
/// transport. Dropping the guard uncommitted retracts the entry, so a send
/// cancelled after admission but before dispatch frees its slot for real
/// traffic instead of throttling it for a full window.
#[derive(Debug)]
#[must_use = "an admission dropped without commit() is retracted"]
pub struct Admission<'a> {
    limiter: &'a SlidingWindowRateLimiter,
    at: Instant,
    committed: bool,
}

impl Admission<'_> {
    /// Finalizes the admission: the slot stays consumed for the rest of the
    /// window, whether or not the attempt it paid for ultimately succeeds.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Admission<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.limiter.retract(self.at);
        }
    }
}

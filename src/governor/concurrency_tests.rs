//! Tests for `ConcurrencyLimiter`.

use super::ConcurrencyLimiter;
use std::time::Duration;

mod permits {
    use super::*;

    #[tokio::test]
    async fn acquire_takes_a_permit_and_drop_returns_it() {
        let limiter = ConcurrencyLimiter::new(2);
        assert_eq!(limiter.available(), 2);

        let permit = limiter.acquire().await;
        assert_eq!(limiter.available(), 1);

        drop(permit);
        assert_eq!(limiter.available(), 2);
    }

    #[tokio::test]
    async fn acquire_blocks_when_pool_is_empty() {
        let limiter = ConcurrencyLimiter::new(1);
        let held = limiter.acquire().await;

        let blocked = limiter.acquire();
        tokio::pin!(blocked);
        let poll = tokio::time::timeout(Duration::from_millis(10), &mut blocked).await;
        assert!(poll.is_err(), "second acquire should block");

        drop(held);
        let _second = blocked.await;
        assert_eq!(limiter.available(), 0);
    }

    #[tokio::test]
    async fn cancelled_acquire_leaks_nothing() {
        let limiter = ConcurrencyLimiter::new(1);
        let held = limiter.acquire().await;

        {
            let blocked = limiter.acquire();
            tokio::pin!(blocked);
            let poll = tokio::time::timeout(Duration::from_millis(10), &mut blocked).await;
            assert!(poll.is_err());
            // Dropping the future abandons the queued acquire.
        }

        drop(held);
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test]
    async fn permit_released_when_holder_panics() {
        let limiter = std::sync::Arc::new(ConcurrencyLimiter::new(1));
        let clone = std::sync::Arc::clone(&limiter);

        let handle = tokio::spawn(async move {
            let _permit = clone.acquire().await;
            panic!("simulated task failure");
        });
        assert!(handle.await.is_err());

        // The permit unwound with the task.
        assert_eq!(limiter.available(), 1);
    }
}

mod construction {
    use super::*;

    #[test]
    #[should_panic(expected = "max_concurrent must be at least 1")]
    fn zero_permits_panics() {
        let _ = ConcurrencyLimiter::new(0);
    }
}

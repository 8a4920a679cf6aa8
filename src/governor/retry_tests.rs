//! Tests for retry classification and backoff computation.

use super::retry::RETRY_AFTER_BUFFER;
use super::{GovernorConfig, RetryContext, RetryDecision, RetryOrchestrator, is_retryable_status};
use std::time::Duration;

fn orchestrator() -> RetryOrchestrator {
    RetryOrchestrator::from_config(&GovernorConfig::default())
}

fn context_with_status(status: u16) -> RetryContext {
    let mut context = RetryContext::new();
    context.record_response(http::StatusCode::from_u16(status).unwrap(), None);
    context
}

mod classification {
    use super::*;

    #[test]
    fn transient_provider_statuses_are_retryable() {
        for status in [408, 409, 412, 423, 424, 429, 500, 502, 503, 504] {
            assert!(
                is_retryable_status(http::StatusCode::from_u16(status).unwrap()),
                "{status} should be retryable"
            );
        }
    }

    #[test]
    fn success_redirect_and_other_client_errors_are_terminal() {
        for status in [200, 201, 204, 301, 304, 400, 401, 403, 404, 410, 422] {
            assert!(
                !is_retryable_status(http::StatusCode::from_u16(status).unwrap()),
                "{status} should be terminal"
            );
        }
    }

    #[test]
    fn transient_transport_failure_is_retryable() {
        let mut context = RetryContext::new();
        context.record_transport_failure(true);

        assert!(orchestrator().is_retryable(&context));
    }

    #[test]
    fn non_transient_transport_failure_is_terminal() {
        let mut context = RetryContext::new();
        context.record_transport_failure(false);

        assert!(!orchestrator().is_retryable(&context));
    }

    #[test]
    fn fresh_context_with_no_observation_is_terminal() {
        assert!(!orchestrator().is_retryable(&RetryContext::new()));
    }
}

mod context_lifecycle {
    use super::*;

    #[test]
    fn new_context_starts_at_attempt_one() {
        let context = RetryContext::new();

        assert_eq!(context.attempt(), 1);
        assert!(context.last_status().is_none());
        assert!(context.retry_after().is_none());
    }

    #[test]
    fn record_response_stores_status_and_hint() {
        let mut context = RetryContext::new();
        context.record_response(
            http::StatusCode::TOO_MANY_REQUESTS,
            Some(Duration::from_secs(5)),
        );

        assert_eq!(
            context.last_status(),
            Some(http::StatusCode::TOO_MANY_REQUESTS)
        );
        assert_eq!(context.retry_after(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn next_attempt_increments_and_clears_observation() {
        let mut context = RetryContext::new();
        context.record_response(
            http::StatusCode::SERVICE_UNAVAILABLE,
            Some(Duration::from_secs(5)),
        );

        context.next_attempt();

        assert_eq!(context.attempt(), 2);
        assert!(context.last_status().is_none());
        assert!(context.retry_after().is_none());
    }

    #[test]
    fn transport_failure_clears_previous_status() {
        let mut context = RetryContext::new();
        context.record_response(http::StatusCode::SERVICE_UNAVAILABLE, None);
        context.record_transport_failure(true);

        assert!(context.last_status().is_none());
    }
}

mod decisions {
    use super::*;

    #[test]
    fn terminal_status_stops_immediately() {
        assert_eq!(
            orchestrator().decide(&context_with_status(404)),
            RetryDecision::Stop
        );
    }

    #[test]
    fn retryable_status_within_budget_retries() {
        let decision = orchestrator().decide(&context_with_status(503));
        assert!(matches!(decision, RetryDecision::RetryAfter(_)));
    }

    #[test]
    fn budget_exhaustion_stops_even_when_retryable() {
        let config = GovernorConfig::default().with_max_retry_attempts(3);
        let orchestrator = RetryOrchestrator::from_config(&config);

        let mut context = context_with_status(503);
        for _ in 0..3 {
            context.next_attempt();
        }
        context.record_response(http::StatusCode::SERVICE_UNAVAILABLE, None);

        assert_eq!(context.attempt(), 4);
        assert_eq!(orchestrator.decide(&context), RetryDecision::Stop);
    }

    #[test]
    fn zero_retry_budget_never_retries() {
        let config = GovernorConfig::default().with_max_retry_attempts(0);
        let orchestrator = RetryOrchestrator::from_config(&config);

        assert_eq!(
            orchestrator.decide(&context_with_status(503)),
            RetryDecision::Stop
        );
    }
}

mod backoff {
    use super::*;

    #[test]
    fn exponential_delay_doubles_per_attempt() {
        let config = GovernorConfig::default()
            .with_initial_backoff(Duration::from_secs(1))
            .with_max_backoff(Duration::from_secs(3600));
        let orchestrator = RetryOrchestrator::from_config(&config);

        assert_eq!(orchestrator.exponential_delay(1), Duration::from_secs(1));
        assert_eq!(orchestrator.exponential_delay(2), Duration::from_secs(2));
        assert_eq!(orchestrator.exponential_delay(3), Duration::from_secs(4));
        assert_eq!(orchestrator.exponential_delay(4), Duration::from_secs(8));
    }

    #[test]
    fn exponential_delay_is_monotonic_and_bounded() {
        let orchestrator = orchestrator();
        let max = GovernorConfig::DEFAULT_MAX_BACKOFF;

        let mut previous = Duration::ZERO;
        for attempt in 1..=20 {
            let delay = orchestrator.exponential_delay(attempt);
            assert!(delay >= previous, "delay shrank at attempt {attempt}");
            assert!(delay <= max, "delay exceeded cap at attempt {attempt}");
            previous = delay;
        }
    }

    #[test]
    fn huge_attempt_numbers_saturate_at_the_cap() {
        let orchestrator = orchestrator();

        assert_eq!(
            orchestrator.exponential_delay(u32::MAX),
            GovernorConfig::DEFAULT_MAX_BACKOFF
        );
    }

    #[test]
    fn jittered_delay_stays_within_the_documented_bound() {
        let config = GovernorConfig::default().with_jitter_factor(1.0);
        let orchestrator = RetryOrchestrator::from_config(&config);
        let max = config.max_backoff;

        let context = context_with_status(503);
        for _ in 0..100 {
            let delay = orchestrator.backoff_delay(&context);
            assert!(delay >= orchestrator.exponential_delay(1));
            assert!(delay <= max.mul_f64(2.0), "jittered delay {delay:?} out of bound");
        }
    }

    #[test]
    fn zero_jitter_is_deterministic() {
        let config = GovernorConfig::default().with_jitter_factor(0.0);
        let orchestrator = RetryOrchestrator::from_config(&config);
        let context = context_with_status(503);

        assert_eq!(
            orchestrator.backoff_delay(&context),
            orchestrator.exponential_delay(1)
        );
    }
}

mod retry_after_precedence {
    use super::*;

    fn context_with_hint(secs: u64) -> RetryContext {
        let mut context = RetryContext::new();
        context.record_response(
            http::StatusCode::TOO_MANY_REQUESTS,
            Some(Duration::from_secs(secs)),
        );
        context
    }

    #[test]
    fn hint_overrides_the_exponential_formula() {
        let delay = orchestrator().backoff_delay(&context_with_hint(5));

        assert_eq!(delay, Duration::from_secs(5) + RETRY_AFTER_BUFFER);
        assert!(delay >= Duration::from_secs(5));
    }

    #[test]
    fn hint_is_independent_of_the_attempt_number() {
        let mut context = context_with_hint(5);
        for _ in 0..3 {
            context.next_attempt();
        }
        context.record_response(
            http::StatusCode::TOO_MANY_REQUESTS,
            Some(Duration::from_secs(5)),
        );

        assert_eq!(
            orchestrator().backoff_delay(&context),
            Duration::from_secs(5) + RETRY_AFTER_BUFFER
        );
    }

    #[test]
    fn hint_is_capped_at_max_backoff() {
        let delay = orchestrator().backoff_delay(&context_with_hint(86_400));

        assert_eq!(delay, GovernorConfig::DEFAULT_MAX_BACKOFF + RETRY_AFTER_BUFFER);
    }

    #[test]
    fn hint_is_ignored_when_respect_retry_after_is_disabled() {
        let config = GovernorConfig::default()
            .with_respect_retry_after(false)
            .with_jitter_factor(0.0);
        let orchestrator = RetryOrchestrator::from_config(&config);

        assert_eq!(
            orchestrator.backoff_delay(&context_with_hint(86_400)),
            orchestrator.exponential_delay(1)
        );
    }
}

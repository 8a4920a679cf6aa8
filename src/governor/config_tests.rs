//! Tests for `GovernorConfig`.

use super::GovernorConfig;
use std::time::Duration;

mod defaults {
    use super::*;

    #[test]
    fn new_creates_config_with_defaults() {
        let config = GovernorConfig::new();

        assert_eq!(
            config.max_requests_per_window,
            GovernorConfig::DEFAULT_MAX_REQUESTS_PER_WINDOW
        );
        assert_eq!(config.window, GovernorConfig::DEFAULT_WINDOW);
        assert_eq!(
            config.max_concurrent_requests,
            GovernorConfig::DEFAULT_MAX_CONCURRENT_REQUESTS
        );
        assert_eq!(
            config.max_retry_attempts,
            GovernorConfig::DEFAULT_MAX_RETRY_ATTEMPTS
        );
        assert_eq!(config.initial_backoff, GovernorConfig::DEFAULT_INITIAL_BACKOFF);
        assert_eq!(config.max_backoff, GovernorConfig::DEFAULT_MAX_BACKOFF);
        assert!((config.jitter_factor - GovernorConfig::DEFAULT_JITTER_FACTOR).abs() < f64::EPSILON);
        assert!(config.respect_retry_after);
    }

    #[test]
    fn default_trait_matches_new() {
        assert_eq!(GovernorConfig::new(), GovernorConfig::default());
    }

    #[test]
    fn default_quota_is_300_per_minute() {
        assert_eq!(GovernorConfig::DEFAULT_MAX_REQUESTS_PER_WINDOW, 300);
        assert_eq!(GovernorConfig::DEFAULT_WINDOW, Duration::from_secs(60));
    }

    #[test]
    fn default_concurrency_never_exceeds_quota() {
        let config = GovernorConfig::default();
        assert!(config.max_concurrent_requests <= config.max_requests_per_window);
    }
}

mod builder {
    use super::*;

    #[test]
    fn with_max_requests_per_window_sets_value() {
        let config = GovernorConfig::new().with_max_requests_per_window(120);
        assert_eq!(config.max_requests_per_window, 120);
    }

    #[test]
    fn low_quota_lowers_concurrency_ceiling() {
        let config = GovernorConfig::new().with_max_requests_per_window(10);

        assert_eq!(config.max_concurrent_requests, 10);
    }

    #[test]
    fn explicit_concurrency_after_quota_wins() {
        let config = GovernorConfig::new()
            .with_max_requests_per_window(10)
            .with_max_concurrent_requests(20);

        assert_eq!(config.max_concurrent_requests, 20);
    }

    #[test]
    #[should_panic(expected = "max_requests_per_window must be at least 1")]
    fn with_max_requests_per_window_zero_panics() {
        let _ = GovernorConfig::new().with_max_requests_per_window(0);
    }

    #[test]
    #[should_panic(expected = "window must be non-zero")]
    fn with_zero_window_panics() {
        let _ = GovernorConfig::new().with_window(Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "max_concurrent_requests must be at least 1")]
    fn with_max_concurrent_requests_zero_panics() {
        let _ = GovernorConfig::new().with_max_concurrent_requests(0);
    }

    #[test]
    fn with_max_retry_attempts_zero_is_allowed() {
        let config = GovernorConfig::new().with_max_retry_attempts(0);
        assert_eq!(config.max_retry_attempts, 0);
    }

    #[test]
    fn with_backoff_bounds_set_values() {
        let config = GovernorConfig::new()
            .with_initial_backoff(Duration::from_millis(250))
            .with_max_backoff(Duration::from_secs(10));

        assert_eq!(config.initial_backoff, Duration::from_millis(250));
        assert_eq!(config.max_backoff, Duration::from_secs(10));
    }

    #[test]
    fn with_jitter_factor_accepts_bounds() {
        assert!((GovernorConfig::new().with_jitter_factor(0.0).jitter_factor).abs() < f64::EPSILON);
        assert!(
            (GovernorConfig::new().with_jitter_factor(1.0).jitter_factor - 1.0).abs()
                < f64::EPSILON
        );
    }

    #[test]
    #[should_panic(expected = "jitter_factor must be within 0.0..=1.0")]
    fn with_jitter_factor_above_one_panics() {
        let _ = GovernorConfig::new().with_jitter_factor(1.5);
    }

    #[test]
    fn with_respect_retry_after_false_disables_hint() {
        let config = GovernorConfig::new().with_respect_retry_after(false);
        assert!(!config.respect_retry_after);
    }
}

mod serde_round_trip {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let config = GovernorConfig::new()
            .with_max_requests_per_window(120)
            .with_max_retry_attempts(5);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: GovernorConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: GovernorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, GovernorConfig::default());
    }
}

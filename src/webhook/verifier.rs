//! Webhook payload verification.

use std::time::Duration;

use subtle::ConstantTimeEq;

use crate::time::{Clock, SystemClock};

use super::signature::{SignatureHeader, compute_digest};

/// Result of verifying one webhook delivery.
///
/// Exactly one outcome per verification call; there are no partial states
/// and no panics for malformed input. Callers must treat anything other
/// than [`Valid`](Self::Valid) as "reject the delivery", but the distinct
/// variants let logging and alerting tell a wrong secret apart from a
/// malformed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The signature is authentic and fresh.
    Valid,
    /// The signature header is missing a component or unparseable.
    MalformedHeader,
    /// The timestamp is outside the freshness tolerance.
    Expired,
    /// The computed digest does not match the provided one.
    DigestMismatch,
}

impl VerificationOutcome {
    /// Returns true only for [`Valid`](Self::Valid).
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Authenticates inbound webhook payloads.
///
/// Checks the delivery's HMAC-SHA256 signature and timestamp freshness.
/// Verification is synchronous and CPU-bound; it never suspends and never
/// retries — a failed verification is immediately actionable.
///
/// # Security
///
/// - Digest comparison is constant-time, so inequality is only reported
///   after the full scan.
/// - The freshness window bounds replay-attack exposure; it validates
///   recency, not ordering.
///
/// # Type Parameters
///
/// - `C`: The clock used for freshness checks (defaults to [`SystemClock`])
///
/// # Example
///
/// ```
/// use paylane::webhook::WebhookVerifier;
///
/// let verifier = WebhookVerifier::new();
/// let outcome = verifier.verify(b"{}", "t=0,v1=deadbeef", "whsec_test");
/// assert!(!outcome.is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct WebhookVerifier<C = SystemClock> {
    clock: C,
    tolerance: Duration,
}

impl WebhookVerifier<SystemClock> {
    /// Default freshness tolerance (5 minutes).
    pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

    /// Creates a verifier with the system clock and default tolerance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clock: SystemClock,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }
}

impl Default for WebhookVerifier<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> WebhookVerifier<C> {
    /// Sets a custom clock.
    ///
    /// This is primarily useful for testing freshness checks against fixed
    /// time values.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> WebhookVerifier<C2> {
        WebhookVerifier {
            clock,
            tolerance: self.tolerance,
        }
    }

    /// Sets the freshness tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns the configured freshness tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> Duration {
        self.tolerance
    }
}

impl<C: Clock> WebhookVerifier<C> {
    /// Verifies one delivery: raw payload bytes against the signature
    /// header, using the endpoint `secret`.
    ///
    /// Checks run in order: header shape, timestamp freshness, digest
    /// equality. Each failure mode maps to its own
    /// [`VerificationOutcome`]; no input causes a panic or error.
    #[must_use]
    pub fn verify(&self, payload: &[u8], header: &str, secret: &str) -> VerificationOutcome {
        let Some(signature) = SignatureHeader::parse(header) else {
            return VerificationOutcome::MalformedHeader;
        };

        let age = self.clock.unix_seconds().abs_diff(signature.timestamp);
        if age > self.tolerance.as_secs() {
            return VerificationOutcome::Expired;
        }

        let expected = compute_digest(signature.timestamp, payload, secret);

        let matches: bool = expected
            .as_bytes()
            .ct_eq(signature.provided_digest.as_bytes())
            .into();

        if matches {
            VerificationOutcome::Valid
        } else {
            VerificationOutcome::DigestMismatch
        }
    }
}

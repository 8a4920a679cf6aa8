//! Error types for governed sends.

use thiserror::Error;

use crate::transport::TransportError;

/// Terminal failure surfaced by [`RequestGovernor::send`].
///
/// Retryable conditions (transient transport failures, retryable statuses)
/// are absorbed inside the governor and never reach the caller until the
/// attempt budget is consumed. Terminal responses of any status class are
/// returned as responses, not errors.
///
/// [`RequestGovernor::send`]: super::RequestGovernor::send
#[derive(Debug, Error)]
pub enum GovernorError {
    /// Every attempt was consumed without a terminal outcome.
    ///
    /// Carries what the exhausted final attempt observed: a response status,
    /// or the transport failure when no response arrived.
    #[error("Retry budget exhausted after {attempts} attempts")]
    RetryExhausted {
        /// Number of attempts actually dispatched.
        attempts: u32,
        /// Status code of the final attempt's response, when one arrived.
        last_status: Option<http::StatusCode>,
        /// Transport failure of the final attempt, when no response arrived.
        #[source]
        source: Option<TransportError>,
    },

    /// The request failed in a way a retry can never fix (for example a
    /// malformed request that the transport refuses to construct).
    #[error("Request could not be dispatched")]
    Transport(#[from] TransportError),
}

impl GovernorError {
    /// Returns the final observed status code, if a response was received.
    #[must_use]
    pub const fn last_status(&self) -> Option<http::StatusCode> {
        match self {
            Self::RetryExhausted { last_status, .. } => *last_status,
            Self::Transport(_) => None,
        }
    }
}

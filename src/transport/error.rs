//! Error types for transport operations.

use thiserror::Error;

/// Error type for transport-level failures.
///
/// Describes what went wrong without dictating recovery strategy. Whether a
/// given failure warrants a retry is decided by the governor's retry
/// classification, not here.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused, TLS
    /// handshake failures, and other network-level errors raised before or
    /// during the exchange.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be constructed.
    ///
    /// This typically indicates a configuration error (bad URL, invalid
    /// header bytes) rather than a transient failure.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Returns true if the failure is connection-level and potentially
    /// transient.
    ///
    /// [`InvalidRequest`](Self::InvalidRequest) is a configuration problem
    /// and never transient.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }
}

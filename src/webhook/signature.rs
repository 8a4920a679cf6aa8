//! Signature header parsing and digest computation.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Parsed form of the webhook signature header.
///
/// # Wire format
///
/// ```text
/// t=<unix-seconds>,v1=<lowercase-hex-hmac-sha256>
/// ```
///
/// Both components must be present and well-formed; a header missing either
/// one never verifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp (seconds) the sender attached to the delivery.
    pub timestamp: i64,
    /// Sender-provided digest, lowercase hex.
    pub provided_digest: String,
}

impl SignatureHeader {
    /// Parses a signature header from its comma-separated `key=value` form.
    ///
    /// Unknown keys are ignored so senders can add signature-scheme versions
    /// without breaking existing verifiers. Returns `None` when `t` or `v1`
    /// is missing, or when the timestamp is not a valid integer.
    #[must_use]
    pub fn parse(header: &str) -> Option<Self> {
        let mut timestamp = None;
        let mut provided_digest = None;

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };

            match key.trim() {
                "t" => timestamp = value.trim().parse::<i64>().ok(),
                "v1" => provided_digest = Some(value.trim().to_string()),
                _ => {}
            }
        }

        Some(Self {
            timestamp: timestamp?,
            provided_digest: provided_digest?,
        })
    }
}

/// Computes the expected digest for a payload: lowercase hex of
/// HMAC-SHA256 over `"{timestamp}." ++ payload` keyed with `secret`.
///
/// The payload is authenticated as raw bytes; it does not need to be valid
/// UTF-8.
#[must_use]
pub fn compute_digest(timestamp: i64, payload: &[u8], secret: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    hex::encode(mac.finalize().into_bytes())
}

//! Inbound webhook authentication.
//!
//! This module provides types for:
//! - Parsing the signature header ([`SignatureHeader`])
//! - Computing expected digests ([`compute_digest`])
//! - Verifying deliveries ([`WebhookVerifier`], [`VerificationOutcome`])
//!
//! Webhook delivery bypasses the request governor entirely: verification is
//! synchronous, never retried, and must run before any business logic reads
//! the payload.

mod signature;
mod verifier;


pub use signature::{SignatureHeader, compute_digest};
pub use verifier::{VerificationOutcome, WebhookVerifier};

//! Transport layer: request/response value types and the client seam.
//!
//! This module provides types and traits for:
//! - Building logical API requests ([`ApiRequest`])
//! - Capturing immutable, re-sendable copies for retries ([`RequestSnapshot`])
//! - Handling buffered responses ([`ApiResponse`])
//! - Abstracting the HTTP client ([`Transport`])
//! - Production HTTP client implementation ([`ReqwestTransport`])

mod client;
mod error;
mod http;


pub use client::{OPTION_IDEMPOTENCY_KEY, OPTION_TIMEOUT_MS, ReqwestTransport};
pub use error::TransportError;
pub use http::{ApiRequest, ApiResponse, RequestSnapshot, Transport};

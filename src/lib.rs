//! paylane: outbound request governance for a payments API client.
//!
//! A library providing the throttled, retrying send path that every API
//! wrapper method funnels through ([`governor`]), the narrow transport seam
//! it dispatches over ([`transport`]), and HMAC signature verification for
//! inbound webhook deliveries ([`webhook`]).

pub mod governor;
pub mod time;
pub mod transport;
pub mod webhook;

//! Request/response value types and the transport trait.

use std::collections::BTreeMap;
use std::time::Duration;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc2822;

use super::TransportError;

/// A logical API request, independent of any attempt to send it.
///
/// This is the value the caller hands to the governor once per call. The
/// governor never sends it directly; each attempt captures a fresh
/// [`RequestSnapshot`] from it, so the logical request retains its body and
/// headers for as many retries as the attempt budget allows.
///
/// Uses standard `http` crate types for method and headers, ensuring
/// compatibility with the broader ecosystem. Duplicate header names are
/// preserved in insertion order.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: http::Method,
    /// Target URL
    pub url: url::Url,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
    /// Optional request body
    pub body: Option<Vec<u8>>,
    /// Request-scoped options (idempotency keys, account overrides, ...)
    /// passed through to the transport alongside the snapshot.
    pub options: BTreeMap<String, String>,
}

impl ApiRequest {
    /// Creates a new request with the given method and URL.
    ///
    /// Headers are initialized to an empty map, body to `None`, and options
    /// to an empty set.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
            options: BTreeMap::new(),
        }
    }

    /// Creates a GET request to the given URL.
    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self::new(http::Method::GET, url)
    }

    /// Creates a POST request to the given URL.
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self::new(http::Method::POST, url)
    }

    /// Creates a DELETE request to the given URL.
    #[must_use]
    pub fn delete(url: url::Url) -> Self {
        Self::new(http::Method::DELETE, url)
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header to the request.
    ///
    /// If the header name already exists, the value is appended
    /// (HTTP headers can have multiple values).
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Adds a request-scoped option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// An immutable, re-sendable copy of an [`ApiRequest`].
///
/// Captured once per attempt. Because the body is held as an owned byte
/// buffer rather than a stream, a snapshot can be dispatched without
/// consuming the logical request, and a retry simply captures another one.
/// No field is mutable after capture.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    method: http::Method,
    url: url::Url,
    headers: http::HeaderMap,
    body: Option<Vec<u8>>,
    options: BTreeMap<String, String>,
}

impl RequestSnapshot {
    /// Captures an immutable copy of the logical request.
    #[must_use]
    pub fn capture(request: &ApiRequest) -> Self {
        Self {
            method: request.method.clone(),
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
            options: request.options.clone(),
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &http::Method {
        &self.method
    }

    /// Returns the target URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Returns the headers, duplicates preserved in insertion order.
    #[must_use]
    pub const fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Returns the body bytes, if any.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Returns the request-scoped options.
    #[must_use]
    pub const fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// Consumes the snapshot, returning its parts for dispatch.
    ///
    /// Options travel with the other parts; how each key is interpreted is
    /// up to the transport.
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        http::Method,
        url::Url,
        http::HeaderMap,
        Option<Vec<u8>>,
        BTreeMap<String, String>,
    ) {
        (self.method, self.url, self.headers, self.body, self.options)
    }
}

/// An HTTP response received from the API.
///
/// Contains the status code, headers, and body of the response.
/// The body is fully buffered into memory.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Response body (fully buffered)
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a new response.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as a UTF-8 string, if valid.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Parses the `Retry-After` header, if present and well-formed.
    ///
    /// Accepts both forms defined by RFC 7231: delta-seconds and an
    /// HTTP-date. A date in the past yields [`Duration::ZERO`] rather than
    /// an error, so callers can treat the hint as "retry immediately".
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        let value = self.headers.get(http::header::RETRY_AFTER)?;
        let raw = value.to_str().ok()?.trim();

        if let Ok(secs) = raw.parse::<u64>() {
            return Some(Duration::from_secs(secs));
        }
        if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
            let delta = moment - OffsetDateTime::now_utc();

            return if delta.is_positive() {
                delta.try_into().ok()
            } else {
                Some(Duration::ZERO)
            };
        }

        None
    }
}

/// Trait for dispatching request snapshots.
///
/// # Design
///
/// This trait is the governor's only dependency on an HTTP stack. It
/// abstracts the client implementation, enabling:
/// - Dependency injection for testing with mock transports
/// - Swapping HTTP libraries without changing the governor
/// - Adding cross-cutting concerns (logging, metrics) via decorators
///
/// Connection management, DNS, and TLS all live behind this seam; the
/// governor only sequences snapshots through it.
///
/// # Example
///
/// ```ignore
/// use paylane::transport::{Transport, RequestSnapshot, ApiResponse, TransportError};
///
/// struct MockTransport {
///     response: ApiResponse,
/// }
///
/// impl Transport for MockTransport {
///     async fn dispatch(&self, _snapshot: RequestSnapshot) -> Result<ApiResponse, TransportError> {
///         Ok(self.response.clone())
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Dispatches a snapshot and returns the buffered response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when:
    /// - Network connection fails ([`TransportError::Connection`])
    /// - Request times out ([`TransportError::Timeout`])
    /// - The request cannot be constructed ([`TransportError::InvalidRequest`])
    fn dispatch(
        &self,
        snapshot: RequestSnapshot,
    ) -> impl std::future::Future<Output = Result<ApiResponse, TransportError>> + Send;
}

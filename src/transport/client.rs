//! Production transport implementation using reqwest.

use std::time::Duration;

use super::{ApiResponse, RequestSnapshot, Transport, TransportError};

/// Option key carrying an idempotency key, sent as the `Idempotency-Key`
/// header.
pub const OPTION_IDEMPOTENCY_KEY: &str = "idempotency_key";

/// Option key setting a per-request timeout in milliseconds, overriding the
/// client-wide default for this dispatch only.
pub const OPTION_TIMEOUT_MS: &str = "timeout_ms";

/// Production transport backed by `reqwest::Client`.
///
/// Implements the [`Transport`] trait over a pooled reqwest client.
/// Request-scoped options from the snapshot are applied here: the
/// [`OPTION_IDEMPOTENCY_KEY`] and [`OPTION_TIMEOUT_MS`] keys are
/// understood, anything else is ignored so callers can attach options
/// aimed at other transports without breaking this one.
///
/// # Example
///
/// ```no_run
/// use paylane::transport::{ReqwestTransport, Transport, ApiRequest, RequestSnapshot};
/// use paylane::transport::OPTION_IDEMPOTENCY_KEY;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = ReqwestTransport::new();
/// let url = Url::parse("https://api.example.com/v1/charges")?;
/// let request = ApiRequest::post(url)
///     .with_body(b"amount=100".to_vec())
///     .with_option(OPTION_IDEMPOTENCY_KEY, "ch_create_8f2c");
/// let response = transport.dispatch(RequestSnapshot::capture(&request)).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a new transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates a transport from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (timeouts, TLS, proxies).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    pub(crate) fn prepare(&self, snapshot: RequestSnapshot) -> reqwest::RequestBuilder {
        let (method, url, headers, body, options) = snapshot.into_parts();

        let mut builder = self.inner.request(method, url.as_str()).headers(headers);

        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(key) = options.get(OPTION_IDEMPOTENCY_KEY) {
            builder = builder.header("Idempotency-Key", key);
        }
        if let Some(ms) = options
            .get(OPTION_TIMEOUT_MS)
            .and_then(|raw| raw.parse::<u64>().ok())
        {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        builder
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    async fn dispatch(&self, snapshot: RequestSnapshot) -> Result<ApiResponse, TransportError> {
        let response = self.prepare(snapshot).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else if e.is_builder() {
                TransportError::InvalidRequest(e.to_string())
            } else {
                TransportError::Connection(Box::new(e))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection(Box::new(e)))?
            .to_vec();

        Ok(ApiResponse::new(status, headers, body))
    }
}

//! HTTP transport used by access probes.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Timeout applied to a probe when no valid override is given.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolve a timeout override in seconds. Non-positive values fall back to `default`.
pub fn resolve_timeout(override_secs: Option<i64>, default: Duration) -> Duration {
    match override_secs {
        Some(secs) if secs > 0 => {
            let timeout = Duration::from_secs(secs.unsigned_abs());
            debug!(?timeout, "HTTP request and response timeout overridden");
            timeout
        }
        Some(secs) => {
            debug!(secs, "Invalid HTTP timeout passed in, using default value");
            default
        }
        None => default,
    }
}

/// A single GET request.
#[derive(Debug, Clone, Copy)]
pub struct HttpRequest<'a> {
    pub url: &'a str,
    /// Sent as a bearer token when present and non-empty.
    pub token: Option<&'a str>,
    pub timeout: Duration,
    /// Sent as the `Client` header when present.
    pub client_name: Option<&'a str>,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to create async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to retrieve {url}, {status}: {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("empty response body from {url}")]
    EmptyBody { url: String },
}

/// Blocking HTTP GET capability.
pub trait Transport: Send + Sync {
    /// Fetch the body of `request.url`. Non-2xx responses are errors.
    fn get(&self, request: &HttpRequest<'_>) -> Result<Vec<u8>, TransportError>;
}

/// [`Transport`] backed by `reqwest`, driven on a private current-thread runtime.
///
/// Must not be called from inside an async runtime.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    user_agent: String,
}

impl ReqwestTransport {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    async fn fetch(&self, request: &HttpRequest<'_>) -> Result<Vec<u8>, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(request.timeout)
            .build()
            .map_err(TransportError::Client)?;

        let mut builder = client.get(request.url);
        if let Some(token) = request.token.filter(|token| !token.is_empty()) {
            builder = builder.bearer_auth(token);
        }
        if let Some(client_name) = request.client_name {
            builder = builder.header("Client", client_name);
        }

        debug!(url = request.url, "HTTP GET");
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: request.url.to_string(),
                source: Box::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: request.url.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request {
                url: request.url.to_string(),
                source: Box::new(e),
            })?;

        Ok(bytes.to_vec())
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(concat!("gitsrc/", env!("CARGO_PKG_VERSION")))
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, request: &HttpRequest<'_>) -> Result<Vec<u8>, TransportError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(TransportError::Runtime)?;
        runtime.block_on(self.fetch(request))
    }
}

//! HTTP Client port

use async_trait::async_trait;
use echoline_domain::{HttpRequest, HttpResponse};
use thiserror::Error;

/// Network-level failures. None of these are assertion failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// No response within the timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The remote host refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The host name did not resolve.
    #[error("DNS resolution failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The URL was rejected by the client.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The body could not be sent or read.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// Any other client failure.
    #[error("{0}")]
    Other(String),
}

impl HttpClientError {
    /// Whether retrying the same request might succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::ConnectionFailed(_)
                | Self::ConnectionRefused { .. }
                | Self::DnsError { .. }
        )
    }
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation so the runner can be
/// driven by a fake in tests. Implementations are shared across concurrent
/// cases and must not keep per-request state.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a request and returns the full response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails due to network issues,
    /// timeout, or other HTTP-related problems. A non-2xx status is not an error.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpClientError>;
}

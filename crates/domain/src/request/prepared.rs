//! Prepared request type
//!
//! An [`HttpRequest`] is a [`crate::testing::TestCase`] resolved against a
//! base URL: everything an HTTP client needs to put bytes on the wire.

use std::time::Duration;

use indexmap::IndexMap;
use url::Url;

use super::HttpMethod;
use crate::error::{DomainError, DomainResult};

/// A fully resolved HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute target URL, query included.
    pub url: Url,
    /// Headers in send order.
    pub headers: Vec<(String, String)>,
    /// Encoded request body.
    pub body: Option<Vec<u8>>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub const fn new(method: HttpMethod, url: Url, timeout: Duration) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
            timeout,
        }
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the first header with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the timeout in whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Joins `base_url` and `path`, then appends `query` pairs.
///
/// `path` may already carry a query string; the extra pairs are appended after it.
///
/// # Errors
///
/// Returns [`DomainError::InvalidUrl`] when the result is not an absolute
/// `http`/`https` URL.
pub fn build_url(
    base_url: &str,
    path: &str,
    query: &IndexMap<String, String>,
) -> DomainResult<Url> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), path);
    let mut url = Url::parse(&raw).map_err(|e| DomainError::InvalidUrl(format!("{e}: {raw}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(DomainError::InvalidUrl(format!(
            "URL must start with http:// or https://: {raw}"
        )));
    }

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter());
    }

    Ok(url)
}

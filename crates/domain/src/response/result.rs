//! Response types
//!
//! [`HttpResponse`] is what an HTTP client hands back; [`ExecutionResult`]
//! adds timing and the parsed body, and is what assertions read.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::path::{lookup, FieldLookup};

/// Raw HTTP response as received from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers as a map.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Response body bytes.
    #[serde(default)]
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub const fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }
}

/// Outcome of executing a single test case's request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// HTTP status code.
    pub status: u16,
    /// Response headers as a map.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Response body as (lossy) UTF-8 text.
    pub body: String,
    /// Response body parsed as JSON, when it is JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    /// Wall-clock time from send to full body.
    pub elapsed_ms: u64,
    /// Number of attempts it took (1 unless retried).
    pub attempts: u32,
}

impl ExecutionResult {
    /// Builds a result from a raw response and the measured elapsed time.
    #[must_use]
    pub fn from_response(response: HttpResponse, elapsed_ms: u64) -> Self {
        let body = String::from_utf8(response.body)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
        let json = serde_json::from_str(&body).ok();

        Self {
            status: response.status,
            headers: response.headers,
            body,
            json,
            elapsed_ms,
            attempts: 1,
        }
    }

    /// Sets the attempt count (builder pattern).
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Looks up a field of the JSON body by dotted path.
    #[must_use]
    pub fn field(&self, path: &str) -> FieldLookup<'_> {
        match &self.json {
            Some(json) => lookup(json, path),
            None => FieldLookup::NotJson,
        }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

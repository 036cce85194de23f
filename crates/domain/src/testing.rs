//! Contract test definitions.
//!
//! A [`TestSuite`] is plain data: an ordered list of [`TestCase`]s, each one
//! request plus the [`Assertion`]s to evaluate against its response.

use std::collections::HashSet;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::request::{build_url, HttpMethod, HttpRequest};

/// A check to run against an [`crate::response::ExecutionResult`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Status code equals the expected value.
    StatusEquals {
        /// Expected status code.
        expected: u16,
    },
    /// A response header exists and its value contains a substring.
    HeaderContains {
        /// Header name (case-insensitive).
        name: String,
        /// Substring the value must contain.
        substring: String,
    },
    /// A field of the JSON body equals a value.
    BodyFieldEquals {
        /// Dotted field path (e.g., `args.name`).
        path: String,
        /// Expected value (as JSON).
        expected: serde_json::Value,
    },
    /// A string field of the JSON body contains a substring.
    BodyFieldContains {
        /// Dotted field path (e.g., `url`).
        path: String,
        /// Substring the field must contain.
        substring: String,
    },
    /// The raw body contains a substring.
    #[serde(rename = "body_contains")]
    BodyContainsSubstring {
        /// Text to search for.
        substring: String,
    },
    /// The request completed in under `max_ms` milliseconds.
    DurationBelow {
        /// Exclusive upper bound in milliseconds.
        max_ms: u64,
    },
}

impl Assertion {
    /// Creates a status assertion.
    #[must_use]
    pub const fn status(expected: u16) -> Self {
        Self::StatusEquals { expected }
    }

    /// Creates a header assertion.
    #[must_use]
    pub fn header_contains(name: impl Into<String>, substring: impl Into<String>) -> Self {
        Self::HeaderContains {
            name: name.into(),
            substring: substring.into(),
        }
    }

    /// Creates a body field equality assertion.
    #[must_use]
    pub fn field_equals(path: impl Into<String>, expected: impl Into<serde_json::Value>) -> Self {
        Self::BodyFieldEquals {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Creates a body field substring assertion.
    #[must_use]
    pub fn field_contains(path: impl Into<String>, substring: impl Into<String>) -> Self {
        Self::BodyFieldContains {
            path: path.into(),
            substring: substring.into(),
        }
    }

    /// Creates a raw body substring assertion.
    #[must_use]
    pub fn body_contains(substring: impl Into<String>) -> Self {
        Self::BodyContainsSubstring {
            substring: substring.into(),
        }
    }

    /// Creates a duration assertion.
    #[must_use]
    pub const fn duration_below(max_ms: u64) -> Self {
        Self::DurationBelow { max_ms }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusEquals { expected } => format!("status = {expected}"),
            Self::HeaderContains { name, substring } => {
                format!("header '{name}' contains '{substring}'")
            }
            Self::BodyFieldEquals { path, expected } => format!("body.{path} = {expected}"),
            Self::BodyFieldContains { path, substring } => {
                format!("body.{path} contains '{substring}'")
            }
            Self::BodyContainsSubstring { substring } => format!("body contains '{substring}'"),
            Self::DurationBelow { max_ms } => format!("duration < {max_ms}ms"),
        }
    }
}

/// Result of evaluating a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionOutcome {
    /// The assertion that was evaluated.
    pub assertion: Assertion,
    /// Whether it held.
    pub passed: bool,
    /// Actual value found, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// What was checked, or why it failed.
    pub detail: String,
}

impl AssertionOutcome {
    /// Create a passed outcome.
    #[must_use]
    pub fn pass(assertion: Assertion, actual: impl Into<String>) -> Self {
        let detail = assertion.description();
        Self {
            assertion,
            passed: true,
            actual: Some(actual.into()),
            detail,
        }
    }

    /// Create a failed outcome without an actual value.
    #[must_use]
    pub fn fail(assertion: Assertion, detail: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            detail: detail.into(),
        }
    }

    /// Create a failed outcome with the actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            passed: false,
            actual: Some(actual.into()),
            detail: detail.into(),
        }
    }
}

/// One independent request/evaluate cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
    /// Unique name within the suite.
    pub name: String,
    /// HTTP method.
    #[serde(default)]
    pub method: HttpMethod,
    /// Path relative to the base URL; must start with `/`.
    pub path: String,
    /// Query parameters appended to the path, in file order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub query: IndexMap<String, String>,
    /// Request headers, sent in file order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,
    /// JSON request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Per-case timeout override in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Assertions, evaluated in order.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

impl TestCase {
    /// Creates a case with no assertions.
    #[must_use]
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            query: IndexMap::new(),
            headers: IndexMap::new(),
            body: None,
            timeout_ms: None,
            assertions: Vec::new(),
        }
    }

    /// Adds a query parameter (builder pattern).
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the JSON body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the timeout override (builder pattern).
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Adds an assertion (builder pattern).
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Checks the case is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTestCase`] describing the first problem found.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_case(&self.name, "name is required"));
        }
        if !self.path.starts_with('/') {
            return Err(DomainError::invalid_case(
                &self.name,
                format!("path '{}' must start with '/'", self.path),
            ));
        }
        if self.assertions.is_empty() {
            return Err(DomainError::invalid_case(
                &self.name,
                "at least one assertion is required",
            ));
        }
        if self.timeout_ms == Some(0) {
            return Err(DomainError::invalid_case(
                &self.name,
                "timeout_ms must be greater than zero",
            ));
        }
        if let Some(name) = self.headers.keys().find(|name| !is_token(name)) {
            return Err(DomainError::InvalidHeader {
                name: name.clone(),
                reason: "not a valid header name".to_string(),
            });
        }
        Ok(())
    }

    /// Timeout for this case, falling back to `default`.
    #[must_use]
    pub fn timeout(&self, default: Duration) -> Duration {
        self.timeout_ms.map_or(default, Duration::from_millis)
    }

    /// Resolves this case into a request against `base_url`.
    ///
    /// A JSON body gets `Content-Type: application/json` unless the case sets
    /// its own content type.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built or the body cannot be encoded.
    pub fn to_request(&self, base_url: &str, default_timeout: Duration) -> DomainResult<HttpRequest> {
        let url = build_url(base_url, &self.path, &self.query)?;
        let mut request = HttpRequest::new(self.method, url, self.timeout(default_timeout));

        for (name, value) in &self.headers {
            request = request.with_header(name, value);
        }

        if let Some(body) = &self.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| DomainError::invalid_case(&self.name, format!("body: {e}")))?;
            if request.header("content-type").is_none() {
                request = request.with_header("Content-Type", "application/json");
            }
            request.body = Some(bytes);
        }

        Ok(request)
    }
}

/// RFC 7230 token characters, which is what a header name may contain.
fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// An ordered list of test cases.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TestSuite {
    /// Suite name.
    pub name: String,
    /// Cases, in run and report order.
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    /// Create a new empty test suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// Add a case (builder pattern).
    #[must_use]
    pub fn with_case(mut self, case: TestCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Check if the suite is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Get the number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Validates every case and checks names are unique.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidSuite("suite name is required".to_string()));
        }
        if self.cases.is_empty() {
            return Err(DomainError::InvalidSuite(format!(
                "suite '{}' has no test cases",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for case in &self.cases {
            case.validate()?;
            if !seen.insert(case.name.as_str()) {
                return Err(DomainError::InvalidSuite(format!(
                    "duplicate test case name '{}'",
                    case.name
                )));
            }
        }
        Ok(())
    }

    /// Keeps only cases whose name contains `needle` (case-insensitive).
    #[must_use]
    pub fn filter(mut self, needle: &str) -> Self {
        let needle = needle.to_lowercase();
        self.cases
            .retain(|case| case.name.to_lowercase().contains(&needle));
        self
    }
}

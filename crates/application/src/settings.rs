//! Run settings.

use std::time::Duration;

use echoline_domain::request::build_url;
use indexmap::IndexMap;

use crate::error::ConfigError;

/// Default target service.
pub const DEFAULT_BASE_URL: &str = "https://httpbin.org";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pause between retries.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Retry policy for transient network failures. Assertion failures are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Pause before each retry.
    pub delay: Duration,
}

impl RetryPolicy {
    /// No retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Retry up to `max_retries` times, pausing `delay` between attempts.
    #[must_use]
    pub const fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Settings for one suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Base URL every case path is joined to.
    pub base_url: String,
    /// Default per-request timeout.
    pub timeout: Duration,
    /// Maximum number of cases in flight.
    pub parallel: usize,
    /// Network retry policy.
    pub retry: RetryPolicy,
}

impl RunSettings {
    /// Settings targeting `base_url` with defaults for everything else.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the default timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the worker limit (builder pattern).
    #[must_use]
    pub const fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the retry policy (builder pattern).
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Checks the settings before a run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] for a bad base URL, a zero
    /// timeout, or a zero worker limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        build_url(&self.base_url, "/", &IndexMap::new())
            .map_err(|e| ConfigError::InvalidSetting(format!("base URL: {e}")))?;
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidSetting(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.parallel == 0 {
            return Err(ConfigError::InvalidSetting(
                "parallel must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            parallel: 1,
            retry: RetryPolicy::none(),
        }
    }
}

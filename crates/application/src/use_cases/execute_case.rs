//! Execute Case Use Case
//!
//! Sends a single test case's request and measures how long it took.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use echoline_domain::{DomainError, ExecutionResult, HttpRequest, TestCase};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ports::{elapsed_ms, Clock, HttpClient, HttpClientError};
use crate::settings::RetryPolicy;

/// Error type for the execute case use case.
#[derive(Debug, Clone, Error)]
pub enum ExecuteCaseError {
    /// The case could not be turned into a request.
    #[error("cannot build request: {0}")]
    InvalidRequest(#[from] DomainError),

    /// The request failed at the network level.
    #[error("{source}")]
    Network {
        /// Last error seen.
        source: HttpClientError,
        /// Attempts made, including the first.
        attempts: u32,
    },
}

/// Use case for executing one test case.
///
/// Timing goes through the [`Clock`] port and the timeout is enforced here,
/// so a client that hangs is cut off even if it ignores its own timeout.
pub struct ExecuteCase<C: HttpClient, K: Clock> {
    client: Arc<C>,
    clock: Arc<K>,
    retry: RetryPolicy,
}

impl<C: HttpClient, K: Clock> ExecuteCase<C, K> {
    /// Creates a new `ExecuteCase` use case without retries.
    pub const fn new(client: Arc<C>, clock: Arc<K>) -> Self {
        Self {
            client,
            clock,
            retry: RetryPolicy::none(),
        }
    }

    /// Sets the retry policy (builder pattern).
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Builds and sends the request for `case`.
    ///
    /// `timeout` applies unless the case overrides it.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteCaseError::InvalidRequest`] if the request cannot be
    /// built, or [`ExecuteCaseError::Network`] once retries are exhausted.
    pub async fn execute(
        &self,
        case: &TestCase,
        base_url: &str,
        timeout: Duration,
    ) -> Result<ExecutionResult, ExecuteCaseError> {
        self.execute_tracked(case, base_url, timeout, &AtomicU32::new(0))
            .await
    }

    /// Like [`Self::execute`], but publishes the attempt count to `attempts`
    /// as each attempt starts, so a caller that drops the future mid-retry
    /// still knows how many requests went out.
    ///
    /// # Errors
    ///
    /// Same as [`Self::execute`].
    pub async fn execute_tracked(
        &self,
        case: &TestCase,
        base_url: &str,
        timeout: Duration,
        attempts: &AtomicU32,
    ) -> Result<ExecutionResult, ExecuteCaseError> {
        let request = case.to_request(base_url, timeout)?;
        self.send_tracked(&request, attempts).await
    }

    /// Sends a prepared request, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteCaseError::Network`] with the last error and attempt count.
    pub async fn send(&self, request: &HttpRequest) -> Result<ExecutionResult, ExecuteCaseError> {
        self.send_tracked(request, &AtomicU32::new(0)).await
    }

    async fn send_tracked(
        &self,
        request: &HttpRequest,
        counter: &AtomicU32,
    ) -> Result<ExecutionResult, ExecuteCaseError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            counter.store(attempts, Ordering::Relaxed);
            debug!(method = %request.method, url = %request.url, attempt = attempts, "sending request");

            match self.attempt(request).await {
                Ok(result) => {
                    debug!(
                        url = %request.url,
                        status = result.status,
                        elapsed_ms = result.elapsed_ms,
                        "response received"
                    );
                    return Ok(result.with_attempts(attempts));
                }
                Err(error) if error.is_transient() && attempts <= self.retry.max_retries => {
                    warn!(url = %request.url, attempt = attempts, %error, "transient failure, retrying");
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(error) => {
                    warn!(url = %request.url, attempts, %error, "request failed");
                    return Err(ExecuteCaseError::Network {
                        source: error,
                        attempts,
                    });
                }
            }
        }
    }

    async fn attempt(&self, request: &HttpRequest) -> Result<ExecutionResult, HttpClientError> {
        let started = self.clock.now();
        let response = tokio::time::timeout(request.timeout, self.client.send(request))
            .await
            .map_err(|_| HttpClientError::Timeout {
                timeout_ms: request.timeout_ms(),
            })??;
        let elapsed = elapsed_ms(started, self.clock.now());
        Ok(ExecutionResult::from_response(response, elapsed))
    }
}

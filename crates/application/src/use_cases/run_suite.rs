//! Run Suite Use Case
//!
//! Executes every case of a suite, evaluates its assertions, and aggregates
//! the results into a [`SuiteReport`]. Cases are independent: a failure in
//! one never stops the others.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use echoline_domain::request::build_url;
use echoline_domain::{CaseReport, SuiteReport, TestCase, TestSuite};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::ports::{CancellationReceiver, CancellationToken, Clock, HttpClient};
use crate::settings::RunSettings;
use crate::use_cases::{AssertionEvaluator, ExecuteCase, ExecuteCaseError};

/// Use case for running a whole suite.
pub struct RunSuite<C: HttpClient + 'static, K: Clock + 'static> {
    executor: Arc<ExecuteCase<C, K>>,
    clock: Arc<K>,
    settings: RunSettings,
}

impl<C: HttpClient + 'static, K: Clock + 'static> RunSuite<C, K> {
    /// Creates the use case. The client is shared by every case.
    pub fn new(client: Arc<C>, clock: Arc<K>, settings: RunSettings) -> Self {
        let executor = ExecuteCase::new(client, Arc::clone(&clock)).with_retry(settings.retry);
        Self {
            executor: Arc::new(executor),
            clock,
            settings,
        }
    }

    /// Returns the settings this runner uses.
    #[must_use]
    pub const fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Runs every case and returns the report, cases in suite order.
    ///
    /// Runs sequentially when `parallel` is 1, otherwise keeps up to
    /// `parallel` cases in flight. Cancelling `cancel` marks cases that have
    /// not finished as skipped.
    pub async fn run_all(&self, suite: &TestSuite, cancel: &CancellationToken) -> SuiteReport {
        let started_at = self.clock.now();
        info!(
            suite = %suite.name,
            cases = suite.len(),
            base_url = %self.settings.base_url,
            parallel = self.settings.parallel,
            "starting suite run"
        );

        let cases = if self.settings.parallel <= 1 {
            self.run_sequential(suite, cancel).await
        } else {
            self.run_parallel(suite, cancel).await
        };

        let report = SuiteReport::new(
            &suite.name,
            &self.settings.base_url,
            started_at,
            self.clock.now(),
            cases,
        );
        info!(
            passed = report.summary.passed,
            failed = report.summary.failed,
            errored = report.summary.errored,
            skipped = report.summary.skipped,
            "suite run finished"
        );
        report
    }

    async fn run_sequential(&self, suite: &TestSuite, cancel: &CancellationToken) -> Vec<CaseReport> {
        let mut reports = Vec::with_capacity(suite.len());
        for case in &suite.cases {
            let report = run_case(
                &self.executor,
                &self.settings.base_url,
                self.settings.timeout,
                case,
                cancel.receiver(),
            )
            .await;
            reports.push(report);
        }
        reports
    }

    async fn run_parallel(&self, suite: &TestSuite, cancel: &CancellationToken) -> Vec<CaseReport> {
        let semaphore = Arc::new(Semaphore::new(self.settings.parallel));
        let mut tasks = JoinSet::new();

        for (index, case) in suite.cases.iter().cloned().enumerate() {
            let executor = Arc::clone(&self.executor);
            let semaphore = Arc::clone(&semaphore);
            let base_url = self.settings.base_url.clone();
            let timeout = self.settings.timeout;
            let receiver = cancel.receiver();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let report = run_case(&executor, &base_url, timeout, &case, receiver).await;
                (index, report)
            });
        }

        let mut slots: Vec<Option<CaseReport>> = vec![None; suite.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => slots[index] = Some(report),
                Err(error) => warn!(%error, "case worker failed"),
            }
        }

        slots
            .into_iter()
            .zip(&suite.cases)
            .map(|(slot, case)| {
                slot.unwrap_or_else(|| {
                    CaseReport::errored(
                        &case.name,
                        case.method,
                        display_url(&self.settings.base_url, case),
                        "case worker failed",
                        0,
                    )
                })
            })
            .collect()
    }
}

/// One request/evaluate cycle, raced against cancellation.
async fn run_case<C: HttpClient, K: Clock>(
    executor: &ExecuteCase<C, K>,
    base_url: &str,
    timeout: Duration,
    case: &TestCase,
    mut cancel: CancellationReceiver,
) -> CaseReport {
    let url = display_url(base_url, case);

    if cancel.is_cancelled() {
        return CaseReport::skipped(&case.name, case.method, url, "run cancelled before start");
    }

    let attempts = AtomicU32::new(0);
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            let attempts = attempts.load(Ordering::Relaxed);
            warn!(case = %case.name, attempts, "cancelled while in flight");
            let mut report = CaseReport::skipped(
                &case.name,
                case.method,
                url,
                "run cancelled while request was in flight",
            );
            report.attempts = attempts;
            report
        }
        result = executor.execute_tracked(case, base_url, timeout, &attempts) => match result {
            Ok(result) => {
                let outcomes = AssertionEvaluator::new().evaluate(&result, &case.assertions);
                let report = CaseReport::completed(
                    &case.name,
                    case.method,
                    url,
                    outcomes,
                    result.elapsed_ms,
                    result.attempts,
                );
                info!(case = %case.name, status = ?report.status, elapsed_ms = result.elapsed_ms, "case finished");
                report
            }
            Err(ExecuteCaseError::Network { source, attempts }) => {
                CaseReport::errored(&case.name, case.method, url, source.to_string(), attempts)
            }
            Err(error @ ExecuteCaseError::InvalidRequest(_)) => {
                CaseReport::errored(&case.name, case.method, url, error.to_string(), 0)
            }
        },
    }
}

/// URL shown in reports; falls back to plain concatenation if it cannot be built.
fn display_url(base_url: &str, case: &TestCase) -> String {
    build_url(base_url, &case.path, &case.query).map_or_else(
        |_| format!("{}{}", base_url.trim_end_matches('/'), case.path),
        |url| url.to_string(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::HttpClientError;
    use crate::settings::RetryPolicy;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use echoline_domain::{Assertion, CaseStatus, HttpMethod, HttpRequest, HttpResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Clock whose reads advance by a fixed step.
    struct SteppingClock {
        now: Mutex<DateTime<Utc>>,
        step: chrono::Duration,
    }

    impl SteppingClock {
        fn new(step_ms: i64) -> Self {
            Self {
                now: Mutex::new(DateTime::<Utc>::UNIX_EPOCH),
                step: chrono::Duration::milliseconds(step_ms),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut now = self.now.lock().expect("Lock poisoned");
            let current = *now;
            *now += self.step;
            current
        }
    }

    /// Echoes query args and JSON body back; `/status/{code}` returns that code;
    /// `/down` fails to connect; `/slow` sleeps for a second.
    struct EchoClient {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl EchoClient {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HttpClient for EchoClient {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpClientError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let path = request.url.path();
            if path == "/down" {
                return Err(HttpClientError::ConnectionFailed("refused".into()));
            }
            if path == "/slow" {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            let status = path
                .strip_prefix("/status/")
                .and_then(|code| code.parse().ok())
                .unwrap_or(200);

            let args: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
            let body = request
                .body
                .as_ref()
                .map(|bytes| serde_json::from_slice::<serde_json::Value>(bytes).unwrap());
            let echo = json!({ "args": args, "json": body, "url": request.url.as_str() });
            Ok(HttpResponse::new(status, HashMap::new(), echo.to_string().into_bytes()))
        }
    }

    fn runner(parallel: usize) -> RunSuite<EchoClient, SteppingClock> {
        RunSuite::new(
            Arc::new(EchoClient::new()),
            Arc::new(SteppingClock::new(10)),
            RunSettings::new("http://echo.test").with_parallel(parallel),
        )
    }

    fn case(name: &str, path: &str) -> TestCase {
        TestCase::new(name, HttpMethod::Get, path).with_assertion(Assertion::status(200))
    }

    fn mixed_suite() -> TestSuite {
        TestSuite::new("mixed")
            .with_case(
                case("query", "/get")
                    .with_query("name", "Cypress")
                    .with_query("type", "Test")
                    .with_assertion(Assertion::field_equals(
                        "args",
                        json!({"name": "Cypress", "type": "Test"}),
                    )),
            )
            .with_case(case("not found", "/status/404"))
            .with_case(case("down", "/down"))
            .with_case(
                TestCase::new("post", HttpMethod::Post, "/post")
                    .with_body(json!({"username": "admin", "password": "12345"}))
                    .with_assertion(Assertion::field_equals(
                        "json",
                        json!({"username": "admin", "password": "12345"}),
                    )),
            )
    }

    fn statuses(report: &SuiteReport) -> Vec<CaseStatus> {
        report.cases.iter().map(|c| c.status).collect()
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_later_cases() {
        let report = runner(1)
            .run_all(&mixed_suite(), &CancellationToken::new())
            .await;

        assert_eq!(
            statuses(&report),
            vec![
                CaseStatus::Passed,
                CaseStatus::Failed,
                CaseStatus::Errored,
                CaseStatus::Passed
            ]
        );
        assert_eq!(report.summary.total, 4);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.cases[0].url, "http://echo.test/get?name=Cypress&type=Test");
        assert_eq!(report.cases[2].error.as_deref(), Some("connection failed: refused"));
    }

    #[tokio::test]
    async fn test_all_passing_exit_code_zero() {
        let suite = TestSuite::new("ok")
            .with_case(case("a", "/get"))
            .with_case(case("b", "/headers").with_assertion(Assertion::duration_below(5000)));
        let report = runner(1).run_all(&suite, &CancellationToken::new()).await;

        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.cases[1].elapsed_ms, Some(10));
    }

    #[tokio::test]
    async fn test_same_case_twice_is_idempotent() {
        let runner = runner(1);
        let suite = TestSuite::new("q").with_case(mixed_suite().cases[0].clone());

        let first = runner.run_all(&suite, &CancellationToken::new()).await;
        let second = runner.run_all(&suite, &CancellationToken::new()).await;

        assert_eq!(first.cases[0].outcomes, second.cases[0].outcomes);
        assert_ne!(first.run_id, second.run_id);
    }

    #[tokio::test]
    async fn test_parallel_keeps_suite_order_and_limit() {
        let client = Arc::new(EchoClient::new());
        let runner = RunSuite::new(
            Arc::clone(&client),
            Arc::new(SteppingClock::new(1)),
            RunSettings::new("http://echo.test").with_parallel(2),
        );
        let mut suite = mixed_suite();
        for i in 0..6 {
            suite = suite.with_case(case(&format!("extra {i}"), "/get"));
        }

        let report = runner.run_all(&suite, &CancellationToken::new()).await;

        let names: Vec<_> = report.cases.iter().map(|c| c.name.clone()).collect();
        let expected: Vec<_> = suite.cases.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, expected);
        assert_eq!(
            &statuses(&report)[..4],
            &[
                CaseStatus::Passed,
                CaseStatus::Failed,
                CaseStatus::Errored,
                CaseStatus::Passed
            ]
        );
        assert!(client.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_skips_everything() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = runner(1).run_all(&mixed_suite(), &cancel).await;

        assert!(report.cases.iter().all(|c| c.status == CaseStatus::Skipped));
        assert_eq!(report.summary.skipped, 4);
        assert_eq!(report.exit_code(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_in_flight_marks_skipped() {
        let runner = runner(1);
        let suite = TestSuite::new("slow")
            .with_case(case("fast", "/get"))
            .with_case(case("slow", "/slow"))
            .with_case(case("after", "/get"));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let report = runner.run_all(&suite, &cancel).await;

        assert_eq!(
            statuses(&report),
            vec![CaseStatus::Passed, CaseStatus::Skipped, CaseStatus::Skipped]
        );
        assert_eq!(
            report.cases[1].error.as_deref(),
            Some("run cancelled while request was in flight")
        );
        assert_eq!(report.cases[1].attempts, 1);
        assert_eq!(
            report.cases[2].error.as_deref(),
            Some("run cancelled before start")
        );
        assert_eq!(report.cases[2].attempts, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_retries_keeps_attempt_count() {
        let runner = RunSuite::new(
            Arc::new(EchoClient::new()),
            Arc::new(SteppingClock::new(1)),
            RunSettings::new("http://echo.test")
                .with_retry(RetryPolicy::new(5, Duration::from_millis(100))),
        );
        let suite = TestSuite::new("down").with_case(case("down", "/down"));
        let cancel = CancellationToken::new();

        // Attempts start at 0, 110 and 220 ms; the fourth would start at 330.
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            trigger.cancel();
        });

        let report = runner.run_all(&suite, &cancel).await;

        assert_eq!(report.cases[0].status, CaseStatus::Skipped);
        assert_eq!(report.cases[0].attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_setting_reaches_executor() {
        let runner = RunSuite::new(
            Arc::new(EchoClient::new()),
            Arc::new(SteppingClock::new(1)),
            RunSettings::new("http://echo.test")
                .with_retry(RetryPolicy::new(2, Duration::from_millis(5))),
        );
        let suite = TestSuite::new("down").with_case(case("down", "/down"));

        let report = runner.run_all(&suite, &CancellationToken::new()).await;

        assert_eq!(report.cases[0].status, CaseStatus::Errored);
        assert_eq!(report.cases[0].attempts, 3);
    }
}

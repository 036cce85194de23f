//! Run reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::request::HttpMethod;
use crate::testing::AssertionOutcome;

/// Final state of a single case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Every assertion held.
    Passed,
    /// At least one assertion failed.
    Failed,
    /// The request never produced a response (connection failure, timeout).
    Errored,
    /// The run was cancelled before the case completed.
    Skipped,
}

impl CaseStatus {
    /// Short uppercase label for text output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::Errored => "ERROR",
            Self::Skipped => "SKIP",
        }
    }
}

/// Report for a single case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case name.
    pub name: String,
    /// HTTP method used.
    pub method: HttpMethod,
    /// Resolved request URL.
    pub url: String,
    /// Final status.
    pub status: CaseStatus,
    /// Assertion outcomes, in assertion order. Empty unless a response arrived.
    #[serde(default)]
    pub outcomes: Vec<AssertionOutcome>,
    /// Network error or skip reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Measured request time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
    /// Attempts made (0 when skipped before sending).
    pub attempts: u32,
}

impl CaseReport {
    /// Report for a case whose request completed.
    #[must_use]
    pub fn completed(
        name: impl Into<String>,
        method: HttpMethod,
        url: impl Into<String>,
        outcomes: Vec<AssertionOutcome>,
        elapsed_ms: u64,
        attempts: u32,
    ) -> Self {
        let status = if outcomes.iter().all(|o| o.passed) {
            CaseStatus::Passed
        } else {
            CaseStatus::Failed
        };
        Self {
            name: name.into(),
            method,
            url: url.into(),
            status,
            outcomes,
            error: None,
            elapsed_ms: Some(elapsed_ms),
            attempts,
        }
    }

    /// Report for a case whose request failed at the network level.
    #[must_use]
    pub fn errored(
        name: impl Into<String>,
        method: HttpMethod,
        url: impl Into<String>,
        error: impl Into<String>,
        attempts: u32,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            url: url.into(),
            status: CaseStatus::Errored,
            outcomes: Vec::new(),
            error: Some(error.into()),
            elapsed_ms: None,
            attempts,
        }
    }

    /// Report for a case that was cancelled.
    #[must_use]
    pub fn skipped(
        name: impl Into<String>,
        method: HttpMethod,
        url: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            url: url.into(),
            status: CaseStatus::Skipped,
            outcomes: Vec::new(),
            error: Some(reason.into()),
            elapsed_ms: None,
            attempts: 0,
        }
    }

    /// Outcomes that did not hold.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSummary {
    /// Number of cases.
    pub total: usize,
    /// Cases that passed.
    pub passed: usize,
    /// Cases with a failed assertion.
    pub failed: usize,
    /// Cases with a network error.
    pub errored: usize,
    /// Cases skipped by cancellation.
    pub skipped: usize,
    /// Assertions evaluated.
    pub assertions_total: usize,
    /// Assertions that failed.
    pub assertions_failed: usize,
}

impl SuiteSummary {
    /// Computes the summary for a list of case reports.
    #[must_use]
    pub fn from_cases(cases: &[CaseReport]) -> Self {
        cases.iter().fold(Self::default(), |mut acc, case| {
            acc.total += 1;
            match case.status {
                CaseStatus::Passed => acc.passed += 1,
                CaseStatus::Failed => acc.failed += 1,
                CaseStatus::Errored => acc.errored += 1,
                CaseStatus::Skipped => acc.skipped += 1,
            }
            acc.assertions_total += case.outcomes.len();
            acc.assertions_failed += case.failures().count();
            acc
        })
    }

    /// True when every case passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Report for a whole suite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Name of the suite that ran.
    pub suite_name: String,
    /// Base URL the suite ran against.
    pub base_url: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Per-case reports, in suite order.
    pub cases: Vec<CaseReport>,
    /// Aggregate counts.
    pub summary: SuiteSummary,
}

impl SuiteReport {
    /// Creates a report, computing the summary.
    #[must_use]
    pub fn new(
        suite_name: impl Into<String>,
        base_url: impl Into<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        cases: Vec<CaseReport>,
    ) -> Self {
        let summary = SuiteSummary::from_cases(&cases);
        Self {
            run_id: Uuid::now_v7(),
            suite_name: suite_name.into(),
            base_url: base_url.into(),
            started_at,
            finished_at,
            cases,
            summary,
        }
    }

    /// Process exit code: 0 if every case passed, 1 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.summary.all_passed() { 0 } else { 1 }
    }

    /// Run duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

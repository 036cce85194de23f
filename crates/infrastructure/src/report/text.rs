//! Human-readable report.

use echoline_domain::{CaseReport, CaseStatus, SuiteReport};

/// Renders one status line per case, the details of anything that did not
/// pass, and a summary.
#[must_use]
pub fn render_text(report: &SuiteReport) -> String {
    let mut lines = vec![
        format!("Suite: {}", report.suite_name),
        format!("Target: {}", report.base_url),
        String::new(),
    ];

    for case in &report.cases {
        lines.push(case_line(case));
        match case.status {
            CaseStatus::Passed => {}
            CaseStatus::Failed => {
                lines.extend(case.failures().map(|outcome| match &outcome.actual {
                    Some(actual) if !outcome.detail.contains(actual.as_str()) => {
                        format!("      - {} (actual: {actual})", outcome.detail)
                    }
                    _ => format!("      - {}", outcome.detail),
                }));
            }
            CaseStatus::Errored | CaseStatus::Skipped => {
                if let Some(error) = &case.error {
                    lines.push(format!("      {error}"));
                }
            }
        }
    }

    let summary = &report.summary;
    lines.push(String::new());
    lines.push(format!(
        "{} cases: {} passed, {} failed, {} errored, {} skipped",
        summary.total, summary.passed, summary.failed, summary.errored, summary.skipped
    ));
    lines.push(format!(
        "Assertions: {} of {} failed",
        summary.assertions_failed, summary.assertions_total
    ));
    lines.push(format!("Duration: {} ms", report.duration_ms()));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn case_line(case: &CaseReport) -> String {
    let mut context = format!("{} {}", case.method, case.url);
    if let Some(elapsed) = case.elapsed_ms {
        context.push_str(&format!(", {elapsed} ms"));
    }
    if case.attempts > 1 {
        context.push_str(&format!(", {} attempts", case.attempts));
    }
    format!("{:<5} {} ({context})", case.status.label(), case.name)
}

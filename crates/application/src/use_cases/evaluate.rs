//! Assertion evaluation.
//!
//! Applies every assertion of a case to its execution result and produces
//! one outcome per assertion. Evaluation never stops early: a failed or
//! unresolvable assertion is recorded and the next one is still checked.

use echoline_domain::{Assertion, AssertionOutcome, ExecutionResult, FieldLookup};
use serde_json::Value;

/// Maximum characters of body text shown in a failure.
const PREVIEW_CHARS: usize = 100;

/// Evaluates assertions against execution results.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssertionEvaluator;

impl AssertionEvaluator {
    /// Create a new evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluate all assertions in order.
    #[must_use]
    pub fn evaluate(
        &self,
        result: &ExecutionResult,
        assertions: &[Assertion],
    ) -> Vec<AssertionOutcome> {
        assertions
            .iter()
            .map(|assertion| self.evaluate_one(assertion, result))
            .collect()
    }

    /// Evaluate a single assertion.
    #[must_use]
    pub fn evaluate_one(&self, assertion: &Assertion, result: &ExecutionResult) -> AssertionOutcome {
        match assertion {
            Assertion::StatusEquals { expected } => Self::check_status(assertion, result, *expected),
            Assertion::HeaderContains { name, substring } => {
                Self::check_header_contains(assertion, result, name, substring)
            }
            Assertion::BodyFieldEquals { path, expected } => {
                Self::check_field_equals(assertion, result, path, expected)
            }
            Assertion::BodyFieldContains { path, substring } => {
                Self::check_field_contains(assertion, result, path, substring)
            }
            Assertion::BodyContainsSubstring { substring } => {
                Self::check_body_contains(assertion, result, substring)
            }
            Assertion::DurationBelow { max_ms } => {
                Self::check_duration(assertion, result, *max_ms)
            }
        }
    }

    fn check_status(assertion: &Assertion, result: &ExecutionResult, expected: u16) -> AssertionOutcome {
        let actual = result.status;
        if actual == expected {
            AssertionOutcome::pass(assertion.clone(), actual.to_string())
        } else {
            AssertionOutcome::fail_with_value(
                assertion.clone(),
                actual.to_string(),
                format!("Expected status {expected}, got {actual}"),
            )
        }
    }

    fn check_header_contains(
        assertion: &Assertion,
        result: &ExecutionResult,
        name: &str,
        substring: &str,
    ) -> AssertionOutcome {
        match result.header(name) {
            Some(actual) if actual.contains(substring) => {
                AssertionOutcome::pass(assertion.clone(), actual.clone())
            }
            Some(actual) => AssertionOutcome::fail_with_value(
                assertion.clone(),
                actual.clone(),
                format!("Header '{name}' value '{actual}' does not contain '{substring}'"),
            ),
            None => AssertionOutcome::fail(assertion.clone(), format!("Header '{name}' not found")),
        }
    }

    fn check_field_equals(
        assertion: &Assertion,
        result: &ExecutionResult,
        path: &str,
        expected: &Value,
    ) -> AssertionOutcome {
        match result.field(path) {
            FieldLookup::Found(actual) if actual == expected => {
                AssertionOutcome::pass(assertion.clone(), actual.to_string())
            }
            FieldLookup::Found(actual) => AssertionOutcome::fail_with_value(
                assertion.clone(),
                actual.to_string(),
                format!("Field '{path}' mismatch: expected {expected}, got {actual}"),
            ),
            unresolved => Self::unresolved(assertion, path, &unresolved),
        }
    }

    fn check_field_contains(
        assertion: &Assertion,
        result: &ExecutionResult,
        path: &str,
        substring: &str,
    ) -> AssertionOutcome {
        match result.field(path) {
            FieldLookup::Found(Value::String(actual)) if actual.contains(substring) => {
                AssertionOutcome::pass(assertion.clone(), actual.clone())
            }
            FieldLookup::Found(Value::String(actual)) => AssertionOutcome::fail_with_value(
                assertion.clone(),
                actual.clone(),
                format!("Field '{path}' does not contain '{substring}'"),
            ),
            FieldLookup::Found(actual) => AssertionOutcome::fail_with_value(
                assertion.clone(),
                actual.to_string(),
                format!("Field '{path}' is not a string"),
            ),
            unresolved => Self::unresolved(assertion, path, &unresolved),
        }
    }

    fn check_body_contains(
        assertion: &Assertion,
        result: &ExecutionResult,
        substring: &str,
    ) -> AssertionOutcome {
        if result.body.contains(substring) {
            AssertionOutcome::pass(assertion.clone(), preview(&result.body))
        } else {
            AssertionOutcome::fail_with_value(
                assertion.clone(),
                preview(&result.body),
                format!("Body does not contain '{substring}'"),
            )
        }
    }

    fn check_duration(assertion: &Assertion, result: &ExecutionResult, max_ms: u64) -> AssertionOutcome {
        let actual_ms = result.elapsed_ms;
        if actual_ms < max_ms {
            AssertionOutcome::pass(assertion.clone(), format!("{actual_ms}ms"))
        } else {
            AssertionOutcome::fail_with_value(
                assertion.clone(),
                format!("{actual_ms}ms"),
                format!("Response took {actual_ms}ms, expected < {max_ms}ms"),
            )
        }
    }

    fn unresolved(assertion: &Assertion, path: &str, lookup: &FieldLookup<'_>) -> AssertionOutcome {
        let detail = match lookup {
            FieldLookup::Missing { resolved, segment } if resolved.is_empty() => {
                format!("Field '{path}' not found: no '{segment}' at the top level")
            }
            FieldLookup::Missing { resolved, segment } => {
                format!("Field '{path}' not found: no '{segment}' under '{resolved}'")
            }
            FieldLookup::InvalidPath(reason) => format!("Invalid field path '{path}': {reason}"),
            FieldLookup::NotJson => format!("Cannot read field '{path}': response body is not JSON"),
            FieldLookup::Found(_) => format!("Field '{path}' found"),
        };
        AssertionOutcome::fail(assertion.clone(), detail)
    }
}

/// First [`PREVIEW_CHARS`] characters of the body.
fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_CHARS {
        let head: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use echoline_domain::HttpResponse;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    fn create_result(status: u16, body: &str, headers: HashMap<String, String>) -> ExecutionResult {
        ExecutionResult::from_response(HttpResponse::new(status, headers, body.as_bytes().to_vec()), 50)
    }

    fn json_result(body: &serde_json::Value) -> ExecutionResult {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        create_result(200, &body.to_string(), headers)
    }

    #[test]
    fn test_status_equals() {
        let evaluator = AssertionEvaluator::new();
        let result = create_result(200, "", HashMap::new());

        assert!(evaluator.evaluate_one(&Assertion::status(200), &result).passed);

        let outcome = evaluator.evaluate_one(&Assertion::status(201), &result);
        assert!(!outcome.passed);
        assert_eq!(outcome.actual.as_deref(), Some("200"));
        assert_eq!(outcome.detail, "Expected status 201, got 200");
    }

    #[test]
    fn test_header_contains() {
        let evaluator = AssertionEvaluator::new();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/html; charset=utf-8".to_string());
        let result = create_result(200, "<html></html>", headers);

        let outcome = evaluator.evaluate_one(&Assertion::header_contains("Content-Type", "text/html"), &result);
        assert!(outcome.passed);

        let outcome = evaluator.evaluate_one(&Assertion::header_contains("Content-Type", "json"), &result);
        assert!(!outcome.passed);

        let outcome = evaluator.evaluate_one(&Assertion::header_contains("X-Missing", "x"), &result);
        assert!(!outcome.passed);
        assert_eq!(outcome.detail, "Header 'X-Missing' not found");
    }

    #[test]
    fn test_field_equals_echoed_query() {
        let evaluator = AssertionEvaluator::new();
        let result = json_result(&json!({"args": {"name": "Cypress", "type": "Test"}}));

        let outcomes = evaluator.evaluate(
            &result,
            &[
                Assertion::field_equals("args.name", "Cypress"),
                Assertion::field_equals("args.type", "Test"),
                Assertion::field_equals("args", json!({"name": "Cypress", "type": "Test"})),
            ],
        );
        assert!(outcomes.iter().all(|o| o.passed));
    }

    #[test]
    fn test_field_equals_number_is_not_string() {
        let evaluator = AssertionEvaluator::new();
        let result = json_result(&json!({"json": {"id": 1}}));

        assert!(evaluator.evaluate_one(&Assertion::field_equals("json.id", 1), &result).passed);
        let outcome = evaluator.evaluate_one(&Assertion::field_equals("json.id", "1"), &result);
        assert!(!outcome.passed);
        assert_eq!(outcome.actual.as_deref(), Some("1"));
    }

    #[test]
    fn test_missing_field_fails_with_detail() {
        let evaluator = AssertionEvaluator::new();
        let result = json_result(&json!({"json": null}));

        let outcome = evaluator.evaluate_one(&Assertion::field_equals("json.username", "admin"), &result);
        assert!(!outcome.passed);
        assert_eq!(
            outcome.detail,
            "Field 'json.username' not found: no 'username' under 'json'"
        );

        let outcome = evaluator.evaluate_one(&Assertion::field_equals("args.name", "x"), &result);
        assert_eq!(
            outcome.detail,
            "Field 'args.name' not found: no 'args' at the top level"
        );
    }

    #[test]
    fn test_field_on_html_body() {
        let evaluator = AssertionEvaluator::new();
        let result = create_result(200, "<html><body>hi</body></html>", HashMap::new());

        let outcome = evaluator.evaluate_one(&Assertion::field_equals("json.id", 1), &result);
        assert!(!outcome.passed);
        assert!(outcome.detail.contains("not JSON"));
    }

    #[test]
    fn test_field_contains() {
        let evaluator = AssertionEvaluator::new();
        let result = json_result(&json!({
            "url": "https://httpbin.org/post?source=test&status=ok",
            "json": {"id": 1}
        }));

        assert!(
            evaluator
                .evaluate_one(&Assertion::field_contains("url", "source=test&status=ok"), &result)
                .passed
        );
        assert!(
            !evaluator
                .evaluate_one(&Assertion::field_contains("url", "status=fail"), &result)
                .passed
        );
        let outcome = evaluator.evaluate_one(&Assertion::field_contains("json.id", "1"), &result);
        assert!(!outcome.passed);
        assert_eq!(outcome.detail, "Field 'json.id' is not a string");
    }

    #[test]
    fn test_body_contains() {
        let evaluator = AssertionEvaluator::new();
        let result = create_result(200, "<!DOCTYPE html>\n<html>\n<body></body></html>", HashMap::new());

        assert!(evaluator.evaluate_one(&Assertion::body_contains("<html>"), &result).passed);

        let outcome = evaluator.evaluate_one(&Assertion::body_contains("<HTML>"), &result);
        assert!(!outcome.passed);
        assert_eq!(outcome.detail, "Body does not contain '<HTML>'");
    }

    #[test]
    fn test_body_preview_is_truncated() {
        let evaluator = AssertionEvaluator::new();
        let body = "é".repeat(300);
        let result = create_result(200, &body, HashMap::new());

        let outcome = evaluator.evaluate_one(&Assertion::body_contains("missing"), &result);
        let actual = outcome.actual.unwrap();
        assert_eq!(actual.chars().count(), PREVIEW_CHARS + 3);
        assert!(actual.ends_with("..."));
    }

    #[test]
    fn test_duration_below_is_strict() {
        let evaluator = AssertionEvaluator::new();
        let result = create_result(200, "", HashMap::new());

        assert!(evaluator.evaluate_one(&Assertion::duration_below(51), &result).passed);

        let outcome = evaluator.evaluate_one(&Assertion::duration_below(50), &result);
        assert!(!outcome.passed);
        assert_eq!(outcome.detail, "Response took 50ms, expected < 50ms");
    }

    #[test]
    fn test_evaluation_does_not_short_circuit() {
        let evaluator = AssertionEvaluator::new();
        let result = create_result(404, "Not Found", HashMap::new());

        let outcomes = evaluator.evaluate(
            &result,
            &[
                Assertion::status(200),
                Assertion::field_equals("json.id", 1),
                Assertion::body_contains("Not Found"),
            ],
        );
        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes.iter().map(|o| o.passed).collect::<Vec<_>>(),
            vec![false, false, true]
        );
    }
}

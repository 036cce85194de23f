//! Echoline Domain - Core contract-test types
//!
//! This crate defines the domain model for the Echoline contract-test harness.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod path;
pub mod report;
pub mod request;
pub mod response;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use path::FieldLookup;
pub use report::{CaseReport, CaseStatus, SuiteReport, SuiteSummary};
pub use request::{HttpMethod, HttpRequest};
pub use response::{ExecutionResult, HttpResponse};
pub use testing::{Assertion, AssertionOutcome, TestCase, TestSuite};

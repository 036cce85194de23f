//! Echoline Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP client, clock, cancellation)
//! - Use case orchestration (execute, evaluate, run a suite)
//! - Run settings and configuration errors

pub mod error;
pub mod ports;
pub mod settings;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult, ConfigError};
pub use ports::{CancellationReceiver, CancellationToken, Clock, HttpClient, HttpClientError};
pub use settings::{RetryPolicy, RunSettings};
pub use use_cases::{AssertionEvaluator, ExecuteCase, ExecuteCaseError, RunSuite};

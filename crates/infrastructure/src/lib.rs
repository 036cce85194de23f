//! Echoline Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, the suite loader and report output.

pub mod adapters;
pub mod report;
pub mod serialization;
pub mod suite;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use report::{render_json, render_text, write_report};
pub use serialization::{SerializationError, to_json_stable};
pub use suite::{SuiteFormat, SuiteLoader};

//! Stable JSON output for reports.
//!
//! Reports are written with 2-space indentation and a trailing newline so
//! saved runs diff cleanly against each other.

mod json;

pub use json::{SerializationError, to_json_stable};

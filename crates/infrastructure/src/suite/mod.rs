//! Test suite sources.

mod loader;

pub use loader::{SuiteFormat, SuiteLoader};

//! Application use cases (business logic orchestration).

mod evaluate;
mod execute_case;
mod run_suite;

pub use evaluate::AssertionEvaluator;
pub use execute_case::{ExecuteCase, ExecuteCaseError};
pub use run_suite::RunSuite;

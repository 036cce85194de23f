//! HTTP Response domain types

mod result;

pub use result::{ExecutionResult, HttpResponse};

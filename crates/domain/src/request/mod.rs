//! HTTP Request domain types

mod method;
mod prepared;

pub use method::HttpMethod;
pub use prepared::{build_url, HttpRequest};

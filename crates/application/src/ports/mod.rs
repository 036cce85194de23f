//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the runner and the outside world.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod cancellation;
mod clock;
mod http_client;

pub use cancellation::{CancellationReceiver, CancellationToken};
pub use clock::{elapsed_ms, Clock};
pub use http_client::{HttpClient, HttpClientError};

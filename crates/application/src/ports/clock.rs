//! Clock port for time-related operations

use chrono::{DateTime, Utc};

/// Port for getting the current time.
///
/// Request timing and report timestamps both read this clock, so tests can
/// simulate latency with a fake implementation instead of sleeping.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}

/// Milliseconds between two instants, clamped at zero.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn elapsed_ms(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    (end - start).num_milliseconds().max(0) as u64
}

//! System clock adapter

use chrono::{DateTime, TimeDelta, Utc};
use echoline_application::ports::Clock;
use tokio::time::Instant;

/// Wall-clock time that never runs backwards.
///
/// The wall time is sampled once; later readings add monotonic elapsed time
/// to it, so request durations are immune to NTP adjustments mid-run. The
/// monotonic part is tokio's, the same clock that enforces request timeouts.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    wall: DateTime<Utc>,
    anchor: Instant,
}

impl SystemClock {
    /// Creates a clock anchored at the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            wall: Utc::now(),
            anchor: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.anchor.elapsed()).unwrap_or(TimeDelta::MAX);
        self.wall.checked_add_signed(elapsed).unwrap_or(self.wall)
    }
}

//! Wall-clock display ticker

use chrono::{DateTime, Local, Timelike};
use std::time::Duration;

/// Display format of the clock line
pub const CLOCK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Tick interval of the clock
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Format a local timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn format_clock(now: &DateTime<Local>) -> String {
    now.format(CLOCK_FORMAT).to_string()
}

/// Tracks the last rendered second so the UI can poll every frame
/// and only dispatch a tick when the displayed text changes.
#[derive(Debug, Default)]
pub struct ClockTicker {
    last_second: Option<i64>,
}

impl ClockTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the tick time (truncated to the second) if the second changed since the last tick
    pub fn poll(&mut self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        let second = now.timestamp();
        if self.last_second == Some(second) {
            return None;
        }
        self.last_second = Some(second);
        Some(now.with_nanosecond(0).unwrap_or(now))
    }
}

//! Wall clock for the on-screen timestamp

use chrono::{Local, NaiveDateTime};

/// Display timestamp format
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the displayed time. Never used for tracker timing.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// Current time formatted for the overlay
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Local system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

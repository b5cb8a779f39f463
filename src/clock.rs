//! Local wall-clock time from the operating system

use chrono::{Local, NaiveDateTime};
use radmon_core::WallClock;

/// The host's local time zone clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl WallClock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

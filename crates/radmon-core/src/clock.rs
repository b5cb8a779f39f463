//! Wall-clock access

use chrono::NaiveDateTime;

/// Source of local wall-clock time.
///
/// Month boundaries and log timestamps follow local time, like the
/// timestamps a person reading the log expects.
pub trait WallClock {
    fn now(&self) -> NaiveDateTime;
}

impl<C: WallClock + ?Sized> WallClock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

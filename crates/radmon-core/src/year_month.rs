//! Calendar month keys used to name log files and detect rotation

use core::fmt;

use chrono::{Datelike, NaiveDateTime};

/// A calendar month, rendered as `YYYY-MM`.
///
/// Two timestamps belong to the same epoch exactly when their `YearMonth`
/// values are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    /// Build from a year and a 1-based month. Returns `None` for a month
    /// outside `1..=12`.
    pub const fn new(year: i32, month: u8) -> Option<Self> {
        if month >= 1 && month <= 12 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month a local wall-clock timestamp falls in.
    pub fn of(timestamp: &NaiveDateTime) -> Self {
        Self {
            year: timestamp.year(),
            // chrono guarantees 1..=12
            month: timestamp.month() as u8,
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u8 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

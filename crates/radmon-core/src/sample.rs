//! One aggregated dose-rate sample per sampling tick

use core::fmt;

use chrono::NaiveDateTime;

/// Conversion factor from CPM to µSv/h, calibrated for the tube fitted to the
/// radiation sensor board.
pub const CONV_FACTOR: f64 = 0.00812;

/// A single measurement, produced once per tick and written to the log.
///
/// Displays as the data columns of a log row: `<cpm>, <dose>` with the dose
/// rate in µSv/h to four decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Local wall-clock time the sample was taken
    pub timestamp: NaiveDateTime,
    /// Pulse rate extrapolated to one minute
    pub counts_per_minute: u32,
    /// Dose-equivalent rate in µSv/h
    pub dose_rate: f64,
}

impl Sample {
    /// Build a sample from a CPM value.
    pub fn from_cpm(timestamp: NaiveDateTime, counts_per_minute: u32, conversion_factor: f64) -> Self {
        Self {
            timestamp,
            counts_per_minute,
            dose_rate: f64::from(counts_per_minute) * conversion_factor,
        }
    }

    /// Build a sample from the raw pulses of one window.
    ///
    /// `windows_per_minute` extrapolates the window to a minute: 6 for the
    /// usual 10 second cadence.
    pub fn from_pulses(
        timestamp: NaiveDateTime,
        raw: u32,
        windows_per_minute: u32,
        conversion_factor: f64,
    ) -> Self {
        Self::from_cpm(
            timestamp,
            raw.saturating_mul(windows_per_minute),
            conversion_factor,
        )
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {:.4}", self.counts_per_minute, self.dose_rate)
    }
}

//! Monitor timing and calibration settings

use embassy_time::Duration;

use crate::sample::CONV_FACTOR;

/// Seconds between two samples unless configured otherwise.
pub const DEFAULT_PERIOD_SECS: u64 = 10;

/// Seconds to wait after a month rollover before opening the next epoch.
pub const DEFAULT_SETTLE_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorConfig {
    /// Delay between the end of one tick and the start of the next
    pub period: Duration,
    /// Pause between the rotation notice and the next epoch
    pub settle_delay: Duration,
    /// CPM to µSv/h factor
    pub conversion_factor: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(DEFAULT_PERIOD_SECS),
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_SECS),
            conversion_factor: CONV_FACTOR,
        }
    }
}

impl MonitorConfig {
    /// Settings with a custom sampling period.
    ///
    /// The period must be a whole number of seconds that divides a minute,
    /// so the pulse count of one window extrapolates to an integer CPM.
    pub fn with_period_secs(period_secs: u64, settle_secs: u64) -> Option<Self> {
        if period_secs == 0 || 60 % period_secs != 0 {
            return None;
        }
        Some(Self {
            period: Duration::from_secs(period_secs),
            settle_delay: Duration::from_secs(settle_secs),
            ..Self::default()
        })
    }

    /// How many sampling windows fit in one minute.
    pub fn windows_per_minute(&self) -> u32 {
        (60 / self.period.as_secs().max(1)) as u32
    }
}

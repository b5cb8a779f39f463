//! Month-based log rotation
//!
//! The [`RotationManager`] is a small state machine:
//!
//! ```text
//! Initial ──begin──▶ Active(base) ──observe, same month──▶ Active(base)
//!                        │
//!                        └─observe, month changed──▶ Rotating{from, to} ──begin──▶ Active(to)
//! ```
//!
//! `Rotating` is where an epoch ends. The [`Monitor`] then re-enters the
//! initial state within the same process instead of restarting it.

use chrono::NaiveDateTime;
use embedded_hal_async::delay::DelayNs;
use log::{info, warn};

use crate::clock::WallClock;
use crate::error::MonitorError;
use crate::log_file::{LogFileName, UnitName};
use crate::scheduler::SamplingScheduler;
use crate::stats::EpochStats;
use crate::store::LogStore;
use crate::year_month::YearMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationState {
    /// No epoch has started yet
    Initial,
    /// Sampling into the file of `base`
    Active(YearMonth),
    /// The month moved on; the epoch of `from` is closed
    Rotating { from: YearMonth, to: YearMonth },
}

/// Result of checking the clock against the active epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same month, keep sampling
    Stay,
    /// Month changed since the epoch began
    Rotate { from: YearMonth, to: YearMonth },
    /// No active epoch to check against
    Inactive,
}

#[derive(Debug)]
pub struct RotationManager {
    state: RotationState,
}

impl Default for RotationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationManager {
    pub const fn new() -> Self {
        Self {
            state: RotationState::Initial,
        }
    }

    pub const fn state(&self) -> RotationState {
        self.state
    }

    /// Start an epoch for the month `now` falls in and return it.
    pub fn begin(&mut self, now: &NaiveDateTime) -> YearMonth {
        let base = YearMonth::of(now);
        self.state = RotationState::Active(base);
        base
    }

    /// Compare the month of `now` with the active epoch.
    ///
    /// Reports [`Transition::Rotate`] once per month change: the manager
    /// leaves `Active` and further calls return [`Transition::Inactive`]
    /// until [`begin`](Self::begin) is called again.
    pub fn observe(&mut self, now: &NaiveDateTime) -> Transition {
        let RotationState::Active(base) = self.state else {
            return Transition::Inactive;
        };

        let current = YearMonth::of(now);
        if current == base {
            return Transition::Stay;
        }

        self.state = RotationState::Rotating {
            from: base,
            to: current,
        };
        Transition::Rotate {
            from: base,
            to: current,
        }
    }
}

/// The whole monitor: epochs of sampling separated by log rotations.
pub struct Monitor<'a, S, C, D> {
    unit: UnitName,
    rotation: RotationManager,
    scheduler: SamplingScheduler<'a, S, C, D>,
}

impl<'a, S, C, D> Monitor<'a, S, C, D>
where
    S: LogStore,
    C: WallClock,
    D: DelayNs,
{
    pub fn new(unit: UnitName, scheduler: SamplingScheduler<'a, S, C, D>) -> Self {
        Self {
            unit,
            rotation: RotationManager::new(),
            scheduler,
        }
    }

    /// Enter `Active` for the current month and run the file-check.
    ///
    /// An unusable file name is fatal. A failing file-check is not: the
    /// writer retries it before every sample.
    pub fn start_epoch(&mut self) -> Result<LogFileName, MonitorError> {
        let base = self.rotation.begin(&self.scheduler.now());
        info!("BaseYearMonth: {}", base);

        let file = LogFileName::new(&self.unit, base)?;
        if let Err(e) = self.scheduler.writer_mut().open(file.clone()) {
            warn!("{}; retrying before the next sample", e);
        }

        info!("Measurement started for unit {}", self.unit);
        Ok(file)
    }

    /// Run one epoch from file-check to the end of the settle delay.
    pub async fn run_epoch(&mut self) -> Result<EpochStats, MonitorError> {
        self.start_epoch()?;

        let (from, to, stats) = self.scheduler.run_epoch(&mut self.rotation).await;
        info!("A month has passed ({} -> {}): it's time for a new file", from, to);
        info!("Epoch {} summary: {}", from, stats);

        let settle = self.scheduler.config().settle_delay;
        info!("Starting the next epoch in {} s", settle.as_secs());
        self.scheduler.sleep(settle).await;

        Ok(stats)
    }

    /// Run epochs forever. Only returns on a fatal error.
    pub async fn run(&mut self) -> MonitorError {
        loop {
            if let Err(e) = self.run_epoch().await {
                return e;
            }
        }
    }

    pub fn rotation(&self) -> &RotationManager {
        &self.rotation
    }

    pub fn scheduler(&self) -> &SamplingScheduler<'a, S, C, D> {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::log_file::LOG_HEADER;
    use crate::pulse::PulseCounter;
    use crate::testing::{InstantDelay, ManualClock, MemoryLogStore, at};
    use crate::writer::LogWriter;
    use embassy_futures::block_on;

    fn month(year: i32, month: u8) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let mut rotation = RotationManager::new();
        assert_eq!(rotation.state(), RotationState::Initial);
        assert_eq!(
            rotation.observe(&at(2026, 1, 1, 0, 0, 0)),
            Transition::Inactive
        );
    }

    #[test]
    fn test_stays_active_within_month() {
        let mut rotation = RotationManager::new();
        let base = rotation.begin(&at(2026, 3, 1, 0, 0, 0));
        assert_eq!(base, month(2026, 3));

        for day in 1..=31 {
            assert_eq!(
                rotation.observe(&at(2026, 3, day, 23, 59, 59)),
                Transition::Stay
            );
        }
        assert_eq!(rotation.state(), RotationState::Active(month(2026, 3)));
    }

    #[test]
    fn test_rotates_exactly_once_per_month_change() {
        let mut rotation = RotationManager::new();
        rotation.begin(&at(2026, 12, 31, 23, 59, 50));

        let expected = Transition::Rotate {
            from: month(2026, 12),
            to: month(2027, 1),
        };
        assert_eq!(rotation.observe(&at(2027, 1, 1, 0, 0, 0)), expected);
        assert_eq!(
            rotation.state(),
            RotationState::Rotating {
                from: month(2026, 12),
                to: month(2027, 1)
            }
        );
        assert_eq!(
            rotation.observe(&at(2027, 1, 1, 0, 0, 10)),
            Transition::Inactive
        );

        assert_eq!(rotation.begin(&at(2027, 1, 1, 0, 0, 10)), month(2027, 1));
        assert_eq!(rotation.observe(&at(2027, 1, 1, 0, 0, 20)), Transition::Stay);
    }

    #[test]
    fn test_clock_going_backwards_also_rotates() {
        let mut rotation = RotationManager::new();
        rotation.begin(&at(2026, 5, 1, 0, 0, 5));
        assert_eq!(
            rotation.observe(&at(2026, 4, 30, 23, 59, 59)),
            Transition::Rotate {
                from: month(2026, 5),
                to: month(2026, 4)
            }
        );
    }

    #[test]
    fn test_epochs_rotate_files_without_losing_pulses() {
        let counter = PulseCounter::new();
        let clock = ManualClock::new(at(2026, 1, 31, 23, 59, 40));
        let scheduler = SamplingScheduler::new(
            &counter,
            LogWriter::new(MemoryLogStore::default()),
            &clock,
            InstantDelay::new(&clock).with_pulses(&counter, 2),
            MonitorConfig::default(),
        );
        let mut monitor = Monitor::new(UnitName::new("station1").unwrap(), scheduler);

        let january = block_on(monitor.run_epoch()).unwrap();
        assert_eq!(january.samples, 2);
        assert_eq!(january.total_pulses, 2);
        assert_eq!(clock.now(), at(2026, 2, 1, 0, 0, 10), "Settle delay elapsed");

        // Second epoch: the first sample carries the pulses from the last
        // January window and the settle delay.
        let file = monitor.start_epoch().unwrap();
        assert_eq!(file.as_str(), "station1_log_2026-02.txt");
        monitor.scheduler.sample_once();

        let store = monitor.scheduler().writer().store();
        assert_eq!(
            store.file_names(),
            ["station1_log_2026-01.txt", "station1_log_2026-02.txt"]
        );
        assert_eq!(
            store.lines("station1_log_2026-01.txt"),
            [
                LOG_HEADER,
                "2026-01-31 23:59:40, 0, 0.0000",
                "2026-01-31 23:59:50, 12, 0.0974",
            ]
        );
        assert_eq!(
            store.lines("station1_log_2026-02.txt"),
            [LOG_HEADER, "2026-02-01 00:00:10, 24, 0.1949"]
        );
        assert_eq!(monitor.rotation().state(), RotationState::Active(month(2026, 2)));
    }

    #[test]
    fn test_oversized_file_name_is_fatal_before_any_write() {
        let counter = PulseCounter::new();
        let clock = ManualClock::new(at(2026, 10, 19, 12, 0, 0));
        let scheduler = SamplingScheduler::new(
            &counter,
            LogWriter::new(MemoryLogStore::default()),
            &clock,
            InstantDelay::new(&clock),
            MonitorConfig::default(),
        );
        let long_name: alloc::string::String = core::iter::repeat('x').take(120).collect();
        let mut monitor = Monitor::new(UnitName::new(&long_name).unwrap(), scheduler);

        let err = block_on(monitor.run());

        assert!(matches!(
            err,
            MonitorError::Name(crate::error::NameError::FileNameTooLong { .. })
        ));
        assert!(monitor.scheduler().writer().store().file_names().is_empty());
        assert!(monitor.scheduler().delay().sleeps.is_empty());
    }
}

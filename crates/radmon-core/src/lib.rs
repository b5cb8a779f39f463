//! Hardware-independent core library for radmon
//!
//! This crate contains all platform-agnostic logic of the Geiger counter dose
//! monitor: pulse accounting, the fixed-cadence sampling loop, month-based log
//! rotation and the log line format.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the monitor daemon and tests).
//! Wall-clock time, sleeping, pulse pins and log storage are reached through
//! traits, so each platform plugs in its own implementations.

#![no_std]

extern crate alloc;

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod log_file;
pub mod pulse;
pub mod rotation;
pub mod sample;
pub mod scheduler;
pub mod stats;
pub mod store;
pub mod writer;
pub mod year_month;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::WallClock;
pub use config::MonitorConfig;
pub use error::{MonitorError, NameError, PulseError, WriteError};
pub use events::{
    EVENT_CHANNEL_CAPACITY, EVENT_PUBLISHERS, EVENT_SUBSCRIBERS, EventChannel, EventPublisher,
    EventSubscriber, MonitorEvent,
};
pub use log_file::{LOG_HEADER, LogFileName, MAX_FILE_NAME_LEN, UnitName};
pub use pulse::{PulseCounter, PulseInput};
pub use rotation::{Monitor, RotationManager, RotationState, Transition};
pub use sample::{CONV_FACTOR, Sample};
pub use scheduler::{SamplingScheduler, TickOutcome};
pub use stats::EpochStats;
pub use store::LogStore;
pub use writer::{LogWriter, TimestampGuard};
pub use year_month::YearMonth;

//! Monitor events published to interested tasks

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};

use crate::sample::Sample;
use crate::stats::EpochStats;
use crate::year_month::YearMonth;

/// Channel capacity for monitor events.
/// Publishing is immediate: when a subscriber lags, its oldest events are dropped
/// rather than stalling the sampling loop.
pub const EVENT_CHANNEL_CAPACITY: usize = 8;

/// Number of subscribers that can listen to monitor events
pub const EVENT_SUBSCRIBERS: usize = 2;

/// Number of publishers (just the monitor)
pub const EVENT_PUBLISHERS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorEvent {
    /// A sample was taken (whether or not it reached the log file)
    Sample(Sample),
    /// An epoch ended because the calendar month changed
    EpochEnded { month: YearMonth, stats: EpochStats },
}

pub type EventChannel = PubSubChannel<
    CriticalSectionRawMutex,
    MonitorEvent,
    EVENT_CHANNEL_CAPACITY,
    EVENT_SUBSCRIBERS,
    EVENT_PUBLISHERS,
>;

pub type EventPublisher<'a> = Publisher<
    'a,
    CriticalSectionRawMutex,
    MonitorEvent,
    EVENT_CHANNEL_CAPACITY,
    EVENT_SUBSCRIBERS,
    EVENT_PUBLISHERS,
>;

pub type EventSubscriber<'a> = Subscriber<
    'a,
    CriticalSectionRawMutex,
    MonitorEvent,
    EVENT_CHANNEL_CAPACITY,
    EVENT_SUBSCRIBERS,
    EVENT_PUBLISHERS,
>;

//! Running totals since process start, fed by monitor events

use core::convert::Infallible;

use embassy_sync::pubsub::WaitResult;
use log::{debug, info, warn};
use radmon_core::{EventSubscriber, MonitorEvent};

/// Totals across all epochs since startup.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunningTotals {
    pub samples: u64,
    pub epochs_closed: u32,
    pub peak_cpm: u32,
}

impl RunningTotals {
    pub fn apply(&mut self, event: &MonitorEvent) {
        match event {
            MonitorEvent::Sample(sample) => {
                self.samples += 1;
                self.peak_cpm = self.peak_cpm.max(sample.counts_per_minute);
            }
            MonitorEvent::EpochEnded { .. } => self.epochs_closed += 1,
        }
    }
}

/// Follow monitor events and report totals whenever an epoch closes.
pub async fn report(mut subscriber: EventSubscriber<'_>) -> Infallible {
    let mut totals = RunningTotals::default();
    loop {
        match subscriber.next_message().await {
            WaitResult::Lagged(missed) => warn!("Status reporter missed {} events", missed),
            WaitResult::Message(event) => {
                totals.apply(&event);
                match event {
                    MonitorEvent::Sample(_) => debug!("Totals: {:?}", totals),
                    MonitorEvent::EpochEnded { month, .. } => info!(
                        "Closed {}; since startup: {} epochs, {} samples, peak CPM {}",
                        month, totals.epochs_closed, totals.samples, totals.peak_cpm
                    ),
                }
            }
        }
    }
}

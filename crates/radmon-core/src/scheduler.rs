//! Fixed-cadence sampling loop

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use log::{debug, warn};

use chrono::NaiveDateTime;

use crate::clock::WallClock;
use crate::config::MonitorConfig;
use crate::events::{EventPublisher, MonitorEvent};
use crate::pulse::PulseCounter;
use crate::rotation::{RotationManager, Transition};
use crate::sample::Sample;
use crate::stats::EpochStats;
use crate::store::LogStore;
use crate::writer::LogWriter;
use crate::year_month::YearMonth;

/// What the month check after a tick decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still in the epoch's month, keep sampling
    Continue,
    /// The month changed: the epoch for `from` is over
    EpochEnded { from: YearMonth, to: YearMonth },
}

/// Takes the pulse count every period and turns it into a logged sample.
///
/// Each tick reads the clock once, then:
/// 1. asks the [`RotationManager`] whether that instant is in a new month,
///    and if so ends the epoch without sampling,
/// 2. takes (reads and resets) the pulse count in one atomic step,
/// 3. derives CPM and dose rate for the same instant,
/// 4. hands the sample to the [`LogWriter`] and publishes it,
/// 5. sleeps for the full period (fixed delay, processing time is not subtracted).
///
/// A sample is therefore always written to the file of the month it is
/// stamped with; pulses of a window that crosses the boundary stay pending
/// for the next epoch.
///
/// Log write failures are reported and the sample is skipped; nothing in a
/// tick can stop the cadence.
pub struct SamplingScheduler<'a, S, C, D> {
    counter: &'a PulseCounter,
    writer: LogWriter<S>,
    clock: C,
    delay: D,
    config: MonitorConfig,
    events: Option<EventPublisher<'a>>,
    stats: EpochStats,
}

impl<'a, S, C, D> SamplingScheduler<'a, S, C, D>
where
    S: LogStore,
    C: WallClock,
    D: DelayNs,
{
    pub fn new(
        counter: &'a PulseCounter,
        writer: LogWriter<S>,
        clock: C,
        delay: D,
        config: MonitorConfig,
    ) -> Self {
        Self {
            counter,
            writer,
            clock,
            delay,
            config,
            events: None,
            stats: EpochStats::new(),
        }
    }

    /// Publish every sample and epoch end on `publisher`.
    pub fn with_events(mut self, publisher: EventPublisher<'a>) -> Self {
        self.events = Some(publisher);
        self
    }

    /// Take the pending pulses and log them as one sample.
    pub fn sample_once(&mut self) -> Sample {
        let now = self.clock.now();
        self.sample_at(now)
    }

    /// Take the pending pulses and log them as one sample stamped `now`.
    pub fn sample_at(&mut self, now: NaiveDateTime) -> Sample {
        let raw = self.counter.take();
        let sample = Sample::from_pulses(
            now,
            raw,
            self.config.windows_per_minute(),
            self.config.conversion_factor,
        );
        debug!("Took {} pulses", raw);

        self.stats.update(raw, &sample);
        if let Err(e) = self.writer.write_sample(&sample) {
            warn!("Sample skipped: {}", e);
        }
        self.publish(MonitorEvent::Sample(sample));

        sample
    }

    /// One full tick: check the month, sample, sleep one period.
    pub async fn tick(&mut self, rotation: &mut RotationManager) -> TickOutcome {
        let now = self.clock.now();
        if let Transition::Rotate { from, to } = rotation.observe(&now) {
            return TickOutcome::EpochEnded { from, to };
        }

        self.sample_at(now);
        self.sleep(self.config.period).await;
        TickOutcome::Continue
    }

    /// Tick until the month changes. Returns the months on either side of
    /// the rollover and the finished epoch's statistics.
    pub async fn run_epoch(
        &mut self,
        rotation: &mut RotationManager,
    ) -> (YearMonth, YearMonth, EpochStats) {
        self.stats = EpochStats::new();
        loop {
            if let TickOutcome::EpochEnded { from, to } = self.tick(rotation).await {
                let stats = self.stats;
                self.publish(MonitorEvent::EpochEnded { month: from, stats });
                return (from, to, stats);
            }
        }
    }

    pub(crate) async fn sleep(&mut self, duration: Duration) {
        let ms = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        self.delay.delay_ms(ms).await;
    }

    fn publish(&self, event: MonitorEvent) {
        if let Some(events) = &self.events {
            events.publish_immediate(event);
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn writer(&self) -> &LogWriter<S> {
        &self.writer
    }

    pub(crate) fn writer_mut(&mut self) -> &mut LogWriter<S> {
        &mut self.writer
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }
}

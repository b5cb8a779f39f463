//! Test doubles for the platform traits

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use embedded_hal::digital::{ErrorKind, ErrorType};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

use crate::clock::WallClock;
use crate::pulse::PulseCounter;
use crate::store::LogStore;

pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, min, sec)
        .unwrap()
}

/// Clock that only moves when told to, or by a fixed step on every read.
pub struct ManualClock {
    now: Cell<NaiveDateTime>,
    step: TimeDelta,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(start),
            step: TimeDelta::zero(),
        }
    }

    /// Move forward by `step` after each read.
    pub fn with_step(mut self, step: TimeDelta) -> Self {
        self.step = step;
        self
    }

    pub fn advance_ns(&self, ns: u64) {
        self.now
            .set(self.now.get() + TimeDelta::nanoseconds(ns as i64));
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

/// Delay that returns immediately, moving the clock forward by the requested
/// time and optionally delivering pulses "during" the sleep.
pub struct InstantDelay<'a> {
    clock: &'a ManualClock,
    pulses: Option<(&'a PulseCounter, u32)>,
    pub sleeps: Vec<u64>,
}

impl<'a> InstantDelay<'a> {
    pub fn new(clock: &'a ManualClock) -> Self {
        Self {
            clock,
            pulses: None,
            sleeps: Vec::new(),
        }
    }

    pub fn with_pulses(mut self, counter: &'a PulseCounter, per_sleep: u32) -> Self {
        self.pulses = Some((counter, per_sleep));
        self
    }

    fn sleep(&mut self, ns: u64) {
        self.clock.advance_ns(ns);
        self.sleeps.push(ns);
        if let Some((counter, per_sleep)) = self.pulses {
            for _ in 0..per_sleep {
                counter.record();
            }
        }
    }
}

impl DelayNs for InstantDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.sleep(u64::from(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.sleep(u64::from(us) * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.sleep(u64::from(ms) * 1_000_000);
    }
}

/// In-memory log files.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    files: BTreeMap<String, String>,
    failing_ensures: usize,
    failing_appends: usize,
}

impl MemoryLogStore {
    pub fn insert(&mut self, name: &str, contents: &str) {
        self.files.insert(String::from(name), String::from(contents));
    }

    pub fn lines(&self, name: &str) -> Vec<&str> {
        self.files
            .get(name)
            .map(|c| c.lines().collect())
            .unwrap_or_default()
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }

    pub fn fail_next_ensures(&mut self, n: usize) {
        self.failing_ensures = n;
    }

    pub fn fail_next_appends(&mut self, n: usize) {
        self.failing_appends = n;
    }
}

impl LogStore for MemoryLogStore {
    type Error = &'static str;

    fn ensure_file(&mut self, name: &str, header: &str) -> Result<bool, Self::Error> {
        if self.failing_ensures > 0 {
            self.failing_ensures -= 1;
            return Err("disk unavailable");
        }
        let contents = self.files.entry(String::from(name)).or_default();
        if !contents.is_empty() {
            return Ok(false);
        }
        contents.push_str(header);
        contents.push('\n');
        Ok(true)
    }

    fn append_line(&mut self, name: &str, line: &str) -> Result<(), Self::Error> {
        if self.failing_appends > 0 {
            self.failing_appends -= 1;
            return Err("disk unavailable");
        }
        let contents = self.files.get_mut(name).ok_or("no such file")?;
        contents.push_str(line);
        contents.push('\n');
        Ok(())
    }
}

/// Pin that produces a fixed number of falling edges, then fails.
pub struct ScriptedPin {
    edges_left: usize,
}

impl ScriptedPin {
    pub fn new(edges: usize) -> Self {
        Self { edges_left: edges }
    }

    fn edge(&mut self) -> Result<(), ErrorKind> {
        if self.edges_left == 0 {
            return Err(ErrorKind::Other);
        }
        self.edges_left -= 1;
        Ok(())
    }
}

impl ErrorType for ScriptedPin {
    type Error = ErrorKind;
}

impl Wait for ScriptedPin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }
}

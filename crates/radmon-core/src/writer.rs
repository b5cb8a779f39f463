//! Log writer: file-check and per-sample appends to the active log file

use alloc::format;
use alloc::string::String;
use core::fmt::Write;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use log::{debug, info, warn};

use crate::error::WriteError;
use crate::log_file::{LOG_HEADER, LogFileName};
use crate::sample::Sample;
use crate::store::LogStore;

/// A `YYYY-MM-DD HH:MM:SS` timestamp.
pub type Timestamp = heapless::String<32>;

/// Emits a timestamp at most once per wall-clock second.
///
/// A second request within the same second yields `None`, so a row written
/// twice in one second does not repeat the prefix.
#[derive(Debug, Default)]
pub struct TimestampGuard {
    last_second: Option<(NaiveDate, u32)>,
}

impl TimestampGuard {
    pub const fn new() -> Self {
        Self { last_second: None }
    }

    pub fn stamp(&mut self, now: &NaiveDateTime) -> Option<Timestamp> {
        let second = (now.date(), now.num_seconds_from_midnight());
        if self.last_second == Some(second) {
            return None;
        }
        self.last_second = Some(second);

        let mut out = Timestamp::new();
        write!(
            out,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            now.year(),
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second()
        )
        .ok()?;
        Some(out)
    }
}

/// Writes samples to the log file of the current epoch.
///
/// The file-check runs once per epoch through [`open`](Self::open). If it
/// fails, it is retried before each sample until it succeeds; samples are
/// never appended to a file whose header has not been confirmed.
pub struct LogWriter<S> {
    store: S,
    file: Option<LogFileName>,
    ready: bool,
    stamps: TimestampGuard,
}

impl<S: LogStore> LogWriter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            file: None,
            ready: false,
            stamps: TimestampGuard::new(),
        }
    }

    /// Switch to `file` and run the file-check on it.
    ///
    /// An error here is transient: the writer keeps `file` as its target and
    /// retries the check on the next sample.
    pub fn open(&mut self, file: LogFileName) -> Result<(), WriteError> {
        info!("Log file name is: {}", file);
        self.file = Some(file);
        self.ready = false;
        self.prepare()
    }

    fn prepare(&mut self) -> Result<(), WriteError> {
        let Some(file) = self.file.as_ref() else {
            return Err(WriteError::NoActiveFile);
        };

        match self.store.ensure_file(file.as_str(), LOG_HEADER) {
            Ok(true) => {
                info!("Log file {} created, header written", file);
                self.ready = true;
                Ok(())
            }
            Ok(false) => {
                debug!("Log file {} already present", file);
                self.ready = true;
                Ok(())
            }
            Err(e) => {
                warn!("Log file {} could not be accessed: {:?}", file, e);
                Err(WriteError::Prepare {
                    file: String::from(file.as_str()),
                    details: format!("{:?}", e),
                })
            }
        }
    }

    /// Mirror `sample` to the console and append it to the active log file.
    pub fn write_sample(&mut self, sample: &Sample) -> Result<(), WriteError> {
        let stamp = self.stamps.stamp(&sample.timestamp);
        let row = match &stamp {
            Some(ts) => format!("{}, {}", ts, sample),
            None => format!("{}", sample),
        };

        match &stamp {
            Some(ts) => info!(
                "{}, CPM={}, {:.4} uSv/h",
                ts, sample.counts_per_minute, sample.dose_rate
            ),
            None => info!(
                "CPM={}, {:.4} uSv/h",
                sample.counts_per_minute, sample.dose_rate
            ),
        }

        if !self.ready {
            self.prepare()?;
        }
        let Some(file) = self.file.as_ref() else {
            return Err(WriteError::NoActiveFile);
        };

        self.store.append_line(file.as_str(), &row).map_err(|e| {
            warn!("Sample not written to {}: {:?}", file, e);
            WriteError::Append {
                file: String::from(file.as_str()),
                details: format!("{:?}", e),
            }
        })
    }

    /// Whether the file-check of the current file has succeeded.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

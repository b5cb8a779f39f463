//! Fatal errors of the monitor process

use radmon_core::{MonitorError, NameError, PulseError};
use thiserror_no_std::Error;

/// Process exit code for every fatal error.
pub const EXIT_FATAL: u8 = 1;

/// Errors that stop the process.
///
/// All of them are configuration problems detected at startup, a fatal
/// error bubbling up from the monitor, or a dead pulse input. Transient log
/// I/O and failed uploads never end up here.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config file \"{path}\" could not be accessed: {details}")]
    ConfigUnreadable { path: String, details: String },
    #[error("Bad unit name in \"{path}\": {source_error}")]
    UnitName { path: String, source_error: NameError },
    #[error("{0}")]
    LogFileName(NameError),
    #[error("Log directory \"{path}\" is not a directory")]
    LogDir { path: String },
    #[error("Sampling interval of {0} s does not divide a minute evenly")]
    InvalidInterval(u64),
    #[error("Settle delay of {secs} s is longer than the allowed {max} s")]
    InvalidSettle { secs: u64, max: u64 },
    #[error("Simulated tube rate must be 0 or between {min} and {max} CPM, got {rate}")]
    InvalidRate { rate: f64, min: f64, max: f64 },
    #[error("Server config file \"{path}\" could not be accessed: {details}")]
    ServerConfigUnreadable { path: String, details: String },
    #[error("Server config file \"{path}\" was missing; a template was written. Please edit it with the correct information")]
    ServerConfigCreated { path: String },
    #[error("{0}")]
    Monitor(MonitorError),
    #[error("{0}; readings would no longer be real")]
    Pulse(PulseError),
}

impl AppError {
    pub const fn exit_code(&self) -> u8 {
        EXIT_FATAL
    }
}

impl From<MonitorError> for AppError {
    fn from(value: MonitorError) -> Self {
        Self::Monitor(value)
    }
}

impl From<PulseError> for AppError {
    fn from(value: PulseError) -> Self {
        Self::Pulse(value)
    }
}

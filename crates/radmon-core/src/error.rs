//! Error types for the monitor core

use alloc::string::String;
use thiserror_no_std::Error;

/// Why a unit name or the log file name derived from it was rejected.
///
/// Every variant is a configuration mistake; the monitor cannot start with it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("The unit name is empty")]
    EmptyUnitName,
    #[error("The unit name '{name}' contains a path separator or NUL character")]
    InvalidUnitName { name: String },
    #[error("The unit name '{name}' is too long ({len} bytes, the limit is {max})")]
    UnitNameTooLong { name: String, len: usize, max: usize },
    #[error(
        "The final size of the log file name is too long ({len} bytes, the limit is {max}). Try using a shorter unit name"
    )]
    FileNameTooLong { len: usize, max: usize },
}

/// The pulse input pin reported an error while waiting for an edge.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseError {
    #[error("Pulse input pin error")]
    Pin,
}

/// A log store operation failed. Never fatal: the sample is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    #[error("No log file has been opened")]
    NoActiveFile,
    #[error("Could not prepare log file {file}: {details}")]
    Prepare { file: String, details: String },
    #[error("Could not append to log file {file}: {details}")]
    Append { file: String, details: String },
}

/// Errors that stop the monitor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    #[error("Invalid log file name: {0}")]
    Name(NameError),
}

impl From<NameError> for MonitorError {
    fn from(value: NameError) -> Self {
        Self::Name(value)
    }
}

//! Unit names and the monthly log file names derived from them

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

use crate::error::NameError;
use crate::year_month::YearMonth;

/// First line of every log file.
pub const LOG_HEADER: &str = "Time, CPM, Activity (uSv/h)";

/// Longest accepted log file name in bytes.
///
/// Matches a 128-byte name buffer with room for its terminator.
pub const MAX_FILE_NAME_LEN: usize = 127;

/// Identifier of the measurement unit, used as the log file name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitName(String);

impl UnitName {
    /// Parse a unit name from config file contents.
    ///
    /// Only the first line is used, verbatim, without its line terminator.
    pub fn parse(contents: &str) -> Result<Self, NameError> {
        let line = contents.split('\n').next().unwrap_or_default();
        let line = line.strip_suffix('\r').unwrap_or(line);
        Self::new(line)
    }

    /// Validate a unit name.
    pub fn new(name: &str) -> Result<Self, NameError> {
        if name.is_empty() {
            return Err(NameError::EmptyUnitName);
        }
        if name.contains(['/', '\\', '\0']) {
            return Err(NameError::InvalidUnitName {
                name: name.to_string(),
            });
        }
        if name.len() > MAX_FILE_NAME_LEN {
            return Err(NameError::UnitNameTooLong {
                name: name.to_string(),
                len: name.len(),
                max: MAX_FILE_NAME_LEN,
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of the log file for one unit and one calendar month:
/// `<unit>_log_<YYYY-MM>.txt`.
///
/// A pure function of its inputs, so recomputing it within a month always
/// yields the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileName {
    name: String,
}

impl LogFileName {
    pub fn new(unit: &UnitName, month: YearMonth) -> Result<Self, NameError> {
        let name = format!("{}_log_{}.txt", unit, month);
        if name.len() > MAX_FILE_NAME_LEN {
            return Err(NameError::FileNameTooLong {
                len: name.len(),
                max: MAX_FILE_NAME_LEN,
            });
        }
        Ok(Self { name })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for LogFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

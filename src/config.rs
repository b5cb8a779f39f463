//! Unit name configuration file
//!
//! `radmon.cfg` holds a single line: the unit name used as the log file
//! prefix. Anything after the first newline is ignored.

use std::fs;
use std::path::Path;

use log::info;
use radmon_core::UnitName;

use crate::error::AppError;

/// Config file looked up in the working directory by default.
pub const DEFAULT_CONFIG_FILE: &str = "radmon.cfg";

/// Read and validate the unit name from `path`.
pub fn load_unit_name(path: &Path) -> Result<UnitName, AppError> {
    let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigUnreadable {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;

    let unit = UnitName::parse(&contents).map_err(|e| AppError::UnitName {
        path: path.display().to_string(),
        source_error: e,
    })?;

    info!("Unit name is set to: {}", unit);
    Ok(unit)
}

//! Command line options

use std::path::PathBuf;

use clap::Parser;
use radmon_core::MonitorConfig;
use radmon_core::config::{DEFAULT_PERIOD_SECS, DEFAULT_SETTLE_SECS};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::error::AppError;
use crate::upload::{DEFAULT_SERVER_CONFIG_FILE, DEFAULT_UPLOAD_PERIOD_SECS};

/// Longest accepted settle delay after a month rollover: one day.
pub const MAX_SETTLE_SECS: u64 = 86_400;

/// Slowest non-silent simulated tube; rarer pulses would need gaps beyond
/// what the timer can represent.
pub const MIN_SIMULATED_CPM: f64 = 0.001;

/// Fastest simulated tube, far above any background a real tube would see.
pub const MAX_SIMULATED_CPM: f64 = 1_000_000.0;

/// Geiger counter dose-rate monitor.
///
/// Counts tube pulses, logs CPM and µSv/h every interval, and starts a new
/// log file every calendar month.
#[derive(Parser, Debug, Clone)]
#[command(name = "radmon", version, about)]
pub struct Cli {
    /// File holding the unit name on its first line
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory the monthly log files are written to
    #[arg(long, default_value = ".")]
    pub log_dir: PathBuf,

    /// Seconds per sample; must divide 60
    #[arg(long, default_value_t = DEFAULT_PERIOD_SECS)]
    pub interval_secs: u64,

    /// Seconds to wait after a month rollover before the next log file is opened
    #[arg(long, default_value_t = DEFAULT_SETTLE_SECS)]
    pub settle_secs: u64,

    /// Mean counts per minute produced by the simulated tube
    #[arg(long, default_value_t = 20.0)]
    pub simulated_cpm: f64,

    /// Seed for the simulated tube, for reproducible pulse trains
    #[arg(long)]
    pub seed: Option<u64>,

    /// Upload the current log file to the FTP server from the server config
    #[arg(long)]
    pub upload: bool,

    /// Server config file with a [RADIATION_SERVER] section (IP, Username, Password)
    #[arg(long, default_value = DEFAULT_SERVER_CONFIG_FILE)]
    pub server_config: PathBuf,

    /// Seconds between two uploads
    #[arg(long, default_value_t = DEFAULT_UPLOAD_PERIOD_SECS, value_parser = clap::value_parser!(u64).range(1..=86_400))]
    pub upload_interval_secs: u64,
}

impl Cli {
    pub fn monitor_config(&self) -> Result<MonitorConfig, AppError> {
        MonitorConfig::with_period_secs(self.interval_secs, self.settle_secs)
            .ok_or(AppError::InvalidInterval(self.interval_secs))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let rate = self.simulated_cpm;
        if rate != 0.0 && !(MIN_SIMULATED_CPM..=MAX_SIMULATED_CPM).contains(&rate) {
            return Err(AppError::InvalidRate {
                rate,
                min: MIN_SIMULATED_CPM,
                max: MAX_SIMULATED_CPM,
            });
        }
        if self.settle_secs > MAX_SETTLE_SECS {
            return Err(AppError::InvalidSettle {
                secs: self.settle_secs,
                max: MAX_SETTLE_SECS,
            });
        }
        if !self.log_dir.is_dir() {
            return Err(AppError::LogDir {
                path: self.log_dir.display().to_string(),
            });
        }
        Ok(())
    }
}

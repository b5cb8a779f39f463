//! Host side of the radmon dose monitor
//!
//! Everything the monitor needs on a desktop or single-board Linux host:
//! the command line, the unit-name config file, local wall-clock time, log
//! files on the filesystem, a simulated Geiger tube to drive the pulse
//! input, and the optional FTP upload of the current log. The measurement
//! engine itself lives in `radmon-core`.

pub mod cli;
pub mod clock;
pub mod config;
pub mod daemon;
pub mod error;
pub mod fs_store;
pub mod simulated_tube;
pub mod status;
pub mod upload;

pub use error::AppError;

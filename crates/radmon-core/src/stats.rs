//! Per-epoch summary statistics

use core::fmt;

use crate::sample::Sample;

/// Running summary of one epoch's samples.
///
/// Updated on every tick and reported when the epoch ends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpochStats {
    /// Number of samples taken
    pub samples: u32,
    /// Raw pulses counted over all samples
    pub total_pulses: u64,
    /// Sum of CPM values, for the mean
    pub cpm_sum: u64,
    /// Lowest CPM seen (`None` before the first sample)
    pub min_cpm: Option<u32>,
    /// Highest CPM seen
    pub max_cpm: u32,
}

impl EpochStats {
    pub const fn new() -> Self {
        Self {
            samples: 0,
            total_pulses: 0,
            cpm_sum: 0,
            min_cpm: None,
            max_cpm: 0,
        }
    }

    /// Fold one sample and the raw pulse count it was derived from.
    pub fn update(&mut self, raw: u32, sample: &Sample) {
        let cpm = sample.counts_per_minute;
        self.samples = self.samples.saturating_add(1);
        self.total_pulses += u64::from(raw);
        self.cpm_sum += u64::from(cpm);
        self.min_cpm = Some(self.min_cpm.map_or(cpm, |m| m.min(cpm)));
        self.max_cpm = self.max_cpm.max(cpm);
    }

    /// Mean CPM over the epoch.
    pub fn mean_cpm(&self) -> Option<f64> {
        if self.samples == 0 {
            return None;
        }
        Some(self.cpm_sum as f64 / f64::from(self.samples))
    }
}

impl fmt::Display for EpochStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mean_cpm(), self.min_cpm) {
            (Some(mean), Some(min)) => write!(
                f,
                "{} samples, {} pulses, CPM mean {:.1} / min {} / max {}",
                self.samples, self.total_pulses, mean, min, self.max_cpm
            ),
            _ => f.write_str("no samples"),
        }
    }
}

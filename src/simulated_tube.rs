//! Simulated Geiger-Müller tube output line
//!
//! Background radiation is a Poisson process, so the gaps between pulses are
//! exponentially distributed. [`SimulatedTube`] behaves like the tube's
//! open-collector output: idle high, pulled low for each count. It implements
//! [`Wait`] and plugs into `PulseInput` wherever a real GPIO input would.

use core::convert::Infallible;

use embassy_time::{Duration, Timer};
use embedded_hal::digital::ErrorType;
use embedded_hal_async::digital::Wait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct SimulatedTube {
    /// Mean pulses per second
    rate: f64,
    rng: StdRng,
}

impl SimulatedTube {
    /// A tube counting `mean_cpm` pulses per minute on average.
    pub fn new(mean_cpm: f64) -> Self {
        Self::with_rng(mean_cpm, StdRng::from_entropy())
    }

    /// Same as [`new`](Self::new) with a fixed seed, for reproducible runs.
    pub fn seeded(mean_cpm: f64, seed: u64) -> Self {
        Self::with_rng(mean_cpm, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mean_cpm: f64, rng: StdRng) -> Self {
        Self {
            rate: mean_cpm.max(0.0) / 60.0,
            rng,
        }
    }

    /// Time until the next pulse, or `None` for a tube that never fires.
    pub fn next_gap(&mut self) -> Option<Duration> {
        if self.rate <= 0.0 {
            return None;
        }
        let u: f64 = self.rng.gen_range(0.0..1.0);
        let secs = -(1.0 - u).ln() / self.rate;
        Some(Duration::from_micros((secs * 1_000_000.0) as u64))
    }

    async fn next_pulse(&mut self) {
        match self.next_gap() {
            Some(gap) => Timer::after(gap).await,
            None => core::future::pending::<()>().await,
        }
    }
}

impl ErrorType for SimulatedTube {
    type Error = Infallible;
}

impl Wait for SimulatedTube {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        // Pulses are instantaneous, the line is back high by the time we look
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.next_pulse().await;
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.next_pulse().await;
        Ok(())
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.next_pulse().await;
        Ok(())
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.next_pulse().await;
        Ok(())
    }
}

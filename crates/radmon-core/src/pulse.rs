//! Pulse accounting for the Geiger-Müller tube
//!
//! Every falling edge on the tube's output line is one ionising event. The
//! edges are recorded into a [`PulseCounter`] from an async task, while the
//! sampling loop periodically takes (reads and resets) the count.

use core::sync::atomic::{AtomicU32, Ordering};

use embedded_hal_async::digital::Wait;
use log::{debug, error};

use crate::error::PulseError;

/// Shared count of pulses observed since the last sample.
///
/// Recording and taking are single atomic operations. A pulse recorded
/// concurrently with [`take`](Self::take) lands either in the value returned
/// by that take or in the next one, never both and never neither.
///
/// ```rust
/// use radmon_core::PulseCounter;
///
/// static PULSES: PulseCounter = PulseCounter::new();
///
/// PULSES.record();
/// PULSES.record();
/// assert_eq!(PULSES.take(), 2);
/// assert_eq!(PULSES.take(), 0);
/// ```
#[derive(Debug, Default)]
pub struct PulseCounter {
    count: AtomicU32,
}

impl PulseCounter {
    /// Create a counter starting at zero.
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
        }
    }

    /// Record one pulse. Cannot fail.
    #[inline]
    pub fn record(&self) {
        // Wraps at u32::MAX; the sampling loop resets the count long before
        // a real tube could get there.
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    /// Read the number of pulses since the last take and reset it to zero.
    #[inline]
    pub fn take(&self) -> u32 {
        self.count.swap(0, Ordering::AcqRel)
    }

    /// Current count without resetting it.
    #[inline]
    pub fn peek(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }
}

/// A tube output line feeding a [`PulseCounter`].
///
/// Works with any pin implementing [`Wait`], so the same code runs against a
/// HAL GPIO input on a board or a simulated tube on the desktop.
pub struct PulseInput<P> {
    pin: P,
}

impl<P: Wait> PulseInput<P> {
    pub const fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Wait for the next falling edge and record it.
    pub async fn next_pulse(&mut self, counter: &PulseCounter) -> Result<(), PulseError> {
        self.pin.wait_for_falling_edge().await.map_err(|e| {
            error!("Pulse input failed while waiting for an edge: {:?}", e);
            PulseError::Pin
        })?;
        counter.record();
        debug!("Pulse recorded");
        Ok(())
    }

    /// Record pulses forever. Only returns if the pin reports an error.
    pub async fn run(&mut self, counter: &PulseCounter) -> PulseError {
        loop {
            if let Err(e) = self.next_pulse(counter).await {
                return e;
            }
        }
    }
}

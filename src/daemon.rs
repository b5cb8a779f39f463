//! The concurrent activities of a running monitor

use core::convert::Infallible;

use embassy_futures::select::{Either3, select3};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use log::{error, warn};
use radmon_core::{EventChannel, LogStore, Monitor, PulseCounter, PulseInput, WallClock};

use crate::error::AppError;
use crate::status;

/// Run the monitor, the pulse input and the status reporter side by side.
///
/// Returns on the first fatal error. A pulse input that stops delivering
/// edges is fatal: the monitor would otherwise keep logging zero counts as
/// if they were real readings.
pub async fn run<S, C, D, P>(
    mut monitor: Monitor<'_, S, C, D>,
    mut input: PulseInput<P>,
    pulses: &PulseCounter,
    events: &EventChannel,
) -> AppError
where
    S: LogStore,
    C: WallClock,
    D: DelayNs,
    P: Wait,
{
    let reporter = async {
        match events.subscriber() {
            Ok(subscriber) => status::report(subscriber).await,
            Err(e) => {
                warn!("Status reporter disabled: {:?}", e);
                core::future::pending::<Infallible>().await
            }
        }
    };

    match select3(monitor.run(), input.run(pulses), reporter).await {
        Either3::First(e) => e.into(),
        Either3::Second(e) => {
            error!("{}; no further pulses can be counted", e);
            e.into()
        }
        Either3::Third(never) => match never {},
    }
}

//! Transmit task
//!
//! Ticks the transmitter at the configured rate; the transmitter itself
//! decides whether a frame is due.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Ticker};

use pubremote_core::link::{TransmitOutcome, Transmitter};

use super::now_ms;
use crate::input::InputState;
use crate::radio::EspNowLink;

pub type LinkTransmitter =
    Transmitter<'static, CriticalSectionRawMutex, EspNowLink, InputState>;

/// Transmit task - sends control frames to the paired vehicle
#[embassy_executor::task]
pub async fn transmitter_task(mut transmitter: LinkTransmitter, period: Duration) {
    info!("Transmitter task started");

    let mut ticker = Ticker::every(period);

    loop {
        ticker.next().await;

        match transmitter.tick(now_ms()) {
            TransmitOutcome::Sent => trace!("Control frame queued"),
            TransmitOutcome::Failed(e) => debug!("Control frame not sent: {:?}", e),
            _ => {}
        }
    }
}

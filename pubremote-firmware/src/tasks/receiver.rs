//! Receive task
//!
//! Waits for inbound datagrams and user requests, and runs the receiver's
//! housekeeping whenever the radio is quiet.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{with_timeout, Duration};

use pubremote_core::link::{Dispatch, IdleReport, Receiver};

use super::now_ms;
use crate::channels::{INBOUND, PAIRING_MODE, UNPAIR};
use crate::radio::EspNowLink;
use crate::storage::FlashPeerStore;
use crate::ui::{IdleReset, UiNotifier};

/// Quiet period after which housekeeping runs
const IDLE_POLL_MS: u64 = 20;

pub type LinkReceiver = Receiver<
    'static,
    CriticalSectionRawMutex,
    EspNowLink,
    FlashPeerStore,
    UiNotifier,
    IdleReset,
>;

/// Receive task - dispatches datagrams, pairing requests and unpair requests
#[embassy_executor::task]
pub async fn receiver_task(mut receiver: LinkReceiver) {
    info!("Receiver task started");

    match receiver.start(now_ms()) {
        Ok(Some(peer)) => info!(
            "Resuming pairing with {} on channel {}",
            peer.address, peer.channel
        ),
        Ok(None) => info!("Not paired"),
        Err(e) => warn!("Reading stored pairing failed: {:?}", e),
    }

    loop {
        let event = with_timeout(
            Duration::from_millis(IDLE_POLL_MS),
            select3(INBOUND.wait(), UNPAIR.wait(), PAIRING_MODE.wait()),
        )
        .await;

        let now = now_ms();
        match event {
            Ok(Either3::First(datagram)) => log_dispatch(receiver.handle(&datagram, now)),
            Ok(Either3::Second(())) => match receiver.unpair(now) {
                Ok(()) => info!("Unpaired"),
                Err(e) => warn!("Unpaired, but clearing flash failed: {:?}", e),
            },
            Ok(Either3::Third(active)) => {
                info!("Pairing mode {}", if active { "on" } else { "off" });
                receiver.set_pairing_mode(active);
            }
            Err(_) => log_idle(receiver.on_idle(now)),
        }
    }
}

fn log_dispatch(dispatch: Dispatch) {
    match dispatch {
        Dispatch::PairingStarted(peer) => info!(
            "Pairing with {} on channel {}",
            peer.address, peer.channel
        ),
        Dispatch::CodeOffered(code) => info!("Vehicle offered code {}", code),
        Dispatch::Paired { peer, persisted } => {
            info!("Paired with {}", peer.address);
            if let Err(e) = persisted {
                warn!("Saving pairing failed: {:?}", e);
            }
        }
        Dispatch::PairingFailed(e) => warn!("Pairing failed: {:?}", e),
        Dispatch::Telemetry { reconnected: true } => info!("Vehicle heard again, reconnecting"),
        Dispatch::Telemetry { reconnected: false } => trace!("Telemetry"),
        Dispatch::Ignored(reason) => debug!("Ignored datagram: {:?}", reason),
    }
}

fn log_idle(report: IdleReport) {
    if report.expired {
        warn!("Pairing handshake timed out");
    }
    match report.hop {
        Some(Ok(channel)) => debug!("Searching on channel {}", channel),
        Some(Err(e)) => warn!("Channel hop failed: {:?}", e),
        None => {}
    }
    if report.telemetry_cleared {
        info!("Link down, telemetry cleared");
    }
}

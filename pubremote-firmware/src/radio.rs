//! ESP-NOW transport
//!
//! The link loops call [`LinkTransport`] from inside their own logic, so the
//! adapter must not await. [`EspNowLink`] validates each request and queues
//! the work as a [`RadioCommand`] for the radio task, which owns the ESP-NOW
//! driver. Commands run in FIFO order, so a peer registration always precedes
//! the first send to that peer.
//!
//! Only one vehicle is registered at a time. A registration is recorded in
//! [`PEER`] once it is queued, and a new vehicle displaces the old one.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use pubremote_core::link::hopper::{MAX_CHANNEL, MIN_CHANNEL};
use pubremote_core::link::PeerSlot;
use pubremote_core::traits::{LinkTransport, TransportError};
use pubremote_protocol::{MacAddress, CONTROL_FRAME_LEN};

use crate::channels::RADIO_COMMANDS;

/// Largest datagram the remote sends (the control frame)
pub const MAX_OUTBOUND_LEN: usize = CONTROL_FRAME_LEN;

/// Vehicle registered with the driver, mirrored for `peer_exists`
static PEER: Mutex<CriticalSectionRawMutex, Cell<PeerSlot>> =
    Mutex::new(Cell::new(PeerSlot::EMPTY));

/// Work for the radio task
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioCommand {
    /// Transmit one datagram
    Send {
        peer: MacAddress,
        payload: Vec<u8, MAX_OUTBOUND_LEN>,
    },
    /// Add the peer, or move it to a new channel, removing `replaces` first
    RegisterPeer {
        peer: MacAddress,
        channel: u8,
        replaces: Option<MacAddress>,
    },
    /// Retune the radio
    SetChannel(u8),
}

/// Handle the link loops use to reach the radio
#[derive(Debug, Clone, Copy, Default)]
pub struct EspNowLink;

impl EspNowLink {
    fn queue(command: RadioCommand) -> Result<(), TransportError> {
        RADIO_COMMANDS
            .try_send(command)
            .map_err(|_| TransportError::NotReady)
    }
}

fn check_channel(channel: u8) -> Result<(), TransportError> {
    if (MIN_CHANNEL..=MAX_CHANNEL).contains(&channel) {
        Ok(())
    } else {
        Err(TransportError::InvalidChannel)
    }
}

impl LinkTransport for EspNowLink {
    fn send(&mut self, peer: &MacAddress, payload: &[u8]) -> Result<(), TransportError> {
        if !self.peer_exists(peer) {
            return Err(TransportError::SendFailed);
        }
        let payload = Vec::from_slice(payload).map_err(|_| TransportError::SendFailed)?;
        Self::queue(RadioCommand::Send {
            peer: *peer,
            payload,
        })
    }

    fn add_peer(&mut self, peer: &MacAddress, channel: u8) -> Result<(), TransportError> {
        check_channel(channel)?;
        PEER.lock(|cell| {
            let mut slot = cell.get();
            // Re-registering the current peer moves it to `channel`
            Self::queue(RadioCommand::RegisterPeer {
                peer: *peer,
                channel,
                replaces: slot.displaced_by(peer),
            })?;
            slot.register(*peer);
            cell.set(slot);
            Ok(())
        })
    }

    fn peer_exists(&self, peer: &MacAddress) -> bool {
        PEER.lock(|cell| cell.get().contains(peer))
    }

    fn set_channel(&mut self, channel: u8) -> Result<(), TransportError> {
        check_channel(channel)?;
        Self::queue(RadioCommand::SetChannel(channel))
    }
}

//! Pairing coordinator
//!
//! Drives the three-message handshake:
//!
//! ```text
//! Unpaired --init (addr == sender), ack sent--> Pairing
//! Pairing  --code-------------------------------> Pending
//! Pending  --confirm (-1)-----------------------> Paired
//! Pending  --anything else----------------------> Unpaired
//! Pairing/Pending --handshake timeout-----------> Unpaired
//! ```
//!
//! Once a handshake is underway only datagrams from the announced vehicle
//! advance it. The coordinator is the only writer of the pairing state and
//! peer identity; persistence and connection side effects belong to the
//! caller.

use pubremote_protocol::{
    decode_secret_code, parse_pairing_init, FrameError, MacAddress, PAIRING_ACK,
    PAIRING_CONFIRMED, UNSET_SECRET_CODE,
};

use super::identity::PeerIdentity;
use crate::config::LinkConfig;
use crate::state::{PairingEvent, PairingState};
use crate::traits::{LinkTransport, TransportError};

/// Published pairing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PairingStatus {
    pub state: PairingState,
    /// Vehicle being paired with, or bonded to
    pub peer: Option<PeerIdentity>,
}

impl PairingStatus {
    pub const UNPAIRED: Self = Self {
        state: PairingState::Unpaired,
        peer: None,
    };

    /// Bonded peer, only once pairing has completed
    pub fn paired_peer(&self) -> Option<PeerIdentity> {
        match self.state {
            PairingState::Paired => self.peer,
            _ => None,
        }
    }
}

impl Default for PairingStatus {
    fn default() -> Self {
        Self::UNPAIRED
    }
}

/// Successful secret code step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairingOutcome {
    /// Vehicle offered this code for the user to compare
    CodeOffered(i32),
    /// Pairing committed
    Paired(PeerIdentity),
}

/// Failed handshake step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairingError {
    /// Message not expected in this state; state unchanged
    OutOfSequence(PairingState),
    /// Datagram from a device other than the one being paired; state unchanged
    UnknownSender(MacAddress),
    /// Init payload does not match its sender; state unchanged
    AddressMismatch {
        sender: MacAddress,
        announced: MacAddress,
    },
    /// Acknowledgement could not be sent; state unchanged
    AckFailed(TransportError),
    /// Vehicle offered an unusable code or did not confirm; reverted to
    /// unpaired
    CodeRejected(i32),
    /// Handshake stalled; reverted to unpaired
    TimedOut,
    /// Payload has the wrong size for the step
    Malformed(FrameError),
}

impl From<FrameError> for PairingError {
    fn from(e: FrameError) -> Self {
        PairingError::Malformed(e)
    }
}

/// Pairing handshake state machine
#[derive(Debug, Clone)]
pub struct PairingCoordinator {
    status: PairingStatus,
    /// Start of the current handshake step
    step_started_ms: u64,
    handshake_timeout_ms: u64,
}

impl PairingCoordinator {
    /// Create an unpaired coordinator
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            status: PairingStatus::UNPAIRED,
            step_started_ms: 0,
            handshake_timeout_ms: config.handshake_timeout_ms as u64,
        }
    }

    /// Adopt a stored pairing
    ///
    /// Identities without a secret code are ignored.
    pub fn restore(&mut self, peer: PeerIdentity) -> bool {
        if !peer.has_secret() || self.status.state != PairingState::Unpaired {
            return false;
        }
        self.status = PairingStatus {
            state: self.status.state.transition(PairingEvent::Restored),
            peer: Some(peer),
        };
        true
    }

    pub fn state(&self) -> PairingState {
        self.status.state
    }

    pub fn peer(&self) -> Option<PeerIdentity> {
        self.status.peer
    }

    pub fn status(&self) -> PairingStatus {
        self.status
    }

    /// Handshake step 1
    ///
    /// Registers the vehicle with the transport on the channel the request
    /// arrived on and acknowledges it. The state only advances once the ack
    /// has been handed to the transport.
    pub fn handle_init<T: LinkTransport>(
        &mut self,
        sender: MacAddress,
        payload: &[u8],
        channel: u8,
        now_ms: u64,
        transport: &mut T,
    ) -> Result<PeerIdentity, PairingError> {
        if self.status.state != PairingState::Unpaired {
            return Err(PairingError::OutOfSequence(self.status.state));
        }

        let announced = parse_pairing_init(payload)?;
        if announced != sender {
            return Err(PairingError::AddressMismatch { sender, announced });
        }

        transport
            .add_peer(&sender, channel)
            .map_err(PairingError::AckFailed)?;
        transport
            .send(&sender, &PAIRING_ACK)
            .map_err(PairingError::AckFailed)?;

        let peer = PeerIdentity::new(sender, channel);
        self.advance(PairingEvent::InitAccepted, Some(peer), now_ms);
        Ok(peer)
    }

    /// Handshake steps 2 and 3
    pub fn handle_secret_code(
        &mut self,
        sender: MacAddress,
        payload: &[u8],
        now_ms: u64,
    ) -> Result<PairingOutcome, PairingError> {
        let Some(mut peer) = self.status.peer.filter(|_| self.status.state.is_handshaking())
        else {
            return Err(PairingError::OutOfSequence(self.status.state));
        };
        if sender != peer.address {
            return Err(PairingError::UnknownSender(sender));
        }

        let code = decode_secret_code(payload)?;

        match self.status.state {
            // Would be stored as "no pairing" and lost on reboot
            PairingState::Pairing if code == UNSET_SECRET_CODE => {
                self.advance(PairingEvent::Rejected, None, now_ms);
                Err(PairingError::CodeRejected(code))
            }
            PairingState::Pairing => {
                peer.secret_code = code;
                self.advance(PairingEvent::CodeOffered, Some(peer), now_ms);
                Ok(PairingOutcome::CodeOffered(code))
            }
            _ if code == PAIRING_CONFIRMED => {
                self.advance(PairingEvent::Confirmed, Some(peer), now_ms);
                Ok(PairingOutcome::Paired(peer))
            }
            _ => {
                self.advance(PairingEvent::Rejected, None, now_ms);
                Err(PairingError::CodeRejected(code))
            }
        }
    }

    /// Revert a stalled handshake
    pub fn expire(&mut self, now_ms: u64) -> Option<PairingError> {
        let stalled = self.status.state.is_handshaking()
            && now_ms.saturating_sub(self.step_started_ms) > self.handshake_timeout_ms;
        if !stalled {
            return None;
        }
        self.advance(PairingEvent::TimedOut, None, now_ms);
        Some(PairingError::TimedOut)
    }

    /// Forget the vehicle
    pub fn unpair(&mut self, now_ms: u64) {
        self.advance(PairingEvent::Unpair, None, now_ms);
    }

    /// Record that the bonded vehicle is now on a different channel
    pub fn retune(&mut self, channel: u8) -> Option<PeerIdentity> {
        let peer = self.status.peer.as_mut()?;
        peer.channel = channel;
        Some(*peer)
    }

    fn advance(&mut self, event: PairingEvent, peer: Option<PeerIdentity>, now_ms: u64) {
        self.status = PairingStatus {
            state: self.status.state.transition(event),
            peer,
        };
        self.step_started_ms = now_ms;
    }
}

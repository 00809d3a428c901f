//! Control transmit loop logic
//!
//! Called on a fixed tick. Sends at most one control frame per command
//! timeout to the paired vehicle. The transport is fire-and-forget, so the
//! send time is recorded whether or not the send succeeded; a failing radio
//! is retried on the next slot rather than every tick.

use embassy_sync::blocking_mutex::raw::RawMutex;
use pubremote_protocol::encode_control;

use super::shared::LinkState;
use crate::config::LinkConfig;
use crate::pairing::PeerIdentity;
use crate::state::ConnectionState;
use crate::traits::{ControlSource, LinkTransport, TransportError};

/// Result of one transmit tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitOutcome {
    /// No paired vehicle
    NotPaired,
    /// Paired but the connection was given up
    Offline,
    /// Too soon after the previous send
    Throttled,
    /// Transmission disabled by the input layer (pocket mode)
    Suppressed,
    Sent,
    Failed(TransportError),
}

/// Outbound side of the link
pub struct Transmitter<'a, M: RawMutex, T, C> {
    link: &'a LinkState<M>,
    transport: T,
    source: C,
    command_timeout_ms: u64,
    last_send_ms: Option<u64>,
}

impl<'a, M, T, C> Transmitter<'a, M, T, C>
where
    M: RawMutex,
    T: LinkTransport,
    C: ControlSource,
{
    pub fn new(link: &'a LinkState<M>, config: &LinkConfig, transport: T, source: C) -> Self {
        Self {
            link,
            transport,
            source,
            command_timeout_ms: config.command_timeout_ms as u64,
            last_send_ms: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn source_mut(&mut self) -> &mut C {
        &mut self.source
    }

    /// Run one transmit tick
    pub fn tick(&mut self, now_ms: u64) -> TransmitOutcome {
        let Some(peer) = self.link.pairing().paired_peer() else {
            return TransmitOutcome::NotPaired;
        };
        if self.link.connection() == ConnectionState::Disconnected {
            return TransmitOutcome::Offline;
        }
        if let Some(last) = self.last_send_ms {
            if now_ms.saturating_sub(last) < self.command_timeout_ms {
                return TransmitOutcome::Throttled;
            }
        }

        self.last_send_ms = Some(now_ms);
        if !self.source.transmit_enabled() {
            return TransmitOutcome::Suppressed;
        }

        let sample = self.source.read_control_sample().clamped();
        let frame = encode_control(peer.secret_code, &sample);
        match self.send(&peer, &frame) {
            Ok(()) => TransmitOutcome::Sent,
            Err(e) => TransmitOutcome::Failed(e),
        }
    }

    fn send(&mut self, peer: &PeerIdentity, frame: &[u8]) -> Result<(), TransportError> {
        if !self.transport.peer_exists(&peer.address) {
            self.transport.add_peer(&peer.address, peer.channel)?;
        }
        self.transport.send(&peer.address, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockInput, MockTransport};
    use crate::pairing::PairingStatus;
    use crate::state::{ConnectionEvent, PairingState};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use pubremote_protocol::{decode_control, ControlSample, MacAddress};

    const VEHICLE: MacAddress = MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

    fn paired_link() -> LinkState<NoopRawMutex> {
        let link = LinkState::new(&LinkConfig::DEFAULT);
        link.publish_pairing(PairingStatus {
            state: PairingState::Paired,
            peer: Some(PeerIdentity {
                address: VEHICLE,
                channel: 3,
                secret_code: 5678,
            }),
        });
        link.force_connection(ConnectionEvent::Connect, 0);
        link
    }

    fn transmitter(
        link: &LinkState<NoopRawMutex>,
    ) -> Transmitter<'_, NoopRawMutex, MockTransport, MockInput> {
        Transmitter::new(
            link,
            &LinkConfig::DEFAULT,
            MockTransport::default(),
            MockInput::default(),
        )
    }

    #[test]
    fn test_unpaired_sends_nothing() {
        let link = LinkState::<NoopRawMutex>::new(&LinkConfig::DEFAULT);
        let mut tx = transmitter(&link);
        assert_eq!(tx.tick(0), TransmitOutcome::NotPaired);
        assert_eq!(tx.tick(5000), TransmitOutcome::NotPaired);
        assert!(tx.transport().sent.is_empty());
    }

    #[test]
    fn test_first_send_is_immediate_and_framed() {
        let link = paired_link();
        let mut tx = transmitter(&link);
        tx.source_mut().sample = ControlSample {
            js_y: 0.5,
            bt_c: true,
            ..ControlSample::NEUTRAL
        };

        assert_eq!(tx.tick(20), TransmitOutcome::Sent);
        let sent = tx.transport().sent_to(&VEHICLE);
        assert_eq!(sent.len(), 1);
        let (code, sample) = decode_control(&sent[0]).unwrap();
        assert_eq!(code, 5678);
        assert_eq!(sample.js_y, 0.5);
        assert!(sample.bt_c);
        assert_eq!(tx.transport().peer_channel(&VEHICLE), Some(3));
    }

    #[test]
    fn test_throttled_to_command_timeout() {
        let link = paired_link();
        let mut tx = transmitter(&link);

        assert_eq!(tx.tick(0), TransmitOutcome::Sent);
        let mut now = 20;
        while now < 1000 {
            assert_eq!(tx.tick(now), TransmitOutcome::Throttled);
            now += 20;
        }
        assert_eq!(tx.tick(1000), TransmitOutcome::Sent);
        assert_eq!(tx.transport().sent.len(), 2);
    }

    #[test]
    fn test_failed_send_still_throttles() {
        let link = paired_link();
        let mut tx = transmitter(&link);
        tx.transport.fail_send = true;

        assert_eq!(
            tx.tick(0),
            TransmitOutcome::Failed(TransportError::SendFailed)
        );
        assert_eq!(tx.tick(20), TransmitOutcome::Throttled);
        assert_eq!(tx.tick(999), TransmitOutcome::Throttled);
        assert_eq!(tx.transport().sent.len(), 1);
    }

    #[test]
    fn test_registration_failure_reported() {
        let link = paired_link();
        let mut tx = transmitter(&link);
        tx.transport.fail_add = true;
        assert_eq!(
            tx.tick(0),
            TransmitOutcome::Failed(TransportError::PeerTableFull)
        );
        assert!(tx.transport().sent.is_empty());
    }

    #[test]
    fn test_pocket_mode_suppresses() {
        let link = paired_link();
        let mut tx = transmitter(&link);
        tx.source_mut().enabled = false;

        assert_eq!(tx.tick(0), TransmitOutcome::Suppressed);
        assert_eq!(tx.tick(500), TransmitOutcome::Throttled);
        assert!(tx.transport().sent.is_empty());
        assert_eq!(tx.source_mut().reads, 0);

        tx.source_mut().enabled = true;
        assert_eq!(tx.tick(1000), TransmitOutcome::Sent);
    }

    #[test]
    fn test_disconnected_is_offline() {
        let link = paired_link();
        link.force_connection(ConnectionEvent::Disconnect, 0);
        let mut tx = transmitter(&link);
        assert_eq!(tx.tick(0), TransmitOutcome::Offline);
        assert!(tx.transport().sent.is_empty());
    }

    #[test]
    fn test_out_of_range_axes_clamped() {
        let link = paired_link();
        let mut tx = transmitter(&link);
        tx.source_mut().sample = ControlSample {
            js_x: -3.0,
            ..ControlSample::NEUTRAL
        };
        tx.tick(0);
        let (_, sample) = decode_control(&tx.transport().sent[0].1).unwrap();
        assert_eq!(sample.js_x, -1.0);
    }
}

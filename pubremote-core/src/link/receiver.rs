//! Receive loop logic
//!
//! Every inbound datagram is classified by length and dispatched:
//!
//! - 6 bytes: pairing init
//! - 4 bytes: secret code or confirmation, depending on the pairing state
//! - 32 bytes: telemetry, only from the paired vehicle
//! - anything else: ignored
//!
//! Datagrams are handled one at a time, so a handshake step and the state it
//! reads never interleave with another datagram. Between datagrams the
//! receive task calls [`Receiver::on_idle`] to expire stalled handshakes and
//! hop channels while searching.

use embassy_sync::blocking_mutex::raw::RawMutex;
use pubremote_protocol::{
    decode_telemetry, MacAddress, MessageKind, TELEMETRY_FRAME_LEN, UNSET_SECRET_CODE,
};

use super::datagram::Datagram;
use super::hopper::{ChannelHopper, MIN_CHANNEL};
use super::shared::LinkState;
use crate::config::LinkConfig;
use crate::pairing::{PairingCoordinator, PairingError, PairingOutcome, PeerIdentity};
use crate::state::{ConnectionEvent, ConnectionState, PairingState};
use crate::telemetry::TelemetrySnapshot;
use crate::traits::{IdleTimer, LinkObserver, LinkTransport, PeerStore, StoreError, TransportError};

/// What the receiver did with a datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// Pairing init accepted and acknowledged
    PairingStarted(PeerIdentity),
    /// Secret code shown to the user
    CodeOffered(i32),
    /// Pairing committed and connection search started
    Paired {
        peer: PeerIdentity,
        persisted: Result<(), StoreError>,
    },
    /// Handshake step failed
    PairingFailed(PairingError),
    /// Telemetry stored; `reconnected` if it restarted a dropped connection
    Telemetry { reconnected: bool },
    /// Discarded without effect
    Ignored(IgnoreReason),
}

/// Why a datagram was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IgnoreReason {
    UnexpectedLength(usize),
    /// Handshake message not expected in this pairing state
    OutOfSequence(PairingState),
    UnknownSender(MacAddress),
    /// Telemetry before pairing completed
    NotPaired,
    /// Handshake message while the pairing screen is closed
    PairingClosed,
}

/// What happened during an idle period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdleReport {
    /// A stalled handshake was abandoned
    pub expired: bool,
    /// Channel hop attempted
    pub hop: Option<Result<u8, TransportError>>,
    /// Telemetry was reset after a disconnect
    pub telemetry_cleared: bool,
}

/// Inbound side of the link
pub struct Receiver<'a, M: RawMutex, T, S, O, I> {
    link: &'a LinkState<M>,
    pairing: PairingCoordinator,
    hopper: ChannelHopper,
    transport: T,
    store: S,
    observer: O,
    idle: I,
    /// User has the pairing screen open
    pairing_mode: bool,
    telemetry_cleared: bool,
}

impl<'a, M, T, S, O, I> Receiver<'a, M, T, S, O, I>
where
    M: RawMutex,
    T: LinkTransport,
    S: PeerStore,
    O: LinkObserver,
    I: IdleTimer,
{
    pub fn new(
        link: &'a LinkState<M>,
        config: &LinkConfig,
        transport: T,
        store: S,
        observer: O,
        idle: I,
    ) -> Self {
        Self {
            link,
            pairing: PairingCoordinator::new(config),
            hopper: ChannelHopper::new(MIN_CHANNEL, config.channel_hop_interval_ms),
            transport,
            store,
            observer,
            idle,
            pairing_mode: false,
            telemetry_cleared: true,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn idle_timer(&self) -> &I {
        &self.idle
    }

    /// Channel the radio is tuned to
    pub fn channel(&self) -> u8 {
        self.hopper.channel()
    }

    /// Open or close the pairing screen
    ///
    /// Handshake messages are only answered while it is open, and the
    /// remote only hops channels while unpaired if it is open. Pairing and
    /// unpairing both close it.
    pub fn set_pairing_mode(&mut self, active: bool) {
        self.pairing_mode = active;
    }

    /// Resume a stored pairing
    ///
    /// With a saved secret code and vehicle address the remote starts
    /// paired and immediately begins connecting on the saved channel.
    pub fn start(&mut self, now_ms: u64) -> Result<Option<PeerIdentity>, StoreError> {
        let secret_code = self.store.load_secret_code()?;
        if secret_code == UNSET_SECRET_CODE {
            return Ok(None);
        }
        let Some((address, channel)) = self.store.load_peer()? else {
            return Ok(None);
        };

        let peer = PeerIdentity {
            address,
            channel,
            secret_code,
        };
        if !self.pairing.restore(peer) {
            return Ok(None);
        }

        self.hopper.set_channel(channel);
        // Both are retried: by the hopper while connecting, and by the
        // transmitter before every send
        let _ = self.transport.set_channel(channel);
        let _ = self.transport.add_peer(&address, channel);

        self.link.publish_pairing(self.pairing.status());
        self.link.force_connection(ConnectionEvent::Connect, now_ms);
        self.notify_state();
        Ok(Some(peer))
    }

    /// Process one inbound datagram
    pub fn handle(&mut self, datagram: &Datagram, now_ms: u64) -> Dispatch {
        self.hopper.heard(now_ms);
        self.expire(now_ms);
        self.clear_if_disconnected();

        match MessageKind::classify(datagram.len()) {
            Some(MessageKind::PairingInit | MessageKind::SecretCode) if !self.pairing_mode => {
                Dispatch::Ignored(IgnoreReason::PairingClosed)
            }
            Some(MessageKind::PairingInit) => self.on_pairing_init(datagram, now_ms),
            Some(MessageKind::SecretCode) => self.on_secret_code(datagram, now_ms),
            Some(MessageKind::Telemetry) => self.on_telemetry(datagram, now_ms),
            None => Dispatch::Ignored(IgnoreReason::UnexpectedLength(datagram.len())),
        }
    }

    /// Housekeeping while no datagrams arrive
    pub fn on_idle(&mut self, now_ms: u64) -> IdleReport {
        let expired = self.expire(now_ms);
        let telemetry_cleared = self.clear_if_disconnected();

        let searching = (self.pairing.state() == PairingState::Unpaired && self.pairing_mode)
            || self.link.connection() == ConnectionState::Connecting;
        let hop = self
            .hopper
            .poll(now_ms, searching)
            .map(|channel| self.retune(channel));

        IdleReport {
            expired,
            hop,
            telemetry_cleared,
        }
    }

    /// Forget the vehicle and stop talking to it
    ///
    /// The stored address, channel and secret code are all cleared, so a
    /// reboot comes up unpaired.
    pub fn unpair(&mut self, now_ms: u64) -> Result<(), StoreError> {
        self.pairing.unpair(now_ms);
        self.pairing_mode = false;
        self.link.publish_pairing(self.pairing.status());
        self.link.force_connection(ConnectionEvent::Disconnect, now_ms);
        self.notify_state();
        self.store.clear_peer()
    }

    fn on_pairing_init(&mut self, datagram: &Datagram, now_ms: u64) -> Dispatch {
        let result = self.pairing.handle_init(
            datagram.sender(),
            datagram.payload(),
            datagram.channel(),
            now_ms,
            &mut self.transport,
        );
        match result {
            Ok(peer) => {
                self.hopper.set_channel(peer.channel);
                self.publish_pairing();
                Dispatch::PairingStarted(peer)
            }
            Err(e) => self.rejected(e),
        }
    }

    fn on_secret_code(&mut self, datagram: &Datagram, now_ms: u64) -> Dispatch {
        let result = self
            .pairing
            .handle_secret_code(datagram.sender(), datagram.payload(), now_ms);
        match result {
            Ok(PairingOutcome::CodeOffered(code)) => {
                self.publish_pairing();
                self.observer.pairing_code_offered(code);
                Dispatch::CodeOffered(code)
            }
            Ok(PairingOutcome::Paired(peer)) => self.commit(peer, now_ms),
            Err(e) => self.rejected(e),
        }
    }

    fn on_telemetry(&mut self, datagram: &Datagram, now_ms: u64) -> Dispatch {
        let Some(peer) = self.pairing.status().paired_peer() else {
            return Dispatch::Ignored(IgnoreReason::NotPaired);
        };
        if datagram.sender() != peer.address {
            return Dispatch::Ignored(IgnoreReason::UnknownSender(datagram.sender()));
        }
        let Ok(frame) = <&[u8; TELEMETRY_FRAME_LEN]>::try_from(datagram.payload()) else {
            return Dispatch::Ignored(IgnoreReason::UnexpectedLength(datagram.len()));
        };

        let telemetry = decode_telemetry(frame);
        let snapshot = TelemetrySnapshot::received(telemetry, now_ms, datagram.rssi());
        self.link.publish_telemetry(snapshot);
        self.telemetry_cleared = false;
        self.idle.reset_idle_timer();
        self.observer.notify_telemetry_updated(&snapshot);

        // The monitor gave up but the vehicle is back
        let reconnected = self.link.connection() == ConnectionState::Disconnected;
        if reconnected {
            self.link.force_connection(ConnectionEvent::Connect, now_ms);
            self.notify_state();
        }
        Dispatch::Telemetry { reconnected }
    }

    fn commit(&mut self, peer: PeerIdentity, now_ms: u64) -> Dispatch {
        let peer_saved = self.store.save_peer(&peer);
        let code_saved = self.store.save_secret_code(peer.secret_code);
        // Retried by the transmitter
        let _ = self.transport.add_peer(&peer.address, peer.channel);
        self.pairing_mode = false;

        self.link.publish_pairing(self.pairing.status());
        self.link.force_connection(ConnectionEvent::Connect, now_ms);
        self.notify_state();

        Dispatch::Paired {
            peer,
            persisted: peer_saved.and(code_saved),
        }
    }

    fn rejected(&mut self, error: PairingError) -> Dispatch {
        match error {
            PairingError::OutOfSequence(state) => {
                Dispatch::Ignored(IgnoreReason::OutOfSequence(state))
            }
            PairingError::UnknownSender(sender) => {
                Dispatch::Ignored(IgnoreReason::UnknownSender(sender))
            }
            other => {
                self.publish_pairing();
                Dispatch::PairingFailed(other)
            }
        }
    }

    fn expire(&mut self, now_ms: u64) -> bool {
        if self.pairing.expire(now_ms).is_none() {
            return false;
        }
        self.publish_pairing();
        true
    }

    fn retune(&mut self, channel: u8) -> Result<u8, TransportError> {
        self.transport.set_channel(channel)?;
        if let Some(peer) = self.pairing.retune(channel) {
            self.link.publish_pairing(self.pairing.status());
            self.transport.add_peer(&peer.address, channel)?;
        }
        Ok(channel)
    }

    fn clear_if_disconnected(&mut self) -> bool {
        if self.telemetry_cleared || self.link.connection() != ConnectionState::Disconnected {
            return false;
        }
        self.link.publish_telemetry(TelemetrySnapshot::EMPTY);
        self.observer
            .notify_telemetry_updated(&TelemetrySnapshot::EMPTY);
        self.telemetry_cleared = true;
        true
    }

    /// Publish the pairing status, notifying the UI if the state moved
    fn publish_pairing(&mut self) {
        let previous = self.link.pairing().state;
        let status = self.pairing.status();
        self.link.publish_pairing(status);
        if previous != status.state {
            self.notify_state();
        }
    }

    fn notify_state(&mut self) {
        let (pairing, connection) = self.link.status();
        self.observer.notify_state_changed(pairing, connection);
    }
}

//! Test doubles for the collaborator traits

use std::vec::Vec;

use pubremote_protocol::{ControlSample, MacAddress};

use crate::config::PeerRecord;
use crate::pairing::PeerIdentity;
use crate::state::{ConnectionState, PairingState};
use crate::telemetry::TelemetrySnapshot;
use crate::traits::{
    ControlSource, IdleTimer, LinkObserver, LinkTransport, PeerStore, StoreError, TransportError,
};

#[derive(Debug, Default)]
pub struct MockTransport {
    pub sent: Vec<(MacAddress, Vec<u8>)>,
    pub peers: Vec<(MacAddress, u8)>,
    pub channels: Vec<u8>,
    pub fail_send: bool,
    pub fail_add: bool,
}

impl MockTransport {
    pub fn sent_to(&self, peer: &MacAddress) -> Vec<Vec<u8>> {
        self.sent
            .iter()
            .filter(|(addr, _)| addr == peer)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub fn peer_channel(&self, peer: &MacAddress) -> Option<u8> {
        self.peers
            .iter()
            .find(|(addr, _)| addr == peer)
            .map(|(_, channel)| *channel)
    }
}

impl LinkTransport for MockTransport {
    fn send(&mut self, peer: &MacAddress, payload: &[u8]) -> Result<(), TransportError> {
        self.sent.push((*peer, payload.to_vec()));
        if self.fail_send {
            return Err(TransportError::SendFailed);
        }
        Ok(())
    }

    fn add_peer(&mut self, peer: &MacAddress, channel: u8) -> Result<(), TransportError> {
        if self.fail_add {
            return Err(TransportError::PeerTableFull);
        }
        match self.peers.iter_mut().find(|(addr, _)| addr == peer) {
            Some(entry) => entry.1 = channel,
            None => self.peers.push((*peer, channel)),
        }
        Ok(())
    }

    fn peer_exists(&self, peer: &MacAddress) -> bool {
        self.peers.iter().any(|(addr, _)| addr == peer)
    }

    fn set_channel(&mut self, channel: u8) -> Result<(), TransportError> {
        self.channels.push(channel);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockStore {
    pub record: PeerRecord,
    pub peer_saves: usize,
    pub code_saves: usize,
    pub clears: usize,
    pub fail: bool,
}

impl PeerStore for MockStore {
    fn load_peer(&mut self) -> Result<Option<(MacAddress, u8)>, StoreError> {
        if self.fail {
            return Err(StoreError::Flash);
        }
        self.record.load_peer()
    }

    fn save_peer(&mut self, peer: &PeerIdentity) -> Result<(), StoreError> {
        self.peer_saves += 1;
        if self.fail {
            return Err(StoreError::Flash);
        }
        self.record.save_peer(peer)
    }

    fn load_secret_code(&mut self) -> Result<i32, StoreError> {
        if self.fail {
            return Err(StoreError::Flash);
        }
        self.record.load_secret_code()
    }

    fn save_secret_code(&mut self, code: i32) -> Result<(), StoreError> {
        self.code_saves += 1;
        if self.fail {
            return Err(StoreError::Flash);
        }
        self.record.save_secret_code(code)
    }

    fn clear_peer(&mut self) -> Result<(), StoreError> {
        self.clears += 1;
        if self.fail {
            return Err(StoreError::Flash);
        }
        self.record.clear_peer()
    }
}

#[derive(Debug, Default)]
pub struct MockObserver {
    pub states: Vec<(PairingState, ConnectionState)>,
    pub telemetry: Vec<TelemetrySnapshot>,
    pub codes: Vec<i32>,
}

impl MockObserver {
    pub fn last_state(&self) -> Option<(PairingState, ConnectionState)> {
        self.states.last().copied()
    }
}

impl LinkObserver for MockObserver {
    fn notify_state_changed(&mut self, pairing: PairingState, connection: ConnectionState) {
        self.states.push((pairing, connection));
    }

    fn notify_telemetry_updated(&mut self, snapshot: &TelemetrySnapshot) {
        self.telemetry.push(*snapshot);
    }

    fn pairing_code_offered(&mut self, code: i32) {
        self.codes.push(code);
    }
}

#[derive(Debug, Default)]
pub struct MockIdle {
    pub resets: usize,
}

impl IdleTimer for MockIdle {
    fn reset_idle_timer(&mut self) {
        self.resets += 1;
    }
}

#[derive(Debug)]
pub struct MockInput {
    pub sample: ControlSample,
    pub enabled: bool,
    pub reads: usize,
}

impl Default for MockInput {
    fn default() -> Self {
        Self {
            sample: ControlSample::NEUTRAL,
            enabled: true,
            reads: 0,
        }
    }
}

impl ControlSource for MockInput {
    fn read_control_sample(&mut self) -> ControlSample {
        self.reads += 1;
        self.sample
    }

    fn transmit_enabled(&self) -> bool {
        self.enabled
    }
}

//! Persisted pairing record

use pubremote_protocol::{MacAddress, UNSET_SECRET_CODE};
use serde::{Deserialize, Serialize};

use crate::pairing::PeerIdentity;
use crate::traits::{PeerStore, StoreError};

/// Current record layout version
pub const PEER_RECORD_VERSION: u8 = 1;

/// Upper bound on the encoded record size
pub const MAX_PEER_RECORD_SIZE: usize = 16;

/// Pairing data as stored in flash
///
/// The address and channel are kept even when the secret code is unset, so
/// the radio can still be pointed at the last known vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerRecord {
    pub version: u8,
    pub address: [u8; 6],
    pub channel: u8,
    pub secret_code: i32,
}

impl PeerRecord {
    /// Record for a remote that was never paired
    pub const UNPAIRED: Self = Self {
        version: PEER_RECORD_VERSION,
        address: [0; 6],
        channel: 1,
        secret_code: UNSET_SECRET_CODE,
    };

    /// Record for a committed pairing
    pub fn from_identity(peer: &PeerIdentity) -> Self {
        Self {
            version: PEER_RECORD_VERSION,
            address: peer.address.octets(),
            channel: peer.channel,
            secret_code: peer.secret_code,
        }
    }

    /// Check if this record holds a usable pairing
    pub fn is_paired(&self) -> bool {
        self.secret_code != UNSET_SECRET_CODE
    }

    /// Identity this record describes, if it holds a pairing
    pub fn identity(&self) -> Option<PeerIdentity> {
        self.is_paired().then(|| PeerIdentity {
            address: MacAddress::new(self.address),
            channel: self.channel,
            secret_code: self.secret_code,
        })
    }

    /// Serialize into `buf`, returning the used prefix
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], StoreError> {
        postcard::to_slice(self, buf).map_err(|_| StoreError::BufferTooSmall)
    }

    /// Deserialize a stored record
    pub fn decode(bytes: &[u8]) -> Result<Self, StoreError> {
        let record: Self = postcard::from_bytes(bytes).map_err(|_| StoreError::Corrupted)?;
        if record.version != PEER_RECORD_VERSION {
            return Err(StoreError::VersionMismatch);
        }
        Ok(record)
    }
}

impl Default for PeerRecord {
    fn default() -> Self {
        Self::UNPAIRED
    }
}

/// In-memory store; flash-backed stores keep one of these as their mirror
impl PeerStore for PeerRecord {
    fn load_peer(&mut self) -> Result<Option<(MacAddress, u8)>, StoreError> {
        if self.address == [0; 6] {
            return Ok(None);
        }
        Ok(Some((MacAddress::new(self.address), self.channel)))
    }

    fn save_peer(&mut self, peer: &PeerIdentity) -> Result<(), StoreError> {
        self.address = peer.address.octets();
        self.channel = peer.channel;
        Ok(())
    }

    fn load_secret_code(&mut self) -> Result<i32, StoreError> {
        Ok(self.secret_code)
    }

    fn save_secret_code(&mut self, code: i32) -> Result<(), StoreError> {
        self.secret_code = code;
        Ok(())
    }

    fn clear_peer(&mut self) -> Result<(), StoreError> {
        *self = PeerRecord::UNPAIRED;
        Ok(())
    }
}

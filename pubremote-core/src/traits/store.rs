//! Pairing persistence trait

use pubremote_protocol::MacAddress;

use crate::pairing::PeerIdentity;

/// Persistence failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Underlying flash operation failed
    Flash,
    /// Stored bytes do not decode
    Corrupted,
    /// Stored record was written by an incompatible layout
    VersionMismatch,
    /// Encode buffer too small for the record
    BufferTooSmall,
    /// Write queue is full
    Busy,
}

/// Durable storage for the pairing
///
/// Saves may be deferred (queued to a storage task); a successful return
/// only means the write was accepted.
pub trait PeerStore {
    /// Last saved vehicle address and channel, if any
    fn load_peer(&mut self) -> Result<Option<(MacAddress, u8)>, StoreError>;

    /// Persist the vehicle address and channel
    fn save_peer(&mut self, peer: &PeerIdentity) -> Result<(), StoreError>;

    /// Saved secret code, or the unset sentinel
    fn load_secret_code(&mut self) -> Result<i32, StoreError>;

    /// Persist the secret code
    fn save_secret_code(&mut self, code: i32) -> Result<(), StoreError>;

    /// Forget the vehicle: address, channel and secret code
    fn clear_peer(&mut self) -> Result<(), StoreError>;
}

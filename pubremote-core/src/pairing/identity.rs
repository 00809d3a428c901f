//! Identity of the paired vehicle

use pubremote_protocol::{MacAddress, UNSET_SECRET_CODE};

/// The vehicle this remote is bonded to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerIdentity {
    /// Vehicle hardware address; also the only datagram source accepted once
    /// a handshake is underway
    pub address: MacAddress,
    /// Radio channel the vehicle was last heard on
    pub channel: u8,
    /// Shared secret prepended to every control frame
    pub secret_code: i32,
}

impl PeerIdentity {
    /// Identity learned from a pairing init, before any code is agreed
    pub const fn new(address: MacAddress, channel: u8) -> Self {
        Self {
            address,
            channel,
            secret_code: UNSET_SECRET_CODE,
        }
    }

    /// Check if a secret code has been agreed
    pub fn has_secret(&self) -> bool {
        self.secret_code != UNSET_SECRET_CODE
    }
}

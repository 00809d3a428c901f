//! Datagram classification
//!
//! The link has no framing layer of its own: the transport delivers whole
//! datagrams, and the datagram length alone identifies the message.

use crate::address::MAC_ADDRESS_LEN;
use crate::control::CONTROL_FRAME_LEN;
use crate::handshake::{PAIRING_ACK_LEN, SECRET_CODE_LEN};
use crate::telemetry::TELEMETRY_FRAME_LEN;

/// Largest payload the wireless transport carries in one datagram
pub const MAX_DATAGRAM_LEN: usize = 250;

/// Errors from decoding or encoding a datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Datagram length does not match the message it was decoded as
    WrongLength { expected: usize, actual: usize },
    /// Datagram exceeds [`MAX_DATAGRAM_LEN`]
    TooLarge(usize),
}

/// Messages the remote can receive, keyed by datagram length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    /// Handshake step 1: the vehicle announces its own address
    PairingInit,
    /// Handshake steps 2 and 3: a big-endian secret code or confirmation
    SecretCode,
    /// Periodic vehicle status
    Telemetry,
}

impl MessageKind {
    /// Classify an inbound datagram by its length
    ///
    /// Returns `None` for lengths the remote never expects to receive.
    pub fn classify(len: usize) -> Option<Self> {
        match len {
            MAC_ADDRESS_LEN => Some(MessageKind::PairingInit),
            SECRET_CODE_LEN => Some(MessageKind::SecretCode),
            TELEMETRY_FRAME_LEN => Some(MessageKind::Telemetry),
            _ => None,
        }
    }

    /// Expected datagram length for this message
    pub fn expected_len(self) -> usize {
        match self {
            MessageKind::PairingInit => MAC_ADDRESS_LEN,
            MessageKind::SecretCode => SECRET_CODE_LEN,
            MessageKind::Telemetry => TELEMETRY_FRAME_LEN,
        }
    }
}

// Outbound and inbound lengths must stay distinct.
const _: () = assert!(CONTROL_FRAME_LEN != TELEMETRY_FRAME_LEN);
const _: () = assert!(PAIRING_ACK_LEN != SECRET_CODE_LEN);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_lengths() {
        assert_eq!(MessageKind::classify(6), Some(MessageKind::PairingInit));
        assert_eq!(MessageKind::classify(4), Some(MessageKind::SecretCode));
        assert_eq!(MessageKind::classify(32), Some(MessageKind::Telemetry));
    }

    #[test]
    fn test_classify_unknown_lengths() {
        for len in [0, 1, 2, 3, 5, 7, 15, 31, 33, MAX_DATAGRAM_LEN] {
            assert_eq!(MessageKind::classify(len), None, "len {}", len);
        }
    }

    #[test]
    fn test_len_matches_classify() {
        for kind in [
            MessageKind::PairingInit,
            MessageKind::SecretCode,
            MessageKind::Telemetry,
        ] {
            assert_eq!(MessageKind::classify(kind.expected_len()), Some(kind));
        }
    }
}

//! Pairing handshake payloads
//!
//! The vehicle drives a three-message exchange:
//!
//! 1. Pairing init: 6 bytes, the vehicle's own hardware address. The remote
//!    answers with a single [`PAIRING_ACK`] byte.
//! 2. Bond: 4 bytes, big-endian `i32` secret code shown to the user.
//! 3. Complete: 4 bytes, big-endian `i32`. [`PAIRING_CONFIRMED`] commits the
//!    pairing; any other value rejects it.

use crate::address::MacAddress;
use crate::frame::FrameError;

/// Length of the bond and complete datagrams
pub const SECRET_CODE_LEN: usize = 4;

/// Length of the acknowledgement the remote sends after a pairing init
pub const PAIRING_ACK_LEN: usize = 1;

/// Acknowledgement payload
///
/// Opaque to the vehicle, which only checks that something arrived.
pub const PAIRING_ACK: [u8; PAIRING_ACK_LEN] = [0xA4];

/// Secret code value meaning "no code" (never paired, or pairing reset)
pub const UNSET_SECRET_CODE: i32 = -1;

/// Value of the complete datagram that confirms a pairing
pub const PAIRING_CONFIRMED: i32 = -1;

/// Parse a pairing init datagram into the address it announces
pub fn parse_pairing_init(payload: &[u8]) -> Result<MacAddress, FrameError> {
    MacAddress::from_slice(payload)
}

/// Decode a big-endian secret code datagram
pub fn decode_secret_code(payload: &[u8]) -> Result<i32, FrameError> {
    let bytes: [u8; SECRET_CODE_LEN] =
        payload.try_into().map_err(|_| FrameError::WrongLength {
            expected: SECRET_CODE_LEN,
            actual: payload.len(),
        })?;
    Ok(i32::from_be_bytes(bytes))
}

/// Encode a secret code as the vehicle sends it
pub fn encode_secret_code(code: i32) -> [u8; SECRET_CODE_LEN] {
    code.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_secret_code() {
        assert_eq!(decode_secret_code(&[0x00, 0x00, 0x16, 0x2E]), Ok(5678));
        assert_eq!(decode_secret_code(&[0xFF, 0xFF, 0xFF, 0xFF]), Ok(-1));
        assert_eq!(decode_secret_code(&[0x80, 0x00, 0x00, 0x00]), Ok(i32::MIN));
    }

    #[test]
    fn test_encode_secret_code() {
        assert_eq!(encode_secret_code(5678), [0x00, 0x00, 0x16, 0x2E]);
        assert_eq!(encode_secret_code(PAIRING_CONFIRMED), [0xFF; 4]);
    }

    #[test]
    fn test_decode_secret_code_wrong_length() {
        assert_eq!(
            decode_secret_code(&[1, 2, 3]),
            Err(FrameError::WrongLength {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_parse_pairing_init() {
        let addr = parse_pairing_init(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]).unwrap();
        assert_eq!(addr, MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]));
    }

    #[test]
    fn test_ack_is_single_byte() {
        assert_eq!(PAIRING_ACK.len(), 1);
    }
}

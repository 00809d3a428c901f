//! Hardware (MAC) addresses of link peers

use core::fmt;

use crate::frame::FrameError;

/// Length of a hardware address in bytes
pub const MAC_ADDRESS_LEN: usize = 6;

/// 6-byte hardware address identifying a peer on the link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacAddress(pub [u8; MAC_ADDRESS_LEN]);

impl MacAddress {
    /// Broadcast address, used before any peer is known
    pub const BROADCAST: Self = Self([0xFF; MAC_ADDRESS_LEN]);

    /// Create an address from its six octets
    pub const fn new(octets: [u8; MAC_ADDRESS_LEN]) -> Self {
        Self(octets)
    }

    /// Read an address from a slice that must be exactly six bytes long
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FrameError> {
        let octets: [u8; MAC_ADDRESS_LEN] =
            bytes.try_into().map_err(|_| FrameError::WrongLength {
                expected: MAC_ADDRESS_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(octets))
    }

    /// Raw octets
    pub const fn octets(&self) -> [u8; MAC_ADDRESS_LEN] {
        self.0
    }
}

impl From<[u8; MAC_ADDRESS_LEN]> for MacAddress {
    fn from(octets: [u8; MAC_ADDRESS_LEN]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice() {
        let addr = MacAddress::from_slice(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]).unwrap();
        assert_eq!(addr.octets(), [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }

    #[test]
    fn test_from_slice_wrong_length() {
        assert_eq!(
            MacAddress::from_slice(&[1, 2, 3]),
            Err(FrameError::WrongLength {
                expected: 6,
                actual: 3
            })
        );
    }

    #[test]
    fn test_display() {
        let addr = MacAddress::new([0xAA, 0xBB, 0x0C, 0xDD, 0xEE, 0x01]);
        assert_eq!(std::format!("{}", addr), "AA:BB:0C:DD:EE:01");
    }
}

//! Inbound datagram as delivered by the radio

use heapless::Vec;
use pubremote_protocol::{FrameError, MacAddress, MAX_DATAGRAM_LEN};

/// One received datagram with its receive metadata
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Datagram {
    sender: MacAddress,
    channel: u8,
    rssi: i8,
    payload: Vec<u8, MAX_DATAGRAM_LEN>,
}

impl Datagram {
    /// Copy a received payload
    pub fn new(
        sender: MacAddress,
        channel: u8,
        rssi: i8,
        payload: &[u8],
    ) -> Result<Self, FrameError> {
        let payload =
            Vec::from_slice(payload).map_err(|_| FrameError::TooLarge(payload.len()))?;
        Ok(Self {
            sender,
            channel,
            rssi,
            payload,
        })
    }

    pub fn sender(&self) -> MacAddress {
        self.sender
    }

    /// Channel the datagram arrived on
    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn rssi(&self) -> i8 {
        self.rssi
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

//! Single-entry peer registry
//!
//! The remote only ever talks to one vehicle. A transport keeps the
//! registered vehicle in a [`PeerSlot`]; registering a different vehicle
//! displaces the old one, which the transport then removes from the radio.

use pubremote_protocol::MacAddress;

/// The one peer registered with the radio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerSlot {
    peer: Option<MacAddress>,
}

impl PeerSlot {
    pub const EMPTY: Self = Self { peer: None };

    pub fn peer(&self) -> Option<MacAddress> {
        self.peer
    }

    pub fn contains(&self, peer: &MacAddress) -> bool {
        self.peer.as_ref() == Some(peer)
    }

    /// Peer that registering `peer` would displace
    ///
    /// `None` when the slot is empty or already holds `peer` (a channel move).
    pub fn displaced_by(&self, peer: &MacAddress) -> Option<MacAddress> {
        self.peer.filter(|current| current != peer)
    }

    /// Record `peer` as registered, returning the displaced peer
    ///
    /// Call only once the registration has been handed to the radio.
    pub fn register(&mut self, peer: MacAddress) -> Option<MacAddress> {
        let displaced = self.displaced_by(&peer);
        self.peer = Some(peer);
        displaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VEHICLE: MacAddress = MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    const OTHER: MacAddress = MacAddress::new([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);

    #[test]
    fn test_empty_slot() {
        let slot = PeerSlot::EMPTY;
        assert_eq!(slot.peer(), None);
        assert!(!slot.contains(&VEHICLE));
        assert_eq!(slot.displaced_by(&VEHICLE), None);
    }

    #[test]
    fn test_reregistering_same_peer_displaces_nothing() {
        let mut slot = PeerSlot::EMPTY;
        assert_eq!(slot.register(VEHICLE), None);
        assert_eq!(slot.register(VEHICLE), None);
        assert!(slot.contains(&VEHICLE));
    }

    #[test]
    fn test_new_vehicle_replaces_old() {
        let mut slot = PeerSlot::EMPTY;
        slot.register(VEHICLE);

        assert_eq!(slot.displaced_by(&OTHER), Some(VEHICLE));
        // Asking does not change the slot
        assert!(slot.contains(&VEHICLE));

        assert_eq!(slot.register(OTHER), Some(VEHICLE));
        assert!(slot.contains(&OTHER));
        assert!(!slot.contains(&VEHICLE));
    }

    #[test]
    fn test_any_number_of_vehicles_fit() {
        let mut slot = PeerSlot::EMPTY;
        for last in 0..=u8::MAX {
            slot.register(MacAddress::new([0x02, 0, 0, 0, 0, last]));
        }
        assert_eq!(slot.peer(), Some(MacAddress::new([0x02, 0, 0, 0, 0, 0xFF])));
        assert!(!slot.contains(&MacAddress::new([0x02, 0, 0, 0, 0, 0])));
    }
}

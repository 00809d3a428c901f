//! Wireless transport trait

use pubremote_protocol::MacAddress;

/// Transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Radio refused or failed to deliver the datagram
    SendFailed,
    /// Peer table has no room for another entry
    PeerTableFull,
    /// Channel outside the supported range, or radio refused to switch
    InvalidChannel,
    /// Radio not ready
    NotReady,
}

/// Connectionless datagram transport addressed by hardware address
///
/// Inbound datagrams are not pulled through this trait: the radio driver
/// pushes each one, with its sender, into the receive loop as a
/// [`Datagram`](crate::link::Datagram).
pub trait LinkTransport {
    /// Send one datagram to a registered peer
    fn send(&mut self, peer: &MacAddress, payload: &[u8]) -> Result<(), TransportError>;

    /// Register a peer, or update its channel if already registered
    ///
    /// The remote talks to one vehicle at a time; a transport may drop the
    /// previously registered peer.
    fn add_peer(&mut self, peer: &MacAddress, channel: u8) -> Result<(), TransportError>;

    /// Check if a peer is registered
    fn peer_exists(&self, peer: &MacAddress) -> bool;

    /// Tune the radio
    fn set_channel(&mut self, channel: u8) -> Result<(), TransportError>;
}

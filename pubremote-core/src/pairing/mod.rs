//! Pairing handshake

pub mod coordinator;
pub mod identity;

pub use coordinator::{PairingCoordinator, PairingError, PairingOutcome, PairingStatus};
pub use identity::PeerIdentity;

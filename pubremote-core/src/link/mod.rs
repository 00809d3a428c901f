//! Link loops
//!
//! The firmware runs three independent loops over one shared [`LinkState`]:
//!
//! - [`Receiver`]: dispatches inbound datagrams, owns the pairing handshake
//!   and is the only writer of the telemetry snapshot
//! - [`Transmitter`]: sends throttled control frames to the paired vehicle
//! - [`Supervisor`]: polls connection liveness on a fixed tick
//!
//! Each loop is a plain struct driven with explicit timestamps; the async
//! tasks around them only wait and forward.

pub mod datagram;
pub mod hopper;
pub mod peer_slot;
pub mod receiver;
pub mod shared;
pub mod supervisor;
pub mod transmitter;

pub use datagram::Datagram;
pub use hopper::ChannelHopper;
pub use peer_slot::PeerSlot;
pub use receiver::{Dispatch, IdleReport, IgnoreReason, Receiver};
pub use shared::LinkState;
pub use supervisor::{Supervisor, SupervisorReport};
pub use transmitter::{TransmitOutcome, Transmitter};

//! Link state machines
//!
//! Pairing and connection are two independent finite machines. Their
//! transition tables live here; the components that decide *when* an event
//! fires live in [`crate::pairing`] and [`crate::connection`].

pub mod events;
pub mod machine;

pub use events::{ConnectionEvent, PairingEvent};
pub use machine::{ConnectionState, PairingState};

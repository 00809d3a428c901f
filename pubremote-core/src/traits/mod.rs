//! Collaborator traits
//!
//! The link logic talks to the radio, flash, screen and inputs only through
//! these traits, so it runs unchanged against test doubles.

pub mod input;
pub mod store;
pub mod transport;
pub mod ui;

pub use input::ControlSource;
pub use store::{PeerStore, StoreError};
pub use transport::{LinkTransport, TransportError};
pub use ui::{IdleTimer, LinkObserver};

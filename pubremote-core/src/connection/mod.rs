//! Connection liveness

pub mod monitor;

pub use monitor::{ConnectionMonitor, Transition};

//! Board-agnostic link logic for the handheld remote
//!
//! This crate contains everything about the remote <-> vehicle link that does
//! not depend on a particular radio or flash driver:
//!
//! - Pairing handshake state machine
//! - Connection liveness monitor
//! - Receive dispatch and throttled control transmission
//! - Channel hopping while searching for the vehicle
//! - Shared link state handle for the concurrent loops
//! - Collaborator traits (transport, persistence, UI, input)
//! - Link tuning configuration and the persisted peer record
//! - Thumbstick calibration
//!
//! Time is passed in explicitly as monotonic milliseconds, so every component
//! can be driven by synthetic clocks in tests.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod connection;
pub mod link;
pub mod pairing;
pub mod state;
pub mod stick;
pub mod telemetry;
pub mod traits;

#[cfg(test)]
mod mocks;

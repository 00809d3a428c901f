//! Remote <-> vehicle link protocol
//!
//! This crate defines the datagrams exchanged between the handheld remote and
//! the vehicle controller over a connectionless, single-hop wireless link.
//! Datagrams carry no type byte: the receiver tells them apart by length.
//!
//! # Datagrams
//!
//! ```text
//! ┌──────────────┬───────┬───────────┬──────────────────────────────────────┐
//! │ Name         │ Len   │ Direction │ Payload                              │
//! ├──────────────┼───────┼───────────┼──────────────────────────────────────┤
//! │ Pairing init │ 6     │ V → R     │ sender's own hardware address        │
//! │ Pairing ack  │ 1     │ R → V     │ opaque sentinel byte                 │
//! │ Secret code  │ 4     │ V → R     │ i32, big-endian (bond and complete)  │
//! │ Telemetry    │ 32    │ V → R     │ see [`telemetry`]                    │
//! │ Control      │ 15    │ R → V     │ see [`control`]                      │
//! └──────────────┴───────┴───────────┴──────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function over fixed-size buffers.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod address;
pub mod control;
pub mod frame;
pub mod handshake;
pub mod telemetry;
pub mod units;

pub use address::MacAddress;
pub use control::{decode_control, encode_control, ControlSample, CONTROL_FRAME_LEN};
pub use frame::{FrameError, MessageKind, MAX_DATAGRAM_LEN};
pub use handshake::{
    decode_secret_code, encode_secret_code, parse_pairing_init, PAIRING_ACK, PAIRING_CONFIRMED,
    UNSET_SECRET_CODE,
};
pub use telemetry::{decode_telemetry, SwitchState, Telemetry, TELEMETRY_FRAME_LEN};

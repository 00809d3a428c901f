//! Inter-task communication channels
//!
//! Defines the statics shared between the link tasks. The link state itself
//! lives in [`LINK`]; everything else is a one-way hand-off between tasks.

use core::cell::Cell;
use core::sync::atomic::AtomicBool;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use pubremote_core::config::PeerRecord;
use pubremote_core::link::{Datagram, LinkState};
use pubremote_core::state::{ConnectionState, PairingState};
use pubremote_core::telemetry::TelemetrySnapshot;
use pubremote_protocol::ControlSample;

use crate::config::LINK_CONFIG;
use crate::radio::RadioCommand;

/// Channel capacity for radio commands (sends, peer registration, retunes)
const RADIO_COMMAND_QUEUE_SIZE: usize = 8;

/// Pairing, connection and telemetry shared by the receive, transmit and
/// supervisor tasks
pub static LINK: LinkState<CriticalSectionRawMutex> = LinkState::new(&LINK_CONFIG);

/// Latest inbound datagram; an unprocessed one is overwritten by the next
pub static INBOUND: Signal<CriticalSectionRawMutex, Datagram> = Signal::new();

/// Work for the task that owns the ESP-NOW driver
pub static RADIO_COMMANDS: Channel<
    CriticalSectionRawMutex,
    RadioCommand,
    RADIO_COMMAND_QUEUE_SIZE,
> = Channel::new();

/// Peer record waiting to be written to flash (latest wins)
pub static PEER_SAVE: Signal<CriticalSectionRawMutex, PeerRecord> = Signal::new();

/// User asked to forget the vehicle
pub static UNPAIR: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Pairing screen opened (true) or closed (false)
pub static PAIRING_MODE: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Most recent stick and button sample
pub static CONTROL_SAMPLE: Mutex<CriticalSectionRawMutex, Cell<ControlSample>> =
    Mutex::new(Cell::new(ControlSample::NEUTRAL));

/// Transmission suppressed by the pocket switch
pub static POCKET_MODE: AtomicBool = AtomicBool::new(false);

/// Link status for the screen
pub static UI_STATE: Signal<CriticalSectionRawMutex, (PairingState, ConnectionState)> =
    Signal::new();

/// Telemetry for the screen
pub static UI_TELEMETRY: Signal<CriticalSectionRawMutex, TelemetrySnapshot> = Signal::new();

/// Secret code to show on the pairing screen
pub static UI_PAIRING_CODE: Signal<CriticalSectionRawMutex, i32> = Signal::new();

/// Vehicle or user activity; restarts the sleep countdown
pub static ACTIVITY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

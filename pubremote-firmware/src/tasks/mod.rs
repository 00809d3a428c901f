//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.
//! The three link tasks drive the board-agnostic loops from pubremote-core
//! with the monotonic clock below.

use embassy_time::Instant;

pub mod input;
pub mod radio;
pub mod receiver;
pub mod storage;
pub mod supervisor;
pub mod transmitter;
pub mod ui;

pub use input::{input_task, Buttons, Thumbstick};
pub use radio::radio_task;
pub use receiver::{receiver_task, LinkReceiver};
pub use storage::storage_task;
pub use supervisor::{supervisor_task, LinkSupervisor};
pub use transmitter::{transmitter_task, LinkTransmitter};
pub use ui::ui_task;

/// Milliseconds since boot, the timebase of every link loop
pub fn now_ms() -> u64 {
    Instant::now().as_millis()
}

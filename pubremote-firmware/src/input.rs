//! Control source backed by the input task's latest sample

use core::sync::atomic::Ordering;

use pubremote_core::traits::ControlSource;
use pubremote_protocol::ControlSample;

use crate::channels::{CONTROL_SAMPLE, POCKET_MODE};

/// Reads what the input task last published
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState;

impl InputState {
    /// Replace the current sample
    pub fn publish(sample: ControlSample) {
        CONTROL_SAMPLE.lock(|cell| cell.set(sample));
    }

    pub fn set_pocket_mode(enabled: bool) {
        POCKET_MODE.store(enabled, Ordering::Relaxed);
    }
}

impl ControlSource for InputState {
    fn read_control_sample(&mut self) -> ControlSample {
        CONTROL_SAMPLE.lock(|cell| cell.get())
    }

    fn transmit_enabled(&self) -> bool {
        !POCKET_MODE.load(Ordering::Relaxed)
    }
}

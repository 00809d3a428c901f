//! Control input trait

use pubremote_protocol::ControlSample;

/// Source of the stick and button state sent to the vehicle
pub trait ControlSource {
    /// Latest input sample
    fn read_control_sample(&mut self) -> ControlSample;

    /// False while transmission is suppressed (pocket mode)
    fn transmit_enabled(&self) -> bool;
}

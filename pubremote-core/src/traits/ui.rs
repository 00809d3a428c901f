//! Screen and power-management hooks

use crate::state::{ConnectionState, PairingState};
use crate::telemetry::TelemetrySnapshot;

/// Receives link changes for display
///
/// Called from the link loops; implementations must not block.
pub trait LinkObserver {
    /// Pairing or connection state changed
    fn notify_state_changed(&mut self, pairing: PairingState, connection: ConnectionState);

    /// New telemetry is available, or telemetry was cleared
    fn notify_telemetry_updated(&mut self, snapshot: &TelemetrySnapshot);

    /// The vehicle offered a secret code for the user to compare
    fn pairing_code_offered(&mut self, code: i32);
}

/// Inactivity timer that puts the remote to sleep
pub trait IdleTimer {
    /// Vehicle activity counts as user activity
    fn reset_idle_timer(&mut self);
}

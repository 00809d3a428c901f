//! Screen and sleep-timer adapters
//!
//! The link loops report through these handles; each call only raises a
//! signal, so the screen task always renders the latest value.

use pubremote_core::state::{ConnectionState, PairingState};
use pubremote_core::telemetry::TelemetrySnapshot;
use pubremote_core::traits::{IdleTimer, LinkObserver};

use crate::channels::{ACTIVITY, UI_PAIRING_CODE, UI_STATE, UI_TELEMETRY};

/// Forwards link changes to the screen task
#[derive(Debug, Clone, Copy, Default)]
pub struct UiNotifier;

impl LinkObserver for UiNotifier {
    fn notify_state_changed(&mut self, pairing: PairingState, connection: ConnectionState) {
        UI_STATE.signal((pairing, connection));
    }

    fn notify_telemetry_updated(&mut self, snapshot: &TelemetrySnapshot) {
        UI_TELEMETRY.signal(*snapshot);
    }

    fn pairing_code_offered(&mut self, code: i32) {
        UI_PAIRING_CODE.signal(code);
    }
}

/// Counts vehicle traffic as activity
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleReset;

impl IdleTimer for IdleReset {
    fn reset_idle_timer(&mut self) {
        ACTIVITY.signal(());
    }
}

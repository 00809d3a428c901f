//! Screen task
//!
//! Stands in for the display: renders the latest link status, telemetry and
//! pairing code to the log, and reports when the remote has been idle long
//! enough to sleep.

use defmt::*;
use embassy_futures::select::{select4, Either4};
use embassy_time::{with_timeout, Duration};

use pubremote_core::telemetry::TelemetrySnapshot;

use crate::channels::{ACTIVITY, UI_PAIRING_CODE, UI_STATE, UI_TELEMETRY};

/// Inactivity before the remote counts as idle
const SLEEP_TIMEOUT_S: u64 = 120;

/// Screen task - shows link changes as they are signalled
#[embassy_executor::task]
pub async fn ui_task() {
    info!("UI task started");

    let mut idle = false;

    loop {
        let event = with_timeout(
            Duration::from_secs(SLEEP_TIMEOUT_S),
            select4(
                UI_STATE.wait(),
                UI_TELEMETRY.wait(),
                UI_PAIRING_CODE.wait(),
                ACTIVITY.wait(),
            ),
        )
        .await;

        match event {
            Ok(Either4::First((pairing, connection))) => {
                info!("Status: {:?} / {:?}", pairing, connection);
            }
            Ok(Either4::Second(snapshot)) => show_telemetry(&snapshot),
            Ok(Either4::Third(code)) => info!("Confirm pairing code {} on the vehicle", code),
            Ok(Either4::Fourth(())) => {
                if idle {
                    info!("Activity, waking");
                    idle = false;
                }
            }
            Err(_) => {
                if !idle {
                    info!("Idle for {} s", SLEEP_TIMEOUT_S);
                    idle = true;
                }
            }
        }
    }
}

fn show_telemetry(snapshot: &TelemetrySnapshot) {
    if !snapshot.has_data() {
        info!("Telemetry: no data");
        return;
    }
    let t = &snapshot.telemetry;
    debug!(
        "Telemetry: {} km/h, {} V, duty {:?}, signal {:?}",
        snapshot.speed_kph(),
        t.input_voltage,
        snapshot.duty_status(),
        snapshot.signal_quality()
    );
}

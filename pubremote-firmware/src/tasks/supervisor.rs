//! Connection supervisor task

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Ticker};

use pubremote_core::link::Supervisor;

use super::now_ms;
use crate::storage::FlashPeerStore;
use crate::ui::UiNotifier;

pub type LinkSupervisor = Supervisor<'static, CriticalSectionRawMutex, FlashPeerStore, UiNotifier>;

/// Supervisor task - polls connection liveness on a fixed tick
#[embassy_executor::task]
pub async fn supervisor_task(mut supervisor: LinkSupervisor, period: Duration) {
    info!("Supervisor task started");

    let mut ticker = Ticker::every(period);

    loop {
        ticker.next().await;

        let Some(report) = supervisor.tick(now_ms()) else {
            continue;
        };
        info!(
            "Connection {:?} -> {:?}",
            report.transition.from, report.transition.to
        );
        if let Some(Err(e)) = report.persisted {
            warn!("Saving connected channel failed: {:?}", e);
        }
    }
}

//! Shared link state
//!
//! One handle shared by the three link loops. Each field has a single
//! writer: pairing status is published by the receiver, the connection
//! state is owned by the [`ConnectionMonitor`] inside, and telemetry is
//! written only by the receiver. Everyone else reads copies.

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::config::LinkConfig;
use crate::connection::{ConnectionMonitor, Transition};
use crate::pairing::PairingStatus;
use crate::state::{ConnectionEvent, ConnectionState, PairingState};
use crate::telemetry::TelemetrySnapshot;

/// Synchronized link state
///
/// `M` is the raw mutex flavour: `CriticalSectionRawMutex` on target,
/// `NoopRawMutex` in single-threaded tests.
pub struct LinkState<M: RawMutex> {
    pairing: Mutex<M, Cell<PairingStatus>>,
    connection: Mutex<M, RefCell<ConnectionMonitor>>,
    telemetry: Mutex<M, Cell<TelemetrySnapshot>>,
}

impl<M: RawMutex> LinkState<M> {
    /// Unpaired, disconnected, no telemetry
    pub const fn new(config: &LinkConfig) -> Self {
        Self {
            pairing: Mutex::new(Cell::new(PairingStatus::UNPAIRED)),
            connection: Mutex::new(RefCell::new(ConnectionMonitor::new(config))),
            telemetry: Mutex::new(Cell::new(TelemetrySnapshot::EMPTY)),
        }
    }

    pub fn pairing(&self) -> PairingStatus {
        self.pairing.lock(|cell| cell.get())
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection.lock(|monitor| monitor.borrow().state())
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.telemetry.lock(|cell| cell.get())
    }

    /// Both state machines, for display
    pub fn status(&self) -> (PairingState, ConnectionState) {
        (self.pairing().state, self.connection())
    }

    pub(crate) fn publish_pairing(&self, status: PairingStatus) {
        self.pairing.lock(|cell| cell.set(status));
    }

    pub(crate) fn publish_telemetry(&self, snapshot: TelemetrySnapshot) {
        self.telemetry.lock(|cell| cell.set(snapshot));
    }

    pub(crate) fn force_connection(&self, event: ConnectionEvent, now_ms: u64) -> Transition {
        self.connection
            .lock(|monitor| monitor.borrow_mut().force(event, now_ms))
    }

    pub(crate) fn poll_connection(&self, now_ms: u64) -> Option<Transition> {
        let last_telemetry = self.telemetry().last_updated;
        self.connection
            .lock(|monitor| monitor.borrow_mut().poll(now_ms, last_telemetry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use pubremote_protocol::Telemetry;

    #[test]
    fn test_initial_state() {
        let link = LinkState::<NoopRawMutex>::new(&LinkConfig::DEFAULT);
        assert_eq!(
            link.status(),
            (PairingState::Unpaired, ConnectionState::Disconnected)
        );
        assert!(!link.telemetry().has_data());
    }

    #[test]
    fn test_poll_reads_published_telemetry() {
        let link = LinkState::<NoopRawMutex>::new(&LinkConfig::DEFAULT);
        link.force_connection(ConnectionEvent::Connect, 0);
        assert_eq!(link.poll_connection(100), None);

        link.publish_telemetry(TelemetrySnapshot::received(Telemetry::ZERO, 150, -50));
        let t = link.poll_connection(200).unwrap();
        assert_eq!(t.to, ConnectionState::Connected);
        assert_eq!(link.connection(), ConnectionState::Connected);
    }
}

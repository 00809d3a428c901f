//! Pairing and connection state definitions
//!
//! Both machines stay in their current state for any event that has no
//! entry in the table.

use super::events::{ConnectionEvent, PairingEvent};

/// Where the remote is in the pairing handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairingState {
    /// No vehicle known; waiting for a pairing init
    #[default]
    Unpaired,
    /// Init acknowledged; waiting for the vehicle's secret code
    Pairing,
    /// Secret code shown to the user; waiting for confirmation
    Pending,
    /// Bonded to a vehicle
    Paired,
}

/// Liveness of the link to the paired vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    #[default]
    Disconnected,
    /// Paired but no telemetry seen yet
    Connecting,
    /// Telemetry arriving within the command timeout
    Connected,
    /// Telemetry recently stopped; waiting out the grace period
    Reconnecting,
}

impl PairingState {
    /// Check if a handshake is in flight
    pub fn is_handshaking(&self) -> bool {
        matches!(self, PairingState::Pairing | PairingState::Pending)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: PairingEvent) -> Self {
        use PairingEvent::*;
        use PairingState::*;

        match (self, event) {
            (Unpaired, InitAccepted) => Pairing,
            (Unpaired, Restored) => Paired,

            (Pairing, CodeOffered) => Pending,
            (Pairing, Rejected) => Unpaired,
            (Pairing, TimedOut) => Unpaired,

            (Pending, Confirmed) => Paired,
            (Pending, Rejected) => Unpaired,
            (Pending, TimedOut) => Unpaired,

            (_, Unpair) => Unpaired,

            _ => self,
        }
    }
}

impl ConnectionState {
    /// Check if the vehicle is currently reachable
    pub fn is_online(&self) -> bool {
        matches!(self, ConnectionState::Connected | ConnectionState::Reconnecting)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: ConnectionEvent) -> Self {
        use ConnectionEvent::*;
        use ConnectionState::*;

        match (self, event) {
            (_, Connect) => Connecting,
            (_, Disconnect) => Disconnected,

            (Connecting, TelemetryFresh) => Connected,
            (Connecting, GiveUp) => Disconnected,

            (Connected, TelemetryStale) => Reconnecting,

            (Reconnecting, TelemetryFresh) => Connected,
            (Reconnecting, GiveUp) => Disconnected,

            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_happy_path() {
        let state = PairingState::Unpaired
            .transition(PairingEvent::InitAccepted)
            .transition(PairingEvent::CodeOffered)
            .transition(PairingEvent::Confirmed);
        assert_eq!(state, PairingState::Paired);
    }

    #[test]
    fn test_pairing_rejection_and_timeout_revert() {
        assert_eq!(
            PairingState::Pending.transition(PairingEvent::Rejected),
            PairingState::Unpaired
        );
        assert_eq!(
            PairingState::Pairing.transition(PairingEvent::Rejected),
            PairingState::Unpaired
        );
        assert_eq!(
            PairingState::Pairing.transition(PairingEvent::TimedOut),
            PairingState::Unpaired
        );
        assert_eq!(
            PairingState::Pending.transition(PairingEvent::TimedOut),
            PairingState::Unpaired
        );
    }

    #[test]
    fn test_pairing_out_of_order_events_ignored() {
        assert_eq!(
            PairingState::Unpaired.transition(PairingEvent::Confirmed),
            PairingState::Unpaired
        );
        assert_eq!(
            PairingState::Paired.transition(PairingEvent::InitAccepted),
            PairingState::Paired
        );
        assert_eq!(
            PairingState::Pairing.transition(PairingEvent::Confirmed),
            PairingState::Pairing
        );
        assert_eq!(
            PairingState::Paired.transition(PairingEvent::TimedOut),
            PairingState::Paired
        );
    }

    #[test]
    fn test_unpair_from_any_state() {
        for state in [
            PairingState::Unpaired,
            PairingState::Pairing,
            PairingState::Pending,
            PairingState::Paired,
        ] {
            assert_eq!(state.transition(PairingEvent::Unpair), PairingState::Unpaired);
        }
    }

    #[test]
    fn test_connection_flow() {
        let state = ConnectionState::Disconnected.transition(ConnectionEvent::Connect);
        assert_eq!(state, ConnectionState::Connecting);

        let state = state.transition(ConnectionEvent::TelemetryFresh);
        assert_eq!(state, ConnectionState::Connected);

        let state = state.transition(ConnectionEvent::TelemetryStale);
        assert_eq!(state, ConnectionState::Reconnecting);

        let state = state.transition(ConnectionEvent::TelemetryFresh);
        assert_eq!(state, ConnectionState::Connected);
    }

    #[test]
    fn test_give_up_only_while_searching() {
        assert_eq!(
            ConnectionState::Connecting.transition(ConnectionEvent::GiveUp),
            ConnectionState::Disconnected
        );
        assert_eq!(
            ConnectionState::Reconnecting.transition(ConnectionEvent::GiveUp),
            ConnectionState::Disconnected
        );
        assert_eq!(
            ConnectionState::Connected.transition(ConnectionEvent::GiveUp),
            ConnectionState::Connected
        );
    }

    #[test]
    fn test_disconnected_ignores_telemetry_events() {
        assert_eq!(
            ConnectionState::Disconnected.transition(ConnectionEvent::TelemetryFresh),
            ConnectionState::Disconnected
        );
    }

    #[test]
    fn test_is_online() {
        assert!(ConnectionState::Connected.is_online());
        assert!(ConnectionState::Reconnecting.is_online());
        assert!(!ConnectionState::Connecting.is_online());
        assert!(!ConnectionState::Disconnected.is_online());
    }
}

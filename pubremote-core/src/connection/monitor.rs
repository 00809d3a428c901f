//! Connection monitor
//!
//! Derives the connection state from two clocks: when telemetry last arrived
//! and when the state last changed. Polled on a fixed tick, so detection
//! latency is at most one poll period.
//!
//! | state        | checked each poll                       | next         |
//! |--------------|-----------------------------------------|--------------|
//! | Connecting   | since change > give-up                  | Disconnected |
//! | Connecting   | telemetry seen, age < give-up           | Connected    |
//! | Connected    | telemetry age > command timeout         | Reconnecting |
//! | Reconnecting | since change > give-up                  | Disconnected |
//! | Reconnecting | telemetry age < reconnect grace         | Connected    |
//!
//! Disconnected is left only by a forced `Connect`.

use crate::config::LinkConfig;
use crate::state::{ConnectionEvent, ConnectionState};

/// A state change reported by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: ConnectionState,
    pub to: ConnectionState,
}

/// Sole owner of the connection state
#[derive(Debug, Clone)]
pub struct ConnectionMonitor {
    state: ConnectionState,
    last_change_ms: u64,
    command_timeout_ms: u64,
    reconnect_grace_ms: u64,
    give_up_timeout_ms: u64,
}

impl ConnectionMonitor {
    /// Create a disconnected monitor
    pub const fn new(config: &LinkConfig) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            last_change_ms: 0,
            command_timeout_ms: config.command_timeout_ms as u64,
            reconnect_grace_ms: config.reconnect_grace_ms as u64,
            give_up_timeout_ms: config.give_up_timeout_ms as u64,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Time of the last state change
    pub fn last_change_ms(&self) -> u64 {
        self.last_change_ms
    }

    /// Evaluate the liveness table
    ///
    /// `last_telemetry_ms` is 0 if no telemetry has arrived since the last
    /// reset.
    pub fn poll(&mut self, now_ms: u64, last_telemetry_ms: u64) -> Option<Transition> {
        let since_change = now_ms.saturating_sub(self.last_change_ms);
        let seen = last_telemetry_ms > 0;
        let age = now_ms.saturating_sub(last_telemetry_ms);

        let event = match self.state {
            ConnectionState::Disconnected => None,
            ConnectionState::Connecting => {
                if since_change > self.give_up_timeout_ms {
                    Some(ConnectionEvent::GiveUp)
                } else if seen && age < self.give_up_timeout_ms {
                    Some(ConnectionEvent::TelemetryFresh)
                } else {
                    None
                }
            }
            ConnectionState::Connected => {
                (age > self.command_timeout_ms).then_some(ConnectionEvent::TelemetryStale)
            }
            ConnectionState::Reconnecting => {
                if since_change > self.give_up_timeout_ms {
                    Some(ConnectionEvent::GiveUp)
                } else if seen && age < self.reconnect_grace_ms {
                    Some(ConnectionEvent::TelemetryFresh)
                } else {
                    None
                }
            }
        }?;

        self.apply(event, now_ms)
    }

    /// Force a transition
    ///
    /// `Connect` and `Disconnect` always restart the state clock, even when
    /// the state is unchanged, and always report a transition.
    pub fn force(&mut self, event: ConnectionEvent, now_ms: u64) -> Transition {
        let from = self.state;
        self.state = from.transition(event);
        self.last_change_ms = now_ms;
        Transition {
            from,
            to: self.state,
        }
    }

    fn apply(&mut self, event: ConnectionEvent, now_ms: u64) -> Option<Transition> {
        let from = self.state;
        let to = from.transition(event);
        if to == from {
            return None;
        }
        self.state = to;
        self.last_change_ms = now_ms;
        Some(Transition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> ConnectionMonitor {
        ConnectionMonitor::new(&LinkConfig::DEFAULT)
    }

    /// Monitor that entered Connected at t=1000 with telemetry at t=1000
    fn connected() -> ConnectionMonitor {
        let mut m = monitor();
        m.force(ConnectionEvent::Connect, 500);
        assert!(m.poll(1000, 1000).is_some());
        assert_eq!(m.state(), ConnectionState::Connected);
        m
    }

    #[test]
    fn test_disconnected_never_moves_on_its_own() {
        let mut m = monitor();
        assert_eq!(m.poll(10, 5), None);
        assert_eq!(m.poll(100_000, 99_999), None);
        assert_eq!(m.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_connecting_to_connected_on_telemetry() {
        let mut m = monitor();
        m.force(ConnectionEvent::Connect, 0);

        assert_eq!(m.poll(200, 0), None);
        let t = m.poll(400, 350).unwrap();
        assert_eq!(t.from, ConnectionState::Connecting);
        assert_eq!(t.to, ConnectionState::Connected);
        assert_eq!(m.last_change_ms(), 400);
    }

    #[test]
    fn test_connecting_ignores_telemetry_older_than_give_up() {
        let mut m = monitor();
        m.force(ConnectionEvent::Connect, 29_000);
        // Telemetry exactly at the give-up age is not fresh
        assert_eq!(m.poll(30_001, 1), None);
        assert_eq!(
            m.poll(30_001, 2),
            Some(Transition {
                from: ConnectionState::Connecting,
                to: ConnectionState::Connected,
            })
        );
    }

    #[test]
    fn test_connecting_gives_up_after_30s() {
        let mut m = monitor();
        m.force(ConnectionEvent::Connect, 1000);

        assert_eq!(m.poll(31_000, 0), None);
        let t = m.poll(31_001, 0).unwrap();
        assert_eq!(t.to, ConnectionState::Disconnected);
    }

    #[test]
    fn test_connecting_give_up_checked_before_telemetry() {
        let mut m = monitor();
        m.force(ConnectionEvent::Connect, 0);
        let t = m.poll(30_001, 30_000).unwrap();
        assert_eq!(t.to, ConnectionState::Disconnected);
    }

    #[test]
    fn test_connected_stays_at_999ms() {
        let mut m = connected();
        assert_eq!(m.poll(1999, 1000), None);
        assert_eq!(m.poll(2000, 1000), None);
        assert_eq!(m.state(), ConnectionState::Connected);
    }

    #[test]
    fn test_connected_to_reconnecting_at_1001ms() {
        let mut m = connected();
        let t = m.poll(2001, 1000).unwrap();
        assert_eq!(t.from, ConnectionState::Connected);
        assert_eq!(t.to, ConnectionState::Reconnecting);
        assert_eq!(m.last_change_ms(), 2001);
    }

    #[test]
    fn test_reconnecting_recovers_within_grace() {
        let mut m = connected();
        m.poll(2001, 1000).unwrap();

        // Telemetry 1000ms old is not within the grace window
        assert_eq!(m.poll(3000, 2000), None);
        let t = m.poll(3000, 2001).unwrap();
        assert_eq!(t.to, ConnectionState::Connected);
    }

    #[test]
    fn test_reconnecting_gives_up_after_30s() {
        let mut m = connected();
        m.poll(2001, 1000).unwrap();

        assert_eq!(m.poll(32_001, 1000), None);
        let t = m.poll(32_002, 1000).unwrap();
        assert_eq!(t.from, ConnectionState::Reconnecting);
        assert_eq!(t.to, ConnectionState::Disconnected);
    }

    #[test]
    fn test_force_restarts_clock() {
        let mut m = monitor();
        m.force(ConnectionEvent::Connect, 0);
        let t = m.force(ConnectionEvent::Connect, 20_000);
        assert_eq!(t.from, ConnectionState::Connecting);
        assert_eq!(t.to, ConnectionState::Connecting);
        // Give-up now measured from the second connect
        assert_eq!(m.poll(40_000, 0), None);
        assert!(m.poll(50_001, 0).is_some());
    }

    #[test]
    fn test_force_disconnect() {
        let mut m = connected();
        let t = m.force(ConnectionEvent::Disconnect, 1500);
        assert_eq!(t.to, ConnectionState::Disconnected);
        assert_eq!(m.poll(1600, 1550), None);
    }

    #[test]
    fn test_clock_going_backwards_does_not_panic() {
        let mut m = connected();
        assert_eq!(m.poll(500, 1000), None);
        assert_eq!(m.state(), ConnectionState::Connected);
    }

    #[test]
    fn test_custom_timings() {
        let config = LinkConfig {
            command_timeout_ms: 300,
            reconnect_grace_ms: 250,
            give_up_timeout_ms: 5000,
            ..LinkConfig::DEFAULT
        };
        let mut m = ConnectionMonitor::new(&config);
        m.force(ConnectionEvent::Connect, 0);
        m.poll(100, 100).unwrap();
        assert_eq!(m.poll(401, 100).unwrap().to, ConnectionState::Reconnecting);
        assert_eq!(m.poll(5402, 100).unwrap().to, ConnectionState::Disconnected);
    }
}

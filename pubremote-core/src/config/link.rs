//! Link timing configuration

use serde::{Deserialize, Serialize};

/// Timing parameters for the link loops and state machines
///
/// All durations are milliseconds. Every field has a default, so a partial
/// `[link]` table in `remote.toml` only overrides what it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct LinkConfig {
    /// Connection monitor poll period
    pub monitor_tick_ms: u32,
    /// Control transmit loop period
    pub transmit_tick_ms: u32,
    /// Minimum spacing between control frames; also the staleness limit
    /// after which a connected link drops to reconnecting
    pub command_timeout_ms: u32,
    /// Telemetry newer than this recovers a reconnecting link
    pub reconnect_grace_ms: u32,
    /// Time spent searching before giving up, and telemetry freshness limit
    /// for the first connection
    pub give_up_timeout_ms: u32,
    /// A pairing step not completed within this window reverts to unpaired
    pub handshake_timeout_ms: u32,
    /// Radio silence before hopping to the next channel while searching
    pub channel_hop_interval_ms: u32,
}

impl LinkConfig {
    /// Stock timings
    pub const DEFAULT: Self = Self {
        monitor_tick_ms: 200,
        transmit_tick_ms: 20,
        command_timeout_ms: 1000,
        reconnect_grace_ms: 1000,
        give_up_timeout_ms: 30_000,
        handshake_timeout_ms: 60_000,
        channel_hop_interval_ms: 200,
    };

    /// Check the timings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ticks = [
            ("monitor_tick_ms", self.monitor_tick_ms),
            ("transmit_tick_ms", self.transmit_tick_ms),
            ("command_timeout_ms", self.command_timeout_ms),
            ("reconnect_grace_ms", self.reconnect_grace_ms),
            ("give_up_timeout_ms", self.give_up_timeout_ms),
            ("handshake_timeout_ms", self.handshake_timeout_ms),
            ("channel_hop_interval_ms", self.channel_hop_interval_ms),
        ];
        for (name, value) in ticks {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }

        if self.command_timeout_ms >= self.give_up_timeout_ms {
            return Err(ConfigError::CommandTimeoutTooLong);
        }
        if self.reconnect_grace_ms >= self.give_up_timeout_ms {
            return Err(ConfigError::GraceTooLong);
        }
        // A monitor slower than the staleness limit would skip Reconnecting
        if self.monitor_tick_ms > self.command_timeout_ms {
            return Err(ConfigError::MonitorTooSlow);
        }
        Ok(())
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Invalid link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Named duration is zero
    Zero(&'static str),
    /// Command timeout must be shorter than the give-up timeout
    CommandTimeoutTooLong,
    /// Reconnect grace must be shorter than the give-up timeout
    GraceTooLong,
    /// Monitor period exceeds the command timeout
    MonitorTooSlow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(LinkConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = LinkConfig {
            transmit_tick_ms: 0,
            ..LinkConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::Zero("transmit_tick_ms")));
    }

    #[test]
    fn test_ordering_rules() {
        let config = LinkConfig {
            command_timeout_ms: 30_000,
            ..LinkConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::CommandTimeoutTooLong));

        let config = LinkConfig {
            reconnect_grace_ms: 40_000,
            ..LinkConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::GraceTooLong));

        let config = LinkConfig {
            monitor_tick_ms: 1500,
            ..LinkConfig::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::MonitorTooSlow));
    }
}

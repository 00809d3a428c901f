//! Latest vehicle status as seen by the remote

use pubremote_protocol::{units, Telemetry};

/// RSSI reported when nothing has been heard
pub const RSSI_NONE: i8 = -100;

/// Most recent telemetry plus receive metadata
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetrySnapshot {
    pub telemetry: Telemetry,
    /// Receive time in ms; 0 means no telemetry since the last reset
    pub last_updated: u64,
    /// Signal strength of the frame, dBm
    pub rssi: i8,
}

impl TelemetrySnapshot {
    /// State before any telemetry arrives, and after a disconnect
    pub const EMPTY: Self = Self {
        telemetry: Telemetry::ZERO,
        last_updated: 0,
        rssi: RSSI_NONE,
    };

    /// Snapshot for a frame received at `now_ms`
    pub fn received(telemetry: Telemetry, now_ms: u64, rssi: i8) -> Self {
        Self {
            telemetry,
            // 0 is reserved for "never"
            last_updated: now_ms.max(1),
            rssi,
        }
    }

    /// Check if any telemetry has been received
    pub fn has_data(&self) -> bool {
        self.last_updated > 0
    }

    pub fn signal_quality(&self) -> SignalQuality {
        SignalQuality::from_rssi(self.rssi)
    }

    pub fn duty_status(&self) -> DutyStatus {
        DutyStatus::from_duty(self.telemetry.duty_cycle)
    }

    /// Ground speed in km/h, always positive
    pub fn speed_kph(&self) -> f32 {
        units::ms_to_kph(self.telemetry.speed).abs()
    }
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Coarse link quality bucket for the signal indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalQuality {
    None,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SignalQuality {
    pub fn from_rssi(rssi: i8) -> Self {
        match rssi {
            i8::MIN..=-100 => SignalQuality::None,
            -99..=-95 => SignalQuality::Poor,
            -94..=-85 => SignalQuality::Fair,
            -84..=-75 => SignalQuality::Good,
            _ => SignalQuality::Excellent,
        }
    }
}

/// Duty cycle warning level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DutyStatus {
    Normal,
    /// 70 % and above
    Caution,
    /// 80 % and above
    Warning,
    /// 90 % and above
    Critical,
}

impl DutyStatus {
    pub const CAUTION_THRESHOLD: u8 = 70;
    pub const WARNING_THRESHOLD: u8 = 80;
    pub const CRITICAL_THRESHOLD: u8 = 90;

    pub fn from_duty(duty: u8) -> Self {
        if duty >= Self::CRITICAL_THRESHOLD {
            DutyStatus::Critical
        } else if duty >= Self::WARNING_THRESHOLD {
            DutyStatus::Warning
        } else if duty >= Self::CAUTION_THRESHOLD {
            DutyStatus::Caution
        } else {
            DutyStatus::Normal
        }
    }
}

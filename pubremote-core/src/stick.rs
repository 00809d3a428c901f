//! Thumbstick calibration
//!
//! Converts raw 12-bit ADC readings into the -1.0..=1.0 axis values carried
//! by the control frame. Readings inside the deadband around the resting
//! position map to exactly zero; outside it the axis ramps linearly from the
//! deadband edge to the calibrated end stop.

use serde::{Deserialize, Serialize};

/// Largest raw reading of the 12-bit stick ADC
pub const STICK_MAX_RAW: u16 = (1 << 12) - 1;

/// Calibration of one stick axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct AxisCalibration {
    /// Raw reading at full negative deflection
    pub min: u16,
    /// Raw reading at rest
    pub center: u16,
    /// Raw reading at full positive deflection
    pub max: u16,
    /// Half-width of the dead zone around `center`
    pub deadband: u16,
    /// Flip the sign of the result
    pub invert: bool,
}

/// Calibration rejected at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// `min < center - deadband` and `center + deadband < max` must hold
    Unordered,
    /// An end stop is beyond the ADC range
    OutOfRange,
}

impl AxisCalibration {
    /// Uncalibrated stick, resting mid-scale
    pub const DEFAULT: Self = Self {
        min: 0,
        center: STICK_MAX_RAW / 2 - 1,
        max: STICK_MAX_RAW,
        deadband: 10,
        invert: false,
    };

    /// Check the end stops leave room on both sides of the dead zone
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.max > STICK_MAX_RAW {
            return Err(CalibrationError::OutOfRange);
        }
        let lower = i32::from(self.center) - i32::from(self.deadband);
        let upper = i32::from(self.center) + i32::from(self.deadband);
        if i32::from(self.min) >= lower || upper >= i32::from(self.max) {
            return Err(CalibrationError::Unordered);
        }
        Ok(())
    }

    /// Axis value for a raw reading, rounded to two decimal places
    pub fn axis(&self, raw: u16) -> f32 {
        let raw = i32::from(raw);
        let lower = i32::from(self.center) - i32::from(self.deadband);
        let upper = i32::from(self.center) + i32::from(self.deadband);

        if raw > lower && raw < upper {
            return 0.0;
        }

        let axis = if raw > i32::from(self.center) {
            (raw - upper) as f32 / (i32::from(self.max) - upper).max(1) as f32
        } else {
            (raw - lower) as f32 / (lower - i32::from(self.min)).max(1) as f32
        };

        let axis = round_hundredths(axis.clamp(-1.0, 1.0));
        if self.invert {
            -axis
        } else {
            axis
        }
    }
}

impl Default for AxisCalibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn round_hundredths(value: f32) -> f32 {
    let scaled = value * 100.0;
    let rounded = if scaled < 0.0 {
        (scaled - 0.5) as i32
    } else {
        (scaled + 0.5) as i32
    };
    rounded as f32 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAL: AxisCalibration = AxisCalibration {
        min: 0,
        center: 2000,
        max: 4010,
        deadband: 10,
        invert: false,
    };

    #[test]
    fn test_deadband_is_zero() {
        assert_eq!(CAL.axis(2000), 0.0);
        assert_eq!(CAL.axis(1991), 0.0);
        assert_eq!(CAL.axis(2009), 0.0);
    }

    #[test]
    fn test_ramp_starts_at_deadband_edge() {
        assert_eq!(CAL.axis(2010), 0.0);
        assert_eq!(CAL.axis(1990), 0.0);
        assert_eq!(CAL.axis(3010), 0.5);
        assert_eq!(CAL.axis(995), -0.5);
    }

    #[test]
    fn test_end_stops_and_clamp() {
        assert_eq!(CAL.axis(4010), 1.0);
        assert_eq!(CAL.axis(STICK_MAX_RAW), 1.0);
        assert_eq!(CAL.axis(0), -1.0);
    }

    #[test]
    fn test_invert() {
        let cal = AxisCalibration {
            invert: true,
            ..CAL
        };
        assert_eq!(cal.axis(4010), -1.0);
        assert_eq!(cal.axis(2000), 0.0);
    }

    #[test]
    fn test_validate() {
        assert_eq!(AxisCalibration::DEFAULT.validate(), Ok(()));
        assert_eq!(CAL.validate(), Ok(()));

        let squeezed = AxisCalibration {
            max: 2005,
            ..CAL
        };
        assert_eq!(squeezed.validate(), Err(CalibrationError::Unordered));

        let wide = AxisCalibration { max: 5000, ..CAL };
        assert_eq!(wide.validate(), Err(CalibrationError::OutOfRange));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn axis_stays_in_range(raw in 0u16..=STICK_MAX_RAW) {
                let axis = AxisCalibration::DEFAULT.axis(raw);
                prop_assert!((-1.0..=1.0).contains(&axis));
            }
        }
    }
}

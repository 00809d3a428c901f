//! Remote control frame
//!
//! Frame layout (15 bytes, packed, no padding):
//!
//! ```text
//! off len field         encoding
//!   0   4 secret_code   i32, native byte order
//!   4   4 js_y          f32, native byte order
//!   8   4 js_x          f32, native byte order
//!  12   1 bt_c          0 / 1
//!  13   1 bt_z          0 / 1
//!  14   1 is_rev        0 / 1
//! ```
//!
//! The vehicle reads these fields straight from memory, so multi-byte values
//! travel in host byte order. Both ends are little-endian targets.

use crate::frame::FrameError;

/// Length of a control frame
pub const CONTROL_FRAME_LEN: usize = 15;

/// Latest state of the remote's inputs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSample {
    /// Throttle axis, -1.0 (full brake) to 1.0 (full forward)
    pub js_y: f32,
    /// Steering axis, -1.0 to 1.0
    pub js_x: f32,
    /// Primary (C) button
    pub bt_c: bool,
    /// Secondary (Z) button
    pub bt_z: bool,
    /// Reverse mode engaged
    pub is_rev: bool,
}

impl ControlSample {
    /// Neutral stick, no buttons
    pub const NEUTRAL: Self = Self {
        js_y: 0.0,
        js_x: 0.0,
        bt_c: false,
        bt_z: false,
        is_rev: false,
    };

    /// Copy of this sample with both axes clamped to [-1, 1]
    ///
    /// NaN axes become 0.
    pub fn clamped(self) -> Self {
        Self {
            js_y: clamp_axis(self.js_y),
            js_x: clamp_axis(self.js_x),
            ..self
        }
    }
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Encode a control frame
pub fn encode_control(secret_code: i32, sample: &ControlSample) -> [u8; CONTROL_FRAME_LEN] {
    let mut frame = [0u8; CONTROL_FRAME_LEN];
    frame[0..4].copy_from_slice(&secret_code.to_ne_bytes());
    frame[4..8].copy_from_slice(&sample.js_y.to_ne_bytes());
    frame[8..12].copy_from_slice(&sample.js_x.to_ne_bytes());
    frame[12] = sample.bt_c as u8;
    frame[13] = sample.bt_z as u8;
    frame[14] = sample.is_rev as u8;
    frame
}

/// Decode a control frame into its secret code and sample
///
/// The remote never receives these; the decoder exists for the vehicle-side
/// simulator and for testing. Any non-zero flag byte reads as `true`.
pub fn decode_control(frame: &[u8]) -> Result<(i32, ControlSample), FrameError> {
    if frame.len() != CONTROL_FRAME_LEN {
        return Err(FrameError::WrongLength {
            expected: CONTROL_FRAME_LEN,
            actual: frame.len(),
        });
    }

    let word = |offset: usize| -> [u8; 4] {
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    };

    let secret_code = i32::from_ne_bytes(word(0));
    let sample = ControlSample {
        js_y: f32::from_ne_bytes(word(4)),
        js_x: f32::from_ne_bytes(word(8)),
        bt_c: frame[12] != 0,
        bt_z: frame[13] != 0,
        is_rev: frame[14] != 0,
    };

    Ok((secret_code, sample))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_layout() {
        let sample = ControlSample {
            js_y: 0.5,
            js_x: -0.25,
            bt_c: true,
            bt_z: false,
            is_rev: true,
        };
        let frame = encode_control(5678, &sample);

        assert_eq!(&frame[0..4], &5678i32.to_ne_bytes());
        assert_eq!(&frame[4..8], &0.5f32.to_ne_bytes());
        assert_eq!(&frame[8..12], &(-0.25f32).to_ne_bytes());
        assert_eq!(frame[12], 1);
        assert_eq!(frame[13], 0);
        assert_eq!(frame[14], 1);
    }

    #[test]
    fn test_decode_wrong_length() {
        assert_eq!(
            decode_control(&[0u8; 16]),
            Err(FrameError::WrongLength {
                expected: CONTROL_FRAME_LEN,
                actual: 16
            })
        );
    }

    #[test]
    fn test_nonzero_flag_reads_true() {
        let mut frame = encode_control(1, &ControlSample::NEUTRAL);
        frame[13] = 0x7F;
        let (_, sample) = decode_control(&frame).unwrap();
        assert!(sample.bt_z);
        assert!(!sample.bt_c);
    }

    #[test]
    fn test_clamped() {
        let sample = ControlSample {
            js_y: 1.7,
            js_x: f32::NAN,
            ..ControlSample::NEUTRAL
        }
        .clamped();
        assert_eq!(sample.js_y, 1.0);
        assert_eq!(sample.js_x, 0.0);
    }

    proptest! {
        #[test]
        fn prop_control_roundtrip(
            code in any::<i32>(),
            js_y in -1.0f32..=1.0,
            js_x in -1.0f32..=1.0,
            bt_c in any::<bool>(),
            bt_z in any::<bool>(),
            is_rev in any::<bool>(),
        ) {
            let sample = ControlSample { js_y, js_x, bt_c, bt_z, is_rev };
            let frame = encode_control(code, &sample);
            prop_assert_eq!(decode_control(&frame), Ok((code, sample)));
        }

        #[test]
        fn prop_roundtrip_any_finite_axis(
            code in any::<i32>(),
            js_y in prop::num::f32::NORMAL | prop::num::f32::ZERO,
            js_x in prop::num::f32::NORMAL | prop::num::f32::ZERO,
        ) {
            let sample = ControlSample { js_y, js_x, ..ControlSample::NEUTRAL };
            let (decoded_code, decoded) = decode_control(&encode_control(code, &sample)).unwrap();
            prop_assert_eq!(decoded_code, code);
            prop_assert_eq!(decoded.js_y.to_bits(), js_y.to_bits());
            prop_assert_eq!(decoded.js_x.to_bits(), js_x.to_bits());
        }
    }
}

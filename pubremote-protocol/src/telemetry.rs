//! Vehicle telemetry frame
//!
//! Frame layout (32 bytes, multi-byte integers big-endian unless noted):
//!
//! ```text
//! off len field             encoding
//!   0   1 mode              u8
//!   1   1 fault_code        u8
//!   2   2 pitch_angle       i16 / 10
//!   4   2 roll_angle        i16 / 10
//!   6   1 state             u8
//!   7   1 switch_state      u8 (off / left / right / both)
//!   8   2 input_voltage     i16 / 10
//!  10   2 rpm               i16
//!  12   2 speed             i16 / 10, m/s
//!  14   2 total_current     i16 / 10
//!  16   1 duty_cycle        u8, |raw - 50| percent
//!  17   4 trip_distance     f32, native byte order
//!  21   1 controller_temp   u8 / 2
//!  22   1 motor_temp        u8 / 2
//!  23   4 odometer          u32
//!  27   1 battery_percent   u8 / 2
//!  28   4 secret_echo       i32 (unused)
//! ```
//!
//! Decoding never fails. Garbage in a well-sized frame decodes to implausible
//! but well-typed numbers; only the length is checked, by the caller.

/// Length of a telemetry frame
pub const TELEMETRY_FRAME_LEN: usize = 32;

/// Footpad switch state reported by the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchState {
    #[default]
    Off,
    Left,
    Right,
    Both,
    /// Value outside the known range, kept for logging
    Unknown(u8),
}

impl SwitchState {
    /// Decode from the wire byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => SwitchState::Off,
            1 => SwitchState::Left,
            2 => SwitchState::Right,
            3 => SwitchState::Both,
            other => SwitchState::Unknown(other),
        }
    }

    /// True if at least one footpad sensor is engaged
    pub fn is_engaged(&self) -> bool {
        matches!(
            self,
            SwitchState::Left | SwitchState::Right | SwitchState::Both
        )
    }
}

/// Decoded vehicle status
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telemetry {
    pub mode: u8,
    pub fault_code: u8,
    /// Degrees
    pub pitch_angle: f32,
    /// Degrees
    pub roll_angle: f32,
    pub state: u8,
    pub switch_state: SwitchState,
    /// Volts
    pub input_voltage: f32,
    pub rpm: i16,
    /// Metres per second, signed (negative when riding backwards)
    pub speed: f32,
    /// Amps
    pub total_current: f32,
    /// Duty cycle, 0-100 for plausible frames
    pub duty_cycle: u8,
    /// Trip distance as reported by the vehicle
    pub trip_distance: f32,
    /// Degrees Celsius
    pub controller_temp: f32,
    /// Degrees Celsius
    pub motor_temp: f32,
    pub odometer: u32,
    /// 0-100
    pub battery_percent: f32,
    /// Historically labelled an echo of the secret code; not interpreted
    pub secret_echo: i32,
}

impl Telemetry {
    /// All-zero status, used before the first frame arrives
    pub const ZERO: Self = Self {
        mode: 0,
        fault_code: 0,
        pitch_angle: 0.0,
        roll_angle: 0.0,
        state: 0,
        switch_state: SwitchState::Off,
        input_voltage: 0.0,
        rpm: 0,
        speed: 0.0,
        total_current: 0.0,
        duty_cycle: 0,
        trip_distance: 0.0,
        controller_temp: 0.0,
        motor_temp: 0.0,
        odometer: 0,
        battery_percent: 0.0,
        secret_echo: 0,
    };
}

/// Decode a telemetry frame
pub fn decode_telemetry(frame: &[u8; TELEMETRY_FRAME_LEN]) -> Telemetry {
    Telemetry {
        mode: frame[0],
        fault_code: frame[1],
        pitch_angle: tenths(frame, 2),
        roll_angle: tenths(frame, 4),
        state: frame[6],
        switch_state: SwitchState::from_byte(frame[7]),
        input_voltage: tenths(frame, 8),
        rpm: be_i16(frame, 10),
        speed: tenths(frame, 12),
        total_current: tenths(frame, 14),
        duty_cycle: duty_percent(frame[16]),
        trip_distance: native_f32(frame, 17),
        controller_temp: halves(frame[21]),
        motor_temp: halves(frame[22]),
        odometer: u32::from_be_bytes([frame[23], frame[24], frame[25], frame[26]]),
        battery_percent: halves(frame[27]),
        secret_echo: i32::from_be_bytes([frame[28], frame[29], frame[30], frame[31]]),
    }
}

fn be_i16(frame: &[u8; TELEMETRY_FRAME_LEN], offset: usize) -> i16 {
    i16::from_be_bytes([frame[offset], frame[offset + 1]])
}

fn tenths(frame: &[u8; TELEMETRY_FRAME_LEN], offset: usize) -> f32 {
    be_i16(frame, offset) as f32 / 10.0
}

fn halves(raw: u8) -> f32 {
    raw as f32 / 2.0
}

/// `|raw / 100 - 0.5| * 100`, computed exactly
fn duty_percent(raw: u8) -> u8 {
    raw.abs_diff(50)
}

/// The vehicle copies this float straight out of memory, so it arrives in the
/// sender's byte order. Both ends are little-endian in practice; this is the
/// only host-order dependency in the frame.
fn native_f32(frame: &[u8; TELEMETRY_FRAME_LEN], offset: usize) -> f32 {
    f32::from_ne_bytes([
        frame[offset],
        frame[offset + 1],
        frame[offset + 2],
        frame[offset + 3],
    ])
}

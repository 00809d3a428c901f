//! Display unit conversions for telemetry values
//!
//! The vehicle reports SI units; the screen shows whatever the user picked.

/// Metres per second to kilometres per hour
pub fn ms_to_kph(ms: f32) -> f32 {
    ms * 3.6
}

/// Kilometres per hour to miles per hour
pub fn kph_to_mph(kph: f32) -> f32 {
    kph * 0.621371
}

/// Metres to feet
pub fn m_to_ft(m: f32) -> f32 {
    m * 3.28084
}

/// Degrees Celsius to degrees Fahrenheit
pub fn c_to_f(c: f32) -> f32 {
    c * 1.8 + 32.0
}

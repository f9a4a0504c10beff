//! Physical Constants for Time-of-Flight Ranging
//!
//! The echo pin stays high for the time sound needs to travel to the target
//! and back. Distance is half the round trip multiplied by the speed of sound.

/// Speed of sound in air at ~20°C (cm/µs).
///
/// 343.2 m/s expressed per microsecond. Varies with temperature:
/// c = 331.3 + 0.606 * T(°C) m/s. The engine uses this fixed value, so a
/// sensor at 0°C reads roughly 3.5% long.
///
/// Source: ISO 9613-1:1993
pub const SPEED_OF_SOUND_CM_PER_US: f32 = 0.0343;

/// Divisor turning a round-trip path into a one-way distance.
pub const ROUND_TRIP_FACTOR: f32 = 2.0;

/// Convert an echo pulse width to a one-way distance in centimeters.
///
/// ```rust
/// use echoguard_core::constants::physics::pulse_to_cm;
///
/// // 1000µs round trip ≈ 17.15cm
/// assert!((pulse_to_cm(1000) - 17.15).abs() < 0.001);
/// ```
pub fn pulse_to_cm(duration_us: u32) -> f32 {
    (duration_us as f32 * SPEED_OF_SOUND_CM_PER_US) / ROUND_TRIP_FACTOR
}

/// Inverse of [`pulse_to_cm`], truncated to whole microseconds.
pub fn cm_to_pulse(cm: f32) -> u32 {
    ((cm * ROUND_TRIP_FACTOR) / SPEED_OF_SOUND_CM_PER_US) as u32
}

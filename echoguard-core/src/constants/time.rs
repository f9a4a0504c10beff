//! Time-Related Constants
//!
//! Unit conversions and timing defaults for the trigger/echo cycle.

// ===== TIME UNIT CONVERSIONS =====

/// Microseconds per millisecond.
pub const US_PER_MS: u64 = 1000;

// ===== PING TIMING =====

/// Default settling delay between pings (milliseconds).
///
/// Long enough for residual echoes from a previous ping to die out.
///
/// Source: HC-SR04 datasheet recommends a measurement cycle over 60ms
pub const DEFAULT_PING_INTERVAL_MS: u32 = 70;

/// Default trigger pulse width (microseconds).
///
/// The datasheet asks for 10µs; 20µs also reliably excites waterproof
/// transducers.
pub const DEFAULT_TRIGGER_PULSE_US: u32 = 20;

/// Default echo timeout (microseconds).
///
/// Applied separately to the rising-edge wait and to the pulse measurement.
/// Shorter than the ~38ms pulse the module emits when nothing echoes back,
/// so a missing echo surfaces as a timeout.
pub const DEFAULT_ECHO_TIMEOUT_US: u32 = 30_000;

/// Default warmup after initialization (milliseconds).
///
/// Time for the module's MCU to boot after power-on.
pub const DEFAULT_WARMUP_MS: u32 = 600;

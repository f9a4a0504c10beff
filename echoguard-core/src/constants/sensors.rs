//! Sensor Specifications and Limits
//!
//! Defaults for HC-SR04 class sensors and the waterproof transducers
//! (RCWL-1655, JSN-SR04T) that share the same trigger/echo protocol.

// ===== MEASUREMENT BATCH =====

/// Maximum number of pings in a single measurement.
///
/// Bounds the stack buffers used by the orchestrator and the aggregator.
/// At the default 70ms interval a full batch takes just over one second.
pub const MAX_PINGS: usize = 15;

// ===== HC-SR04 DEFAULTS =====

/// Minimum trusted distance (cm).
///
/// Datasheet minimum is 2cm, but readings below ~10cm are dominated by
/// transducer ringing on cheap modules.
///
/// Source: HC-SR04 datasheet, empirical testing
pub const DEFAULT_MIN_DISTANCE_CM: f32 = 10.0;

/// Maximum trusted distance (cm).
///
/// Datasheet claims 400cm; beyond ~2m the echo from small targets is weak
/// and the ping ratio drops quickly.
pub const DEFAULT_MAX_DISTANCE_CM: f32 = 200.0;

/// Maximum population standard deviation of a batch (cm).
pub const DEFAULT_MAX_DEV_CM: f32 = 15.0;

// ===== WATERPROOF TRANSDUCER DEFAULTS =====

/// Dead zone of single-transducer waterproof sensors (cm).
///
/// The same transducer sends and receives, so close echoes arrive while it
/// is still ringing.
///
/// Source: RCWL-1655 datasheet
pub const WATERPROOF_MIN_DISTANCE_CM: f32 = 25.0;

/// Echo timeout for waterproof sensors (µs).
///
/// ~857cm round trip, enough for ~428cm of range.
pub const WATERPROOF_ECHO_TIMEOUT_US: u32 = 25_000;

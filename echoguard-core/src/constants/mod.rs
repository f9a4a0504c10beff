//! Constants for EchoGuard Core
//!
//! This module provides centralized, documented constants used throughout
//! the ping engine and the sample aggregator. Numeric values live here with
//! their purpose and source instead of appearing as magic numbers.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Physics**: Speed of sound and the time-of-flight conversion
//! - **Sensors**: HC-SR04 class defaults and transducer presets
//! - **Time**: Unit conversions and timing defaults
//! - **Quality**: Ratio and variance thresholds for classification
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Reference datasheets where applicable
//! 3. Use descriptive names that include units

/// Physical constants for time-of-flight conversion.
pub mod physics;

/// Sensor defaults including HC-SR04 and waterproof transducer presets.
pub mod sensors;

/// Time unit conversions and timing defaults.
pub mod time;

/// Ratio, variance and clustering thresholds used by the aggregator.
pub mod quality;

// Re-export commonly used constants for convenience
pub use physics::{SPEED_OF_SOUND_CM_PER_US, ROUND_TRIP_FACTOR};

pub use sensors::{
    MAX_PINGS, DEFAULT_MIN_DISTANCE_CM, DEFAULT_MAX_DISTANCE_CM, DEFAULT_MAX_DEV_CM,
};

pub use time::{
    US_PER_MS, DEFAULT_PING_INTERVAL_MS, DEFAULT_TRIGGER_PULSE_US,
    DEFAULT_ECHO_TIMEOUT_US, DEFAULT_WARMUP_MS,
};

pub use quality::{
    VALID_PING_RATIO, INVALID_PING_RATIO, WEAK_VARIANCE_RATIO,
    CLUSTER_DELTA_CM, CLUSTER_MIN_SIZE,
};

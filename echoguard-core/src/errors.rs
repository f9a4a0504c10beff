//! Error Types for Hardware Access and Configuration
//!
//! ## Design Philosophy
//!
//! Errors here follow the same rules as the rest of the crate:
//!
//! 1. **Small Size**: Variants carry only `&'static str` context and pin
//!    numbers, so they can be returned from hot polling loops.
//!
//! 2. **No Heap Allocation**: No `String`, deterministic memory usage.
//!
//! 3. **Copy Semantics**: Errors are `Copy` and cheap to return.
//!
//! ## What Is (and Is Not) an Error
//!
//! Measurement outcomes are *not* errors. A timeout, an out-of-range echo or
//! a stuck echo pin is reported through [`Outcome`](crate::Outcome) inside a
//! [`Reading`](crate::Reading). The types in this module cover:
//!
//! - `HalError`: a pin or timer primitive reported failure. Returned by the
//!   [`PinIo`](crate::traits::PinIo) and [`Clock`](crate::traits::Clock)
//!   capabilities and propagated by `initialize()`/`shutdown()`. During a
//!   ping the engine maps every `HalError` to `Outcome::HwFault`.
//! - `ConfigError`: a [`SensorConfig`](crate::SensorConfig) violates its
//!   invariants.
//!
//! ```rust
//! use echoguard_core::{HalError, SensorConfig, ConfigError};
//!
//! let bad = SensorConfig::default().with_distance_range(200.0, 10.0);
//! assert!(matches!(bad.validate(), Err(ConfigError::InvalidRange { .. })));
//!
//! let err = HalError::Gpio { pin: 5, op: "set_level" };
//! assert_eq!(err.to_string(), "GPIO 5: set_level failed");
//! ```

use thiserror_no_std::Error;

/// Result type for pin and timer primitives
pub type HalResult<T> = Result<T, HalError>;

/// Failure reported by a pin I/O or time-source primitive
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// A GPIO primitive failed
    #[error("GPIO {pin}: {op} failed")]
    Gpio {
        /// Pin number the operation targeted
        pin: u8,
        /// Name of the failing primitive
        op: &'static str,
    },

    /// A timer primitive failed
    #[error("Timer: {op} failed")]
    Timer {
        /// Name of the failing primitive
        op: &'static str,
    },
}

/// Configuration invariant violations
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A magnitude that must be strictly positive was zero or negative
    #[error("{field} must be positive")]
    NotPositive {
        /// Offending configuration field
        field: &'static str,
    },

    /// A floating point field is NaN or infinite
    #[error("{field} is not a valid number")]
    NotFinite {
        /// Offending configuration field
        field: &'static str,
    },

    /// The accepted distance window is empty or starts below zero
    #[error("Distance range [{min}, {max}] is invalid")]
    InvalidRange {
        /// Configured lower bound (cm)
        min: f32,
        /// Configured upper bound (cm)
        max: f32,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for HalError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Gpio { pin, op } =>
                defmt::write!(fmt, "GPIO {}: {} failed", pin, op),
            Self::Timer { op } =>
                defmt::write!(fmt, "Timer: {} failed", op),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotPositive { field } =>
                defmt::write!(fmt, "{} must be positive", field),
            Self::NotFinite { field } =>
                defmt::write!(fmt, "{} is not a valid number", field),
            Self::InvalidRange { min, max } =>
                defmt::write!(fmt, "Distance range [{}, {}] is invalid", min, max),
        }
    }
}

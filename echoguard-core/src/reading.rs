//! Measurement Outcomes and Readings
//!
//! Every ping and every aggregated measurement produces a [`Reading`]: an
//! [`Outcome`] tag plus a distance. Only the two success tags carry a
//! distance; all other readings report 0 cm and compare equal regardless of
//! what distance was passed in.
//!
//! ## Outcome Classes
//!
//! | Class | Tags | Caller action |
//! |---|---|---|
//! | Success | `Ok`, `WeakSignal` | Use the distance |
//! | Logical failure | `Timeout`, `OutOfRange`, `HighVariance`, `InsufficientSamples` | Retry, maybe with more pings |
//! | Hardware failure | `EchoStuck`, `HwFault` | Stop and fix the sensor (power-cycle, wiring) |
//!
//! ```rust
//! use echoguard_core::{Reading, Outcome};
//!
//! let reading = Reading::new(Outcome::Timeout, 42.0);
//! assert_eq!(reading.cm(), 0.0);
//! assert_eq!(reading, Reading::failed(Outcome::Timeout));
//! assert!(reading.distance_cm().is_none());
//! ```

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance for comparing two success distances (cm)
const DISTANCE_EPSILON_CM: f32 = 0.001;

/// Result tag of a ping or a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Reliable reading: high ping ratio, low variance
    Ok,
    /// Valid reading with reduced confidence
    WeakSignal,
    /// No echo edge within the configured timeout
    Timeout,
    /// Distance outside the configured envelope
    OutOfRange,
    /// Valid pings disagree more than `max_dev_cm`
    HighVariance,
    /// Too few valid pings to report anything
    InsufficientSamples,
    /// Echo pin already high before triggering; power-cycle the sensor
    EchoStuck,
    /// A pin or timer primitive failed
    HwFault,
}

impl Outcome {
    /// `Ok` or `WeakSignal`
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::WeakSignal)
    }

    /// `EchoStuck` or `HwFault`: never retried or averaged
    pub const fn is_hardware_fault(self) -> bool {
        matches!(self, Self::EchoStuck | Self::HwFault)
    }

    /// Recoverable failure: retry or aggregate
    pub const fn is_logical_failure(self) -> bool {
        !self.is_success() && !self.is_hardware_fault()
    }

    /// Canonical upper-snake-case name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::WeakSignal => "WEAK_SIGNAL",
            Self::Timeout => "TIMEOUT",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::HighVariance => "HIGH_VARIANCE",
            Self::InsufficientSamples => "INSUFFICIENT_SAMPLES",
            Self::EchoStuck => "ECHO_STUCK",
            Self::HwFault => "HW_FAULT",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduction applied to the valid samples of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Filter {
    /// Upper median of the sorted samples
    #[default]
    Median,
    /// Mean of the largest group of samples within `CLUSTER_DELTA_CM`
    DominantCluster,
}

/// Outcome plus distance
///
/// Fields are private: the constructor zeroes the distance of every
/// non-success outcome.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "ReadingRepr", into = "ReadingRepr"))]
pub struct Reading {
    outcome: Outcome,
    cm: f32,
}

impl Reading {
    /// Build a reading, discarding `cm` unless `outcome` is a success
    pub fn new(outcome: Outcome, cm: f32) -> Self {
        let cm = if outcome.is_success() { cm } else { 0.0 };
        Self { outcome, cm }
    }

    /// High-confidence reading
    pub fn ok(cm: f32) -> Self {
        Self::new(Outcome::Ok, cm)
    }

    /// Valid but lower-confidence reading
    pub fn weak(cm: f32) -> Self {
        Self::new(Outcome::WeakSignal, cm)
    }

    /// Failure reading with distance 0
    pub const fn failed(outcome: Outcome) -> Self {
        Self { outcome, cm: 0.0 }
    }

    /// Outcome tag
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Distance in centimeters; 0 for non-success outcomes
    pub fn cm(&self) -> f32 {
        self.cm
    }

    /// Distance only when it is meaningful
    pub fn distance_cm(&self) -> Option<f32> {
        self.is_success().then_some(self.cm)
    }

    /// Whether the outcome is `Ok` or `WeakSignal`
    pub const fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

impl PartialEq for Reading {
    fn eq(&self, other: &Self) -> bool {
        self.outcome == other.outcome
            && (!self.outcome.is_success()
                || libm::fabsf(self.cm - other.cm) < DISTANCE_EPSILON_CM)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            write!(f, "{} ({:.2} cm)", self.outcome, self.cm)
        } else {
            write!(f, "{}", self.outcome)
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Reading {
    fn format(&self, fmt: defmt::Formatter) {
        if self.is_success() {
            defmt::write!(fmt, "{} ({} cm)", self.outcome, self.cm)
        } else {
            defmt::write!(fmt, "{}", self.outcome)
        }
    }
}

/// Wire form of [`Reading`]; deserializing goes back through `Reading::new`
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct ReadingRepr {
    outcome: Outcome,
    cm: f32,
}

#[cfg(feature = "serde")]
impl From<ReadingRepr> for Reading {
    fn from(repr: ReadingRepr) -> Self {
        Reading::new(repr.outcome, repr.cm)
    }
}

#[cfg(feature = "serde")]
impl From<Reading> for ReadingRepr {
    fn from(reading: Reading) -> Self {
        ReadingRepr {
            outcome: reading.outcome,
            cm: reading.cm,
        }
    }
}

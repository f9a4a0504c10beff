//! Sensor Configuration
//!
//! One [`SensorConfig`] is supplied per measurement session and owned by the
//! orchestrator. The engine and the aggregator only ever borrow it.
//!
//! ## Presets
//!
//! ```rust
//! use echoguard_core::{SensorConfig, Filter};
//! use fugit::ExtU32;
//!
//! // Classic HC-SR04 on a breadboard
//! let hc = SensorConfig::hc_sr04();
//! assert_eq!(hc.max_distance_cm, 200.0);
//!
//! // Waterproof single-transducer module in a tank
//! let tank = SensorConfig::waterproof()
//!     .with_distance_range(25.0, 180.0)
//!     .with_ping_interval(100.millis());
//! assert_eq!(tank.filter, Filter::DominantCluster);
//! assert!(tank.validate().is_ok());
//! ```
//!
//! Zero `ping_interval` or `warmup` means "skip that delay". Every other
//! magnitude must be strictly positive; [`SensorConfig::validate`] checks it.

use fugit::{MicrosDurationU32, MillisDurationU32};

use crate::{
    constants::{
        sensors::{
            DEFAULT_MAX_DEV_CM, DEFAULT_MAX_DISTANCE_CM, DEFAULT_MIN_DISTANCE_CM,
            WATERPROOF_ECHO_TIMEOUT_US, WATERPROOF_MIN_DISTANCE_CM,
        },
        time::{
            DEFAULT_ECHO_TIMEOUT_US, DEFAULT_PING_INTERVAL_MS, DEFAULT_TRIGGER_PULSE_US,
            DEFAULT_WARMUP_MS,
        },
    },
    errors::ConfigError,
    reading::Filter,
};

/// Measurement configuration for one sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorConfig {
    /// Settling delay after each ping (zero = none)
    pub ping_interval: MillisDurationU32,

    /// Width of the trigger pulse
    pub trigger_pulse: MicrosDurationU32,

    /// Timeout for each echo wait (rising edge, then pulse)
    pub echo_timeout: MicrosDurationU32,

    /// Reduction applied to valid samples
    pub filter: Filter,

    /// Inclusive lower bound of trusted distances (cm)
    pub min_distance_cm: f32,

    /// Inclusive upper bound of trusted distances (cm)
    pub max_distance_cm: f32,

    /// Maximum population standard deviation of a batch (cm)
    pub max_dev_cm: f32,

    /// Wait after `initialize()` (zero = none)
    pub warmup: MillisDurationU32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            ping_interval: MillisDurationU32::millis(DEFAULT_PING_INTERVAL_MS),
            trigger_pulse: MicrosDurationU32::micros(DEFAULT_TRIGGER_PULSE_US),
            echo_timeout: MicrosDurationU32::micros(DEFAULT_ECHO_TIMEOUT_US),
            filter: Filter::Median,
            min_distance_cm: DEFAULT_MIN_DISTANCE_CM,
            max_distance_cm: DEFAULT_MAX_DISTANCE_CM,
            max_dev_cm: DEFAULT_MAX_DEV_CM,
            warmup: MillisDurationU32::millis(DEFAULT_WARMUP_MS),
        }
    }
}

impl SensorConfig {
    /// Defaults for a standard two-transducer HC-SR04
    pub fn hc_sr04() -> Self {
        Self::default()
    }

    /// Single-transducer waterproof modules (RCWL-1655, JSN-SR04T)
    ///
    /// Larger dead zone, shorter timeout, and dominant-cluster filtering to
    /// reject reflections from tank walls. No warmup: these modules are
    /// usually powered continuously.
    pub fn waterproof() -> Self {
        Self {
            echo_timeout: MicrosDurationU32::micros(WATERPROOF_ECHO_TIMEOUT_US),
            filter: Filter::DominantCluster,
            min_distance_cm: WATERPROOF_MIN_DISTANCE_CM,
            warmup: MillisDurationU32::millis(0),
            ..Self::default()
        }
    }

    /// Set the inter-ping settling delay
    pub fn with_ping_interval(mut self, interval: MillisDurationU32) -> Self {
        self.ping_interval = interval;
        self
    }

    /// Set the trigger pulse width
    pub fn with_trigger_pulse(mut self, pulse: MicrosDurationU32) -> Self {
        self.trigger_pulse = pulse;
        self
    }

    /// Set the echo timeout
    pub fn with_echo_timeout(mut self, timeout: MicrosDurationU32) -> Self {
        self.echo_timeout = timeout;
        self
    }

    /// Set the reduction filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the trusted distance envelope (cm, inclusive)
    pub fn with_distance_range(mut self, min_cm: f32, max_cm: f32) -> Self {
        self.min_distance_cm = min_cm;
        self.max_distance_cm = max_cm;
        self
    }

    /// Set the maximum accepted standard deviation (cm)
    pub fn with_max_dev(mut self, max_dev_cm: f32) -> Self {
        self.max_dev_cm = max_dev_cm;
        self
    }

    /// Set the post-initialization warmup
    pub fn with_warmup(mut self, warmup: MillisDurationU32) -> Self {
        self.warmup = warmup;
        self
    }

    /// Check the configuration invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trigger_pulse.is_zero() {
            return Err(ConfigError::NotPositive { field: "trigger_pulse" });
        }
        if self.echo_timeout.is_zero() {
            return Err(ConfigError::NotPositive { field: "echo_timeout" });
        }

        check_positive(self.min_distance_cm, "min_distance_cm")?;
        check_positive(self.max_distance_cm, "max_distance_cm")?;
        check_positive(self.max_dev_cm, "max_dev_cm")?;

        if self.min_distance_cm > self.max_distance_cm {
            return Err(ConfigError::InvalidRange {
                min: self.min_distance_cm,
                max: self.max_distance_cm,
            });
        }

        Ok(())
    }

    /// Whether `cm` lies inside the trusted envelope (inclusive)
    pub fn in_range(&self, cm: f32) -> bool {
        cm >= self.min_distance_cm && cm <= self.max_distance_cm
    }
}

fn check_positive(value: f32, field: &'static str) -> Result<(), ConfigError> {
    if !value.is_finite() {
        Err(ConfigError::NotFinite { field })
    } else if value <= 0.0 {
        Err(ConfigError::NotPositive { field })
    } else {
        Ok(())
    }
}

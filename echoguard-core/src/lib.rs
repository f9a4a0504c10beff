//! Core measurement engine for EchoGuard
//!
//! Distance measurement with HC-SR04-class echo-pulse ultrasonic sensors:
//! trigger a ping, time the echo, convert to centimeters, and fold several
//! pings into one filtered, quality-classified reading.
//!
//! Key constraints:
//! - Runs on microcontrollers without an allocator
//! - Busy-wait timing, bounded by the echo timeout
//! - Pin and clock access only through the [`traits::PinIo`] and
//!   [`traits::Clock`] capabilities
//!
//! ```no_run
//! use echoguard_core::{SensorConfig, UltrasonicSensor, Outcome};
//! use echoguard_core::sim::EchoSimulator;
//!
//! let sim = EchoSimulator::new().with_distance(120.0);
//! let mut sensor = UltrasonicSensor::new(SensorConfig::default(), sim.driver())?;
//! sensor.initialize()?;
//!
//! match sensor.measure(5).outcome() {
//!     Outcome::Ok | Outcome::WeakSignal => {}, // Use the distance
//!     Outcome::EchoStuck | Outcome::HwFault => {}, // Power-cycle the sensor
//!     _ => {}, // Retry later
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod config;
pub mod constants;
pub mod driver;
pub mod errors;
pub mod processor;
pub mod reading;
pub mod sensor;
pub mod stats;
pub mod time;
pub mod traits;

#[cfg(feature = "std")]
pub mod sim;

// Public API
pub use config::SensorConfig;
pub use driver::EchoDriver;
pub use errors::{ConfigError, HalError, HalResult};
pub use processor::{SampleSet, UsProcessor};
pub use reading::{Filter, Outcome, Reading};
pub use sensor::UltrasonicSensor;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

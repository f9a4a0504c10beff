//! Core Traits and Abstractions for EchoGuard
//!
//! This module provides the trait definitions at every seam of the crate.
//!
//! ## Module Organization
//!
//! - [`gpio`] - Pin I/O capability consumed by the ping engine
//! - [`time`] - Monotonic microsecond clock and blocking delays
//! - [`sensor`] - Engine and aggregator seams used by the orchestrator
//!
//! ## Design Philosophy
//!
//! The capabilities are generic parameters, not trait objects. An
//! [`EchoDriver`](crate::EchoDriver) is monomorphized over its pin and clock
//! types, so the busy-wait loops compile down to direct register access on
//! targets whose adapters are `#[inline]`.
//!
//! ## Usage Example
//!
//! ```rust
//! use echoguard_core::traits::{PinIo, PinConfig, Direction, DriveStrength, GpioPin};
//! use echoguard_core::HalResult;
//!
//! struct Board;
//!
//! impl PinIo for Board {
//!     fn reset_pin(&mut self, _pin: GpioPin) -> HalResult<()> { Ok(()) }
//!     fn configure(&mut self, _pin: GpioPin, _config: &PinConfig) -> HalResult<()> { Ok(()) }
//!     fn set_level(&mut self, _pin: GpioPin, _high: bool) -> HalResult<()> { Ok(()) }
//!     fn get_level(&mut self, _pin: GpioPin) -> HalResult<bool> { Ok(false) }
//!     fn set_direction(&mut self, _pin: GpioPin, _dir: Direction) -> HalResult<()> { Ok(()) }
//!     fn set_drive_strength(&mut self, _pin: GpioPin, _s: DriveStrength) -> HalResult<()> { Ok(()) }
//! }
//! ```

pub mod gpio;
pub mod time;
pub mod sensor;

pub use gpio::{PinIo, PinConfig, PinMode, Direction, DriveStrength, InterruptType, GpioPin};
pub use time::Clock;
pub use sensor::{PingDriver, SampleProcessor};

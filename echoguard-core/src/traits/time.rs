//! Time Source Abstraction for Embedded Systems
//!
//! This module provides the [`Clock`] trait: a monotonic microsecond counter
//! plus blocking delays at two granularities.
//!
//! ## Design Goals
//!
//! - **Platform Independence**: Works on bare metal, RTOS, and Linux
//! - **Testability**: Easy to replace with a virtual clock
//! - **Precision**: Microsecond timestamps for echo timing
//!
//! ## Common Implementations
//!
//! - `StdClock`: `std::time::Instant` with `thread::sleep` (feature `std`)
//! - `SimClock`: Virtual timeline shared with the simulated sensor
//!
//! ## Platform-Specific Considerations
//!
//! ### Bare Metal (no_std)
//! - Use a free-running 1MHz timer for `now_us()`
//! - `delay_us()` may busy-wait; `delay_ms()` should yield if an executor exists
//!
//! ### RTOS
//! - `now_us()` must not be the tick counter (usually 1-10ms resolution)
//! - `delay_ms()` maps to the task delay primitive
//!
//! ### Linux/Unix
//! - CLOCK_MONOTONIC for `now_us()`
//! - Sleep granularity is coarse; expect jitter on `delay_us()`

use crate::errors::HalResult;
use crate::time::Microseconds;

/// Time-source capability
///
/// `now_us()` must be monotonic: the engine computes elapsed time with
/// saturating subtraction and a clock that jumps backwards only shortens
/// the observed wait.
pub trait Clock {
    /// Current monotonic timestamp in microseconds
    fn now_us(&self) -> Microseconds;

    /// Block for `us` microseconds
    fn delay_us(&mut self, us: u32) -> HalResult<()>;

    /// Block for `ms` milliseconds
    ///
    /// Scheduler-friendly; may sleep instead of spinning.
    fn delay_ms(&mut self, ms: u32) -> HalResult<()>;
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_us(&self) -> Microseconds {
        (**self).now_us()
    }

    fn delay_us(&mut self, us: u32) -> HalResult<()> {
        (**self).delay_us(us)
    }

    fn delay_ms(&mut self, ms: u32) -> HalResult<()> {
        (**self).delay_ms(ms)
    }
}

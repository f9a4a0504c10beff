//! Time management for the ping engine
//!
//! Provides the timestamp type used by [`Clock`] and the host clock adapter:
//! - `Microseconds`: monotonic timestamp, µs since an arbitrary origin
//! - `StdClock`: `Instant`-based clock for Linux hosts (requires std)

use crate::traits::Clock;
#[cfg(feature = "std")]
use crate::errors::HalResult;

/// Monotonic timestamp in microseconds
pub type Microseconds = u64;

/// Microseconds elapsed from `start` to `now`
///
/// Saturates at zero if the clock went backwards.
pub fn elapsed_us(start: Microseconds, now: Microseconds) -> Microseconds {
    now.saturating_sub(start)
}

/// Whether more than `timeout_us` has passed since `start`
///
/// The boundary itself is not a timeout: a wait that observed exactly
/// `timeout_us` elapsed gets one more poll.
pub fn timed_out<C: Clock + ?Sized>(clock: &C, start: Microseconds, timeout_us: u32) -> bool {
    elapsed_us(start, clock.now_us()) > u64::from(timeout_us)
}

/// Host clock backed by `std::time::Instant`
///
/// Good enough for single-board computers running Linux, where the kernel
/// tick limits sleep precision but `Instant` still resolves microseconds.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Start a clock whose origin is now
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_us(&self) -> Microseconds {
        self.origin.elapsed().as_micros() as Microseconds
    }

    fn delay_us(&mut self, us: u32) -> HalResult<()> {
        // Sleeping would overshoot a 20µs trigger by the scheduler tick
        let start = self.now_us();
        while elapsed_us(start, self.now_us()) < u64::from(us) {
            core::hint::spin_loop();
        }
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) -> HalResult<()> {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
        Ok(())
    }
}

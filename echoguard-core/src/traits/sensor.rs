//! Seams Between the Orchestrator, the Engine and the Aggregator
//!
//! [`UltrasonicSensor`](crate::UltrasonicSensor) talks to its ping engine and
//! its aggregator only through these traits, so either side can be replaced
//! (a scripted driver in tests, a custom classifier in an application).

use fugit::MillisDurationU32;

use crate::config::SensorConfig;
use crate::errors::HalResult;
use crate::reading::Reading;

/// One trigger/measure cycle against the hardware
pub trait PingDriver {
    /// Put both pins in their idle state, then wait `warmup`
    fn initialize(&mut self, warmup: MillisDurationU32) -> HalResult<()>;

    /// Return both pins to a safe reset state
    fn shutdown(&mut self) -> HalResult<()>;

    /// Execute exactly one ping and classify it
    ///
    /// Never retries. Hardware problems are reported as
    /// `Outcome::EchoStuck` or `Outcome::HwFault`.
    fn ping_once(&mut self, config: &SensorConfig) -> Reading;
}

/// Reduction of a ping batch into one classified reading
pub trait SampleProcessor {
    /// Classify a batch. Must be a pure function of its inputs.
    fn process(&self, pings: &[Reading], config: &SensorConfig) -> Reading;
}

impl<T: PingDriver + ?Sized> PingDriver for &mut T {
    fn initialize(&mut self, warmup: MillisDurationU32) -> HalResult<()> {
        (**self).initialize(warmup)
    }

    fn shutdown(&mut self) -> HalResult<()> {
        (**self).shutdown()
    }

    fn ping_once(&mut self, config: &SensorConfig) -> Reading {
        (**self).ping_once(config)
    }
}

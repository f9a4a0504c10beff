//! Measurement Orchestrator
//!
//! [`UltrasonicSensor`] runs a batch of pings through a [`PingDriver`] and
//! hands the batch to a [`SampleProcessor`]. Per measurement:
//!
//! 1. Clamp the requested ping count into `1..=MAX_PINGS`
//! 2. Ping that many times
//! 3. On `EchoStuck` or `HwFault`, stop and return that outcome as is
//! 4. Otherwise return the aggregator's verdict unchanged
//!
//! Nothing is carried from one measurement to the next except the
//! configuration. Adapting the ping count to past results is the caller's job.
//!
//! ```rust
//! use echoguard_core::{SensorConfig, UltrasonicSensor, Outcome};
//! use echoguard_core::sim::EchoSimulator;
//!
//! let sim = EchoSimulator::new().with_distance(75.0);
//! let config = SensorConfig::default().with_warmup(fugit::MillisDurationU32::from_ticks(0));
//! let mut sensor = UltrasonicSensor::new(config, sim.driver()).unwrap();
//!
//! sensor.initialize().unwrap();
//! let reading = sensor.measure(5);
//!
//! assert_eq!(reading.outcome(), Outcome::Ok);
//! assert!((reading.cm() - 75.0).abs() < 0.5);
//! assert_eq!(sim.pings_triggered(), 5);
//! ```

use heapless::Vec;

use crate::{
    config::SensorConfig,
    constants::sensors::MAX_PINGS,
    driver::EchoDriver,
    errors::{ConfigError, HalResult},
    processor::UsProcessor,
    reading::Reading,
    traits::{Clock, GpioPin, PinIo, PingDriver, SampleProcessor},
};

/// Clamp a requested ping count into `1..=MAX_PINGS`
///
/// ```rust
/// use echoguard_core::sensor::clamp_ping_count;
///
/// assert_eq!(clamp_ping_count(0), 1);
/// assert_eq!(clamp_ping_count(7), 7);
/// assert_eq!(clamp_ping_count(200), 15);
/// ```
pub fn clamp_ping_count(ping_count: u8) -> usize {
    usize::from(ping_count).clamp(1, MAX_PINGS)
}

/// Multi-ping distance measurement
#[derive(Debug)]
pub struct UltrasonicSensor<D, P = UsProcessor> {
    config: SensorConfig,
    driver: D,
    processor: P,
}

impl<G: PinIo, C: Clock> UltrasonicSensor<EchoDriver<G, C>> {
    /// Build a sensor straight from pin and clock capabilities
    pub fn from_hal(
        config: SensorConfig,
        gpio: G,
        clock: C,
        trigger: GpioPin,
        echo: GpioPin,
    ) -> Result<Self, ConfigError> {
        Self::new(config, EchoDriver::new(gpio, clock, trigger, echo))
    }
}

impl<D: PingDriver> UltrasonicSensor<D> {
    /// Sensor with the standard aggregator
    pub fn new(config: SensorConfig, driver: D) -> Result<Self, ConfigError> {
        Self::with_processor(config, driver, UsProcessor)
    }
}

impl<D: PingDriver, P: SampleProcessor> UltrasonicSensor<D, P> {
    /// Sensor with a custom aggregator
    pub fn with_processor(
        config: SensorConfig,
        driver: D,
        processor: P,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            driver,
            processor,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Ping engine
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Give the ping engine back
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Configure the pins and wait out the sensor's warmup
    pub fn initialize(&mut self) -> HalResult<()> {
        self.driver.initialize(self.config.warmup)
    }

    /// Return both pins to their reset state
    pub fn shutdown(&mut self) -> HalResult<()> {
        self.driver.shutdown()
    }

    /// Measure with `ping_count` pings, clamped into `1..=MAX_PINGS`
    ///
    /// A hardware fault on any ping ends the measurement with that outcome;
    /// the remaining pings are not sent.
    pub fn measure(&mut self, ping_count: u8) -> Reading {
        let count = clamp_ping_count(ping_count);
        if count != usize::from(ping_count) {
            warn!("Ping count {} clamped to {}", ping_count, count);
        }

        let mut pings: Vec<Reading, MAX_PINGS> = Vec::new();
        for index in 0..count {
            let reading = self.driver.ping_once(&self.config);

            if reading.outcome().is_hardware_fault() {
                error!(
                    "Measurement aborted at ping {}/{}: {}",
                    index + 1,
                    count,
                    reading.outcome()
                );
                return Reading::failed(reading.outcome());
            }

            // count <= MAX_PINGS, the batch cannot overflow
            let _ = pings.push(reading);
        }

        self.processor.process(&pings, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Outcome;
    use fugit::MillisDurationU32;
    use std::cell::Cell;
    use std::vec::Vec as StdVec;

    /// Replays a script of readings, repeating the last one
    struct ScriptedDriver {
        script: StdVec<Reading>,
        calls: usize,
        initialized_with: Option<MillisDurationU32>,
        shut_down: bool,
    }

    impl ScriptedDriver {
        fn new(script: impl IntoIterator<Item = Reading>) -> Self {
            Self {
                script: script.into_iter().collect(),
                calls: 0,
                initialized_with: None,
                shut_down: false,
            }
        }
    }

    impl PingDriver for ScriptedDriver {
        fn initialize(&mut self, warmup: MillisDurationU32) -> HalResult<()> {
            self.initialized_with = Some(warmup);
            Ok(())
        }

        fn shutdown(&mut self) -> HalResult<()> {
            self.shut_down = true;
            Ok(())
        }

        fn ping_once(&mut self, _config: &SensorConfig) -> Reading {
            let index = self.calls.min(self.script.len() - 1);
            self.calls += 1;
            self.script[index]
        }
    }

    /// Records the batch size it was handed
    struct CountingProcessor<'a> {
        seen: &'a Cell<Option<usize>>,
    }

    impl SampleProcessor for CountingProcessor<'_> {
        fn process(&self, pings: &[Reading], config: &SensorConfig) -> Reading {
            self.seen.set(Some(pings.len()));
            UsProcessor.process(pings, config)
        }
    }

    fn sensor(script: impl IntoIterator<Item = Reading>) -> UltrasonicSensor<ScriptedDriver> {
        UltrasonicSensor::new(SensorConfig::default(), ScriptedDriver::new(script)).unwrap()
    }

    #[test]
    fn clamps_ping_count() {
        assert_eq!(clamp_ping_count(0), 1);
        assert_eq!(clamp_ping_count(1), 1);
        assert_eq!(clamp_ping_count(15), 15);
        assert_eq!(clamp_ping_count(16), 15);
        assert_eq!(clamp_ping_count(u8::MAX), 15);
    }

    #[test]
    fn zero_pings_sends_one() {
        let mut sensor = sensor([Reading::ok(40.0)]);
        let reading = sensor.measure(0);

        assert_eq!(sensor.driver().calls, 1);
        assert_eq!(reading.outcome(), Outcome::Ok);
    }

    #[test]
    fn oversized_request_sends_fifteen() {
        let mut sensor = sensor([Reading::ok(40.0)]);
        sensor.measure(100);
        assert_eq!(sensor.driver().calls, MAX_PINGS);
    }

    #[test]
    fn hardware_fault_stops_the_batch() {
        let seen = Cell::new(None);
        let driver = ScriptedDriver::new([
            Reading::ok(50.0),
            Reading::ok(50.0),
            Reading::failed(Outcome::HwFault),
            Reading::ok(50.0),
        ]);
        let mut sensor = UltrasonicSensor::with_processor(
            SensorConfig::default(),
            driver,
            CountingProcessor { seen: &seen },
        )
        .unwrap();

        let reading = sensor.measure(10);

        assert_eq!(reading.outcome(), Outcome::HwFault);
        assert_eq!(reading.cm(), 0.0);
        assert_eq!(sensor.driver().calls, 3);
        assert_eq!(seen.get(), None);
    }

    #[test]
    fn echo_stuck_on_first_ping() {
        let mut sensor = sensor([Reading::failed(Outcome::EchoStuck)]);
        let reading = sensor.measure(5);

        assert_eq!(reading.outcome(), Outcome::EchoStuck);
        assert_eq!(sensor.driver().calls, 1);
    }

    #[test]
    fn logical_failures_reach_the_aggregator() {
        let seen = Cell::new(None);
        let driver = ScriptedDriver::new([
            Reading::failed(Outcome::Timeout),
            Reading::failed(Outcome::OutOfRange),
            Reading::failed(Outcome::OutOfRange),
        ]);
        let mut sensor = UltrasonicSensor::with_processor(
            SensorConfig::default(),
            driver,
            CountingProcessor { seen: &seen },
        )
        .unwrap();

        let reading = sensor.measure(3);

        assert_eq!(seen.get(), Some(3));
        assert_eq!(reading.outcome(), Outcome::OutOfRange);
    }

    #[test]
    fn mostly_consistent_batch_is_ok() {
        let mut script = StdVec::new();
        for offset in [-0.3, -0.2, -0.1, 0.0, 0.0, 0.1, 0.2, 0.3] {
            script.push(Reading::ok(50.0 + offset));
        }
        script.push(Reading::failed(Outcome::Timeout));
        script.push(Reading::failed(Outcome::OutOfRange));

        let mut sensor = sensor(script);
        let reading = sensor.measure(10);

        assert_eq!(reading.outcome(), Outcome::Ok);
        assert!((reading.cm() - 50.0).abs() < 0.5);
    }

    #[test]
    fn initialize_passes_warmup() {
        let config = SensorConfig::default().with_warmup(MillisDurationU32::from_ticks(250));
        let mut sensor = UltrasonicSensor::new(config, ScriptedDriver::new([Reading::ok(20.0)]))
            .unwrap();

        sensor.initialize().unwrap();
        sensor.shutdown().unwrap();

        let driver = sensor.into_driver();
        assert_eq!(driver.initialized_with, Some(MillisDurationU32::from_ticks(250)));
        assert!(driver.shut_down);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SensorConfig::default().with_distance_range(100.0, 10.0);
        let result = UltrasonicSensor::new(config, ScriptedDriver::new([Reading::ok(20.0)]));
        assert!(matches!(result, Err(ConfigError::InvalidRange { .. })));
    }

    #[test]
    fn works_through_a_borrowed_driver() {
        let mut driver = ScriptedDriver::new([Reading::ok(30.0)]);
        {
            let mut sensor = UltrasonicSensor::new(SensorConfig::default(), &mut driver).unwrap();
            sensor.measure(4);
        }
        assert_eq!(driver.calls, 4);
    }
}

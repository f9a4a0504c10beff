//! Ping Timing Engine
//!
//! [`EchoDriver`] performs exactly one trigger/measure cycle per call and
//! maps everything that can happen during it to a [`Reading`].
//!
//! ## Protocol
//!
//! ```text
//! TRIG ────┐▔▔▔▔┌───────────────────────────────────────────
//!          │20µs│
//! ECHO ────────────────┐▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔┌────────────────
//!                      │◄──── duration ────►│
//!          ▲           ▲                    ▲                ▲
//!        trigger   rising edge         falling edge    settle (ping_interval)
//! ```
//!
//! 1. Echo pin to output, drive low, back to input (clears residual charge)
//! 2. Echo already high? `EchoStuck`, no trigger is sent
//! 3. Trigger pulse
//! 4. Busy-wait for the rising edge, bounded by `echo_timeout`
//! 5. Busy-wait for the falling edge, same bound
//! 6. `cm = duration_us * 0.0343 / 2`
//! 7. Outside `[min_distance_cm, max_distance_cm]`: `OutOfRange`
//! 8. Otherwise `Ok`
//! 9. Settle for `ping_interval` unless a hardware fault occurred
//!
//! Any failing pin or timer primitive becomes `HwFault`. The engine never
//! retries; escalation belongs to the caller.
//!
//! ## Busy-Waiting
//!
//! Both edge waits poll the pin and re-read the clock on every iteration.
//! No alarm or executor is involved: at 1cm ≈ 58µs of round trip, waking
//! from a scheduler tick would cost whole centimeters.

use fugit::MillisDurationU32;

use crate::{
    config::SensorConfig,
    constants::physics::pulse_to_cm,
    errors::{HalError, HalResult},
    reading::{Outcome, Reading},
    time::{elapsed_us, timed_out},
    traits::{Clock, Direction, DriveStrength, GpioPin, PinConfig, PinIo, PingDriver},
};

/// Why a ping cycle stopped before producing a duration
#[derive(Debug, Clone, Copy, PartialEq)]
enum Abort {
    /// Echo pin high before the trigger
    EchoStuck,
    /// No edge within the timeout
    Timeout,
    /// A primitive failed
    Hal(HalError),
}

impl From<HalError> for Abort {
    fn from(err: HalError) -> Self {
        Abort::Hal(err)
    }
}

/// Ping timing engine bound to one trigger pin and one echo pin
///
/// Owns its pin and clock capabilities for the whole session. Use
/// [`EchoDriver::release`] to get them back.
#[derive(Debug)]
pub struct EchoDriver<G, C> {
    gpio: G,
    clock: C,
    trigger: GpioPin,
    echo: GpioPin,
    trigger_drive: Option<DriveStrength>,
}

impl<G: PinIo, C: Clock> EchoDriver<G, C> {
    /// Bind the engine to its capabilities and pins
    pub fn new(gpio: G, clock: C, trigger: GpioPin, echo: GpioPin) -> Self {
        Self {
            gpio,
            clock,
            trigger,
            echo,
            trigger_drive: None,
        }
    }

    /// Apply `strength` to the trigger pin during initialization
    ///
    /// Long cable runs to the sensor may need a stronger driver.
    pub fn with_trigger_drive(mut self, strength: DriveStrength) -> Self {
        self.trigger_drive = Some(strength);
        self
    }

    /// Trigger pin
    pub fn trigger_pin(&self) -> GpioPin {
        self.trigger
    }

    /// Echo pin
    pub fn echo_pin(&self) -> GpioPin {
        self.echo
    }

    /// Give the capabilities back
    pub fn release(self) -> (G, C) {
        (self.gpio, self.clock)
    }

    /// Trigger ends as an output driven low. Echo is configured as an input,
    /// briefly driven low as an output to drain residual charge, left as an
    /// input and sampled once.
    fn setup_pins(&mut self) -> HalResult<()> {
        debug!("Initializing driver: TRIG={}, ECHO={}", self.trigger, self.echo);

        self.gpio.reset_pin(self.trigger)?;
        self.gpio.configure(self.trigger, &PinConfig::output())?;
        if let Some(strength) = self.trigger_drive {
            self.gpio.set_drive_strength(self.trigger, strength)?;
        }
        self.gpio.set_level(self.trigger, false)?;

        self.gpio.reset_pin(self.echo)?;
        self.gpio.configure(self.echo, &PinConfig::input())?;
        self.discharge_echo()?;

        if self.gpio.get_level(self.echo)? {
            warn!("Echo pin {} still high after discharge", self.echo);
        }
        Ok(())
    }

    fn discharge_echo(&mut self) -> HalResult<()> {
        self.gpio.set_direction(self.echo, Direction::Output)?;
        self.gpio.set_level(self.echo, false)?;
        self.gpio.set_direction(self.echo, Direction::Input)
    }

    fn send_trigger(&mut self, config: &SensorConfig) -> HalResult<()> {
        self.gpio.set_level(self.trigger, true)?;
        self.clock.delay_us(config.trigger_pulse.to_micros())?;
        self.gpio.set_level(self.trigger, false)
    }

    /// Poll until the echo pin goes high
    fn wait_rising_edge(&mut self, timeout_us: u32) -> Result<(), Abort> {
        let start = self.clock.now_us();

        loop {
            let high = self.gpio.get_level(self.echo)?;
            if timed_out(&self.clock, start, timeout_us) {
                return Err(Abort::Timeout);
            }
            if high {
                return Ok(());
            }
        }
    }

    /// Poll until the echo pin goes low; returns the high time in µs
    fn measure_pulse(&mut self, timeout_us: u32) -> Result<u32, Abort> {
        let start = self.clock.now_us();

        loop {
            let high = self.gpio.get_level(self.echo)?;
            if timed_out(&self.clock, start, timeout_us) {
                return Err(Abort::Timeout);
            }
            if !high {
                break;
            }
        }

        let duration = elapsed_us(start, self.clock.now_us());
        Ok(u32::try_from(duration).unwrap_or(u32::MAX))
    }

    /// Steps 1-6: returns the measured distance in cm
    fn cycle(&mut self, config: &SensorConfig) -> Result<f32, Abort> {
        self.discharge_echo()?;

        if self.gpio.get_level(self.echo)? {
            return Err(Abort::EchoStuck);
        }

        self.send_trigger(config)?;

        let timeout_us = config.echo_timeout.to_micros();
        self.wait_rising_edge(timeout_us)?;
        let duration_us = self.measure_pulse(timeout_us)?;

        Ok(pulse_to_cm(duration_us))
    }

    fn settle(&mut self, interval: MillisDurationU32) -> HalResult<()> {
        if interval.is_zero() {
            return Ok(());
        }
        self.clock.delay_ms(interval.to_millis())
    }
}

impl<G: PinIo, C: Clock> PingDriver for EchoDriver<G, C> {
    fn initialize(&mut self, warmup: MillisDurationU32) -> HalResult<()> {
        self.setup_pins()?;

        if !warmup.is_zero() {
            debug!("Warming up for {} ms", warmup.to_millis());
            self.clock.delay_ms(warmup.to_millis())?;
        }

        Ok(())
    }

    fn shutdown(&mut self) -> HalResult<()> {
        self.gpio.set_level(self.trigger, false)?;
        self.gpio.reset_pin(self.trigger)?;
        self.gpio.set_level(self.echo, false)?;
        self.gpio.reset_pin(self.echo)
    }

    fn ping_once(&mut self, config: &SensorConfig) -> Reading {
        let reading = match self.cycle(config) {
            Ok(cm) if config.in_range(cm) => Reading::ok(cm),
            Ok(cm) => {
                debug!(
                    "Out of range: {} cm (limits {}-{})",
                    cm, config.min_distance_cm, config.max_distance_cm
                );
                Reading::failed(Outcome::OutOfRange)
            }
            Err(Abort::Timeout) => Reading::failed(Outcome::Timeout),
            Err(Abort::EchoStuck) => {
                warn!("Echo pin {} stuck high before trigger", self.echo);
                return Reading::failed(Outcome::EchoStuck);
            }
            Err(Abort::Hal(err)) => {
                error!("Ping aborted: {}", err);
                return Reading::failed(Outcome::HwFault);
            }
        };

        if let Err(err) = self.settle(config.ping_interval) {
            error!("Inter-ping delay failed: {}", err);
            return Reading::failed(Outcome::HwFault);
        }

        reading
    }
}

//! Pin I/O Capability
//!
//! Everything the ping engine needs from a GPIO peripheral. Platform adapters
//! (ESP-IDF, rppal, embedded-hal wrappers, the bundled simulator) implement
//! [`PinIo`]; the engine never touches hardware directly.
//!
//! Every operation returns [`HalResult`]. Adapters should report *any*
//! failure, including invalid pin numbers, rather than silently ignoring it:
//! the engine turns failures into `Outcome::HwFault`, which tells the caller
//! to stop trusting the sensor.

use core::fmt;

use crate::errors::HalResult;

/// GPIO number as understood by the platform adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioPin(u8);

impl GpioPin {
    /// Wrap a raw GPIO number
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// Raw GPIO number
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Runtime pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// High impedance input
    Input,
    /// Push-pull output
    Output,
}

/// Static pin mode applied by [`PinIo::configure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Pin disabled
    Disabled,
    /// Input only
    Input,
    /// Output only
    Output,
    /// Input and output enabled
    InputOutput,
}

/// Interrupt disposition applied by [`PinIo::configure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptType {
    /// No interrupt
    Disabled,
    /// Rising edge
    RisingEdge,
    /// Falling edge
    FallingEdge,
    /// Both edges
    AnyEdge,
}

/// Output drive strength
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveStrength {
    /// Weakest (~5mA on ESP32)
    Weak,
    /// ~10mA
    Medium,
    /// ~20mA, typical default
    Default,
    /// Strongest (~40mA)
    Strongest,
}

/// Electrical configuration of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// Static mode
    pub mode: PinMode,
    /// Internal pull-up enabled
    pub pull_up: bool,
    /// Internal pull-down enabled
    pub pull_down: bool,
    /// Interrupt disposition
    pub interrupt: InterruptType,
}

impl PinConfig {
    /// Plain output: no pulls, no interrupts
    pub const fn output() -> Self {
        Self {
            mode: PinMode::Output,
            pull_up: false,
            pull_down: false,
            interrupt: InterruptType::Disabled,
        }
    }

    /// Floating input: no pulls, no interrupts
    ///
    /// HC-SR04 drives its echo line push-pull, so pulls are unnecessary.
    pub const fn input() -> Self {
        Self {
            mode: PinMode::Input,
            pull_up: false,
            pull_down: false,
            interrupt: InterruptType::Disabled,
        }
    }
}

/// Pin I/O capability
pub trait PinIo {
    /// Return a pin to its power-on state
    fn reset_pin(&mut self, pin: GpioPin) -> HalResult<()>;

    /// Apply mode, pulls and interrupt disposition
    fn configure(&mut self, pin: GpioPin, config: &PinConfig) -> HalResult<()>;

    /// Drive an output high (`true`) or low (`false`)
    fn set_level(&mut self, pin: GpioPin, high: bool) -> HalResult<()>;

    /// Sample an input level
    fn get_level(&mut self, pin: GpioPin) -> HalResult<bool>;

    /// Switch direction at runtime
    fn set_direction(&mut self, pin: GpioPin, direction: Direction) -> HalResult<()>;

    /// Set output drive strength
    fn set_drive_strength(&mut self, pin: GpioPin, strength: DriveStrength) -> HalResult<()>;
}

impl<T: PinIo + ?Sized> PinIo for &mut T {
    fn reset_pin(&mut self, pin: GpioPin) -> HalResult<()> {
        (**self).reset_pin(pin)
    }

    fn configure(&mut self, pin: GpioPin, config: &PinConfig) -> HalResult<()> {
        (**self).configure(pin, config)
    }

    fn set_level(&mut self, pin: GpioPin, high: bool) -> HalResult<()> {
        (**self).set_level(pin, high)
    }

    fn get_level(&mut self, pin: GpioPin) -> HalResult<bool> {
        (**self).get_level(pin)
    }

    fn set_direction(&mut self, pin: GpioPin, direction: Direction) -> HalResult<()> {
        (**self).set_direction(pin, direction)
    }

    fn set_drive_strength(&mut self, pin: GpioPin, strength: DriveStrength) -> HalResult<()> {
        (**self).set_drive_strength(pin, strength)
    }
}

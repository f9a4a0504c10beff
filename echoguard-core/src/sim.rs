//! Simulated HC-SR04 for Hosts and Tests
//!
//! [`EchoSimulator`] models the sensor on a virtual timeline. It hands out a
//! [`SimGpio`] and a [`SimClock`] that share that timeline, so an
//! [`EchoDriver`] built from them runs the real protocol code against a
//! deterministic fake:
//!
//! - every `now_us()` call advances virtual time by one tick (1µs default),
//!   so busy-wait loops always make progress;
//! - delays advance virtual time by their full length and return at once;
//! - the echo line follows a per-ping [`EchoResponse`] script, relative to
//!   the falling edge of the trigger pulse.
//!
//! Faults can be injected per primitive with [`EchoSimulator::fail_after`].
//! Every primitive except level reads is recorded as a [`SimEvent`].
//!
//! ```rust
//! use echoguard_core::sim::{EchoSimulator, EchoResponse};
//! use echoguard_core::{SensorConfig, Outcome};
//! use echoguard_core::traits::PingDriver;
//!
//! let sim = EchoSimulator::new().with_script([
//!     EchoResponse::Echo { cm: 42.0 },
//!     EchoResponse::Silent,
//! ]);
//! let mut driver = sim.driver();
//! let config = SensorConfig::default();
//!
//! let first = driver.ping_once(&config);
//! assert_eq!(first.outcome(), Outcome::Ok);
//! assert!((first.cm() - 42.0).abs() < 0.1);
//!
//! assert_eq!(driver.ping_once(&config).outcome(), Outcome::Timeout);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    constants::physics::cm_to_pulse,
    driver::EchoDriver,
    errors::{HalError, HalResult},
    time::Microseconds,
    traits::{Clock, Direction, DriveStrength, GpioPin, PinConfig, PinIo},
};

/// Trigger pin used by [`EchoSimulator::new`]
pub const SIM_TRIGGER: GpioPin = GpioPin::new(4);

/// Echo pin used by [`EchoSimulator::new`]
pub const SIM_ECHO: GpioPin = GpioPin::new(5);

/// Delay between the trigger's falling edge and the echo's rising edge (µs)
///
/// A real HC-SR04 emits its 8-cycle 40kHz burst first (~200µs).
pub const DEFAULT_ECHO_LATENCY_US: u64 = 200;

/// What the simulated sensor does for one ping
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EchoResponse {
    /// Echo pulse matching a target at `cm`
    Echo {
        /// Target distance in centimeters
        cm: f32,
    },
    /// No echo at all
    Silent,
    /// Echo rises and never falls
    NeverFalls,
    /// Echo line high before the trigger is even sent
    ///
    /// Consumed by the first echo read of the ping.
    StuckHigh,
}

impl EchoResponse {
    fn level(self, since_trigger_us: u64, latency_us: u64) -> bool {
        match self {
            Self::Echo { cm } => {
                let pulse = u64::from(cm_to_pulse(cm));
                since_trigger_us >= latency_us && since_trigger_us < latency_us + pulse
            }
            Self::Silent => false,
            Self::NeverFalls => since_trigger_us >= latency_us,
            Self::StuckHigh => true,
        }
    }
}

/// Primitive selector for fault injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimOp {
    /// `PinIo::reset_pin`
    ResetPin,
    /// `PinIo::configure`
    Configure,
    /// `PinIo::set_level`
    SetLevel,
    /// `PinIo::get_level`
    GetLevel,
    /// `PinIo::set_direction`
    SetDirection,
    /// `PinIo::set_drive_strength`
    SetDriveStrength,
    /// `Clock::delay_us`
    DelayUs,
    /// `Clock::delay_ms`
    DelayMs,
}

impl SimOp {
    fn name(self) -> &'static str {
        match self {
            Self::ResetPin => "reset_pin",
            Self::Configure => "configure",
            Self::SetLevel => "set_level",
            Self::GetLevel => "get_level",
            Self::SetDirection => "set_direction",
            Self::SetDriveStrength => "set_drive_strength",
            Self::DelayUs => "delay_us",
            Self::DelayMs => "delay_ms",
        }
    }
}

/// Recorded primitive call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// `reset_pin(pin)`
    ResetPin(GpioPin),
    /// `configure(pin, config)`
    Configure(GpioPin, PinConfig),
    /// `set_level(pin, high)`
    SetLevel(GpioPin, bool),
    /// `set_direction(pin, direction)`
    SetDirection(GpioPin, Direction),
    /// `set_drive_strength(pin, strength)`
    SetDriveStrength(GpioPin, DriveStrength),
    /// `delay_us(us)`
    DelayUs(u32),
    /// `delay_ms(ms)`
    DelayMs(u32),
}

#[derive(Debug, Clone, Copy)]
struct Fault {
    op: SimOp,
    remaining_ok: usize,
}

#[derive(Debug)]
struct SimState {
    now_us: Microseconds,
    tick_us: u64,
    latency_us: u64,
    trigger: GpioPin,
    echo: GpioPin,
    script: Vec<EchoResponse>,
    next_ping: usize,
    trigger_high: bool,
    echo_output: bool,
    active: Option<(EchoResponse, Microseconds)>,
    faults: Vec<Fault>,
    events: Vec<SimEvent>,
    pings_triggered: usize,
    level_reads: usize,
}

impl SimState {
    /// Response for the next ping; the last script entry repeats
    fn upcoming(&self) -> EchoResponse {
        match self.script.get(self.next_ping) {
            Some(response) => *response,
            None => self.script.last().copied().unwrap_or(EchoResponse::Silent),
        }
    }

    fn check(&mut self, op: SimOp, pin: Option<GpioPin>) -> HalResult<()> {
        let Some(fault) = self.faults.iter_mut().find(|f| f.op == op) else {
            return Ok(());
        };

        if fault.remaining_ok > 0 {
            fault.remaining_ok -= 1;
            return Ok(());
        }

        Err(match pin {
            Some(pin) => HalError::Gpio { pin: pin.number(), op: op.name() },
            None => HalError::Timer { op: op.name() },
        })
    }

    fn echo_level(&mut self) -> bool {
        if self.echo_output {
            return false;
        }

        match self.active {
            Some((response, fell_at)) => {
                response.level(self.now_us.saturating_sub(fell_at), self.latency_us)
            }
            None if self.upcoming() == EchoResponse::StuckHigh => {
                // A stuck line uses up its ping without a trigger
                self.active = Some((EchoResponse::StuckHigh, self.now_us));
                self.next_ping += 1;
                true
            }
            None => false,
        }
    }
}

/// Virtual HC-SR04 with a scripted echo line
#[derive(Debug, Clone)]
pub struct EchoSimulator {
    state: Rc<RefCell<SimState>>,
}

impl Default for EchoSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoSimulator {
    /// Silent sensor on [`SIM_TRIGGER`] / [`SIM_ECHO`]
    pub fn new() -> Self {
        Self::with_pins(SIM_TRIGGER, SIM_ECHO)
    }

    /// Silent sensor on custom pins
    pub fn with_pins(trigger: GpioPin, echo: GpioPin) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimState {
                now_us: 0,
                tick_us: 1,
                latency_us: DEFAULT_ECHO_LATENCY_US,
                trigger,
                echo,
                script: Vec::new(),
                next_ping: 0,
                trigger_high: false,
                echo_output: false,
                active: None,
                faults: Vec::new(),
                events: Vec::new(),
                pings_triggered: 0,
                level_reads: 0,
            })),
        }
    }

    /// Answer every ping with an echo from `cm`
    pub fn with_distance(self, cm: f32) -> Self {
        self.with_script([EchoResponse::Echo { cm }])
    }

    /// Answer pings in order; the last response repeats
    pub fn with_script(self, script: impl IntoIterator<Item = EchoResponse>) -> Self {
        self.state.borrow_mut().script = script.into_iter().collect();
        self
    }

    /// Change the trigger-to-echo latency
    pub fn with_latency_us(self, latency_us: u64) -> Self {
        self.state.borrow_mut().latency_us = latency_us;
        self
    }

    /// Change how far each `now_us()` call advances the timeline
    pub fn with_tick_us(self, tick_us: u64) -> Self {
        self.state.borrow_mut().tick_us = tick_us.max(1);
        self
    }

    /// Let `ok_calls` calls of `op` succeed, then fail every later one
    pub fn fail_after(self, op: SimOp, ok_calls: usize) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.faults.retain(|f| f.op != op);
            state.faults.push(Fault { op, remaining_ok: ok_calls });
        }
        self
    }

    /// Fail every call of `op`
    pub fn fail(self, op: SimOp) -> Self {
        self.fail_after(op, 0)
    }

    /// Stop injecting faults into `op`
    pub fn heal(&self, op: SimOp) {
        self.state.borrow_mut().faults.retain(|f| f.op != op);
    }

    /// Pin and clock capabilities sharing this simulator's timeline
    pub fn split(&self) -> (SimGpio, SimClock) {
        (
            SimGpio { state: Rc::clone(&self.state) },
            SimClock { state: Rc::clone(&self.state) },
        )
    }

    /// Engine bound to this simulator's pins
    pub fn driver(&self) -> EchoDriver<SimGpio, SimClock> {
        let (gpio, clock) = self.split();
        let (trigger, echo) = {
            let state = self.state.borrow();
            (state.trigger, state.echo)
        };
        EchoDriver::new(gpio, clock, trigger, echo)
    }

    /// Recorded primitive calls, oldest first
    pub fn events(&self) -> Vec<SimEvent> {
        self.state.borrow().events.clone()
    }

    /// Forget recorded calls
    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// Number of complete trigger pulses sent
    pub fn pings_triggered(&self) -> usize {
        self.state.borrow().pings_triggered
    }

    /// Number of `get_level` calls
    pub fn level_reads(&self) -> usize {
        self.state.borrow().level_reads
    }

    /// Current virtual time
    pub fn now_us(&self) -> Microseconds {
        self.state.borrow().now_us
    }

    /// All `delay_ms` durations recorded so far
    pub fn delays_ms(&self) -> Vec<u32> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                SimEvent::DelayMs(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }
}

/// Pin side of the simulator
#[derive(Debug)]
pub struct SimGpio {
    state: Rc<RefCell<SimState>>,
}

impl PinIo for SimGpio {
    fn reset_pin(&mut self, pin: GpioPin) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        state.check(SimOp::ResetPin, Some(pin))?;
        state.events.push(SimEvent::ResetPin(pin));
        if pin == state.echo {
            state.echo_output = false;
        }
        if pin == state.trigger {
            state.trigger_high = false;
        }
        Ok(())
    }

    fn configure(&mut self, pin: GpioPin, config: &PinConfig) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        state.check(SimOp::Configure, Some(pin))?;
        state.events.push(SimEvent::Configure(pin, *config));
        Ok(())
    }

    fn set_level(&mut self, pin: GpioPin, high: bool) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        state.check(SimOp::SetLevel, Some(pin))?;
        state.events.push(SimEvent::SetLevel(pin, high));

        if pin == state.trigger {
            if state.trigger_high && !high {
                // Falling edge of the trigger starts the burst
                let response = state.upcoming();
                let now = state.now_us;
                state.active = Some((response, now));
                state.next_ping += 1;
                state.pings_triggered += 1;
            }
            state.trigger_high = high;
        }
        Ok(())
    }

    fn get_level(&mut self, pin: GpioPin) -> HalResult<bool> {
        let mut state = self.state.borrow_mut();
        state.check(SimOp::GetLevel, Some(pin))?;
        state.level_reads += 1;

        if pin == state.echo {
            Ok(state.echo_level())
        } else if pin == state.trigger {
            Ok(state.trigger_high)
        } else {
            Ok(false)
        }
    }

    fn set_direction(&mut self, pin: GpioPin, direction: Direction) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        state.check(SimOp::SetDirection, Some(pin))?;
        state.events.push(SimEvent::SetDirection(pin, direction));

        if pin == state.echo {
            state.echo_output = direction == Direction::Output;
            if state.echo_output {
                // Driving the line low ends whatever echo was in flight
                state.active = None;
            }
        }
        Ok(())
    }

    fn set_drive_strength(&mut self, pin: GpioPin, strength: DriveStrength) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        state.check(SimOp::SetDriveStrength, Some(pin))?;
        state.events.push(SimEvent::SetDriveStrength(pin, strength));
        Ok(())
    }
}

/// Clock side of the simulator
#[derive(Debug)]
pub struct SimClock {
    state: Rc<RefCell<SimState>>,
}

impl Clock for SimClock {
    fn now_us(&self) -> Microseconds {
        let mut state = self.state.borrow_mut();
        let tick = state.tick_us;
        state.now_us += tick;
        state.now_us
    }

    fn delay_us(&mut self, us: u32) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        state.check(SimOp::DelayUs, None)?;
        state.events.push(SimEvent::DelayUs(us));
        state.now_us += u64::from(us);
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) -> HalResult<()> {
        let mut state = self.state.borrow_mut();
        state.check(SimOp::DelayMs, None)?;
        state.events.push(SimEvent::DelayMs(ms));
        state.now_us += u64::from(ms) * crate::constants::time::US_PER_MS;
        Ok(())
    }
}

//! Common test utilities for integration tests
//!
//! This module provides:
//! - Sensor builders wired to the simulator
//! - Echo scripts for typical field conditions
//! - Scenario tables with the outcome each one must produce

#![allow(dead_code)]

use echoguard_core::{
    sim::{EchoResponse, EchoSimulator, SimGpio, SimClock},
    EchoDriver, Reading, SensorConfig, UltrasonicSensor,
};
use fugit::ExtU32;

pub mod scenarios;

/// Simulated sensor type used across the integration tests
pub type SimSensor = UltrasonicSensor<EchoDriver<SimGpio, SimClock>>;

/// Default configuration without warmup
pub fn quick_config() -> SensorConfig {
    SensorConfig::default().with_warmup(0.millis())
}

/// Initialized sensor reading from `sim`
pub fn sensor(sim: &EchoSimulator, config: SensorConfig) -> SimSensor {
    let mut sensor = UltrasonicSensor::new(config, sim.driver()).expect("valid config");
    sensor.initialize().expect("simulated pins never fail unless told to");
    sensor
}

/// One measurement of `ping_count` pings against `script`
pub fn measure_script(
    script: impl IntoIterator<Item = EchoResponse>,
    config: SensorConfig,
    ping_count: u8,
) -> Reading {
    let sim = EchoSimulator::new().with_script(script);
    sensor(&sim, config).measure(ping_count)
}

/// Echoes around `center_cm`, offset by each of `offsets`
pub fn echoes_around(center_cm: f32, offsets: &[f32]) -> Vec<EchoResponse> {
    offsets
        .iter()
        .map(|offset| EchoResponse::Echo { cm: center_cm + offset })
        .collect()
}

/// Assert a success outcome whose distance is within `tolerance` of `expected`
pub fn assert_distance(reading: &Reading, expected: f32, tolerance: f32) {
    let cm = reading
        .distance_cm()
        .unwrap_or_else(|| panic!("expected a distance, got {}", reading));
    assert!(
        (cm - expected).abs() <= tolerance,
        "distance {} not within {} of {}",
        cm,
        tolerance,
        expected
    );
}

//! Basic Distance Measurement Example
//!
//! This example measures a slowly approaching target with a simulated
//! HC-SR04 and shows how a caller can adapt its ping count to the quality
//! of previous readings.
//!
//! ## What You'll Learn
//!
//! - Building a sensor from pin and clock capabilities
//! - Initializing the sensor and taking measurements
//! - Interpreting outcomes: success, logical failure, hardware fault
//! - Adjusting the ping count between measurements
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use echoguard_core::{
    sim::{EchoResponse, EchoSimulator},
    Outcome, SensorConfig, UltrasonicSensor,
};
use fugit::ExtU32;

/// Ping count bounds used by the adaptive loop
const MIN_PINGS: u8 = 3;
const MAX_PINGS: u8 = 15;

/// More pings after a poor reading, fewer after a good one
fn next_ping_count(current: u8, outcome: Outcome) -> u8 {
    match outcome {
        Outcome::Ok => current.saturating_sub(2).max(MIN_PINGS),
        Outcome::WeakSignal | Outcome::HighVariance | Outcome::InsufficientSamples => {
            (current + 4).min(MAX_PINGS)
        }
        _ => current,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("EchoGuard Basic Measurement Example");
    println!("===================================\n");

    // A target approaching from 150cm to 20cm, with a few lost echoes
    // and a shorted echo line at the very end
    let mut script = Vec::new();
    for step in 0..60u8 {
        let cm = 150.0 - f32::from(step) * 2.2;
        if step % 7 == 3 {
            script.push(EchoResponse::Silent);
        } else {
            script.push(EchoResponse::Echo { cm });
        }
    }
    script.push(EchoResponse::StuckHigh);

    let sim = EchoSimulator::new().with_script(script);
    let (gpio, clock) = sim.split();

    let config = SensorConfig::hc_sr04().with_ping_interval(60.millis());
    println!("Configuration:");
    println!("  Range: {}-{} cm", config.min_distance_cm, config.max_distance_cm);
    println!("  Echo timeout: {} µs", config.echo_timeout.to_micros());
    println!("  Filter: {:?}\n", config.filter);

    let mut sensor = UltrasonicSensor::from_hal(
        config,
        gpio,
        clock,
        echoguard_core::sim::SIM_TRIGGER,
        echoguard_core::sim::SIM_ECHO,
    )?;
    sensor.initialize()?;
    println!("Sensor initialized at t={} ms\n", sim.now_us() / 1000);

    let mut ping_count = 5;
    for round in 1..=12 {
        let reading = sensor.measure(ping_count);

        println!("Round {:>2} ({:>2} pings): {}", round, ping_count, reading);

        match reading.outcome() {
            Outcome::Ok | Outcome::WeakSignal => {}
            Outcome::EchoStuck | Outcome::HwFault => {
                println!("\nHardware fault, power-cycle the sensor before retrying");
                break;
            }
            other => println!("  no distance this round ({})", other),
        }

        ping_count = next_ping_count(ping_count, reading.outcome());
    }

    sensor.shutdown()?;
    println!("\nPings sent: {}", sim.pings_triggered());
    println!("Virtual time elapsed: {} ms", sim.now_us() / 1000);

    Ok(())
}

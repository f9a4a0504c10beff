//! Field scenarios with known verdicts

use echoguard_core::{sim::EchoResponse, Filter, Outcome};

use super::echoes_around;

/// Scripted measurement and its expected verdict
pub struct Scenario {
    pub name: &'static str,
    pub script: Vec<EchoResponse>,
    pub filter: Filter,
    pub pings: u8,
    pub expected: Outcome,
}

/// Scenario catalogue
pub struct Scenarios;

impl Scenarios {
    /// Flat wall at 80cm, every ping answers
    pub fn solid_wall() -> Scenario {
        Scenario {
            name: "solid_wall",
            script: echoes_around(80.0, &[0.0, 0.2, -0.2, 0.1, -0.1]),
            filter: Filter::Median,
            pings: 5,
            expected: Outcome::Ok,
        }
    }

    /// Soft target: only half the pings come back
    pub fn soft_target() -> Scenario {
        let mut script = Vec::new();
        for _ in 0..5 {
            script.push(EchoResponse::Echo { cm: 60.0 });
            script.push(EchoResponse::Silent);
        }
        Scenario {
            name: "soft_target",
            script,
            filter: Filter::Median,
            pings: 10,
            expected: Outcome::WeakSignal,
        }
    }

    /// Open space: nothing echoes
    pub fn open_space() -> Scenario {
        Scenario {
            name: "open_space",
            script: vec![EchoResponse::Silent],
            filter: Filter::Median,
            pings: 5,
            expected: Outcome::Timeout,
        }
    }

    /// Object inside the dead zone
    pub fn too_close() -> Scenario {
        Scenario {
            name: "too_close",
            script: vec![EchoResponse::Echo { cm: 4.0 }],
            filter: Filter::Median,
            pings: 5,
            expected: Outcome::OutOfRange,
        }
    }

    /// Multipath: echoes bounce between two surfaces
    pub fn multipath() -> Scenario {
        Scenario {
            name: "multipath",
            script: echoes_around(100.0, &[-60.0, 60.0, -60.0, 60.0, -60.0, 60.0]),
            filter: Filter::Median,
            pings: 6,
            expected: Outcome::HighVariance,
        }
    }

    /// Echo line shorted high
    pub fn shorted_echo() -> Scenario {
        Scenario {
            name: "shorted_echo",
            script: vec![EchoResponse::StuckHigh],
            filter: Filter::Median,
            pings: 5,
            expected: Outcome::EchoStuck,
        }
    }

    /// Every scenario
    pub fn all() -> Vec<Scenario> {
        vec![
            Self::solid_wall(),
            Self::soft_target(),
            Self::open_space(),
            Self::too_close(),
            Self::multipath(),
            Self::shorted_echo(),
        ]
    }
}

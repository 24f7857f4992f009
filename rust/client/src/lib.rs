extern crate ndarray;
extern crate reqwest;
extern crate serde;
extern crate serde_json;

pub mod action;
pub mod client;
pub mod common;
pub mod config;
pub mod env;
pub mod error;
pub mod observation;
pub mod reference;
pub mod reward;
pub mod sim;
pub mod telemetry;
pub mod termination;

pub use action::ActionScheme;
pub use client::HttpTelemetry;
pub use common::defs::*;
pub use config::{EnvConfig, RewardConfig, StepSync};
pub use env::{EpisodeController, EpisodePhase, EpisodeState};
pub use error::{EnvError, EnvResult};
pub use observation::Observation;
pub use reference::{ReferenceSample, ReferenceTable};
pub use reward::{GravityTurn, RewardPolicy};
pub use sim::SimulatedVessel;
pub use telemetry::TelemetrySource;
pub use termination::{DescentGuard, TerminationPolicy, TerminationReason};

use serde_json::{Map, Value};

/// Bounds metadata for external RL tooling. Only the numeric ranges matter here.
#[derive(Debug, Clone, PartialEq)]
pub enum ObsActSpace {
    /// Refer: https://gymnasium.farama.org/api/spaces/fundamental/#discrete
    Discrete { n: Discrete },

    /// Refer: https://gymnasium.farama.org/api/spaces/fundamental/#box
    Box {
        shape: Vec<Discrete>,
        high: Vec<Continous>,
        low: Vec<Continous>,
    },
}

impl ObsActSpace {
    pub fn discrete_value(&self) -> Option<Discrete> {
        if let Self::Discrete { n } = self {
            Some(*n)
        } else {
            None
        }
    }

    /// Whether every element of `values` lies within the box bounds.
    pub fn contains(&self, values: &[Continous]) -> bool {
        match self {
            ObsActSpace::Discrete { n } => {
                values.len() == 1 && values[0] >= 0. && values[0] < *n as Continous
            }
            ObsActSpace::Box { high, low, .. } => {
                values.len() == high.len()
                    && values
                        .iter()
                        .zip(low.iter().zip(high))
                        .all(|(v, (lo, hi))| lo <= v && v <= hi)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepInfo {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    /// Why the episode ended, when `done`.
    pub reason: Option<TerminationReason>,
    /// Reserved for diagnostics. Always empty.
    pub info: Map<String, Value>,
}

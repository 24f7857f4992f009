use crate::action::ActionScheme;
use crate::error::{EnvError, EnvResult};
use crate::reference::ReferenceTable;
use crate::reward::{GravityTurn, RewardPolicy};
use crate::termination::DescentGuard;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardConfig {
    GravityTurn {
        #[serde(default = "default_turn_start")]
        turn_start_altitude: f64,
        /// Defaults to the environment's `max_altitude`.
        #[serde(default)]
        turn_end_altitude: Option<f64>,
        #[serde(default = "default_tolerance")]
        tolerance_deg: f64,
        #[serde(default = "default_success_reward")]
        success_reward: f64,
        #[serde(default = "default_failure_reward")]
        failure_reward: f64,
    },
    GroundTruth {
        reference_path: PathBuf,
    },
}

impl Default for RewardConfig {
    fn default() -> Self {
        RewardConfig::GravityTurn {
            turn_start_altitude: default_turn_start(),
            turn_end_altitude: None,
            tolerance_deg: default_tolerance(),
            success_reward: default_success_reward(),
            failure_reward: default_failure_reward(),
        }
    }
}

fn default_turn_start() -> f64 {
    250.
}

fn default_tolerance() -> f64 {
    10.
}

fn default_success_reward() -> f64 {
    1.
}

fn default_failure_reward() -> f64 {
    -1.
}

/// How `step` waits for the simulation to move forward after issuing an action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepSync {
    /// Poll the simulated clock until `quantum` seconds have elapsed, sleeping
    /// `poll_interval_ms` between reads.
    PollClock { quantum: f64, poll_interval_ms: u64 },
    /// Ask the source to advance by `quantum` seconds and block until it has.
    Advance { quantum: f64 },
}

impl StepSync {
    pub fn quantum(&self) -> f64 {
        match *self {
            StepSync::PollClock { quantum, .. } | StepSync::Advance { quantum } => quantum,
        }
    }
}

impl Default for StepSync {
    fn default() -> Self {
        StepSync::PollClock {
            quantum: 0.1,
            poll_interval_ms: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub save_name: String,
    /// Altitude at which the episode ends in success. Also the normalization
    /// scale for observations.
    pub max_altitude: f64,
    pub action_scheme: ActionScheme,
    pub reward: RewardConfig,
    pub step_budget: Option<u32>,
    pub descent_guard: Option<DescentGuard>,
    pub sync: StepSync,
    pub settle_after_load_ms: u64,
    pub settle_after_ignition_ms: u64,
    pub ignition_throttle: f64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::impulse()
    }
}

impl EnvConfig {
    pub fn impulse() -> Self {
        Self {
            save_name: "revivekerbals".to_string(),
            max_altitude: 45_000.,
            action_scheme: ActionScheme::AbsoluteImpulse,
            reward: RewardConfig::default(),
            step_budget: None,
            descent_guard: None,
            sync: StepSync::default(),
            settle_after_load_ms: 3_000,
            settle_after_ignition_ms: 2_000,
            ignition_throttle: 1.,
        }
    }

    pub fn trim() -> Self {
        Self {
            action_scheme: ActionScheme::IncrementalTrim,
            step_budget: Some(500),
            descent_guard: Some(DescentGuard::default()),
            ..Self::impulse()
        }
    }

    pub fn from_json(json: &str) -> EnvResult<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> EnvResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Zero both settling delays. Useful against sources that are ready immediately.
    pub fn without_settling(mut self) -> Self {
        self.settle_after_load_ms = 0;
        self.settle_after_ignition_ms = 0;
        self
    }

    pub fn settle_after_load(&self) -> Duration {
        Duration::from_millis(self.settle_after_load_ms)
    }

    pub fn settle_after_ignition(&self) -> Duration {
        Duration::from_millis(self.settle_after_ignition_ms)
    }

    pub fn validate(&self) -> EnvResult<()> {
        let invalid = |m: String| Err(EnvError::InvalidConfig(m));

        if !(self.max_altitude > 0.) {
            return invalid(format!("max_altitude must be positive, got {}", self.max_altitude));
        }
        if !(self.sync.quantum() > 0.) {
            return invalid(format!("step quantum must be positive, got {}", self.sync.quantum()));
        }
        if !(0. ..=1.).contains(&self.ignition_throttle) {
            return invalid(format!(
                "ignition_throttle must lie in [0, 1], got {}",
                self.ignition_throttle
            ));
        }
        if let RewardConfig::GravityTurn {
            turn_start_altitude,
            turn_end_altitude,
            ..
        } = &self.reward
        {
            let end = turn_end_altitude.unwrap_or(self.max_altitude);
            if end <= *turn_start_altitude {
                return invalid(format!(
                    "gravity turn must end above its start ({turn_start_altitude} >= {end})"
                ));
            }
        }

        Ok(())
    }

    /// Build the reward strategy, loading the reference trajectory if one is configured.
    pub fn reward_policy(&self) -> EnvResult<RewardPolicy> {
        match &self.reward {
            RewardConfig::GravityTurn {
                turn_start_altitude,
                turn_end_altitude,
                tolerance_deg,
                success_reward,
                failure_reward,
            } => Ok(RewardPolicy::GravityTurn(GravityTurn {
                turn_start_altitude: *turn_start_altitude,
                turn_end_altitude: turn_end_altitude.unwrap_or(self.max_altitude),
                tolerance_deg: *tolerance_deg,
                success_reward: *success_reward,
                failure_reward: *failure_reward,
            })),
            RewardConfig::GroundTruth { reference_path } => Ok(RewardPolicy::GroundTruth(
                ReferenceTable::load(reference_path)?,
            )),
        }
    }
}

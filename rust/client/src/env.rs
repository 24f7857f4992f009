use crate::action::ActionScheme;
use crate::common::defs::*;
use crate::config::{EnvConfig, StepSync};
use crate::error::{EnvError, EnvResult};
use crate::observation::{self, Observation};
use crate::reward::RewardPolicy;
use crate::telemetry::TelemetrySource;
use crate::termination::{TerminationPolicy, TerminationReason};
use crate::{ObsActSpace, StepInfo};
use serde_json::Map;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    Uninitialized,
    Ready,
    Stepping,
    Terminal,
}

impl EpisodePhase {
    fn name(&self) -> &'static str {
        match self {
            EpisodePhase::Uninitialized => "uninitialized",
            EpisodePhase::Ready => "ready",
            EpisodePhase::Stepping => "stepping",
            EpisodePhase::Terminal => "terminal",
        }
    }
}

/// Mutable bookkeeping for the current episode. Only the controller writes it,
/// and only after a `step` or `reset` has fully succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpisodeState {
    pub step_count: u32,
    /// Step index `last` was scored at. A `step` scores its sample before the
    /// count advances, so this trails `step_count` by one between steps.
    pub scored_at: u32,
    pub max_altitude_observed: f64,
    /// The one telemetry sample the latest observation, reward and
    /// termination check were all computed from.
    pub last: Telemetry,
}

/// Drives one vessel through reset/step episodes.
///
/// The telemetry source is owned for the controller's lifetime; there is one
/// episode at a time and no call is reentrant.
#[derive(Debug)]
pub struct EpisodeController<S: TelemetrySource> {
    source: S,
    config: EnvConfig,
    reward: RewardPolicy,
    termination: TerminationPolicy,
    state: EpisodeState,
    phase: EpisodePhase,
    last_reason: Option<TerminationReason>,
    episodes: u64,
}

impl<S: TelemetrySource> EpisodeController<S> {
    pub fn new(source: S, config: EnvConfig) -> EnvResult<Self> {
        let reward = config.reward_policy()?;
        Self::with_reward_policy(source, config, reward)
    }

    pub fn with_reward_policy(
        source: S,
        config: EnvConfig,
        reward: RewardPolicy,
    ) -> EnvResult<Self> {
        config.validate()?;
        let step_budget = Self::checked_step_budget(&config, &reward)?;

        let termination = TerminationPolicy {
            ceiling: config.max_altitude,
            step_budget,
            descent_guard: config.descent_guard,
        };

        Ok(Self {
            source,
            config,
            reward,
            termination,
            state: EpisodeState::default(),
            phase: EpisodePhase::Uninitialized,
            last_reason: None,
            episodes: 0,
        })
    }

    /// With a reference trajectory the reward reads index `step_count`, which
    /// reaches `step_budget + 1` on the step that times out. The table must
    /// cover that index.
    fn checked_step_budget(config: &EnvConfig, reward: &RewardPolicy) -> EnvResult<Option<u32>> {
        let Some(table) = reward.reference() else {
            return Ok(config.step_budget);
        };

        let max_budget = table.len().checked_sub(2).ok_or_else(|| {
            EnvError::InvalidConfig(format!(
                "reference trajectory needs at least 2 samples, has {}",
                table.len()
            ))
        })?;
        let max_budget = u32::try_from(max_budget).unwrap_or(u32::MAX);

        match config.step_budget {
            Some(budget) if budget > max_budget => Err(EnvError::InvalidConfig(format!(
                "step_budget {budget} exceeds reference trajectory ({} samples, max budget {max_budget})",
                table.len()
            ))),
            Some(budget) => Ok(Some(budget)),
            None => {
                tracing::warn!(
                    step_budget = max_budget,
                    "no step budget configured, deriving one from the reference trajectory"
                );
                Ok(Some(max_budget))
            }
        }
    }

    /// Start a new episode from the configured save game and return its first
    /// observation.
    ///
    /// A missing save surfaces as [`EnvError::SaveNotFound`]; nothing further can
    /// run without it, so callers should stop rather than retry.
    pub fn reset(&mut self) -> EnvResult<Observation> {
        let save_name = self.config.save_name.clone();
        self.source.load_game(&save_name)?;
        settle(self.config.settle_after_load());

        self.state = EpisodeState::default();
        self.last_reason = None;
        self.phase = EpisodePhase::Uninitialized;

        self.source.set_assist_flags(false, false)?;
        self.source
            .set_control(&ControlUpdate::set().throttle(self.config.ignition_throttle))?;
        self.source.set_physics_warp(0)?;
        self.source.activate_next_stage()?;
        settle(self.config.settle_after_ignition());

        let obs = self.get_state()?;
        self.phase = EpisodePhase::Ready;
        self.episodes += 1;
        tracing::info!(
            episode = self.episodes,
            save = %save_name,
            altitude = self.state.last.altitude,
            "episode reset"
        );

        Ok(obs)
    }

    /// Apply `action`, let the simulation run for one quantum, and report what happened.
    ///
    /// On error nothing about the episode state changes.
    pub fn step(&mut self, action: Discrete) -> EnvResult<StepInfo> {
        match self.phase {
            EpisodePhase::Ready | EpisodePhase::Stepping => {}
            p => return Err(EnvError::NotReady(p.name())),
        }

        let cmd = self.config.action_scheme.command(action)?;
        let start = match self.config.sync {
            StepSync::PollClock { .. } => self.source.telemetry()?.elapsed_time,
            StepSync::Advance { .. } => 0.,
        };
        if self.config.action_scheme.resets_attitude_each_step() {
            self.source.set_control(&ControlUpdate::neutral_attitude())?;
        }
        self.dispatch(cmd)?;
        self.synchronize(start)?;

        let (observation, sample) = self.observe()?;
        let step_count = self.state.step_count;
        let (reward, reason) = self.score(&sample, step_count)?;
        let done = reason.is_some();

        self.state.last = sample;
        self.state.scored_at = step_count;
        self.state.step_count = if done { 0 } else { step_count + 1 };
        if sample.altitude > self.state.max_altitude_observed {
            self.state.max_altitude_observed = sample.altitude;
        }
        self.last_reason = reason;
        self.phase = if done {
            EpisodePhase::Terminal
        } else {
            EpisodePhase::Stepping
        };

        tracing::debug!(
            step = step_count,
            action,
            reward,
            altitude = sample.altitude,
            pitch = sample.pitch,
            "step"
        );
        if let Some(reason) = reason {
            tracing::info!(
                episode = self.episodes,
                steps = step_count + 1,
                altitude = sample.altitude,
                best_altitude = self.best_altitude(),
                %reason,
                "episode finished"
            );
        }

        Ok(StepInfo {
            observation,
            reward,
            done,
            reason,
            info: Map::new(),
        })
    }

    /// Issue the control command for `action`. The no-op sends nothing.
    pub fn choose_action(&mut self, action: Discrete) -> EnvResult<()> {
        let cmd = self.config.action_scheme.command(action)?;
        self.dispatch(cmd)
    }

    fn dispatch(&mut self, cmd: Option<ControlUpdate>) -> EnvResult<()> {
        match cmd {
            Some(cmd) => self.source.set_control(&cmd),
            None => Ok(()),
        }
    }

    /// Sample telemetry once, remember it for reward and termination, and
    /// return the encoded observation.
    pub fn get_state(&mut self) -> EnvResult<Observation> {
        let (obs, sample) = self.observe()?;
        self.state.last = sample;
        self.state.scored_at = self.state.step_count;
        Ok(obs)
    }

    /// Reward for the most recent sample, as the `step` that took it reported it.
    pub fn get_reward(&self) -> EnvResult<f64> {
        self.score(&self.state.last, self.state.scored_at)
            .map(|(reward, _)| reward)
    }

    /// Whether the most recent sample ends the episode.
    pub fn epoch_ending(&self) -> bool {
        self.termination_reason().is_some()
    }

    pub fn termination_reason(&self) -> Option<TerminationReason> {
        self.termination
            .evaluate(&self.state.last, self.state.scored_at)
    }

    /// Reward and termination for `sample` taken at step `index`. Terminal
    /// steps get the reward policy's terminal override.
    fn score(
        &self,
        sample: &Telemetry,
        index: u32,
    ) -> EnvResult<(f64, Option<TerminationReason>)> {
        let reward = self.reward.reward(sample, index)?;
        let reason = self.termination.evaluate(sample, index);
        let reward = match reason {
            Some(reason) => self.reward.terminal_reward(reason, reward),
            None => reward,
        };
        Ok((reward, reason))
    }

    fn observe(&mut self) -> EnvResult<(Observation, Telemetry)> {
        let t = self.source.telemetry()?;
        let obs = observation::encode(&t, self.config.max_altitude, self.config.action_scheme);
        Ok((obs, t))
    }

    fn synchronize(&mut self, start: f64) -> EnvResult<()> {
        match self.config.sync {
            StepSync::Advance { quantum } => self.source.advance_time(quantum),
            StepSync::PollClock {
                quantum,
                poll_interval_ms,
            } => {
                let interval = Duration::from_millis(poll_interval_ms);
                while self.source.telemetry()?.elapsed_time - start < quantum {
                    if interval.is_zero() {
                        thread::yield_now();
                    } else {
                        thread::sleep(interval);
                    }
                }
                Ok(())
            }
        }
    }

    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    /// Reason the previous `step` ended the episode, if it did.
    pub fn last_termination(&self) -> Option<TerminationReason> {
        self.last_reason
    }

    /// Highest altitude seen this episode, rounded to centimetres.
    pub fn best_altitude(&self) -> f64 {
        (self.state.max_altitude_observed * 100.).round() / 100.
    }

    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn action_scheme(&self) -> ActionScheme {
        self.config.action_scheme
    }

    /// Refer: https://gymnasium.farama.org/api/env/#gymnasium.Env.action_space
    pub fn action_space(&self) -> ObsActSpace {
        self.config.action_scheme.action_space()
    }

    /// Refer: https://gymnasium.farama.org/api/env/#gymnasium.Env.observation_space
    pub fn observation_space(&self) -> ObsActSpace {
        observation::observation_space(self.config.action_scheme)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

fn settle(d: Duration) {
    if !d.is_zero() {
        tracing::debug!(ms = d.as_millis() as u64, "waiting for simulation to settle");
        thread::sleep(d);
    }
}

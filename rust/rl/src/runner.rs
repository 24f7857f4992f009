use crate::policy::Policy;
use itertools::{Itertools, MinMaxResult};
use kerbal_gym::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeSummary {
    pub episode: u64,
    pub started_at: String,
    pub steps: usize,
    pub total_reward: f64,
    pub min_reward: f64,
    pub max_reward: f64,
    pub best_altitude: f64,
    /// `None` when the runner's own step cap cut the episode short.
    pub reason: Option<TerminationReason>,
}

/// Fly one episode with `policy`, stopping at termination or after `max_steps`.
pub fn run_episode<S: TelemetrySource>(
    env: &mut EpisodeController<S>,
    policy: &mut dyn Policy,
    max_steps: usize,
) -> EnvResult<EpisodeSummary> {
    let started_at = chrono::Local::now();
    let mut s = env.reset()?;
    let mut rewards = Vec::new();
    let mut reason = None;

    for _ in 0..max_steps {
        let a = policy.policy(&s);
        let si = env.step(a)?;
        rewards.push(si.reward);
        s = si.observation;
        if si.done {
            reason = si.reason;
            break;
        }
    }

    let (min_reward, max_reward) = match rewards.iter().copied().minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => (0., 0.),
        MinMaxResult::OneElement(r) => (r, r),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };

    Ok(EpisodeSummary {
        episode: env.episodes(),
        started_at: started_at.to_rfc3339(),
        steps: rewards.len(),
        total_reward: rewards.iter().sum(),
        min_reward,
        max_reward,
        best_altitude: env.best_altitude(),
        reason,
    })
}

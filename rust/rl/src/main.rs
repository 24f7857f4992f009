mod policy;
mod runner;

use anyhow::{Context, Result};
use clap::Parser;
use kerbal_gym::*;
use policy::PolicyKind;
use std::path::PathBuf;

/// Fly episodes of the ascent environment with a fixed policy.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Telemetry bridge base url.
    #[arg(long, default_value = "http://127.0.0.1:50000")]
    url: String,

    /// Use the built-in simulated vessel instead of the bridge.
    #[arg(long)]
    simulated: bool,

    /// Environment configuration (JSON). Defaults to the impulse preset.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1)]
    episodes: usize,

    #[arg(long, value_enum, default_value_t = PolicyKind::Random)]
    policy: PolicyKind,

    #[arg(long)]
    seed: Option<u64>,

    /// Cut an episode short after this many steps.
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => EnvConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EnvConfig::impulse(),
    };

    let source: Box<dyn TelemetrySource> = if args.simulated {
        cfg = EnvConfig {
            sync: StepSync::Advance {
                quantum: cfg.sync.quantum(),
            },
            ..cfg.without_settling()
        };
        Box::new(SimulatedVessel::new(&[cfg.save_name.as_str()]))
    } else {
        let advance = matches!(cfg.sync, StepSync::Advance { .. });
        Box::new(HttpTelemetry::new(&args.url)?.with_advance(advance))
    };

    let mut env = EpisodeController::new(source, cfg)?;
    let n = env
        .action_space()
        .discrete_value()
        .context("action space is not discrete")?;
    let mut policy = policy::make(args.policy, n, args.seed);

    tracing::info!(
        save = %env.config().save_name,
        max_altitude = env.config().max_altitude,
        scheme = ?env.action_scheme(),
        observation_space = ?env.observation_space(),
        policy = ?args.policy,
        "starting {} episode(s)",
        args.episodes
    );

    for _ in 0..args.episodes {
        match runner::run_episode(&mut env, policy.as_mut(), args.max_steps) {
            Ok(summary) => {
                tracing::info!("{}", serde_json::to_string(&summary)?);
            }
            Err(e @ EnvError::SaveNotFound { .. }) => {
                tracing::error!("{e}. Add the save to your saves directory.");
                return Err(e).context("no valid initial state, terminating");
            }
            Err(e) => {
                tracing::error!("episode aborted: {e}");
            }
        }
    }

    Ok(())
}

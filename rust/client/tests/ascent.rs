extern crate float_eq;
extern crate insta;
extern crate kerbal_gym;
mod common;

use common::*;
use float_eq::*;
use insta::assert_debug_snapshot;
use kerbal_gym::*;

fn fly<S: TelemetrySource>(env: &mut EpisodeController<S>, max_steps: usize) -> Vec<StepInfo> {
    env.reset().unwrap();
    let mut infos = vec![];
    for _ in 0..max_steps {
        let si = env.step(0).unwrap();
        let done = si.done;
        infos.push(si);
        if done {
            break;
        }
    }
    infos
}

#[test]
fn climb_ends_at_ceiling_with_success_reward() {
    let mut env =
        EpisodeController::new(FakeVessel::climbing(), advancing(EnvConfig::impulse())).unwrap();
    let infos = fly(&mut env, 450);

    assert_eq!(infos.len(), 45);
    let last = infos.last().unwrap();
    assert!(last.done);
    assert_eq!(last.reason, Some(TerminationReason::AltitudeReached));
    assert_float_eq!(last.reward, 1., abs <= 1e-12);
    assert!(infos[..44].iter().all(|si| !si.done));

    // Straight up stays inside the turn tolerance only below ~5.2 km.
    assert!(infos[..5].iter().all(|si| si.reward == 1.));
    assert!(infos[5..44].iter().all(|si| si.reward == -1.));

    assert_float_eq!(env.best_altitude(), 45_000., abs <= 1e-9);
    assert_eq!(env.state().step_count, 0);
    assert_eq!(env.phase(), EpisodePhase::Terminal);
}

#[test]
fn tracking_the_reference_exactly_costs_nothing() {
    let mut env = EpisodeController::with_reward_policy(
        FakeVessel::climbing(),
        advancing(EnvConfig::impulse()),
        RewardPolicy::GroundTruth(reference(60)),
    )
    .unwrap();
    let infos = fly(&mut env, 450);

    assert_eq!(infos.len(), 45);
    assert_eq!(
        infos.last().unwrap().reason,
        Some(TerminationReason::AltitudeReached)
    );
    assert_float_eq!(
        infos.iter().map(|si| si.reward).collect::<Vec<_>>(),
        vec![0.; 45],
        abs_all <= 1e-12
    );
}

#[test]
fn crew_loss_ends_with_failure_reward() {
    let mut v = FakeVessel::climbing();
    v.on_advance = |t, _| {
        t.altitude += 1_000.;
        if t.altitude >= 3_000. {
            t.crew_count = 0;
        }
    };
    let mut env = EpisodeController::new(v, advancing(EnvConfig::impulse())).unwrap();
    let infos = fly(&mut env, 450);

    assert_eq!(infos.len(), 3);
    let last = infos.last().unwrap();
    assert_eq!(last.reason, Some(TerminationReason::CrewLost));
    assert_float_eq!(last.reward, -1., abs <= 1e-12);
}

#[test]
fn simulated_vessel_reaches_orbit_ceiling_by_polling() {
    let cfg = EnvConfig {
        sync: StepSync::PollClock {
            quantum: 0.1,
            poll_interval_ms: 0,
        },
        ..EnvConfig::impulse().without_settling()
    };
    let mut env = EpisodeController::new(SimulatedVessel::new(&["revivekerbals"]), cfg).unwrap();
    let infos = fly(&mut env, 5_000);

    let last = infos.last().unwrap();
    assert_eq!(last.reason, Some(TerminationReason::AltitudeReached));
    assert!(env.best_altitude() >= 45_000.);
    assert_eq!(env.source().assist_flags(), (false, false));

    let space = env.observation_space();
    assert!(infos.iter().all(|si| space.contains(si.observation.as_slice().unwrap())));
}

#[test]
fn trim_spaces() {
    let env = EpisodeController::new(FakeVessel::on_pad(), advancing(EnvConfig::trim())).unwrap();
    assert_eq!(env.action_space(), ObsActSpace::Discrete { n: 7 });
    assert_debug_snapshot!(env.observation_space(), @r###"
    Box {
        shape: [
            4,
        ],
        high: [
            1.0,
            1.0,
            1.0,
            1.0,
        ],
        low: [
            0.0,
            -1.0,
            -1.0,
            -1.0,
        ],
    }
    "###);
}

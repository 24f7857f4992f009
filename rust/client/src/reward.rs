use crate::common::defs::*;
use crate::error::EnvResult;
use crate::reference::ReferenceTable;
use crate::termination::TerminationReason;

/// Reward for following a linear gravity turn: pitch 90° at `turn_start_altitude`
/// falling to 0° at `turn_end_altitude`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityTurn {
    pub turn_start_altitude: f64,
    pub turn_end_altitude: f64,
    pub tolerance_deg: f64,
    pub success_reward: f64,
    pub failure_reward: f64,
}

impl GravityTurn {
    pub fn new(turn_end_altitude: f64) -> Self {
        Self {
            turn_start_altitude: 250.,
            turn_end_altitude,
            tolerance_deg: 10.,
            success_reward: 1.,
            failure_reward: -1.,
        }
    }

    pub fn ideal_pitch(&self, altitude: f64) -> f64 {
        let fraction = (altitude - self.turn_start_altitude)
            / (self.turn_end_altitude - self.turn_start_altitude);
        90. - fraction * 90.
    }

    pub fn deviation(&self, t: &Telemetry) -> f64 {
        (self.ideal_pitch(t.altitude) - t.pitch).abs()
    }

    fn reward(&self, t: &Telemetry) -> f64 {
        if t.situation != VesselSituation::Flying {
            return 0.;
        }

        if self.deviation(t) < self.tolerance_deg {
            1.
        } else {
            -1.
        }
    }
}

/// Selectable reward strategy, fixed for the life of an environment.
#[derive(Debug, Clone, PartialEq)]
pub enum RewardPolicy {
    GravityTurn(GravityTurn),
    /// Penalty for relative distance from a reference ascent, indexed by step.
    /// Always ≤ 0.
    GroundTruth(ReferenceTable),
}

impl RewardPolicy {
    pub fn reward(&self, t: &Telemetry, step_count: u32) -> EnvResult<f64> {
        match self {
            RewardPolicy::GravityTurn(g) => Ok(g.reward(t)),
            RewardPolicy::GroundTruth(table) => {
                let gt = table.sample(step_count as usize)?;
                Ok(-0.5 * relative_error(t.altitude, gt.altitude)
                    - 0.5 * relative_error(t.pitch, gt.pitch))
            }
        }
    }

    /// Final reward for a step that ended the episode. The gravity turn pays out
    /// its success or failure reward; ground truth keeps the per-step penalty.
    pub fn terminal_reward(&self, reason: TerminationReason, reward: f64) -> f64 {
        match self {
            RewardPolicy::GravityTurn(g) if reason.is_success() => g.success_reward,
            RewardPolicy::GravityTurn(g) => g.failure_reward,
            RewardPolicy::GroundTruth(_) => reward,
        }
    }

    pub fn reference(&self) -> Option<&ReferenceTable> {
        match self {
            RewardPolicy::GroundTruth(table) => Some(table),
            RewardPolicy::GravityTurn(_) => None,
        }
    }
}

fn relative_error(actual: f64, reference: f64) -> f64 {
    let scale = if reference == 0. { 1. } else { reference.abs() };
    ((actual - reference) / scale).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnvError;
    use crate::reference::ReferenceSample;
    use float_eq::*;
    use rstest::*;

    fn at(altitude: f64, pitch: f64, situation: VesselSituation) -> Telemetry {
        Telemetry {
            altitude,
            pitch,
            situation,
            crew_count: 1,
            ..Default::default()
        }
    }

    #[test]
    fn ideal_pitch_is_linear_between_thresholds() {
        let g = GravityTurn::new(45_000.);
        assert_float_eq!(g.ideal_pitch(250.), 90., abs <= 1e-9);
        assert_float_eq!(g.ideal_pitch(45_000.), 0., abs <= 1e-9);
        assert_float_eq!(g.ideal_pitch(22_625.), 45., abs <= 1e-9);
    }

    #[rstest]
    #[case(at(22_625., 50., VesselSituation::Flying), 1.)]
    #[case(at(22_625., 35.1, VesselSituation::Flying), 1.)]
    #[case(at(22_625., 35., VesselSituation::Flying), -1.)]
    #[case(at(22_625., 90., VesselSituation::Flying), -1.)]
    #[case(at(22_625., 90., VesselSituation::SubOrbital), 0.)]
    #[case(at(0., 90., VesselSituation::PreLaunch), 0.)]
    fn gravity_turn_reward(#[case] t: Telemetry, #[case] expected: f64) {
        let p = RewardPolicy::GravityTurn(GravityTurn::new(45_000.));
        assert_float_eq!(p.reward(&t, 0).unwrap(), expected, abs <= 1e-12);
    }

    #[test]
    fn gravity_turn_terminal_override() {
        let p = RewardPolicy::GravityTurn(GravityTurn::new(45_000.));
        assert_eq!(p.terminal_reward(TerminationReason::AltitudeReached, -1.), 1.);
        assert_eq!(p.terminal_reward(TerminationReason::CrewLost, 1.), -1.);
    }

    fn table() -> ReferenceTable {
        ReferenceTable::new(vec![
            ReferenceSample {
                altitude: 0.,
                pitch: 90.,
            },
            ReferenceSample {
                altitude: 1_000.,
                pitch: 80.,
            },
        ])
        .unwrap()
    }

    #[test]
    fn ground_truth_penalty() {
        let p = RewardPolicy::GroundTruth(table());
        let r = p
            .reward(&at(900., 88., VesselSituation::Flying), 1)
            .unwrap();
        assert_float_eq!(r, -0.5 * 0.1 - 0.5 * 0.1, abs <= 1e-12);

        let exact = p.reward(&at(1_000., 80., VesselSituation::Flying), 1).unwrap();
        assert_float_eq!(exact, 0., abs <= 1e-12);
    }

    #[test]
    fn ground_truth_zero_reference_uses_absolute_error() {
        let p = RewardPolicy::GroundTruth(table());
        let r = p.reward(&at(2., 90., VesselSituation::Flying), 0).unwrap();
        assert_float_eq!(r, -1., abs <= 1e-12);
        assert_eq!(p.terminal_reward(TerminationReason::AltitudeReached, r), r);
    }

    #[test]
    fn ground_truth_is_never_positive() {
        let p = RewardPolicy::GroundTruth(table());
        for alt in [0., 10., 999., 5_000.] {
            for pitch in [-90., 0., 80., 90.] {
                let r = p.reward(&at(alt, pitch, VesselSituation::Flying), 1).unwrap();
                assert!(r <= 0.);
            }
        }
    }

    #[test]
    fn ground_truth_past_table_end() {
        let p = RewardPolicy::GroundTruth(table());
        assert!(matches!(
            p.reward(&at(0., 90., VesselSituation::Flying), 2),
            Err(EnvError::ReferenceExhausted { index: 2, len: 2 })
        ));
    }
}

use crate::common::defs::*;
use crate::error::{EnvError, EnvResult};
use crate::ObsActSpace;
use serde::{Deserialize, Serialize};

const TRIM_STEP: f64 = 0.1;

/// How discrete action ids map onto the vessel's controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionScheme {
    /// Full-deflection impulses. Attitude axes are zeroed at the start of every
    /// step, then at most one axis is set to ±1.
    ///
    /// `0: noop, 1: pitch down, 2: pitch up, 3: roll left, 4: roll right,
    /// 5: yaw left, 6: yaw right, 7: throttle off, 8: throttle full`
    #[default]
    AbsoluteImpulse,

    /// Persistent trim. Each action nudges one axis by 0.1 and the deflection
    /// accumulates across steps.
    ///
    /// `0: noop, 1: pitch -0.1, 2: pitch +0.1, 3: yaw -0.1, 4: yaw +0.1,
    /// 5: roll -0.1, 6: roll +0.1`
    IncrementalTrim,
}

impl ActionScheme {
    pub fn n_actions(&self) -> Discrete {
        match self {
            ActionScheme::AbsoluteImpulse => 9,
            ActionScheme::IncrementalTrim => 7,
        }
    }

    pub fn action_space(&self) -> ObsActSpace {
        ObsActSpace::Discrete {
            n: self.n_actions(),
        }
    }

    /// Whether attitude axes are zeroed before each dispatch.
    pub fn resets_attitude_each_step(&self) -> bool {
        matches!(self, ActionScheme::AbsoluteImpulse)
    }

    /// Whether observations carry the normalized roll as a fourth element.
    pub fn observes_roll(&self) -> bool {
        matches!(self, ActionScheme::IncrementalTrim)
    }

    /// The control mutation for `action`, or `None` for the no-op.
    pub fn command(&self, action: Discrete) -> EnvResult<Option<ControlUpdate>> {
        let cmd = match self {
            ActionScheme::AbsoluteImpulse => {
                let u = ControlUpdate::set();
                match action {
                    0 => None,
                    1 => Some(u.pitch(-1.)),
                    2 => Some(u.pitch(1.)),
                    3 => Some(u.roll(-1.)),
                    4 => Some(u.roll(1.)),
                    5 => Some(u.yaw(-1.)),
                    6 => Some(u.yaw(1.)),
                    7 => Some(u.throttle(0.)),
                    8 => Some(u.throttle(1.)),
                    _ => return Err(self.invalid(action)),
                }
            }
            ActionScheme::IncrementalTrim => {
                let u = ControlUpdate::add();
                match action {
                    0 => None,
                    1 => Some(u.pitch(-TRIM_STEP)),
                    2 => Some(u.pitch(TRIM_STEP)),
                    3 => Some(u.yaw(-TRIM_STEP)),
                    4 => Some(u.yaw(TRIM_STEP)),
                    5 => Some(u.roll(-TRIM_STEP)),
                    6 => Some(u.roll(TRIM_STEP)),
                    _ => return Err(self.invalid(action)),
                }
            }
        };

        Ok(cmd)
    }

    fn invalid(&self, action: Discrete) -> EnvError {
        EnvError::InvalidAction {
            action,
            n: self.n_actions(),
        }
    }
}

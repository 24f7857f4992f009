use serde::{Deserialize, Serialize};

pub type Discrete = i32;
pub type Continous = f64;

/// Flight situation reported by the simulator.
/// Refer: https://krpc.github.io/krpc/python/api/space-center/vessel.html#SpaceCenter.VesselSituation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VesselSituation {
    #[default]
    PreLaunch,
    Landed,
    Splashed,
    Flying,
    SubOrbital,
    Orbiting,
    Escaping,
    Docked,
}

/// A point-in-time snapshot of the active vessel. Angles are in degrees,
/// altitudes in metres above sea level, `elapsed_time` in simulated seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub altitude: f64,
    pub apoapsis: f64,
    pub periapsis: f64,
    pub pitch: f64,
    pub heading: f64,
    pub roll: f64,
    pub g_force: f64,
    pub crew_count: u32,
    pub elapsed_time: f64,
    pub fuel_amount: f64,
    #[serde(default)]
    pub situation: VesselSituation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// Assign the given values to the axes.
    #[default]
    Set,
    /// Add the given values to whatever the axes currently hold.
    Add,
}

/// A mutation of the vessel's control axes. Axes left as `None` are untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throttle: Option<f64>,
    pub mode: ControlMode,
}

impl ControlUpdate {
    pub fn set() -> Self {
        Self {
            mode: ControlMode::Set,
            ..Default::default()
        }
    }

    pub fn add() -> Self {
        Self {
            mode: ControlMode::Add,
            ..Default::default()
        }
    }

    pub fn pitch(mut self, v: f64) -> Self {
        self.pitch = Some(v);
        self
    }

    pub fn yaw(mut self, v: f64) -> Self {
        self.yaw = Some(v);
        self
    }

    pub fn roll(mut self, v: f64) -> Self {
        self.roll = Some(v);
        self
    }

    pub fn throttle(mut self, v: f64) -> Self {
        self.throttle = Some(v);
        self
    }

    /// Zero the attitude axes, leaving throttle alone.
    pub fn neutral_attitude() -> Self {
        Self::set().pitch(0.).yaw(0.).roll(0.)
    }

    pub fn is_empty(&self) -> bool {
        self.pitch.is_none() && self.yaw.is_none() && self.roll.is_none() && self.throttle.is_none()
    }
}

/// Current position of the vessel's control inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub throttle: f64,
}

impl ControlState {
    /// Apply `update` with its mode's semantics. Attitude axes clamp to [-1, 1],
    /// throttle to [0, 1].
    pub fn apply(&mut self, update: &ControlUpdate) {
        fn merge(current: f64, v: Option<f64>, mode: ControlMode, lo: f64, hi: f64) -> f64 {
            let Some(v) = v else {
                return current;
            };
            let next = match mode {
                ControlMode::Set => v,
                ControlMode::Add => current + v,
            };
            next.clamp(lo, hi)
        }

        self.pitch = merge(self.pitch, update.pitch, update.mode, -1., 1.);
        self.yaw = merge(self.yaw, update.yaw, update.mode, -1., 1.);
        self.roll = merge(self.roll, update.roll, update.mode, -1., 1.);
        self.throttle = merge(self.throttle, update.throttle, update.mode, 0., 1.);
    }
}

//! A small deterministic ascent model that speaks [`TelemetrySource`].
//!
//! It is not a flight simulator. It exists so the episode loop can be exercised
//! without a running game: thrust along the pitch direction, constant gravity,
//! attitude rates proportional to control input, and a crash when the vessel
//! comes back down hard.

use crate::common::defs::*;
use crate::error::{EnvError, EnvResult};
use crate::telemetry::TelemetrySource;

const GRAVITY: f64 = 9.81;
const ATMOSPHERE_TOP: f64 = 70_000.;
const PITCH_RATE: f64 = 10.;
const YAW_RATE: f64 = 10.;
const ROLL_RATE: f64 = 20.;
const CRASH_SPEED: f64 = 20.;

#[derive(Debug, Clone)]
pub struct SimulatedVessel {
    saves: Vec<String>,
    initial: Telemetry,
    state: Telemetry,
    controls: ControlState,
    speed: f64,
    staged: bool,
    sas: bool,
    rcs: bool,
    /// Physics warp factor; every read runs `warp + 1` frames.
    warp: u32,
    /// Simulated seconds that pass on every telemetry read.
    frame_dt: f64,
    thrust_accel: f64,
    burn_rate: f64,
}

impl SimulatedVessel {
    pub fn new(saves: &[&str]) -> Self {
        let initial = Telemetry {
            altitude: 75.,
            apoapsis: 75.,
            periapsis: -600_000.,
            pitch: 90.,
            heading: 90.,
            roll: 0.,
            g_force: 1.,
            crew_count: 1,
            elapsed_time: 0.,
            fuel_amount: 2_000.,
            situation: VesselSituation::PreLaunch,
        };

        Self {
            saves: saves.iter().map(|s| s.to_string()).collect(),
            initial,
            state: initial,
            controls: ControlState::default(),
            speed: 0.,
            staged: false,
            sas: true,
            rcs: true,
            warp: 0,
            frame_dt: 0.02,
            thrust_accel: 30.,
            burn_rate: 8.,
        }
    }

    /// Non-positive frame lengths are rejected; time would never advance.
    pub fn with_frame_dt(mut self, frame_dt: f64) -> EnvResult<Self> {
        if !(frame_dt > 0.) {
            return Err(EnvError::InvalidConfig(format!(
                "frame_dt must be positive, got {frame_dt}"
            )));
        }
        self.frame_dt = frame_dt;
        Ok(self)
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    pub fn assist_flags(&self) -> (bool, bool) {
        (self.sas, self.rcs)
    }

    pub fn is_staged(&self) -> bool {
        self.staged
    }

    pub fn physics_warp(&self) -> u32 {
        self.warp
    }

    fn integrate(&mut self, dt: f64) {
        let s = &mut self.state;
        s.elapsed_time += dt;
        if s.crew_count == 0 {
            return;
        }

        s.pitch = (s.pitch + self.controls.pitch * PITCH_RATE * dt).clamp(-90., 90.);
        s.heading = (s.heading + self.controls.yaw * YAW_RATE * dt).rem_euclid(360.);
        s.roll = (s.roll + self.controls.roll * ROLL_RATE * dt + 180.).rem_euclid(360.) - 180.;

        let burning = self.staged && s.fuel_amount > 0.;
        let thrust = if burning {
            self.thrust_accel * self.controls.throttle
        } else {
            0.
        };
        if burning {
            s.fuel_amount = (s.fuel_amount - self.burn_rate * self.controls.throttle * dt).max(0.);
        }

        let sin_pitch = s.pitch.to_radians().sin();
        let vertical = self.speed * sin_pitch;
        self.speed = (self.speed + (thrust - GRAVITY * sin_pitch) * dt).max(-500.);
        s.altitude += vertical * dt;
        s.g_force = (thrust / GRAVITY).max(0.);
        s.apoapsis = s.apoapsis.max(s.altitude);

        if s.altitude <= 0. {
            s.altitude = 0.;
            if vertical < -CRASH_SPEED {
                s.crew_count = 0;
                s.situation = VesselSituation::Landed;
                return;
            }
            self.speed = self.speed.max(0.);
        }

        s.situation = if !self.staged {
            VesselSituation::PreLaunch
        } else if s.altitude > ATMOSPHERE_TOP {
            VesselSituation::SubOrbital
        } else {
            VesselSituation::Flying
        };
    }
}

impl TelemetrySource for SimulatedVessel {
    fn telemetry(&mut self) -> EnvResult<Telemetry> {
        for _ in 0..=self.warp {
            self.integrate(self.frame_dt);
        }
        Ok(self.state)
    }

    fn set_control(&mut self, update: &ControlUpdate) -> EnvResult<()> {
        self.controls.apply(update);
        Ok(())
    }

    fn load_game(&mut self, save_name: &str) -> EnvResult<()> {
        if !self.saves.iter().any(|s| s == save_name) {
            return Err(EnvError::SaveNotFound {
                save_name: save_name.to_string(),
            });
        }

        self.state = self.initial;
        self.controls = ControlState::default();
        self.speed = 0.;
        self.staged = false;
        self.sas = true;
        self.rcs = true;
        Ok(())
    }

    fn activate_next_stage(&mut self) -> EnvResult<()> {
        self.staged = true;
        Ok(())
    }

    fn set_assist_flags(&mut self, sas: bool, rcs: bool) -> EnvResult<()> {
        self.sas = sas;
        self.rcs = rcs;
        Ok(())
    }

    fn set_physics_warp(&mut self, factor: u32) -> EnvResult<()> {
        self.warp = factor;
        Ok(())
    }

    fn advance_time(&mut self, dt: f64) -> EnvResult<()> {
        let mut left = dt;
        while left > 0. {
            let h = left.min(self.frame_dt);
            self.integrate(h);
            left -= h;
        }
        Ok(())
    }
}

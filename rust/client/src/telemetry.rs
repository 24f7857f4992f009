use crate::common::defs::*;
use crate::error::{EnvError, EnvResult};

/// The capability the episode controller needs from a running simulation.
///
/// All game-state mutation flows through here from the controller, and all
/// telemetry flows back. Calls are blocking; a stalled source stalls the caller.
pub trait TelemetrySource {
    /// Snapshot of the active vessel.
    fn telemetry(&mut self) -> EnvResult<Telemetry>;

    fn set_control(&mut self, update: &ControlUpdate) -> EnvResult<()>;

    /// Load a save game. Must fail with [`EnvError::SaveNotFound`] if it does not exist.
    fn load_game(&mut self, save_name: &str) -> EnvResult<()>;

    fn activate_next_stage(&mut self) -> EnvResult<()>;

    fn set_assist_flags(&mut self, sas: bool, rcs: bool) -> EnvResult<()>;

    /// Physics warp factor; 0 runs the simulation in real time.
    fn set_physics_warp(&mut self, factor: u32) -> EnvResult<()>;

    /// Advance simulated time by `dt` seconds and return once the simulator has done so.
    fn advance_time(&mut self, _dt: f64) -> EnvResult<()> {
        Err(EnvError::Unsupported("advance_time"))
    }
}

impl<T: TelemetrySource + ?Sized> TelemetrySource for Box<T> {
    fn telemetry(&mut self) -> EnvResult<Telemetry> {
        (**self).telemetry()
    }

    fn set_control(&mut self, update: &ControlUpdate) -> EnvResult<()> {
        (**self).set_control(update)
    }

    fn load_game(&mut self, save_name: &str) -> EnvResult<()> {
        (**self).load_game(save_name)
    }

    fn activate_next_stage(&mut self) -> EnvResult<()> {
        (**self).activate_next_stage()
    }

    fn set_assist_flags(&mut self, sas: bool, rcs: bool) -> EnvResult<()> {
        (**self).set_assist_flags(sas, rcs)
    }

    fn set_physics_warp(&mut self, factor: u32) -> EnvResult<()> {
        (**self).set_physics_warp(factor)
    }

    fn advance_time(&mut self, dt: f64) -> EnvResult<()> {
        (**self).advance_time(dt)
    }
}

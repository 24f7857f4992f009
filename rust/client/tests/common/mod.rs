use kerbal_gym::*;

/// Scriptable stand-in for the simulator. Every call is recorded; hooks decide
/// how the vessel moves on each read and on each time advance.
#[allow(dead_code)]
pub struct FakeVessel {
    pub telemetry: Telemetry,
    pub initial: Telemetry,
    pub saves: Vec<String>,
    pub controls: ControlState,
    pub control_log: Vec<ControlUpdate>,
    pub loads: Vec<String>,
    pub stages: usize,
    pub assist: Option<(bool, bool)>,
    pub warp: Option<u32>,
    pub reads: usize,
    pub advances: Vec<f64>,
    /// Simulated seconds added on every read.
    pub clock_per_read: f64,
    pub on_read: fn(&mut Telemetry),
    pub on_advance: fn(&mut Telemetry, f64),
    /// Fail every read once this many reads have happened.
    pub fail_reads_after: Option<usize>,
}

#[allow(dead_code)]
impl FakeVessel {
    pub fn new(initial: Telemetry) -> Self {
        Self {
            telemetry: initial,
            initial,
            saves: vec!["revivekerbals".to_string()],
            controls: ControlState::default(),
            control_log: vec![],
            loads: vec![],
            stages: 0,
            assist: None,
            warp: Some(2),
            reads: 0,
            advances: vec![],
            clock_per_read: 0.,
            on_read: |_| {},
            on_advance: |_, _| {},
            fail_reads_after: None,
        }
    }

    /// On the pad: altitude 0, pointing straight up, one kerbal aboard.
    pub fn on_pad() -> Self {
        Self::new(Telemetry {
            altitude: 0.,
            pitch: 90.,
            heading: 90.,
            crew_count: 1,
            situation: VesselSituation::Flying,
            ..Default::default()
        })
    }

    /// Climbs 1000 m for every advance of simulated time.
    pub fn climbing() -> Self {
        let mut v = Self::on_pad();
        v.on_advance = |t, dt| {
            t.altitude += 1_000.;
            t.elapsed_time += dt;
        };
        v
    }
}

impl TelemetrySource for FakeVessel {
    fn telemetry(&mut self) -> EnvResult<Telemetry> {
        if let Some(limit) = self.fail_reads_after {
            if self.reads >= limit {
                return Err(EnvError::Telemetry("stream closed".to_string()));
            }
        }

        self.reads += 1;
        self.telemetry.elapsed_time += self.clock_per_read;
        let t = self.telemetry;
        (self.on_read)(&mut self.telemetry);
        Ok(t)
    }

    fn set_control(&mut self, update: &ControlUpdate) -> EnvResult<()> {
        self.controls.apply(update);
        self.control_log.push(*update);
        Ok(())
    }

    fn load_game(&mut self, save_name: &str) -> EnvResult<()> {
        if !self.saves.iter().any(|s| s == save_name) {
            return Err(EnvError::SaveNotFound {
                save_name: save_name.to_string(),
            });
        }

        self.loads.push(save_name.to_string());
        self.telemetry = self.initial;
        self.controls = ControlState::default();
        Ok(())
    }

    fn activate_next_stage(&mut self) -> EnvResult<()> {
        self.stages += 1;
        Ok(())
    }

    fn set_assist_flags(&mut self, sas: bool, rcs: bool) -> EnvResult<()> {
        self.assist = Some((sas, rcs));
        Ok(())
    }

    fn set_physics_warp(&mut self, factor: u32) -> EnvResult<()> {
        self.warp = Some(factor);
        Ok(())
    }

    fn advance_time(&mut self, dt: f64) -> EnvResult<()> {
        self.advances.push(dt);
        (self.on_advance)(&mut self.telemetry, dt);
        Ok(())
    }
}

#[allow(dead_code)]
pub fn advancing(cfg: EnvConfig) -> EnvConfig {
    EnvConfig {
        sync: StepSync::Advance { quantum: 0.1 },
        ..cfg.without_settling()
    }
}

#[allow(dead_code)]
pub fn reference(len: usize) -> ReferenceTable {
    ReferenceTable::new(
        (0..len)
            .map(|i| ReferenceSample {
                altitude: 1_000. * (i + 1) as f64,
                pitch: 90.,
            })
            .collect(),
    )
    .unwrap()
}

use crate::common::defs::Telemetry;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    CrewLost,
    AltitudeReached,
    StepBudgetExhausted,
    LowAltitudeDescent,
}

impl TerminationReason {
    pub fn is_success(&self) -> bool {
        matches!(self, TerminationReason::AltitudeReached)
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminationReason::CrewLost => "crew lost",
            TerminationReason::AltitudeReached => "reached max altitude",
            TerminationReason::StepBudgetExhausted => "step budget exhausted",
            TerminationReason::LowAltitudeDescent => "nose down at low altitude",
        };
        f.write_str(s)
    }
}

/// Ends the episode when the vessel points below `min_pitch` while still under
/// `max_altitude`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescentGuard {
    pub max_altitude: f64,
    pub min_pitch: f64,
}

impl Default for DescentGuard {
    fn default() -> Self {
        Self {
            max_altitude: 10_000.,
            min_pitch: 0.,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminationPolicy {
    pub ceiling: f64,
    pub step_budget: Option<u32>,
    pub descent_guard: Option<DescentGuard>,
}

impl TerminationPolicy {
    /// First matching condition, in priority order: crew, ceiling, budget, descent.
    pub fn evaluate(&self, t: &Telemetry, step_count: u32) -> Option<TerminationReason> {
        if t.crew_count == 0 {
            return Some(TerminationReason::CrewLost);
        }

        if t.altitude >= self.ceiling {
            return Some(TerminationReason::AltitudeReached);
        }

        if let Some(budget) = self.step_budget {
            if step_count > budget {
                return Some(TerminationReason::StepBudgetExhausted);
            }
        }

        if let Some(g) = self.descent_guard {
            if t.altitude < g.max_altitude && t.pitch < g.min_pitch {
                return Some(TerminationReason::LowAltitudeDescent);
            }
        }

        None
    }
}

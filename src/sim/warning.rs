use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dynamics::state::KinematicState;
use crate::vehicle::{StallRule, VariantConfig};

/// Warning label for one tick. Informational only: it never feeds back into
/// the integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Warning {
    #[default]
    None,
    Stall,
    Overspeed,
}

impl Warning {
    pub fn label(self) -> &'static str {
        match self {
            Warning::None => "",
            Warning::Stall => "STALL",
            Warning::Overspeed => "OVERSPEED",
        }
    }

    pub fn is_active(self) -> bool {
        self != Warning::None
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Derives the warning from post-integration state. Stall takes precedence
/// over overspeed in every variant.
#[derive(Debug, Clone, PartialEq)]
pub struct WarningEvaluator {
    pub overspeed: f64,
    pub stall: StallRule,
    pub stall_angle: f64,
}

impl WarningEvaluator {
    pub fn from_variant(v: &VariantConfig) -> Self {
        Self {
            overspeed: v.overspeed,
            stall: v.stall.clone(),
            stall_angle: v.airframe.stall_angle,
        }
    }

    /// `aoa` is the angle of attack as the flight model used it this tick.
    pub fn is_stalled(&self, state: &KinematicState, aoa: f64, airborne: bool) -> bool {
        match self.stall {
            StallRule::Pitch { limit } => airborne && state.orientation.pitch.abs() > limit,
            StallRule::AngleOfAttack { margin, min_speed } => {
                airborne && aoa.abs() > self.stall_angle - margin && state.speed() > min_speed
            }
        }
    }

    pub fn is_overspeed(&self, state: &KinematicState) -> bool {
        state.speed() > self.overspeed
    }

    pub fn evaluate(&self, state: &KinematicState, aoa: f64, airborne: bool) -> Warning {
        if self.is_stalled(state, aoa, airborne) {
            Warning::Stall
        } else if self.is_overspeed(state) {
            Warning::Overspeed
        } else {
            Warning::None
        }
    }
}

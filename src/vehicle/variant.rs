use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::dynamics::controls::THROTTLE_STEP;
use crate::dynamics::state::{KinematicState, Orientation, DEG, G};

// ---------------------------------------------------------------------------
// Airframe: mass and aerodynamic constants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airframe {
    pub mass: f64,        // kg
    pub wing_area: f64,   // m^2
    pub air_density: f64, // kg/m^3, constant: no atmosphere model
    pub max_thrust: f64,  // N
    pub lift_coeff: f64,
    pub drag_coeff: f64,
    pub stall_angle: f64, // rad
    pub gravity: f64,     // m/s^2
}

impl Airframe {
    pub fn weight(&self) -> f64 {
        self.mass * self.gravity
    }

    /// Speed at which wings-level lift equals weight.
    pub fn level_flight_speed(&self) -> f64 {
        (self.weight() / (0.5 * self.air_density * self.wing_area * self.lift_coeff)).sqrt()
    }
}

impl Default for Airframe {
    fn default() -> Self {
        Self {
            mass: 1000.0,
            wing_area: 14.0,
            air_density: 1.22,
            max_thrust: 2500.0,
            lift_coeff: 1.13,
            drag_coeff: 0.035,
            stall_angle: 18.0 * DEG,
            gravity: G,
        }
    }
}

// ---------------------------------------------------------------------------
// Runway ground roll: the separate force law used while grounded
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundRoll {
    pub rollout_speed: f64,    // m/s, below this the vehicle is grounded and friction applies
    pub friction: f64,         // per-tick multiplier on forward velocity
    pub liftoff_throttle: f64, // throttle must exceed this to rotate
    pub liftoff_speed: f64,    // m/s, speed must exceed this to rotate
    pub ground_accel: f64,     // m/s^2 at full throttle
}

impl Default for GroundRoll {
    fn default() -> Self {
        Self {
            rollout_speed: 20.0,
            friction: 0.98,
            liftoff_throttle: 0.5,
            liftoff_speed: 22.0,
            ground_accel: 25.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Stall detection rule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum StallRule {
    /// Stall when |pitch| exceeds the limit while airborne.
    Pitch { limit: f64 },
    /// Stall when |aoa| exceeds `stall_angle - margin` above a minimum speed.
    AngleOfAttack { margin: f64, min_speed: f64 },
}

// ---------------------------------------------------------------------------
// Initial conditions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    pub pos: Vector3<f64>,
    pub vel: Vector3<f64>,
    #[serde(default)]
    pub orientation: Orientation,
    pub throttle: f64,
}

impl InitialConditions {
    pub fn kinematic_state(&self) -> KinematicState {
        KinematicState { pos: self.pos, vel: self.vel, orientation: self.orientation }
    }
}

// ---------------------------------------------------------------------------
// Variant: everything that differs between the runway and spaceship models
// ---------------------------------------------------------------------------

/// One vehicle variant. The flight model, ground handling and warning
/// evaluation are shared; a variant only supplies numbers and rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantConfig {
    pub name: String,
    pub airframe: Airframe,
    pub control_gain: f64,     // rad per tick per unit deflection
    pub ground_elevation: f64, // m
    #[serde(default)]
    pub ground_roll: Option<GroundRoll>,
    #[serde(default)]
    pub clamp_aoa: bool,
    #[serde(default)]
    pub rudder_drag: f64, // N per unit rudder deflection
    pub overspeed: f64,   // m/s
    /// Cap on |v| in m/s that keeps runaway climbs finite. It sits outside
    /// the lift/drag/thrust/weight force law and is applied after integration.
    #[serde(default = "default_speed_limit")]
    pub speed_limit: f64,
    pub stall: StallRule,
    #[serde(default = "default_throttle_step")]
    pub throttle_step: f64,
    pub initial: InitialConditions,
}

fn default_throttle_step() -> f64 {
    THROTTLE_STEP
}

fn default_speed_limit() -> f64 {
    DEFAULT_SPEED_LIMIT
}

/// Structural cap on |v|, well above the overspeed band.
pub const DEFAULT_SPEED_LIMIT: f64 = 400.0;

impl VariantConfig {
    pub fn has_runway(&self) -> bool {
        self.ground_roll.is_some()
    }

    /// Height of the vehicle above the ground elevation, never negative.
    pub fn altitude_above_ground(&self, state: &KinematicState) -> f64 {
        (state.pos.y - self.ground_elevation).max(0.0)
    }
}

// ---------------------------------------------------------------------------
// Variant builder
// ---------------------------------------------------------------------------

pub struct VariantBuilder {
    config: VariantConfig,
}

impl VariantBuilder {
    /// Starts from the runway preset.
    pub fn new(name: impl Into<String>) -> Self {
        let mut config = presets::runway();
        config.name = name.into();
        Self { config }
    }

    pub fn from_preset(config: VariantConfig) -> Self {
        Self { config }
    }

    pub fn airframe(mut self, v: Airframe) -> Self { self.config.airframe = v; self }
    pub fn control_gain(mut self, v: f64) -> Self { self.config.control_gain = v; self }
    pub fn ground_elevation(mut self, v: f64) -> Self { self.config.ground_elevation = v; self }
    pub fn ground_roll(mut self, v: Option<GroundRoll>) -> Self { self.config.ground_roll = v; self }
    pub fn clamp_aoa(mut self, v: bool) -> Self { self.config.clamp_aoa = v; self }
    pub fn rudder_drag(mut self, v: f64) -> Self { self.config.rudder_drag = v; self }
    pub fn overspeed(mut self, v: f64) -> Self { self.config.overspeed = v; self }
    pub fn speed_limit(mut self, v: f64) -> Self { self.config.speed_limit = v; self }
    pub fn stall(mut self, v: StallRule) -> Self { self.config.stall = v; self }
    pub fn throttle_step(mut self, v: f64) -> Self { self.config.throttle_step = v; self }
    pub fn initial(mut self, v: InitialConditions) -> Self { self.config.initial = v; self }

    pub fn build(self) -> VariantConfig {
        self.config
    }
}

// ---------------------------------------------------------------------------
// Preset variants
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    pub const RUNWAY_ELEVATION: f64 = 3.0; // m

    /// Runway model: parked at the threshold, engine idle.
    pub fn runway() -> VariantConfig {
        VariantConfig {
            name: "runway".into(),
            airframe: Airframe::default(),
            control_gain: 0.002,
            ground_elevation: RUNWAY_ELEVATION,
            ground_roll: Some(GroundRoll::default()),
            clamp_aoa: false,
            rudder_drag: 0.0,
            overspeed: 180.0,
            speed_limit: DEFAULT_SPEED_LIMIT,
            stall: StallRule::Pitch { limit: 0.3 },
            throttle_step: THROTTLE_STEP,
            initial: InitialConditions {
                pos: Vector3::new(0.0, RUNWAY_ELEVATION, 0.0),
                vel: Vector3::zeros(),
                orientation: Orientation::default(),
                throttle: 0.0,
            },
        }
    }

    /// Spaceship model: pure flight, starts at cruise well above the floor.
    pub fn spaceship() -> VariantConfig {
        VariantConfig {
            name: "spaceship".into(),
            airframe: Airframe::default(),
            control_gain: 0.003,
            ground_elevation: 0.0,
            ground_roll: None,
            clamp_aoa: true,
            rudder_drag: 30.0,
            overspeed: 180.0,
            speed_limit: DEFAULT_SPEED_LIMIT,
            stall: StallRule::AngleOfAttack { margin: 5.0 * DEG, min_speed: 28.0 },
            throttle_step: THROTTLE_STEP,
            initial: InitialConditions {
                pos: Vector3::new(0.0, 300.0, 0.0),
                vel: Vector3::new(30.0, 0.0, 0.0),
                orientation: Orientation::default(),
                throttle: 0.3,
            },
        }
    }

    pub fn names() -> &'static [&'static str] {
        &["runway", "spaceship"]
    }

    pub fn by_name(name: &str) -> Option<VariantConfig> {
        match name {
            "runway" => Some(runway()),
            "spaceship" => Some(spaceship()),
            _ => None,
        }
    }
}

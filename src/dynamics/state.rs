use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G: f64 = 9.81; // m/s^2, arcade gravity
pub const DEG: f64 = std::f64::consts::PI / 180.0;

/// Fixed logical timestep, s. One tick per display frame at ~45 Hz budget.
pub const TICK_DT: f64 = 0.022;

pub const PITCH_LIMIT: f64 = 0.45; // rad
pub const ROLL_LIMIT: f64 = 0.8; // rad

// ---------------------------------------------------------------------------
// Orientation: Euler angles, no quaternion needed for the arcade model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub pitch: f64, // rad
    pub roll: f64,  // rad
    pub yaw: f64,   // rad, unbounded
}

impl Orientation {
    /// Clamp pitch and roll into their hard limits. Yaw is left alone.
    pub fn clamp_limits(&mut self) {
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.roll = self.roll.clamp(-ROLL_LIMIT, ROLL_LIMIT);
    }

    /// Heading in degrees, wrapped into [0, 360).
    pub fn heading_degrees(&self) -> f64 {
        let h = self.yaw.to_degrees().rem_euclid(360.0);
        // rem_euclid rounds tiny negatives up to exactly 360
        if h >= 360.0 { 0.0 } else { h }
    }
}

// ---------------------------------------------------------------------------
// Kinematic state: position, velocity, orientation
// ---------------------------------------------------------------------------

/// Frame: x forward (downrange), y up (altitude), z lateral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    pub pos: Vector3<f64>, // m
    pub vel: Vector3<f64>, // m/s
    pub orientation: Orientation,
}

impl KinematicState {
    pub fn new(pos: Vector3<f64>, vel: Vector3<f64>) -> Self {
        Self { pos, vel, orientation: Orientation::default() }
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    pub fn altitude(&self) -> f64 {
        self.pos.y
    }

    /// Pin altitude to the floor. Returns true if the clamp fired, in which
    /// case vertical velocity has been zeroed.
    pub fn clamp_to_floor(&mut self, ground_elevation: f64) -> bool {
        if self.pos.y < ground_elevation {
            self.pos.y = ground_elevation;
            self.vel.y = 0.0;
            true
        } else {
            false
        }
    }

    /// Scale velocity down so |v| <= limit. Direction is preserved.
    pub fn limit_speed(&mut self, limit: f64) {
        let speed = self.vel.norm();
        if speed > limit {
            self.vel *= limit / speed;
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pos.iter().all(|v| v.is_finite())
            && self.vel.iter().all(|v| v.is_finite())
            && self.orientation.pitch.is_finite()
            && self.orientation.roll.is_finite()
            && self.orientation.yaw.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub dt: f64,
    pub max_time: f64,
}

impl SimConfig {
    pub fn max_ticks(&self) -> u64 {
        if self.dt > 0.0 {
            (self.max_time / self.dt).round() as u64
        } else {
            0
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: TICK_DT,
            max_time: 60.0, // 1 min
        }
    }
}

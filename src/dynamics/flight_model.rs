use nalgebra::Vector3;

use super::controls::ControlState;
use super::ground::GroundPhase;
use super::state::{KinematicState, Orientation};
use crate::physics::{aerodynamics, gravity};
use crate::vehicle::VariantConfig;

// ---------------------------------------------------------------------------
// Force breakdown for one tick
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Forces {
    pub thrust: f64, // N
    pub lift: f64,   // N
    pub drag: f64,   // N
    pub aoa: f64,    // rad, as used for lift
    pub net: Vector3<f64>,
}

// ---------------------------------------------------------------------------
// Flight model: shared by every variant, parameterised by VariantConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FlightModel {
    pub variant: VariantConfig,
    pub dt: f64,
}

impl FlightModel {
    pub fn new(variant: VariantConfig, dt: f64) -> Self {
        Self { variant, dt }
    }

    /// Angle of attack approximated as -pitch, optionally clamped to the
    /// stall angle.
    pub fn angle_of_attack(&self, pitch: f64) -> f64 {
        let aoa = -pitch;
        if self.variant.clamp_aoa {
            let stall = self.variant.airframe.stall_angle;
            aoa.clamp(-stall, stall)
        } else {
            aoa
        }
    }

    /// Move the orientation by one tick of stick and rudder, then clamp.
    pub fn apply_deflections(&self, o: &mut Orientation, controls: &ControlState) {
        let k = self.variant.control_gain;
        o.pitch += controls.elevator.sign() * k;
        o.roll += controls.aileron.sign() * k;
        o.yaw += controls.rudder.sign() * k;
        o.clamp_limits();
    }

    /// Aerodynamic, thrust and weight forces for the current state.
    ///
    /// Horizontal: thrust * cos(pitch) - drag. Vertical: lift - m g cos(pitch).
    /// Lateral force is not modelled.
    pub fn aero_forces(&self, state: &KinematicState, controls: &ControlState, speed: f64) -> Forces {
        let airframe = &self.variant.airframe;
        let pitch = state.orientation.pitch;
        let aoa = self.angle_of_attack(pitch);

        let thrust = aerodynamics::thrust(airframe, controls.throttle());
        let lift = aerodynamics::lift(airframe, speed, aoa);
        let extra = self.variant.rudder_drag * controls.rudder.sign().abs();
        let drag = aerodynamics::drag(airframe, speed, extra);

        let fx = thrust * pitch.cos() - drag;
        let fy = lift - gravity::weight_component(airframe, pitch);

        Forces { thrust, lift, drag, aoa, net: Vector3::new(fx, fy, 0.0) }
    }

    /// Advance `state` by one fixed tick.
    ///
    /// `speed` is the speed sampled at the start of the tick, before ground
    /// contact touched the velocity. Grounded vehicles ignore the stick and
    /// accelerate on the ground-roll law instead of the aerodynamic one.
    /// Returns the forces used, or `None` on a ground-roll tick.
    pub fn step(
        &self,
        state: &mut KinematicState,
        controls: &ControlState,
        phase: GroundPhase,
        speed: f64,
    ) -> Option<Forces> {
        let dt = self.dt;

        let forces = match (phase, &self.variant.ground_roll) {
            (GroundPhase::Grounded, Some(roll)) => {
                state.vel.x += roll.ground_accel * controls.throttle() * dt;
                None
            }
            _ => {
                self.apply_deflections(&mut state.orientation, controls);
                let f = self.aero_forces(state, controls, speed);
                let mass = self.variant.airframe.mass;
                state.vel.x += f.net.x / mass * dt;
                state.vel.y += f.net.y / mass * dt;
                Some(f)
            }
        };

        state.limit_speed(self.variant.speed_limit);
        state.pos += state.vel * dt;
        state.clamp_to_floor(self.variant.ground_elevation);
        // Pitch and roll only move while airborne; clamp anyway so a
        // hand-built state cannot leave the envelope.
        state.orientation.clamp_limits();

        if let Some(f) = &forces {
            log::trace!(
                "thrust={:.0} lift={:.0} drag={:.0} aoa={:.3} net=({:.0}, {:.0})",
                f.thrust, f.lift, f.drag, f.aoa, f.net.x, f.net.y
            );
        }
        forces
    }
}

use serde::{Deserialize, Serialize};

use super::state::KinematicState;
use crate::vehicle::GroundRoll;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundPhase {
    #[default]
    Grounded,
    Airborne,
}

impl GroundPhase {
    pub fn is_grounded(self) -> bool {
        self == GroundPhase::Grounded
    }
}

// ---------------------------------------------------------------------------
// Ground contact state machine (runway variant)
// ---------------------------------------------------------------------------

/// Tracks whether the vehicle is rolling on the runway or flying.
///
/// At the runway surface the phase is decided by speed: below the rollout
/// speed the vehicle is grounded and friction bleeds off forward speed; above
/// the liftoff speed with enough throttle it rotates. In between, the previous
/// phase holds, so a touchdown keeps flying (aerodynamic drag decelerates it)
/// until it slows to rollout speed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundContact {
    phase: GroundPhase,
}

impl GroundContact {
    pub fn new(phase: GroundPhase) -> Self {
        Self { phase }
    }

    pub fn phase(&self) -> GroundPhase {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = GroundPhase::Grounded;
    }

    /// Evaluate contact at the start of a tick. `speed` is the tick's
    /// pre-integration speed. Mutates `state` when on the surface: altitude
    /// pinned, vertical velocity zeroed, rolling friction applied.
    pub fn update(
        &mut self,
        state: &mut KinematicState,
        speed: f64,
        throttle: f64,
        roll: &GroundRoll,
        ground_elevation: f64,
    ) -> GroundPhase {
        let previous = self.phase;

        if state.pos.y <= ground_elevation {
            state.pos.y = ground_elevation;
            state.vel.y = 0.0;
            if speed < roll.rollout_speed {
                self.phase = GroundPhase::Grounded;
                state.vel.x *= roll.friction;
            } else if throttle > roll.liftoff_throttle && speed > roll.liftoff_speed {
                self.phase = GroundPhase::Airborne;
            }
        } else {
            self.phase = GroundPhase::Airborne;
        }

        if previous != self.phase {
            match self.phase {
                GroundPhase::Airborne => {
                    log::info!("liftoff at x={:.1} m, speed {:.1} m/s", state.pos.x, speed)
                }
                GroundPhase::Grounded => {
                    log::info!("rollout at x={:.1} m, speed {:.1} m/s", state.pos.x, speed)
                }
            }
        }
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    const ELEV: f64 = 3.0;

    fn on_runway(vx: f64) -> KinematicState {
        KinematicState::new(Vector3::new(0.0, ELEV, 0.0), Vector3::new(vx, 0.0, 0.0))
    }

    #[test]
    fn liftoff_with_throttle_and_speed() {
        let mut g = GroundContact::default();
        let mut s = on_runway(23.0);
        let phase = g.update(&mut s, 23.0, 0.6, &GroundRoll::default(), ELEV);
        assert_eq!(phase, GroundPhase::Airborne);
    }

    #[test]
    fn low_throttle_stays_grounded() {
        let mut g = GroundContact::default();
        let mut s = on_runway(23.0);
        let phase = g.update(&mut s, 23.0, 0.3, &GroundRoll::default(), ELEV);
        assert_eq!(phase, GroundPhase::Grounded);
        // No friction above rollout speed
        assert_eq!(s.vel.x, 23.0);
    }

    #[test]
    fn friction_decays_slow_roll() {
        let mut g = GroundContact::default();
        let mut s = on_runway(10.0);
        g.update(&mut s, 10.0, 0.0, &GroundRoll::default(), ELEV);
        assert!((s.vel.x - 9.8).abs() < 1e-12);
        assert!(s.vel.x > 0.0, "decay, not an instant stop");
    }

    #[test]
    fn above_runway_is_airborne() {
        let mut g = GroundContact::default();
        let mut s = KinematicState::new(Vector3::new(0.0, 40.0, 0.0), Vector3::new(5.0, -1.0, 0.0));
        assert_eq!(g.update(&mut s, 5.1, 0.0, &GroundRoll::default(), ELEV), GroundPhase::Airborne);
        assert_eq!(s.vel.y, -1.0);
    }

    #[test]
    fn fast_touchdown_keeps_flying_until_rollout_speed() {
        let mut g = GroundContact::new(GroundPhase::Airborne);
        let mut s = KinematicState::new(Vector3::new(0.0, ELEV, 0.0), Vector3::new(40.0, -2.0, 0.0));
        assert_eq!(g.update(&mut s, 40.05, 0.0, &GroundRoll::default(), ELEV), GroundPhase::Airborne);
        assert_eq!(s.vel.y, 0.0, "pinned to the runway");

        let mut s = on_runway(19.0);
        assert_eq!(g.update(&mut s, 19.0, 0.0, &GroundRoll::default(), ELEV), GroundPhase::Grounded);
    }

    #[test]
    fn reset_returns_to_grounded() {
        let mut g = GroundContact::new(GroundPhase::Airborne);
        g.reset();
        assert_eq!(g.phase(), GroundPhase::Grounded);
    }
}

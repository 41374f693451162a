use crate::dynamics::controls::{ControlError, ControlState};
use crate::dynamics::flight_model::FlightModel;
use crate::dynamics::ground::{GroundContact, GroundPhase};
use crate::dynamics::state::{KinematicState, SimConfig};
use crate::telemetry::Snapshot;
use crate::vehicle::VariantConfig;

use super::input::{CameraMode, Command};
use super::warning::{Warning, WarningEvaluator};

// ---------------------------------------------------------------------------
// Session: the single owner of all simulation state
// ---------------------------------------------------------------------------

/// One flying session. Commands mutate the controls between ticks; `tick`
/// advances the physics by exactly one fixed timestep.
#[derive(Debug, Clone)]
pub struct Session {
    model: FlightModel,
    warnings: WarningEvaluator,
    state: KinematicState,
    controls: ControlState,
    ground: GroundContact,
    camera: CameraMode,
    warning: Warning,
    tick: u64,
}

impl Session {
    pub fn new(variant: VariantConfig, config: &SimConfig) -> Self {
        let state = variant.initial.kinematic_state();
        let controls = ControlState::with_throttle(variant.initial.throttle);
        Self::with_state(variant, config, state, controls)
    }

    /// Start from an arbitrary state. On a runway variant the vehicle counts
    /// as grounded when it sits at or below the ground elevation.
    pub fn with_state(
        variant: VariantConfig,
        config: &SimConfig,
        state: KinematicState,
        controls: ControlState,
    ) -> Self {
        let phase = if variant.has_runway() && state.pos.y <= variant.ground_elevation {
            GroundPhase::Grounded
        } else {
            GroundPhase::Airborne
        };
        let warnings = WarningEvaluator::from_variant(&variant);
        Self {
            model: FlightModel::new(variant, config.dt),
            warnings,
            state,
            controls,
            ground: GroundContact::new(phase),
            camera: CameraMode::default(),
            warning: Warning::None,
            tick: 0,
        }
    }

    pub fn variant(&self) -> &VariantConfig {
        &self.model.variant
    }

    pub fn dt(&self) -> f64 {
        self.model.dt
    }

    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn phase(&self) -> GroundPhase {
        if self.variant().has_runway() {
            self.ground.phase()
        } else {
            GroundPhase::Airborne
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.phase().is_grounded()
    }

    pub fn warning(&self) -> Warning {
        self.warning
    }

    pub fn camera(&self) -> CameraMode {
        self.camera
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn time(&self) -> f64 {
        self.tick as f64 * self.model.dt
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Apply one command. Only malformed throttle deltas can fail, and a
    /// failed command leaves the session untouched.
    pub fn apply(&mut self, cmd: Command) -> Result<(), ControlError> {
        match cmd {
            Command::SetElevator(d) => self.controls.set_elevator(d),
            Command::SetAileron(d) => self.controls.set_aileron(d),
            Command::SetRudder(d) => self.controls.set_rudder(d),
            Command::ClearControls => self.controls.clear_controls(),
            Command::AdjustThrottle(delta) => {
                self.controls.adjust_throttle(delta)?;
            }
            Command::ThrottleUp => {
                self.controls.adjust_throttle(self.model.variant.throttle_step)?;
            }
            Command::ThrottleDown => {
                self.controls.adjust_throttle(-self.model.variant.throttle_step)?;
            }
            Command::ResetSession => self.reset(),
            Command::CycleCamera => self.camera = self.camera.next(),
        }
        Ok(())
    }

    /// Fire-and-forget variant of `apply` for input front ends: rejected
    /// commands are logged and dropped.
    pub fn handle(&mut self, cmd: Command) {
        if let Err(e) = self.apply(cmd) {
            log::warn!("rejected {:?}: {}", cmd, e);
        }
    }

    /// Restore the variant's initial conditions. Camera and tick counter are
    /// kept.
    pub fn reset(&mut self) {
        let initial = &self.model.variant.initial;
        self.state = initial.kinematic_state();
        self.controls = ControlState::with_throttle(initial.throttle);
        self.ground = GroundContact::default();
        if !self.model.variant.has_runway() || self.state.pos.y > self.model.variant.ground_elevation {
            self.ground = GroundContact::new(GroundPhase::Airborne);
        }
        self.warning = Warning::None;
        log::info!("session reset ({})", self.model.variant.name);
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Ground contact, then integration, then warnings.
    pub fn tick(&mut self) -> Snapshot {
        let speed = self.state.speed();
        let throttle = self.controls.throttle();
        let variant = &self.model.variant;

        let phase = match &variant.ground_roll {
            Some(roll) => {
                self.ground.update(&mut self.state, speed, throttle, roll, variant.ground_elevation)
            }
            None => GroundPhase::Airborne,
        };

        let forces = self.model.step(&mut self.state, &self.controls, phase, speed);
        let aoa = match forces {
            Some(f) => f.aoa,
            None => self.model.angle_of_attack(self.state.orientation.pitch),
        };

        let warning = self.warnings.evaluate(&self.state, aoa, !phase.is_grounded());
        if warning != self.warning {
            if warning.is_active() {
                log::warn!("{} at speed {:.1} m/s, pitch {:.2} rad", warning, self.state.speed(), self.state.orientation.pitch);
            } else {
                log::info!("{} cleared", self.warning);
            }
        }
        self.warning = warning;
        self.tick += 1;

        self.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            time: self.time(),
            speed: self.state.speed(),
            altitude_above_ground: self.variant().altitude_above_ground(&self.state),
            heading_degrees: self.state.orientation.heading_degrees(),
            warning: self.warning,
            position: self.state.pos,
            velocity: self.state.vel,
            orientation: self.state.orientation,
            throttle: self.controls.throttle(),
            grounded: self.is_grounded(),
            camera: self.camera,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::controls::Deflection;
    use crate::dynamics::state::{PITCH_LIMIT, ROLL_LIMIT};
    use crate::vehicle::presets;
    use nalgebra::Vector3;

    fn config() -> SimConfig {
        SimConfig::default()
    }

    fn rolling(speed: f64, throttle: f64) -> Session {
        let v = presets::runway();
        let state = KinematicState::new(
            Vector3::new(0.0, v.ground_elevation, 0.0),
            Vector3::new(speed, 0.0, 0.0),
        );
        Session::with_state(v, &config(), state, ControlState::with_throttle(throttle))
    }

    #[test]
    fn runway_session_starts_grounded_and_idle() {
        let s = Session::new(presets::runway(), &config());
        assert!(s.is_grounded());
        assert_eq!(s.controls().throttle(), 0.0);
        assert_eq!(s.state().pos, Vector3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn liftoff_above_threshold() {
        let mut s = rolling(23.0, 0.6);
        assert!(s.is_grounded());
        let snap = s.tick();
        assert!(!snap.grounded);
    }

    #[test]
    fn no_liftoff_with_low_throttle() {
        let mut s = rolling(23.0, 0.3);
        let snap = s.tick();
        assert!(snap.grounded);
    }

    #[test]
    fn controls_inert_while_grounded() {
        let mut s = rolling(5.0, 0.2);
        s.handle(Command::SetElevator(Deflection::Positive));
        s.handle(Command::SetRudder(Deflection::Positive));
        for _ in 0..50 {
            s.tick();
        }
        assert_eq!(s.state().orientation.pitch, 0.0);
        assert_eq!(s.state().orientation.yaw, 0.0);
    }

    #[test]
    fn idle_roll_decays_toward_rest() {
        let mut s = rolling(15.0, 0.0);
        let mut last = 15.0;
        for _ in 0..100 {
            let snap = s.tick();
            assert!(snap.velocity.x < last && snap.velocity.x > 0.0);
            last = snap.velocity.x;
        }
    }

    #[test]
    fn full_throttle_takeoff_roll_lifts_off() {
        let mut s = Session::new(presets::runway(), &config());
        for _ in 0..20 {
            s.handle(Command::ThrottleUp);
        }
        assert_eq!(s.controls().throttle(), 1.0);
        let lifted = (0..200).any(|_| !s.tick().grounded);
        assert!(lifted, "full throttle should reach liftoff speed");
    }

    #[test]
    fn invariants_hold_under_random_looking_inputs() {
        let mut s = Session::new(presets::spaceship(), &config());
        let pattern = [
            Command::SetElevator(Deflection::Positive),
            Command::SetAileron(Deflection::Negative),
            Command::ThrottleDown,
            Command::SetRudder(Deflection::Positive),
            Command::SetElevator(Deflection::Negative),
            Command::SetAileron(Deflection::Positive),
            Command::ClearControls,
        ];
        let floor = s.variant().ground_elevation;
        for i in 0..700 {
            if i % 100 == 0 {
                s.handle(pattern[(i / 100) % pattern.len()]);
            }
            let snap = s.tick();
            assert!(snap.orientation.pitch.abs() <= PITCH_LIMIT);
            assert!(snap.orientation.roll.abs() <= ROLL_LIMIT);
            assert!(snap.position.y >= floor);
            if snap.position.y == floor {
                assert_eq!(snap.velocity.y, 0.0);
            }
        }
    }

    #[test]
    fn reset_restores_initial_constants() {
        for variant in [presets::runway(), presets::spaceship()] {
            let mut s = Session::new(variant.clone(), &config());
            s.handle(Command::AdjustThrottle(0.9));
            s.handle(Command::SetAileron(Deflection::Positive));
            for _ in 0..300 {
                s.tick();
            }
            s.handle(Command::ResetSession);
            assert_eq!(s.state(), &variant.initial.kinematic_state());
            assert_eq!(s.controls().throttle(), variant.initial.throttle);
            assert!(s.controls().aileron.is_neutral());
            assert_eq!(s.warning(), Warning::None);
            assert_eq!(s.is_grounded(), variant.has_runway());
        }
    }

    #[test]
    fn nan_throttle_is_rejected_by_session() {
        let mut s = Session::new(presets::runway(), &config());
        assert!(s.apply(Command::AdjustThrottle(f64::NAN)).is_err());
        s.handle(Command::AdjustThrottle(f64::NAN));
        assert_eq!(s.controls().throttle(), 0.0);
        s.tick();
        assert!(s.state().is_finite());
    }

    #[test]
    fn overspeed_and_stall_labels() {
        let v = presets::runway();
        let fast = KinematicState::new(Vector3::new(0.0, 500.0, 0.0), Vector3::new(190.0, 0.0, 0.0));
        let mut s = Session::with_state(v.clone(), &config(), fast.clone(), ControlState::default());
        assert_eq!(s.tick().warning, Warning::Overspeed);

        let mut nose_high = fast;
        nose_high.orientation.pitch = 0.35;
        let mut s = Session::with_state(v, &config(), nose_high, ControlState::default());
        assert_eq!(s.tick().warning, Warning::Stall);
    }

    #[test]
    fn camera_survives_reset() {
        let mut s = Session::new(presets::spaceship(), &config());
        s.handle(Command::CycleCamera);
        s.handle(Command::CycleCamera);
        s.handle(Command::ResetSession);
        assert_eq!(s.camera().index(), 3);
    }

    #[test]
    fn sessions_are_deterministic() {
        let run = || {
            let mut s = Session::new(presets::runway(), &config());
            s.handle(Command::AdjustThrottle(0.7));
            (0..400).map(|_| s.tick()).last().unwrap()
        };
        assert_eq!(run(), run());
    }
}

use crate::dynamics::controls::{Deflection, THROTTLE_STEP};
use crate::sim::input::Command;
use crate::telemetry::Snapshot;
use super::pid::Pid;
use super::pilot::Pilot;

// ---------------------------------------------------------------------------
// Idle: hands off, whatever the session starts with
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePilot;

impl Pilot for IdlePilot {
    fn commands(&mut self, _snapshot: &Snapshot, _dt: f64) -> Vec<Command> {
        Vec::new()
    }

    fn name(&self) -> &str {
        "idle"
    }
}

// ---------------------------------------------------------------------------
// Cruise: throttle altitude hold + wings/pitch leveller
// ---------------------------------------------------------------------------

/// Bang-bang attitude leveller: deflect against the angle once it leaves the
/// deadband.
fn level(angle: f64, deadband: f64) -> Deflection {
    if angle > deadband {
        Deflection::Negative
    } else if angle < -deadband {
        Deflection::Positive
    } else {
        Deflection::Neutral
    }
}

#[derive(Debug, Clone)]
pub struct CruisePilot {
    pub target_altitude: f64, // m above ground
    pub attitude_deadband: f64, // rad
    pub altitude_pid: Pid,
    elevator: Deflection,
    aileron: Deflection,
}

impl CruisePilot {
    pub fn new(target_altitude: f64) -> Self {
        Self {
            target_altitude,
            attitude_deadband: 0.02,
            // Output is a per-tick throttle delta, so never more than one
            // button press worth
            altitude_pid: Pid::new(0.01, 0.001, 0.02).with_output_limit(THROTTLE_STEP),
            elevator: Deflection::Neutral,
            aileron: Deflection::Neutral,
        }
    }

    pub fn update(&mut self, snapshot: &Snapshot, dt: f64) -> Vec<Command> {
        let mut cmds = Vec::new();

        let error = self.target_altitude - snapshot.altitude_above_ground;
        let delta = self.altitude_pid.update(error, dt);
        if delta.abs() > 1e-9 {
            cmds.push(Command::AdjustThrottle(delta));
        }

        // Only emit deflection changes
        let elevator = level(snapshot.orientation.pitch, self.attitude_deadband);
        if elevator != self.elevator {
            cmds.push(Command::SetElevator(elevator));
            self.elevator = elevator;
        }
        let aileron = level(snapshot.orientation.roll, self.attitude_deadband);
        if aileron != self.aileron {
            cmds.push(Command::SetAileron(aileron));
            self.aileron = aileron;
        }
        cmds
    }
}

impl Default for CruisePilot {
    fn default() -> Self {
        Self::new(150.0)
    }
}

impl Pilot for CruisePilot {
    fn commands(&mut self, snapshot: &Snapshot, dt: f64) -> Vec<Command> {
        self.update(snapshot, dt)
    }

    fn reset(&mut self) {
        self.altitude_pid.reset();
        self.elevator = Deflection::Neutral;
        self.aileron = Deflection::Neutral;
    }

    fn name(&self) -> &str {
        "cruise"
    }
}

// ---------------------------------------------------------------------------
// Takeoff: full throttle down the runway, then cruise
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TakeoffPilot {
    pub takeoff_throttle: f64,
    pub cruise: CruisePilot,
    airborne: bool,
}

impl TakeoffPilot {
    pub fn new(takeoff_throttle: f64, cruise_altitude: f64) -> Self {
        Self {
            takeoff_throttle: takeoff_throttle.clamp(0.0, 1.0),
            cruise: CruisePilot::new(cruise_altitude),
            airborne: false,
        }
    }
}

impl Default for TakeoffPilot {
    fn default() -> Self {
        Self::new(1.0, 150.0)
    }
}

impl Pilot for TakeoffPilot {
    fn commands(&mut self, snapshot: &Snapshot, dt: f64) -> Vec<Command> {
        if !self.airborne && !snapshot.grounded {
            self.airborne = true;
            log::debug!("takeoff pilot handing over to cruise at {:.1} m/s", snapshot.speed);
        }
        if self.airborne {
            return self.cruise.update(snapshot, dt);
        }
        if snapshot.throttle < self.takeoff_throttle {
            vec![Command::ThrottleUp]
        } else {
            Vec::new()
        }
    }

    fn reset(&mut self) {
        self.airborne = false;
        self.cruise.reset();
    }

    fn name(&self) -> &str {
        "takeoff"
    }
}

/// Scripted pilot by name, as accepted on the command line.
pub fn by_name(name: &str) -> Option<Box<dyn Pilot>> {
    match name {
        "idle" => Some(Box::new(IdlePilot)),
        "takeoff" => Some(Box::new(TakeoffPilot::default())),
        "cruise" => Some(Box::new(CruisePilot::default())),
        _ => None,
    }
}

pub fn names() -> &'static [&'static str] {
    &["idle", "takeoff", "cruise"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::Orientation;
    use crate::sim::input::CameraMode;
    use crate::sim::warning::Warning;
    use nalgebra::Vector3;

    fn snap(alt: f64, grounded: bool, throttle: f64, pitch: f64, roll: f64) -> Snapshot {
        Snapshot {
            tick: 0,
            time: 0.0,
            speed: 40.0,
            altitude_above_ground: alt,
            heading_degrees: 0.0,
            warning: Warning::None,
            position: Vector3::new(0.0, alt, 0.0),
            velocity: Vector3::new(40.0, 0.0, 0.0),
            orientation: Orientation { pitch, roll, yaw: 0.0 },
            throttle,
            grounded,
            camera: CameraMode::default(),
        }
    }

    fn throttle_delta(cmds: &[Command]) -> Option<f64> {
        cmds.iter().find_map(|c| match c {
            Command::AdjustThrottle(d) => Some(*d),
            _ => None,
        })
    }

    #[test]
    fn idle_never_commands() {
        let mut p = IdlePilot;
        assert!(p.commands(&snap(0.0, true, 0.0, 0.0, 0.0), 0.022).is_empty());
    }

    #[test]
    fn cruise_cuts_throttle_when_high() {
        let mut p = CruisePilot::new(100.0);
        let d = throttle_delta(&p.commands(&snap(300.0, false, 0.5, 0.0, 0.0), 0.022)).unwrap();
        assert!(d < 0.0);
        assert!(d >= -THROTTLE_STEP);
    }

    #[test]
    fn cruise_adds_throttle_when_low() {
        let mut p = CruisePilot::new(100.0);
        let d = throttle_delta(&p.commands(&snap(20.0, false, 0.5, 0.0, 0.0), 0.022)).unwrap();
        assert!(d > 0.0 && d <= THROTTLE_STEP);
    }

    #[test]
    fn leveller_opposes_attitude_and_only_emits_changes() {
        let mut p = CruisePilot::new(100.0);
        let cmds = p.commands(&snap(100.0, false, 0.5, 0.2, -0.3), 0.022);
        assert!(cmds.contains(&Command::SetElevator(Deflection::Negative)));
        assert!(cmds.contains(&Command::SetAileron(Deflection::Positive)));

        let again = p.commands(&snap(100.0, false, 0.5, 0.2, -0.3), 0.022);
        assert!(!again.iter().any(|c| matches!(c, Command::SetElevator(_) | Command::SetAileron(_))));

        let level = p.commands(&snap(100.0, false, 0.5, 0.0, 0.0), 0.022);
        assert!(level.contains(&Command::SetElevator(Deflection::Neutral)));
        assert!(level.contains(&Command::SetAileron(Deflection::Neutral)));
    }

    #[test]
    fn takeoff_runs_throttle_up_on_the_ground() {
        let mut p = TakeoffPilot::default();
        assert_eq!(p.commands(&snap(0.0, true, 0.2, 0.0, 0.0), 0.022), vec![Command::ThrottleUp]);
        assert!(p.commands(&snap(0.0, true, 1.0, 0.0, 0.0), 0.022).is_empty());
    }

    #[test]
    fn takeoff_hands_over_after_liftoff() {
        let mut p = TakeoffPilot::new(1.0, 100.0);
        let cmds = p.commands(&snap(5.0, false, 1.0, 0.0, 0.0), 0.022);
        assert!(throttle_delta(&cmds).is_some());
        p.reset();
        assert_eq!(p.commands(&snap(0.0, true, 0.5, 0.0, 0.0), 0.022), vec![Command::ThrottleUp]);
    }

    #[test]
    fn scripts_by_name() {
        for name in names() {
            assert_eq!(by_name(name).unwrap().name(), *name);
        }
        assert!(by_name("loop").is_none());
    }
}

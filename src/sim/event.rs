use serde::Serialize;

use super::warning::Warning;
use crate::telemetry::Snapshot;

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventKind {
    Liftoff,
    Touchdown,
    Rollout,
    WarningRaised(Warning),
    WarningCleared,
    Reset,
    Diverged,
    Custom(String),
}

/// A discrete event observed between two consecutive snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    pub tick: u64,
    pub time: f64,
    pub kind: EventKind,
}

/// Passive detectors: inspect consecutive snapshots and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind>;
}

/// Ground contact flag going from grounded to airborne.
pub struct LiftoffDetector;

impl EventDetector for LiftoffDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind> {
        (prev.grounded && !current.grounded).then_some(EventKind::Liftoff)
    }
}

/// Wheels back on the surface while still flying.
pub struct TouchdownDetector;

impl EventDetector for TouchdownDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind> {
        let landed = prev.altitude_above_ground > 0.0 && current.altitude_above_ground <= 0.0;
        (landed && !prev.grounded).then_some(EventKind::Touchdown)
    }
}

/// Airborne vehicle slowed to rollout speed on the surface.
pub struct RolloutDetector;

impl EventDetector for RolloutDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind> {
        (!prev.grounded && current.grounded).then_some(EventKind::Rollout)
    }
}

/// Warning label changes.
pub struct WarningDetector;

impl EventDetector for WarningDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind> {
        if prev.warning == current.warning {
            None
        } else if current.warning.is_active() {
            Some(EventKind::WarningRaised(current.warning))
        } else {
            Some(EventKind::WarningCleared)
        }
    }
}

/// Fires once when the vehicle climbs through a height above ground.
pub struct AltitudeDetector {
    pub altitude: f64,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(altitude: f64) -> Self {
        Self { altitude, fired: false }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &Snapshot, current: &Snapshot) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if prev.altitude_above_ground < self.altitude && current.altitude_above_ground >= self.altitude {
            self.fired = true;
            Some(EventKind::Custom(format!("Climbed through {:.0}m", self.altitude)))
        } else {
            None
        }
    }
}

/// The standard detector set used by the runner.
pub fn default_detectors() -> Vec<Box<dyn EventDetector>> {
    vec![
        Box::new(LiftoffDetector),
        Box::new(TouchdownDetector),
        Box::new(RolloutDetector),
        Box::new(WarningDetector),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::Orientation;
    use crate::sim::input::CameraMode;
    use nalgebra::Vector3;

    fn snap(alt: f64, grounded: bool, warning: Warning) -> Snapshot {
        Snapshot {
            tick: 0,
            time: 0.0,
            speed: 30.0,
            altitude_above_ground: alt,
            heading_degrees: 0.0,
            warning,
            position: Vector3::new(0.0, alt, 0.0),
            velocity: Vector3::new(30.0, 0.0, 0.0),
            orientation: Orientation::default(),
            throttle: 0.6,
            grounded,
            camera: CameraMode::default(),
        }
    }

    #[test]
    fn liftoff_detected() {
        let mut det = LiftoffDetector;
        let prev = snap(0.0, true, Warning::None);
        let curr = snap(0.0, false, Warning::None);
        assert_eq!(det.check(&prev, &curr), Some(EventKind::Liftoff));
        assert_eq!(det.check(&curr, &curr), None);
    }

    #[test]
    fn touchdown_then_rollout() {
        let mut touch = TouchdownDetector;
        let mut roll = RolloutDetector;
        let flying = snap(2.0, false, Warning::None);
        let on_surface = snap(0.0, false, Warning::None);
        let stopped = snap(0.0, true, Warning::None);
        assert_eq!(touch.check(&flying, &on_surface), Some(EventKind::Touchdown));
        assert_eq!(roll.check(&flying, &on_surface), None);
        assert_eq!(roll.check(&on_surface, &stopped), Some(EventKind::Rollout));
    }

    #[test]
    fn warning_transitions() {
        let mut det = WarningDetector;
        let calm = snap(100.0, false, Warning::None);
        let stall = snap(100.0, false, Warning::Stall);
        assert_eq!(det.check(&calm, &stall), Some(EventKind::WarningRaised(Warning::Stall)));
        assert_eq!(det.check(&stall, &stall), None);
        assert_eq!(det.check(&stall, &calm), Some(EventKind::WarningCleared));
    }

    #[test]
    fn altitude_detector_fires_once() {
        let mut det = AltitudeDetector::new(50.0);
        let low = snap(40.0, false, Warning::None);
        let high = snap(55.0, false, Warning::None);
        assert!(det.check(&low, &high).is_some());
        assert!(det.check(&low, &high).is_none());
    }
}

use nalgebra::Vector3;
use serde::Serialize;

use crate::dynamics::state::Orientation;
use crate::sim::input::CameraMode;
use crate::sim::warning::Warning;

// ---------------------------------------------------------------------------
// Read-only snapshot handed to renderer / HUD after every tick
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub time: f64,                  // s of simulated time
    pub speed: f64,                 // m/s
    pub altitude_above_ground: f64, // m, >= 0
    pub heading_degrees: f64,       // [0, 360)
    pub warning: Warning,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub orientation: Orientation,
    pub throttle: f64,
    pub grounded: bool,
    pub camera: CameraMode,
}

impl Snapshot {
    pub fn audio_feed(&self) -> AudioFeed {
        AudioFeed { throttle: self.throttle, speed: self.speed, warning: self.warning }
    }

    pub fn hud(&self) -> HudText {
        HudText::from_snapshot(self)
    }

    pub fn is_finite(&self) -> bool {
        self.speed.is_finite()
            && self.position.iter().all(|v| v.is_finite())
            && self.velocity.iter().all(|v| v.is_finite())
    }
}

// ---------------------------------------------------------------------------
// HUD text lines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub airspeed: String,
    pub altitude: String,
    pub heading: String,
    pub warning: String,
}

impl HudText {
    pub fn from_snapshot(s: &Snapshot) -> Self {
        Self {
            airspeed: format!("Airspeed: {}", s.speed.round()),
            altitude: format!("Altitude: {}", s.altitude_above_ground.round().max(0.0)),
            heading: format!("Heading: {}", s.heading_degrees.round() as i64 % 360),
            warning: s.warning.label().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// The subset of a snapshot the audio collaborator listens to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioFeed {
    pub throttle: f64,
    pub speed: f64,
    pub warning: Warning,
}

/// Playback parameters derived from an `AudioFeed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioMix {
    pub engine_rate: f64,
    pub engine_volume: f64,
    pub wind_volume: f64,
    pub stall_cue: bool,
}

impl AudioMix {
    pub fn from_feed(feed: &AudioFeed) -> Self {
        Self {
            engine_rate: 0.9 + 0.3 * feed.throttle,
            engine_volume: 0.3 + 0.28 * feed.throttle,
            wind_volume: 0.12 + (feed.speed / 120.0).min(1.0) * 0.19,
            stall_cue: feed.warning == Warning::Stall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(speed: f64, alt: f64, heading: f64, warning: Warning) -> Snapshot {
        Snapshot {
            tick: 0,
            time: 0.0,
            speed,
            altitude_above_ground: alt,
            heading_degrees: heading,
            warning,
            position: Vector3::zeros(),
            velocity: Vector3::new(speed, 0.0, 0.0),
            orientation: Orientation::default(),
            throttle: 0.5,
            grounded: false,
            camera: CameraMode::default(),
        }
    }

    #[test]
    fn hud_rounds_values() {
        let hud = snapshot(42.6, 10.4, 359.7, Warning::Stall).hud();
        assert_eq!(hud.airspeed, "Airspeed: 43");
        assert_eq!(hud.altitude, "Altitude: 10");
        assert_eq!(hud.heading, "Heading: 0");
        assert_eq!(hud.warning, "STALL");
    }

    #[test]
    fn audio_mix_scales_with_throttle_and_speed() {
        let idle = AudioMix::from_feed(&AudioFeed { throttle: 0.0, speed: 0.0, warning: Warning::None });
        assert!((idle.engine_rate - 0.9).abs() < 1e-12);
        assert!((idle.engine_volume - 0.3).abs() < 1e-12);
        assert!((idle.wind_volume - 0.12).abs() < 1e-12);
        assert!(!idle.stall_cue);

        let full = AudioMix::from_feed(&AudioFeed { throttle: 1.0, speed: 500.0, warning: Warning::Stall });
        assert!((full.engine_rate - 1.2).abs() < 1e-12);
        assert!((full.wind_volume - 0.31).abs() < 1e-12, "wind saturates at 120 m/s");
        assert!(full.stall_cue);
    }

    #[test]
    fn audio_feed_is_a_subset_of_the_snapshot() {
        let s = snapshot(90.0, 0.0, 0.0, Warning::Overspeed);
        let feed = s.audio_feed();
        assert_eq!(feed.speed, 90.0);
        assert_eq!(feed.throttle, 0.5);
        assert_eq!(feed.warning, Warning::Overspeed);
    }
}

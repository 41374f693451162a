pub mod physics;
pub mod dynamics;
pub mod vehicle;
pub mod autopilot;
pub mod sim;
pub mod telemetry;
pub mod io;

// Flat re-exports for front ends
pub mod types {
    pub use crate::dynamics::state::{KinematicState, Orientation, SimConfig, G, TICK_DT};
    pub use crate::dynamics::{ControlError, ControlState, Deflection, GroundPhase};
    pub use crate::sim::{Command, Session, Warning};
    pub use crate::telemetry::{AudioFeed, AudioMix, HudText, Snapshot};
    pub use crate::vehicle::{ConfigError, VariantConfig};
}

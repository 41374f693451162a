use crate::sim::input::Command;
use crate::telemetry::Snapshot;

/// Trait for pilots.
///
/// A pilot reads the latest snapshot before each tick and returns the
/// commands to apply. Scripted pilots, autopilots and recorded input all plug
/// into the run loop through this trait.
pub trait Pilot {
    /// Commands to apply before the next tick.
    fn commands(&mut self, snapshot: &Snapshot, dt: f64) -> Vec<Command>;

    /// Reset internal state (e.g., PID integrators).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

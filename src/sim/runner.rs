use std::thread;
use std::time::{Duration, Instant};

use crate::autopilot::{Pilot, TakeoffPilot};
use crate::dynamics::state::SimConfig;
use crate::telemetry::Snapshot;
use crate::vehicle::VariantConfig;
use super::event::{default_detectors, EventDetector, EventKind, SimEvent};
use super::input::Command;
use super::session::Session;

// ---------------------------------------------------------------------------
// Run output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Flight {
    /// Snapshot before the first tick, then one per tick.
    pub trajectory: Vec<Snapshot>,
    pub events: Vec<SimEvent>,
    pub diverged: bool,
}

impl Flight {
    pub fn last(&self) -> Option<&Snapshot> {
        self.trajectory.last()
    }

    pub fn first_event(&self, kind: &EventKind) -> Option<&SimEvent> {
        self.events.iter().find(|e| &e.kind == kind)
    }
}

/// How the fixed-tick loop relates to wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    /// As fast as possible.
    #[default]
    Headless,
    /// Sleep off the remainder of each tick. A slow tick is not caught up.
    RealTime,
}

// ---------------------------------------------------------------------------
// Fixed-tick driver
// ---------------------------------------------------------------------------

/// Drive a session for `config.max_time` with a pilot feeding commands
/// between ticks, watching for the standard events.
pub fn simulate_with(
    session: &mut Session,
    config: &SimConfig,
    pilot: &mut dyn Pilot,
    pacing: Pacing,
) -> Flight {
    simulate_with_detectors(session, config, pilot, pacing, default_detectors())
}

/// As `simulate_with`, with a caller-chosen detector set.
pub fn simulate_with_detectors(
    session: &mut Session,
    config: &SimConfig,
    pilot: &mut dyn Pilot,
    pacing: Pacing,
    mut detectors: Vec<Box<dyn EventDetector>>,
) -> Flight {
    let ticks = config.max_ticks();
    let cap = (ticks as usize + 1).min(200_000);
    let mut flight = Flight {
        trajectory: Vec::with_capacity(cap),
        ..Default::default()
    };
    // Headless runs never touch the wall clock
    let tick_len = match pacing {
        Pacing::RealTime => Duration::try_from_secs_f64(session.dt()).ok(),
        Pacing::Headless => None,
    };

    log::info!(
        "flying '{}' with {} pilot for {} ticks",
        session.variant().name,
        pilot.name(),
        ticks
    );
    flight.trajectory.push(session.snapshot());

    for _ in 0..ticks {
        let started = Instant::now();
        let before = session.snapshot();

        for cmd in pilot.commands(&before, session.dt()) {
            session.handle(cmd);
            if cmd == Command::ResetSession {
                pilot.reset();
                record(&mut flight, &before, EventKind::Reset);
            }
        }

        // Compare against the post-command state so a reset is not mistaken
        // for a touchdown.
        let prev = session.snapshot();
        let snap = session.tick();

        if !snap.is_finite() {
            log::error!("state diverged at t={:.3}s, stopping", snap.time);
            record(&mut flight, &snap, EventKind::Diverged);
            flight.diverged = true;
            flight.trajectory.push(snap);
            break;
        }

        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&prev, &snap) {
                record(&mut flight, &snap, kind);
            }
        }
        flight.trajectory.push(snap);

        if let Some(rest) = tick_len.and_then(|t| t.checked_sub(started.elapsed())) {
            thread::sleep(rest);
        }
    }

    flight
}

fn record(flight: &mut Flight, at: &Snapshot, kind: EventKind) {
    log::info!("t={:>7.2}s  {:?}", at.time, kind);
    flight.events.push(SimEvent { tick: at.tick, time: at.time, kind });
}

/// Fly a fresh session of `variant` headless with the default takeoff pilot
/// (convenience wrapper).
pub fn simulate(variant: VariantConfig, config: &SimConfig) -> Flight {
    let mut session = Session::new(variant, config);
    let mut pilot = TakeoffPilot::default();
    simulate_with(&mut session, config, &mut pilot, Pacing::Headless)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::sim::event::{EventKind, SimEvent};
use crate::sim::runner::Flight;
use crate::sim::warning::Warning;
use crate::telemetry::Snapshot;

/// Summary statistics computed from a flight trajectory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlightSummary {
    pub max_altitude_m: f64,
    pub max_altitude_time: f64,
    pub max_speed: f64,
    pub flight_time: f64,
    pub airborne_time: f64,
    pub liftoff_time: Option<f64>,
    pub stall_ticks: u64,
    pub overspeed_ticks: u64,
    pub final_speed: f64,
    pub final_heading_deg: f64,
    pub diverged: bool,
}

impl FlightSummary {
    /// Compute summary from trajectory data. Per-tick counters use the
    /// trajectory spacing as the tick length.
    pub fn from_trajectory(trajectory: &[Snapshot]) -> Self {
        let Some(last) = trajectory.last() else {
            return Self::default();
        };

        let highest = trajectory
            .iter()
            .max_by(|a, b| a.altitude_above_ground.total_cmp(&b.altitude_above_ground))
            .unwrap_or(last);

        let max_speed = trajectory
            .iter()
            .map(|s| s.speed)
            .fold(0.0_f64, f64::max);

        let airborne_time = trajectory
            .windows(2)
            .filter(|w| !w[1].grounded)
            .map(|w| w[1].time - w[0].time)
            .sum();

        let liftoff_time = trajectory
            .windows(2)
            .find(|w| w[0].grounded && !w[1].grounded)
            .map(|w| w[1].time);

        let count = |warning: Warning| {
            trajectory.iter().skip(1).filter(|s| s.warning == warning).count() as u64
        };

        FlightSummary {
            max_altitude_m: highest.altitude_above_ground,
            max_altitude_time: highest.time,
            max_speed,
            flight_time: last.time,
            airborne_time,
            liftoff_time,
            stall_ticks: count(Warning::Stall),
            overspeed_ticks: count(Warning::Overspeed),
            final_speed: last.speed,
            final_heading_deg: last.heading_degrees,
            diverged: !last.is_finite(),
        }
    }

    pub fn from_flight(flight: &Flight) -> Self {
        let mut summary = Self::from_trajectory(&flight.trajectory);
        summary.diverged |= flight.diverged;
        summary
    }
}

// ---------------------------------------------------------------------------
// JSON report
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Report<'a> {
    variant: &'a str,
    pilot: &'a str,
    dt: f64,
    performance: &'a FlightSummary,
    events: Vec<EventRecord<'a>>,
}

#[derive(Serialize)]
struct EventRecord<'a> {
    tick: u64,
    time: f64,
    kind: &'a EventKind,
}

impl<'a> From<&'a SimEvent> for EventRecord<'a> {
    fn from(e: &'a SimEvent) -> Self {
        Self { tick: e.tick, time: e.time, kind: &e.kind }
    }
}

/// Run identification written alongside the summary.
#[derive(Debug, Clone, Copy)]
pub struct RunInfo<'a> {
    pub variant: &'a str,
    pub pilot: &'a str,
    pub dt: f64,
}

/// Write flight summary and events as pretty JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    info: RunInfo<'_>,
    summary: &FlightSummary,
    events: &[SimEvent],
) -> io::Result<()> {
    let report = Report {
        variant: info.variant,
        pilot: info.pilot,
        dt: info.dt,
        performance: summary,
        events: events.iter().map(EventRecord::from).collect(),
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(
    path: impl AsRef<Path>,
    info: RunInfo<'_>,
    summary: &FlightSummary,
    events: &[SimEvent],
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_summary(&mut file, info, summary, events)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::Orientation;
    use crate::sim::input::CameraMode;
    use nalgebra::Vector3;

    fn snap(tick: u64, alt: f64, speed: f64, grounded: bool, warning: Warning) -> Snapshot {
        Snapshot {
            tick,
            time: tick as f64 * 0.5,
            speed,
            altitude_above_ground: alt,
            heading_degrees: 90.0,
            warning,
            position: Vector3::new(0.0, alt, 0.0),
            velocity: Vector3::new(speed, 0.0, 0.0),
            orientation: Orientation::default(),
            throttle: 1.0,
            grounded,
            camera: CameraMode::default(),
        }
    }

    fn simple_trajectory() -> Vec<Snapshot> {
        vec![
            snap(0, 0.0, 0.0, true, Warning::None),
            snap(1, 0.0, 21.0, true, Warning::None),
            snap(2, 0.0, 23.0, false, Warning::None),
            snap(3, 40.0, 35.0, false, Warning::Stall),
            snap(4, 25.0, 190.0, false, Warning::Overspeed),
        ]
    }

    #[test]
    fn summary_computes_peaks_and_liftoff() {
        let s = FlightSummary::from_trajectory(&simple_trajectory());
        assert!((s.max_altitude_m - 40.0).abs() < 1e-12);
        assert!((s.max_altitude_time - 1.5).abs() < 1e-12);
        assert_eq!(s.max_speed, 190.0);
        assert_eq!(s.liftoff_time, Some(1.0));
        assert!((s.airborne_time - 1.5).abs() < 1e-12);
        assert_eq!(s.stall_ticks, 1);
        assert_eq!(s.overspeed_ticks, 1);
        assert!(!s.diverged);
    }

    #[test]
    fn empty_trajectory_gives_zero_summary() {
        assert_eq!(FlightSummary::from_trajectory(&[]), FlightSummary::default());
    }

    #[test]
    fn json_output_is_valid() {
        let summary = FlightSummary::from_trajectory(&simple_trajectory());
        let events = vec![SimEvent { tick: 2, time: 1.0, kind: EventKind::Liftoff }];
        let info = RunInfo { variant: "runway", pilot: "takeoff", dt: 0.022 };

        let mut buf = Vec::new();
        write_summary(&mut buf, info, &summary, &events).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["variant"], "runway");
        assert_eq!(value["performance"]["stall_ticks"], 1);
        assert_eq!(value["events"][0]["kind"], "Liftoff");
    }
}

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use env_logger::Env;

use arcade_flight::autopilot;
use arcade_flight::io::{csv, json};
use arcade_flight::io::json::{FlightSummary, RunInfo};
use arcade_flight::sim::event::EventKind;
use arcade_flight::sim::{self, Pacing, Session};
use arcade_flight::types::{SimConfig, TICK_DT};
use arcade_flight::vehicle::{loader, load_variant, VariantConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Headless arcade flight simulation")]
struct Args {
    /// Preset variant: runway or spaceship
    #[arg(short, long, default_value = "runway")]
    variant: String,

    /// Variant file (.yaml/.yml or .json), overrides --variant
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scripted pilot: idle, takeoff or cruise
    #[arg(short, long, default_value = "takeoff")]
    script: String,

    /// Simulated seconds to fly
    #[arg(long, default_value_t = 30.0)]
    seconds: f64,

    /// Write the trajectory as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON flight summary
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Pace ticks to wall time
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let variant: VariantConfig = match &args.config {
        Some(path) => load_variant(path)
            .with_context(|| format!("loading variant from {}", path.display()))?,
        None => loader::preset(&args.variant)?,
    };
    let mut pilot = autopilot::by_name(&args.script).ok_or_else(|| {
        anyhow!("unknown script '{}' (expected one of {:?})", args.script, autopilot::names())
    })?;
    if !(args.seconds.is_finite() && args.seconds > 0.0) {
        return Err(anyhow!("--seconds must be positive, got {}", args.seconds));
    }

    let config = SimConfig { dt: TICK_DT, max_time: args.seconds };
    let pacing = if args.realtime { Pacing::RealTime } else { Pacing::Headless };

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let mut session = Session::new(variant.clone(), &config);
    let flight = sim::simulate_with(&mut session, &config, pilot.as_mut(), pacing);
    let summary = FlightSummary::from_flight(&flight);

    if let Some(path) = &args.csv {
        csv::write_trajectory_file(path, &flight.trajectory)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("trajectory written to {}", path.display());
    }
    if let Some(path) = &args.summary {
        let info = RunInfo { variant: &variant.name, pilot: pilot.name(), dt: config.dt };
        json::write_summary_file(path, info, &summary, &flight.events)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("summary written to {}", path.display());
    }

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    let a = &variant.airframe;
    println!();
    println!("====================================================================");
    println!("  ARCADE FLIGHT SIMULATION: {} / {} pilot", variant.name, pilot.name());
    println!("====================================================================");
    println!();
    println!("  Vehicle Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.1} kg    Wing area:    {:>8.1} m^2",
        a.mass, a.wing_area
    );
    println!(
        "  Max thrust:    {:>8.0} N     Level speed:  {:>8.1} m/s",
        a.max_thrust,
        a.level_flight_speed()
    );
    println!(
        "  C_L / C_D:     {:>4.2} / {:<5.3}   Stall angle:  {:>8.1} deg",
        a.lift_coeff,
        a.drag_coeff,
        a.stall_angle.to_degrees()
    );
    println!(
        "  Ground:        {:>8.1} m     Runway:       {:>8}",
        variant.ground_elevation,
        if variant.has_runway() { "yes" } else { "no" }
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    if flight.events.is_empty() {
        println!("  (none)");
    }
    for e in &flight.events {
        let label = match &e.kind {
            EventKind::WarningRaised(w) => format!("{}", w),
            EventKind::Custom(s) => s.clone(),
            other => format!("{:?}", other).to_uppercase(),
        };
        println!("  {:<14} t={:>7.2}s   tick {:>6}", label, e.time, e.tick);
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Max altitude:  {:>8.1} m  (t={:.1}s)", summary.max_altitude_m, summary.max_altitude_time);
    println!("  Max speed:     {:>8.1} m/s", summary.max_speed);
    match summary.liftoff_time {
        Some(t) => println!("  Liftoff:       {:>8.2} s", t),
        None => println!("  Liftoff:            n/a"),
    }
    println!("  Airborne time: {:>8.1} s of {:.1} s", summary.airborne_time, summary.flight_time);
    println!(
        "  Warning ticks: {:>8} stall, {} overspeed",
        summary.stall_ticks, summary.overspeed_ticks
    );
    if summary.diverged {
        println!("  State diverged: run stopped early");
    }
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>9}  {:>7}  {:>6}  {:>9}",
        "t (s)", "alt (m)", "spd (m/s)", "hdg", "thr", "status"
    );
    println!("  {}", "─".repeat(60));

    let n = flight.trajectory.len();
    let sample_interval = (n / 30).max(1);
    for (i, s) in flight.trajectory.iter().enumerate() {
        if i % sample_interval != 0 && i + 1 != n {
            continue;
        }
        let status = if s.warning.is_active() {
            s.warning.label()
        } else if s.grounded {
            "GROUND"
        } else {
            "FLY"
        };
        println!(
            "  {:>7.2}  {:>9.1}  {:>9.1}  {:>7.0}  {:>6.2}  {:>9}",
            s.time, s.altitude_above_ground, s.speed, s.heading_degrees, s.throttle, status
        );
    }

    println!();
    println!("  Simulation: {} ticks, dt={} s", n.saturating_sub(1), config.dt);
    println!("====================================================================");
    println!();
    Ok(())
}

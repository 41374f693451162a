use std::io::{self, Write};
use std::path::Path;

use crate::telemetry::Snapshot;

/// Write trajectory data to CSV format.
///
/// Columns: tick, time, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z,
///          speed, altitude_agl, pitch, roll, heading_deg,
///          throttle, grounded, warning, camera
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[Snapshot]) -> io::Result<()> {
    writeln!(
        writer,
        "tick,time,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,\
         speed,altitude_agl,pitch,roll,heading_deg,\
         throttle,grounded,warning,camera"
    )?;

    for s in trajectory {
        writeln!(
            writer,
            "{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},\
             {:.4},{:.4},{:.5},{:.5},{:.2},\
             {:.3},{},{},{}",
            s.tick,
            s.time,
            s.position.x, s.position.y, s.position.z,
            s.velocity.x, s.velocity.y, s.velocity.z,
            s.speed,
            s.altitude_above_ground,
            s.orientation.pitch,
            s.orientation.roll,
            s.heading_degrees,
            s.throttle,
            u8::from(s.grounded),
            s.warning.label(),
            s.camera.index(),
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: impl AsRef<Path>, trajectory: &[Snapshot]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::SimConfig;
    use crate::sim::{Command, Session};
    use crate::vehicle::presets;

    #[test]
    fn csv_output_has_header_and_rows() {
        let mut session = Session::new(presets::runway(), &SimConfig::default());
        let mut traj = vec![session.snapshot()];
        session.handle(Command::ThrottleUp);
        traj.push(session.tick());

        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("tick,time,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0,0.0000,"));
        let columns = lines[0].split(',').count();
        assert!(lines.iter().all(|l| l.split(',').count() == columns));
    }

    #[test]
    fn file_writer_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flight.csv");
        let session = Session::new(presets::spaceship(), &SimConfig::default());
        write_trajectory_file(&path, &[session.snapshot()]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}

use std::io::{self, Write};

use crate::sim::Sample;

/// Write a run trace to CSV format.
///
/// Columns: tick, time, pitch_deg, roll_deg, heading_deg, mode, outcome, power
pub fn write_trace<W: Write>(writer: &mut W, samples: &[Sample]) -> io::Result<()> {
    writeln!(writer, "tick,time,pitch_deg,roll_deg,heading_deg,mode,outcome,power")?;

    for s in samples {
        writeln!(
            writer,
            "{},{:.4},{:.4},{:.4},{:.3},{},{},{:.3}",
            s.tick,
            s.time,
            s.pitch_deg,
            s.roll_deg,
            s.heading_deg,
            s.mode.as_str(),
            s.outcome.map_or("error", |o| o.as_str()),
            s.power,
        )?;
    }

    Ok(())
}

/// Write a run trace to a CSV file at the given path.
pub fn write_trace_file(path: &str, samples: &[Sample]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trace(&mut file, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Mode;
    use crate::ship::TickOutcome;

    #[test]
    fn csv_output_has_header_and_rows() {
        let row = |tick: u64, mode, outcome| Sample {
            tick,
            time: tick as f64 / 60.0,
            pitch_deg: -20.0,
            roll_deg: 0.0,
            heading_deg: 0.0,
            mode,
            outcome,
            power: 1.0,
        };
        let trace = vec![
            row(0, Mode::Aligning, Some(TickOutcome::Driving)),
            row(1, Mode::Aligning, None),
        ];

        let mut buf = Vec::new();
        write_trace(&mut buf, &trace).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("tick,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].ends_with("aligning,driving,1.000"));
        assert!(lines[2].contains(",error,"));
    }
}

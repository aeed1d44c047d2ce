use std::io::{self, Write};

use serde::Serialize;

use crate::control::Mode;
use crate::ship::TickOutcome;
use crate::sim::{Sample, Scenario};

/// Summary statistics computed from a run trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceSummary {
    pub ticks: usize,
    pub max_pitch_deg: f64, // largest |pitch|
    pub max_roll_deg: f64,  // largest |roll|
    #[serde(rename = "settle_time_s")]
    pub settle_time: Option<f64>, // first Aligning -> Settled, s
    pub driving_ticks: usize,
    pub failed_ticks: usize,
    pub final_pitch_deg: f64,
    pub final_roll_deg: f64,
    pub final_heading_deg: f64,
}

impl TraceSummary {
    /// Compute summary from trace data. `None` for an empty trace.
    pub fn from_trace(samples: &[Sample]) -> Option<Self> {
        let last = samples.last()?;

        let settle_time = samples
            .windows(2)
            .find(|w| w[0].mode == Mode::Aligning && w[1].mode == Mode::Settled)
            .map(|w| w[1].time);

        Some(TraceSummary {
            ticks: samples.len(),
            max_pitch_deg: samples.iter().map(|s| s.pitch_deg.abs()).fold(0.0_f64, f64::max),
            max_roll_deg: samples.iter().map(|s| s.roll_deg.abs()).fold(0.0_f64, f64::max),
            settle_time,
            driving_ticks: samples.iter().filter(|s| s.outcome == Some(TickOutcome::Driving)).count(),
            failed_ticks: samples.iter().filter(|s| s.outcome.is_none()).count(),
            final_pitch_deg: last.pitch_deg,
            final_roll_deg: last.roll_deg,
            final_heading_deg: last.heading_deg,
        })
    }
}

#[derive(Serialize)]
struct ScenarioHeader<'a> {
    name: &'a str,
    actuators: usize,
    dt_s: f64,
}

#[derive(Serialize)]
struct Report<'a> {
    scenario: ScenarioHeader<'a>,
    leveling: &'a TraceSummary,
}

/// Write a run summary as JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    scenario: &Scenario,
    summary: &TraceSummary,
) -> io::Result<()> {
    let report = Report {
        scenario: ScenarioHeader {
            name: &scenario.name,
            actuators: scenario.mounts.len(),
            dt_s: scenario.dt,
        },
        leveling: summary,
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}

/// Write a run summary JSON to a file.
pub fn write_summary_file(path: &str, scenario: &Scenario, summary: &TraceSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, scenario, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ScenarioBuilder;

    fn trace() -> Vec<Sample> {
        let s = |tick: u64, pitch_deg: f64, mode, outcome| Sample {
            tick,
            time: tick as f64 * 0.5,
            pitch_deg,
            roll_deg: 0.0,
            heading_deg: 0.0,
            mode,
            outcome,
            power: 1.0,
        };
        vec![
            s(0, -20.0, Mode::Aligning, Some(TickOutcome::Driving)),
            s(1, -5.0, Mode::Aligning, None),
            s(2, -0.5, Mode::Settled, Some(TickOutcome::Idle)),
        ]
    }

    #[test]
    fn summary_finds_settle_time() {
        let s = TraceSummary::from_trace(&trace()).unwrap();
        assert_eq!(s.settle_time, Some(1.0));
        assert_eq!(s.max_pitch_deg, 20.0);
        assert_eq!(s.driving_ticks, 1);
        assert_eq!(s.failed_ticks, 1);
        assert!(TraceSummary::from_trace(&[]).is_none());
    }

    #[test]
    fn json_output_is_valid() {
        let summary = TraceSummary::from_trace(&trace()).unwrap();
        let scenario = ScenarioBuilder::new(r#"Test "quoted" \ run"#).build();

        let mut buf = Vec::new();
        write_summary(&mut buf, &scenario, &summary).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["scenario"]["name"], r#"Test "quoted" \ run"#);
        assert_eq!(json["leveling"]["settle_time_s"], 1.0);
        assert_eq!(json["leveling"]["failed_ticks"], 1);
    }

    #[test]
    fn unsettled_run_writes_null() {
        let mut samples = trace();
        samples.truncate(2);
        let summary = TraceSummary::from_trace(&samples).unwrap();
        let mut buf = Vec::new();
        write_summary(&mut buf, &ScenarioBuilder::new("t").build(), &summary).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(json["leveling"]["settle_time_s"].is_null());
    }
}

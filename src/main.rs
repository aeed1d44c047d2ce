use std::env;
use std::fs;
use std::process::ExitCode;

use log::LevelFilter;

use gyro_leveler::config::ControlConfig;
use gyro_leveler::io::{csv, json};
use gyro_leveler::logger;
use gyro_leveler::sim::event::{default_detectors, detect, EventKind};
use gyro_leveler::sim::{self, presets, Sample, Scenario};

/// Usage: gyro-leveler [scenario] [trace.csv] [summary.json]
/// Log level comes from GYRO_LOG (error|warn|info|debug|trace), default warn.
/// GYRO_CONFIG may name a JSON file overriding control settings.
fn main() -> ExitCode {
    let level = env::var("GYRO_LOG")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(LevelFilter::Warn);
    if let Err(e) = logger::init(level) {
        eprintln!("logger: {}", e);
    }

    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = env::args().skip(1).collect();
    let scenarios: Vec<Scenario> = match args.first() {
        Some(name) => match presets::all().into_iter().find(|s| matches_name(s, name)) {
            Some(s) => vec![s],
            None => {
                eprintln!("unknown scenario '{}'; try one of:", name);
                for s in presets::all() {
                    eprintln!("  {}", slug(&s.name));
                }
                return ExitCode::FAILURE;
            }
        },
        None => presets::all(),
    };
    let csv_path = args.get(1);
    let json_path = args.get(2);

    println!();
    println!("====================================================================");
    println!("  GYRO LEVELER: closed-loop scenarios");
    println!("====================================================================");

    for scenario in &scenarios {
        let samples = match sim::run(scenario, config.clone()) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}: {}", scenario.name, e);
                return ExitCode::FAILURE;
            }
        };
        print_report(scenario, &samples);

        if let Some(path) = csv_path {
            if let Err(e) = csv::write_trace_file(path, &samples) {
                eprintln!("{}: {}", path, e);
                return ExitCode::FAILURE;
            }
            println!("  Trace written to {}", path);
        }
        if let (Some(path), Some(summary)) = (json_path, json::TraceSummary::from_trace(&samples)) {
            if let Err(e) = json::write_summary_file(path, scenario, &summary) {
                eprintln!("{}: {}", path, e);
                return ExitCode::FAILURE;
            }
            println!("  Summary written to {}", path);
        }
    }

    println!("====================================================================");
    println!();
    ExitCode::SUCCESS
}

fn load_config() -> Result<ControlConfig, String> {
    let Ok(path) = env::var("GYRO_CONFIG") else {
        return Ok(ControlConfig::default());
    };
    let text = fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
    ControlConfig::from_json(&text).map_err(|e| format!("{}: {}", path, e))
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn matches_name(scenario: &Scenario, name: &str) -> bool {
    slug(&scenario.name) == slug(name)
}

fn print_report(scenario: &Scenario, samples: &[Sample]) {
    println!();
    println!("  {}", scenario.name);
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Rudders:       {:>8}       Authority:    {:>8.2} rad/s",
        scenario.mounts.len(),
        scenario.authority
    );
    println!(
        "  Gravity:       {:>8.2} m/s^2 Speed:        {:>8.1} m/s",
        scenario.gravity.norm(),
        scenario.speed
    );

    if let Some(summary) = json::TraceSummary::from_trace(samples) {
        let settle = summary
            .settle_time
            .map_or_else(|| "-".to_string(), |t| format!("{:.2} s", t));
        println!(
            "  Max pitch:     {:>8.2}°      Max roll:     {:>8.2}°",
            summary.max_pitch_deg, summary.max_roll_deg
        );
        println!(
            "  Settled after: {:>8}       Driving:      {:>8} ticks",
            settle, summary.driving_ticks
        );
    }
    println!();

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for event in detect(samples, &mut default_detectors()) {
        let what = match event.kind {
            EventKind::ModeChange { from, to } => format!("{} -> {}", from.as_str(), to.as_str()),
            EventKind::Settled => "SETTLED".to_string(),
            EventKind::OutcomeChange { from, to } => format!(
                "{} -> {}",
                from.map_or("error", |o| o.as_str()),
                to.map_or("error", |o| o.as_str())
            ),
        };
        println!("  t={:>6.2}s  tick {:>5}  {}", event.time, event.tick, what);
    }
    println!();

    println!(
        "  {:>7}  {:>9}  {:>9}  {:>9}  {:>12}  {:>8}",
        "t (s)", "pitch(°)", "roll(°)", "head(°)", "mode", "power"
    );
    println!("  {}", "─".repeat(64));

    let interval = (samples.len() / 20).max(1);
    for (i, s) in samples.iter().enumerate() {
        if i % interval != 0 && i != samples.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>9.3}  {:>9.3}  {:>9.2}  {:>12}  {:>8.3}",
            s.time,
            s.pitch_deg,
            s.roll_deg,
            s.heading_deg,
            s.mode.as_str(),
            s.power
        );
    }
}

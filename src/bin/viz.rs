use eframe::egui;
use egui_plot::{Line, Plot};

use gyro_leveler::config::ControlConfig;
use gyro_leveler::control::Mode;
use gyro_leveler::io::json::TraceSummary;
use gyro_leveler::sim::{self, presets, Sample, Scenario};

fn main() -> eframe::Result {
    let runs: Vec<(Scenario, Vec<Sample>)> = presets::all()
        .into_iter()
        .filter_map(|s| {
            let samples = sim::run(&s, ControlConfig::default()).ok()?;
            Some((s, samples))
        })
        .collect();

    let app = LevelViz { runs, selected: 0 };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Gyro Leveler", options, Box::new(|_| Ok(Box::new(app))))
}

struct LevelViz {
    runs: Vec<(Scenario, Vec<Sample>)>,
    selected: usize,
}

fn mode_level(mode: Mode) -> f64 {
    match mode {
        Mode::Settled => 0.0,
        Mode::IdleCorrectPending => 1.0,
        Mode::Aligning => 2.0,
    }
}

fn series(samples: &[&Sample], f: impl Fn(&Sample) -> f64) -> Vec<[f64; 2]> {
    samples.iter().map(|s| [s.time, f(s)]).collect()
}

impl eframe::App for LevelViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let Some((scenario, trace)) = self.runs.get(self.selected) else {
            return;
        };
        let step = (trace.len() / 2000).max(1);
        let sampled: Vec<&Sample> = trace.iter().step_by(step).collect();
        let mut selected = self.selected;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (i, (s, _)) in self.runs.iter().enumerate() {
                    ui.selectable_value(&mut selected, i, &s.name);
                }
            });
            ui.heading(format!("Scenario: {}", scenario.name));
            if let Some(summary) = TraceSummary::from_trace(trace) {
                ui.label(format!(
                    "Max pitch: {:.1}°  |  Max roll: {:.1}°  |  Settled: {}  |  Heading: {:.1}°",
                    summary.max_pitch_deg,
                    summary.max_roll_deg,
                    summary.settle_time.map_or_else(|| "never".to_string(), |t| format!("{:.2} s", t)),
                    summary.final_heading_deg,
                ));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Pitch (deg)");
                    Plot::new("pitch")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Pitch", series(&sampled, |s| s.pitch_deg)));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Roll (deg)");
                    Plot::new("roll")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Roll", series(&sampled, |s| s.roll_deg)));
                        });
                });
            });

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Heading (deg, right positive)");
                    Plot::new("heading")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Heading", series(&sampled, |s| s.heading_deg)));
                        });
                });

                // 0 settled, 1 idle-pending, 2 aligning
                ui.vertical(|ui| {
                    ui.label("Correction mode / power");
                    Plot::new("mode")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Mode", series(&sampled, |s| mode_level(s.mode))));
                            plot_ui.line(Line::new("Power", series(&sampled, |s| s.power)));
                        });
                });
            });
        });

        self.selected = selected;
    }
}

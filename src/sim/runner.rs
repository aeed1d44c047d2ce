use std::sync::Arc;

use log::{debug, info};
use nalgebra::Vector3;
use thiserror::Error;

use crate::config::{ConfigHandle, ControlConfig};
use crate::control::{estimate, has_gravity, Mode};
use crate::error::ConfigError;
use crate::host::{LogNotifier, UniformGravity};
use crate::math::Orientation;
use crate::ship::{Fleet, TickOutcome};
use super::integrator::{actuator_rate, step};
use super::rig::SimRig;
use super::scenario::Scenario;

const SIM_VESSEL_ID: u64 = 1;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Ground truth and controller state at one tick, before integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub tick: u64,
    pub time: f64,        // s
    pub pitch_deg: f64,   // true pitch, nose up positive
    pub roll_deg: f64,    // true roll, left side down positive
    pub heading_deg: f64, // turned right of the initial heading
    pub mode: Mode,
    pub outcome: Option<TickOutcome>, // None if the tick failed
    pub power: f64,                   // highest actuator power
}

/// Down direction used for reporting; in zero gravity the world -Y stands in.
fn reference_down(gravity: &Vector3<f64>) -> Vector3<f64> {
    if has_gravity(gravity) {
        *gravity
    } else {
        -Vector3::y()
    }
}

fn heading_deg(initial: &Vector3<f64>, forward: &Vector3<f64>, down: &Vector3<f64>) -> f64 {
    let up = -down.normalize();
    let flat = |v: &Vector3<f64>| v - up * v.dot(&up);
    let (a, b) = (flat(initial), flat(forward));
    if a.norm() < 1e-9 || b.norm() < 1e-9 {
        return 0.0;
    }
    -a.cross(&b).dot(&up).atan2(a.dot(&b)).to_degrees()
}

// ---------------------------------------------------------------------------
// Closed-loop run: one simulated vessel inside a real Fleet
// ---------------------------------------------------------------------------

pub fn run(scenario: &Scenario, config: ControlConfig) -> Result<Vec<Sample>, SimError> {
    let handle = ConfigHandle::new(config)?;
    let rig = Arc::new(SimRig::new(SIM_VESSEL_ID, &scenario.name, &scenario.initial, &scenario.mounts));
    let mut fleet = Fleet::new(
        handle,
        Arc::clone(&rig) as _,
        Arc::new(UniformGravity(scenario.gravity)),
        Arc::new(LogNotifier),
    );
    fleet.attach(Arc::clone(rig.vessel()));
    info!("run '{}': {} ticks at dt={:.4}s", scenario.name, scenario.ticks, scenario.dt);

    let down = reference_down(&scenario.gravity);
    let initial_forward = scenario.initial.forward();
    let mut body: Orientation = scenario.initial;
    let mut samples = Vec::with_capacity(scenario.ticks as usize);

    for tick in 0..scenario.ticks {
        rig.sync(&body, body.forward() * scenario.speed, scenario.turn_at(tick));

        let outcome = fleet
            .tick()
            .into_iter()
            .find(|(id, _)| *id == SIM_VESSEL_ID)
            .map(|(_, o)| o);
        let mode = fleet.get(SIM_VESSEL_ID).map_or(Mode::Settled, |s| s.mode());

        let states = rig.actuator_states();
        let power = states.iter().map(|s| s.power).fold(0.0_f64, f64::max);
        let truth = estimate(&body.forward(), &body.left(), &down);

        samples.push(Sample {
            tick,
            time: tick as f64 * scenario.dt,
            pitch_deg: truth.pitch_deg(),
            roll_deg: truth.roll_deg(),
            heading_deg: heading_deg(&initial_forward, &body.forward(), &down),
            mode,
            outcome,
            power,
        });

        let rate = actuator_rate(&states, scenario.authority) + scenario.disturbance;
        body = step(&body, &rate, scenario.dt);
    }

    if let Some(last) = samples.last() {
        debug!(
            "run '{}' done: pitch {:.2}° roll {:.2}° heading {:.1}° ({})",
            scenario.name,
            last.pitch_deg,
            last.roll_deg,
            last.heading_deg,
            last.mode.as_str()
        );
    }
    Ok(samples)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::scenario::{presets, ScenarioBuilder};

    #[test]
    fn nose_down_converges_and_settles() {
        let samples = run(&presets::nose_down(), ControlConfig::default()).unwrap();
        let first = samples.first().unwrap();
        assert!((first.pitch_deg + 20.0).abs() < 1e-6);
        assert_eq!(first.mode, Mode::Aligning);
        assert_eq!(first.outcome, Some(TickOutcome::Driving));
        assert_eq!(first.power, 1.0);

        let last = samples.last().unwrap();
        assert!(last.pitch_deg.abs() < 0.8, "pitch {}", last.pitch_deg);
        assert_eq!(last.mode, Mode::Settled);
        assert_eq!(last.outcome, Some(TickOutcome::Idle));
        assert_eq!(last.power, 0.001);
    }

    #[test]
    fn level_start_stays_idle() {
        let s = ScenarioBuilder::new("level").ticks(120).build();
        let samples = run(&s, ControlConfig::default()).unwrap();
        assert!(samples.iter().all(|s| s.outcome == Some(TickOutcome::Idle)));
        assert!(samples.iter().all(|s| s.pitch_deg.abs() < 1e-9));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ControlConfig { max_pitch_deg: 500.0, ..Default::default() };
        let err = run(&presets::nose_down(), config).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn heading_sign_follows_right_turn() {
        let down = -Vector3::y();
        let fwd = Vector3::z();
        let right = fwd.cross(&Vector3::y());
        let turned = (fwd + right * 0.1).normalize();
        assert!(heading_deg(&fwd, &turned, &down) > 0.0);
    }
}

use nalgebra::Vector3;

use crate::math::Orientation;

/// Pilot turn input held over a tick window [start, end).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnInput {
    pub start: u64,
    pub end: u64,
    pub axis: f64, // -1..1, positive = right
}

impl TurnInput {
    pub fn at(&self, tick: u64) -> f64 {
        if tick >= self.start && tick < self.end {
            self.axis
        } else {
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario: one simulated vessel and what happens to it
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub initial: Orientation,      // body = seat frame at tick 0
    pub mounts: Vec<Orientation>,  // actuator frames relative to the body
    pub gravity: Vector3<f64>,     // m/s^2, uniform
    pub speed: f64,                // m/s along the body forward axis
    pub turn: Option<TurnInput>,
    pub disturbance: Vector3<f64>, // rad/s, world frame, always on
    pub authority: f64,            // rad/s per unit command at full power
    pub dt: f64,                   // s per tick
    pub ticks: u64,
}

impl Scenario {
    pub fn turn_at(&self, tick: u64) -> f64 {
        self.turn.map_or(0.0, |t| t.at(tick))
    }
}

pub struct ScenarioBuilder {
    scenario: Scenario,
}

impl ScenarioBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let level = Orientation::from_forward_up(Vector3::z(), Vector3::y()).unwrap_or_default();
        Self {
            scenario: Scenario {
                name: name.into(),
                initial: level,
                mounts: vec![Orientation::identity()],
                gravity: Vector3::new(0.0, -9.81, 0.0),
                speed: 0.0,
                turn: None,
                disturbance: Vector3::zeros(),
                authority: 4.0,
                dt: 1.0 / 60.0,
                ticks: 1200,
            },
        }
    }

    /// Start pitched by `deg` (positive = nose up).
    pub fn pitch_deg(mut self, deg: f64) -> Self {
        self.scenario.initial = self.scenario.initial.rotated_local(&Vector3::x(), deg.to_radians());
        self
    }

    /// Start banked by `deg` (positive = left side down).
    pub fn bank_deg(mut self, deg: f64) -> Self {
        self.scenario.initial = self.scenario.initial.rotated_local(&Vector3::z(), deg.to_radians());
        self
    }

    pub fn mounts(mut self, v: Vec<Orientation>) -> Self { self.scenario.mounts = v; self }
    pub fn gravity(mut self, v: Vector3<f64>) -> Self { self.scenario.gravity = v; self }
    pub fn speed(mut self, v: f64) -> Self { self.scenario.speed = v; self }
    pub fn turn(mut self, v: TurnInput) -> Self { self.scenario.turn = Some(v); self }
    pub fn disturbance(mut self, v: Vector3<f64>) -> Self { self.scenario.disturbance = v; self }
    pub fn authority(mut self, v: f64) -> Self { self.scenario.authority = v; self }
    pub fn dt(mut self, v: f64) -> Self { self.scenario.dt = v; self }
    pub fn ticks(mut self, v: u64) -> Self { self.scenario.ticks = v; self }

    pub fn build(self) -> Scenario {
        self.scenario
    }
}

// ---------------------------------------------------------------------------
// Preset scenarios
// ---------------------------------------------------------------------------

pub mod presets {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    /// Rudders in three different mounting orientations.
    fn mixed_mounts() -> Vec<Orientation> {
        let id = Orientation::identity();
        vec![
            id,
            id.rotated_local(&Vector3::x(), FRAC_PI_2),
            id.rotated_local(&Vector3::y(), -FRAC_PI_2).rotated_local(&Vector3::z(), 0.6),
        ]
    }

    /// 20° nose down, past the hard limit: aligns at once.
    pub fn nose_down() -> Scenario {
        ScenarioBuilder::new("Nose-down").pitch_deg(-20.0).build()
    }

    /// 12° bank with rudders mounted every which way.
    pub fn banked() -> Scenario {
        ScenarioBuilder::new("Banked").bank_deg(12.0).mounts(mixed_mounts()).build()
    }

    /// Small sustained roll drift: idle corrections after the window.
    pub fn crosswind() -> Scenario {
        ScenarioBuilder::new("Crosswind")
            .disturbance(Vector3::new(0.0, 0.0, 0.5_f64.to_radians()))
            .ticks(2400)
            .build()
    }

    /// Level cruise with a right turn held for one second.
    pub fn carving_turn() -> Scenario {
        ScenarioBuilder::new("Carving turn")
            .speed(20.0)
            .turn(TurnInput { start: 60, end: 120, axis: 1.0 })
            .ticks(600)
            .build()
    }

    /// Tilted in deep space: nothing to level against.
    pub fn deep_space() -> Scenario {
        ScenarioBuilder::new("Deep space")
            .pitch_deg(30.0)
            .gravity(Vector3::zeros())
            .ticks(300)
            .build()
    }

    pub fn all() -> Vec<Scenario> {
        vec![nose_down(), banked(), crosswind(), carving_turn(), deep_space()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_window_is_half_open() {
        let t = TurnInput { start: 10, end: 12, axis: -0.5 };
        assert_eq!(t.at(9), 0.0);
        assert_eq!(t.at(10), -0.5);
        assert_eq!(t.at(11), -0.5);
        assert_eq!(t.at(12), 0.0);
    }

    #[test]
    fn builder_pitch_is_nose_up_positive() {
        let s = ScenarioBuilder::new("t").pitch_deg(10.0).build();
        assert!(s.initial.forward().y > 0.0);
        assert_eq!(s.turn_at(0), 0.0);
    }
}

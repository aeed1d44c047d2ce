use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector3;

use crate::math::vector::{angle_between, direction_sign, projection};

// ---------------------------------------------------------------------------
// Attitude relative to local gravity
// ---------------------------------------------------------------------------

/// Pitch and roll error (rad) of a reference device against local "level".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attitude {
    pub pitch: f64, // rad, signed deviation of the forward axis from horizontal
    pub roll: f64,  // rad, counter-clockwise positive
}

impl Attitude {
    pub fn pitch_deg(&self) -> f64 {
        self.pitch.to_degrees()
    }

    pub fn roll_deg(&self) -> f64 {
        self.roll.to_degrees()
    }
}

/// True when the field is strong enough to define "down".
pub fn has_gravity(gravity: &Vector3<f64>) -> bool {
    gravity.norm_squared() != 0.0
}

/// Estimate pitch/roll from the reference device's forward/left axes.
///
/// Zero gravity gives `Attitude::default()`; callers must treat that as
/// "no correction possible" rather than "level".
pub fn estimate(forward: &Vector3<f64>, left: &Vector3<f64>, gravity: &Vector3<f64>) -> Attitude {
    if !has_gravity(gravity) {
        return Attitude::default();
    }
    let g = gravity.norm();

    let pitch = (gravity.dot(forward) / g).clamp(-1.0, 1.0).acos() - FRAC_PI_2;

    let planet_left = forward.cross(gravity);
    let roll = angle_between(left, &planet_left)
        * direction_sign(&projection(left, gravity), gravity);

    Attitude { pitch, roll }
}

/// Unsigned roll magnitude (before sign correction), rad in [0, π].
pub fn roll_magnitude(forward: &Vector3<f64>, left: &Vector3<f64>, gravity: &Vector3<f64>) -> f64 {
    if !has_gravity(gravity) {
        return 0.0;
    }
    angle_between(left, &forward.cross(gravity))
}

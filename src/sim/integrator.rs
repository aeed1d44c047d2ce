use nalgebra::Vector3;

use crate::math::Orientation;
use crate::vessel::ActuatorState;

// ---------------------------------------------------------------------------
// Body kinematics: actuator commands -> body rotation
// ---------------------------------------------------------------------------

/// World-frame angular rate the actuators impose on the body, rad/s.
///
/// Each engaged actuator spins the body about its own axes against the sign
/// of its commands, scaled by power; contributions are averaged so the
/// response does not depend on how many actuators are fitted.
pub fn actuator_rate(states: &[ActuatorState], authority: f64) -> Vector3<f64> {
    if states.is_empty() {
        return Vector3::zeros();
    }
    let sum: Vector3<f64> = states
        .iter()
        .filter(|s| s.override_enabled)
        .map(|s| s.orientation.to_world(&-s.command()) * s.power)
        .sum();
    sum * (authority / states.len() as f64)
}

/// Single step on the rotation group: apply rate * dt as a rotation vector.
pub fn step(body: &Orientation, rate: &Vector3<f64>, dt: f64) -> Orientation {
    body.rotated_world(&(rate * dt))
}

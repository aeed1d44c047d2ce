use std::sync::Arc;

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::math::Orientation;
use crate::vessel::Actuator;

// ---------------------------------------------------------------------------
// Torque allocation: reference frame -> world -> each actuator's frame
// ---------------------------------------------------------------------------

/// Authority while actively driving.
pub const FULL_POWER: f64 = 1.0;
/// Authority while idle. Not zero, so re-engaging responds at once.
pub const IDLE_POWER: f64 = 0.001;

/// Combined correction in the reference device's local frame.
///
/// Pitch and roll are negated: the actuators turn the body against the sign
/// of their pitch and roll inputs.
pub fn correction_vector(pitch: f64, yaw: f64, roll: f64) -> Vector3<f64> {
    Vector3::new(-pitch, yaw, -roll)
}

/// Express a reference-local vector in an actuator's local frame.
pub fn to_actuator_frame(
    reference: &Orientation,
    actuator: &Orientation,
    local: &Vector3<f64>,
) -> Vector3<f64> {
    actuator.to_local(&reference.to_world(local))
}

/// Fans a command out over one vessel's actuators. Actuators are
/// independent, so the fan-out runs on the rayon pool with no ordering;
/// the call returns once every actuator is written.
pub struct TorqueAllocator<'a> {
    actuators: &'a [Arc<Actuator>],
}

impl<'a> TorqueAllocator<'a> {
    pub fn new(actuators: &'a [Arc<Actuator>]) -> Self {
        Self { actuators }
    }

    pub fn len(&self) -> usize {
        self.actuators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actuators.is_empty()
    }

    /// Write `local` (reference frame) to every actuator at `power`,
    /// engaging override.
    pub fn drive(&self, reference: &Orientation, local: &Vector3<f64>, power: f64) {
        let world = reference.to_world(local);
        self.actuators.par_iter().for_each(|a| {
            a.command_world(&world, power);
        });
    }

    /// Release override on every actuator (commands are left as they were).
    pub fn disengage(&self) {
        self.actuators.par_iter().for_each(|a| a.set_override(false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vessel::ActuatorClass;

    fn actuators(orientations: &[Orientation]) -> Vec<Arc<Actuator>> {
        orientations
            .iter()
            .enumerate()
            .map(|(i, o)| Arc::new(Actuator::new(i as u64, "rudder", ActuatorClass::Dedicated, *o)))
            .collect()
    }

    #[test]
    fn identity_frames_pass_through() {
        let v = Vector3::new(0.3, -0.1, 0.05);
        let id = Orientation::identity();
        assert_eq!(to_actuator_frame(&id, &id, &v), v);

        let set = actuators(&[id]);
        TorqueAllocator::new(&set).drive(&id, &v, FULL_POWER);
        let s = set[0].state();
        assert_eq!(s.command(), v);
        assert!(s.override_enabled);
        assert_eq!(s.power, FULL_POWER);
    }

    #[test]
    fn same_world_rotation_for_every_mounting() {
        let reference = Orientation::identity().rotated_local(&Vector3::y(), 0.7);
        let mounts = [
            Orientation::identity(),
            Orientation::identity().rotated_local(&Vector3::x(), std::f64::consts::FRAC_PI_2),
            Orientation::identity().rotated_local(&Vector3::z(), 2.0),
            reference,
        ];
        let set = actuators(&mounts);
        let local = correction_vector(0.2, 0.1, -0.4);
        TorqueAllocator::new(&set).drive(&reference, &local, FULL_POWER);

        let expected_world = reference.to_world(&local);
        for (a, mount) in set.iter().zip(mounts.iter()) {
            let s = a.state();
            let world = mount.to_world(&s.command());
            assert!((world - expected_world).norm() < 1e-12);
        }
        // Actuator mounted like the reference sees the local vector itself
        assert!((set[3].state().command() - local).norm() < 1e-12);
    }

    #[test]
    fn correction_vector_signs() {
        assert_eq!(correction_vector(1.0, 2.0, 3.0), Vector3::new(-1.0, 2.0, -3.0));
    }

    #[test]
    fn disengage_clears_override_only() {
        let id = Orientation::identity();
        let set = actuators(&[id, id]);
        let alloc = TorqueAllocator::new(&set);
        alloc.drive(&id, &Vector3::x(), FULL_POWER);
        alloc.disengage();
        for a in &set {
            let s = a.state();
            assert!(!s.override_enabled);
            assert_eq!(s.pitch, 1.0);
        }
    }

    #[test]
    fn poisoned_actuator_does_not_block_the_rest() {
        let id = Orientation::identity();
        let set = actuators(&[id, id, id, id]);
        set[0].poison();
        TorqueAllocator::new(&set).drive(&id, &Vector3::new(0.2, 0.0, 0.0), FULL_POWER);
        for a in &set {
            let s = a.state();
            assert!(s.override_enabled);
            assert_eq!(s.pitch, 0.2);
            assert_eq!(s.power, FULL_POWER);
        }
    }
}

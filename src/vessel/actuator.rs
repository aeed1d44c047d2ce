use std::sync::{Mutex, MutexGuard};

use log::warn;
use nalgebra::Vector3;

use crate::math::Orientation;

pub type ActuatorId = u64;

/// How the discovery collaborator tagged a torque device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorClass {
    /// Purpose-built rudder: always used.
    Dedicated,
    /// Generic gyro tagged for rudder duty: used only with relaxed matching.
    Relaxed,
    /// Never used by the leveler.
    Ineligible,
}

/// Mutable actuator state: host-written orientation plus the commands the
/// leveler writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorState {
    pub orientation: Orientation, // world-from-local
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub override_enabled: bool,
    pub power: f64, // authority, 0..1
}

impl ActuatorState {
    pub fn command(&self) -> Vector3<f64> {
        Vector3::new(self.pitch, self.yaw, self.roll)
    }
}

/// A torque-producing device.
///
/// The mutex is per actuator: it keeps this subsystem's writes from
/// interleaving with other writers of the same device (the host, or other
/// subsystems on their own ticks). It does not serialize the fan-out across
/// different actuators. A writer that panicked under the lock cannot leave
/// the state torn (every field is a plain copy), so the lock is recovered
/// and the actuator stays in service.
#[derive(Debug)]
pub struct Actuator {
    id: ActuatorId,
    name: String,
    class: ActuatorClass,
    state: Mutex<ActuatorState>,
}

impl Actuator {
    pub fn new(id: ActuatorId, name: impl Into<String>, class: ActuatorClass, orientation: Orientation) -> Self {
        Self {
            id,
            name: name.into(),
            class,
            state: Mutex::new(ActuatorState {
                orientation,
                pitch: 0.0,
                yaw: 0.0,
                roll: 0.0,
                override_enabled: false,
                power: 1.0,
            }),
        }
    }

    pub fn id(&self) -> ActuatorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> ActuatorClass {
        self.class
    }

    pub fn is_eligible(&self, allow_relaxed: bool) -> bool {
        match self.class {
            ActuatorClass::Dedicated => true,
            ActuatorClass::Relaxed => allow_relaxed,
            ActuatorClass::Ineligible => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ActuatorState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("actuator {} ({}): recovered lock from a panicked writer", self.id, self.name);
            self.state.clear_poison();
            poisoned.into_inner()
        })
    }

    /// Copy of the current state.
    pub fn state(&self) -> ActuatorState {
        *self.lock()
    }

    pub fn set_orientation(&self, orientation: Orientation) {
        self.lock().orientation = orientation;
    }

    /// Take a world-space rotation command, express it in this actuator's
    /// own frame, write it and engage override. Orientation read and command
    /// write happen under one lock.
    pub fn command_world(&self, world: &Vector3<f64>, power: f64) -> Vector3<f64> {
        let mut s = self.lock();
        let local = s.orientation.to_local(world);
        s.pitch = local.x;
        s.yaw = local.y;
        s.roll = local.z;
        s.override_enabled = true;
        s.power = power;
        local
    }

    pub fn set_override(&self, enabled: bool) {
        self.lock().override_enabled = enabled;
    }

    /// Simulate a writer that panicked while holding this actuator's lock.
    #[cfg(test)]
    pub(crate) fn poison(self: &std::sync::Arc<Self>) {
        let this = std::sync::Arc::clone(self);
        let _ = std::thread::spawn(move || {
            let _guard = this.state.lock();
            panic!("writer died holding the lock");
        })
        .join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligibility_follows_class() {
        let o = Orientation::identity();
        let d = Actuator::new(1, "rudder", ActuatorClass::Dedicated, o);
        let r = Actuator::new(2, "gyro (rudder)", ActuatorClass::Relaxed, o);
        let n = Actuator::new(3, "gyro", ActuatorClass::Ineligible, o);
        assert!(d.is_eligible(false) && d.is_eligible(true));
        assert!(!r.is_eligible(false) && r.is_eligible(true));
        assert!(!n.is_eligible(false) && !n.is_eligible(true));
    }

    #[test]
    fn command_in_identity_frame_is_unchanged() {
        let a = Actuator::new(1, "a", ActuatorClass::Dedicated, Orientation::identity());
        let v = Vector3::new(0.1, -0.2, 0.3);
        a.command_world(&v, 1.0);
        let s = a.state();
        assert_eq!(s.command(), v);
        assert!(s.override_enabled);
        assert_eq!(s.power, 1.0);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let a = std::sync::Arc::new(Actuator::new(9, "a", ActuatorClass::Dedicated, Orientation::identity()));
        a.poison();
        assert!(a.state.is_poisoned());
        a.command_world(&Vector3::x(), 0.5);
        assert!(!a.state.is_poisoned());
        let s = a.state();
        assert_eq!(s.pitch, 1.0);
        assert!(s.override_enabled);
        assert_eq!(s.power, 0.5);
    }
}

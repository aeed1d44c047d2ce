use std::sync::Mutex;

use nalgebra::Vector3;

use crate::error::ControlError;
use crate::math::Orientation;

pub type SeatId = u64;

/// Instantaneous host-supplied state of a seat/cockpit-like device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatReading {
    pub orientation: Orientation,
    pub position: Vector3<f64>,        // m, world
    pub linear_velocity: Vector3<f64>, // m/s, world (vessel velocity)
    pub move_indicator: Vector3<f64>,  // pilot input; x is the turn axis
    pub under_control: bool,
    pub can_control: bool,
}

impl Default for SeatReading {
    fn default() -> Self {
        Self {
            orientation: Orientation::identity(),
            position: Vector3::zeros(),
            linear_velocity: Vector3::zeros(),
            move_indicator: Vector3::zeros(),
            under_control: false,
            can_control: true,
        }
    }
}

/// A device capable of controlling the vessel.
#[derive(Debug)]
pub struct ControlSeat {
    id: SeatId,
    name: String,
    reading: Mutex<SeatReading>,
}

impl ControlSeat {
    pub fn new(id: SeatId, name: impl Into<String>, reading: SeatReading) -> Self {
        Self { id, name: name.into(), reading: Mutex::new(reading) }
    }

    pub fn id(&self) -> SeatId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reading(&self) -> Result<SeatReading, ControlError> {
        self.reading
            .lock()
            .map(|r| *r)
            .map_err(|_| ControlError::SeatPoisoned(self.id))
    }

    /// Host-side mutation of the live reading. A reading left poisoned by a
    /// panicked writer is unreadable until the next update completes.
    pub fn update(&self, f: impl FnOnce(&mut SeatReading)) {
        let mut r = self.reading.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut r);
        self.reading.clear_poison();
    }

    pub fn can_control(&self) -> bool {
        self.reading().map(|r| r.can_control).unwrap_or(false)
    }

    /// Simulate a host writer that panicked halfway through an update.
    #[cfg(test)]
    pub(crate) fn poison(self: &std::sync::Arc<Self>) {
        let this = std::sync::Arc::clone(self);
        let _ = std::thread::spawn(move || {
            this.update(|r| {
                r.under_control = false;
                panic!("host writer died mid-update");
            });
        })
        .join();
    }
}

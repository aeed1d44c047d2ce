use std::sync::Arc;

use nalgebra::Vector3;

use crate::error::DiscoveryError;
use crate::host::DeviceDiscovery;
use crate::math::Orientation;
use crate::vessel::{Actuator, ActuatorClass, ActuatorState, ControlSeat, Device, SeatReading, Vessel};

// ---------------------------------------------------------------------------
// Simulated host vessel: one seat, N mounted actuators
// ---------------------------------------------------------------------------

/// Plays the host side for one simulated vessel: owns the devices, pushes
/// body state into them each tick, and answers discovery.
pub struct SimRig {
    vessel: Arc<Vessel>,
    seat: Arc<ControlSeat>,
    actuators: Vec<Arc<Actuator>>,
    mounts: Vec<Orientation>, // actuator frames relative to the body
}

impl SimRig {
    pub fn new(id: u64, name: &str, body: &Orientation, mounts: &[Orientation]) -> Self {
        let seat = ControlSeat::new(
            id * 1000,
            "cockpit",
            SeatReading { orientation: *body, under_control: true, ..Default::default() },
        );
        let actuators = mounts
            .iter()
            .enumerate()
            .map(|(i, m)| {
                Arc::new(Actuator::new(
                    id * 1000 + 1 + i as u64,
                    format!("rudder {}", i + 1),
                    ActuatorClass::Dedicated,
                    body.mounted(m),
                ))
            })
            .collect();
        Self {
            vessel: Arc::new(Vessel::new(id, name)),
            seat: Arc::new(seat),
            actuators,
            mounts: mounts.to_vec(),
        }
    }

    pub fn vessel(&self) -> &Arc<Vessel> {
        &self.vessel
    }

    pub fn seat(&self) -> &Arc<ControlSeat> {
        &self.seat
    }

    pub fn actuators(&self) -> &[Arc<Actuator>] {
        &self.actuators
    }

    /// Push the body's current state into every device.
    pub fn sync(&self, body: &Orientation, velocity: Vector3<f64>, turn: f64) {
        self.seat.update(|r| {
            r.orientation = *body;
            r.linear_velocity = velocity;
            r.move_indicator = Vector3::new(turn, 0.0, 0.0);
        });
        for (actuator, mount) in self.actuators.iter().zip(&self.mounts) {
            actuator.set_orientation(body.mounted(mount));
        }
    }

    pub fn actuator_states(&self) -> Vec<ActuatorState> {
        self.actuators.iter().map(|a| a.state()).collect()
    }
}

impl DeviceDiscovery for SimRig {
    fn discover(&self, vessel: &Vessel) -> Result<Vec<Device>, DiscoveryError> {
        if vessel.id() != self.vessel.id() {
            return Err(DiscoveryError::Unavailable(format!("unknown vessel {}", vessel.id())));
        }
        let mut devices = Vec::with_capacity(self.actuators.len() + 2);
        devices.push(Device::Seat(Arc::clone(&self.seat)));
        devices.extend(self.actuators.iter().cloned().map(Device::Actuator));
        devices.push(Device::Other);
        Ok(devices)
    }
}

use std::sync::Arc;

use rayon::iter::Either;
use rayon::prelude::*;

use crate::error::DiscoveryError;
use super::actuator::Actuator;
use super::seat::ControlSeat;

/// One block reported by the discovery collaborator, already tagged.
#[derive(Debug, Clone)]
pub enum Device {
    Actuator(Arc<Actuator>),
    Seat(Arc<ControlSeat>),
    Other,
}

// ---------------------------------------------------------------------------
// DeviceSet: immutable result of one discovery pass
// ---------------------------------------------------------------------------

/// Eligible actuators and control-capable seats of one vessel.
/// Built once per discovery pass and then only read.
#[derive(Debug, Clone, Default)]
pub struct DeviceSet {
    actuators: Vec<Arc<Actuator>>,
    seats: Vec<Arc<ControlSeat>>,
}

impl DeviceSet {
    pub fn new(actuators: Vec<Arc<Actuator>>, seats: Vec<Arc<ControlSeat>>) -> Self {
        Self { actuators, seats }
    }

    /// Split raw devices into the two typed collections, in parallel.
    /// Discovery order is kept within each collection.
    pub fn classify(devices: Vec<Device>, allow_relaxed: bool) -> Result<Self, DiscoveryError> {
        let (actuators, seats): (Vec<_>, Vec<_>) = devices
            .into_par_iter()
            .filter_map(|device| match device {
                Device::Actuator(a) if a.is_eligible(allow_relaxed) => Some(Either::Left(a)),
                Device::Seat(s) if s.can_control() => Some(Either::Right(s)),
                _ => None,
            })
            .partition_map(|e| e);

        if seats.is_empty() {
            return Err(DiscoveryError::NoControllers);
        }
        if actuators.is_empty() {
            return Err(DiscoveryError::NoActuators);
        }
        Ok(Self { actuators, seats })
    }

    pub fn actuators(&self) -> &[Arc<Actuator>] {
        &self.actuators
    }

    pub fn seats(&self) -> &[Arc<ControlSeat>] {
        &self.seats
    }

    pub fn is_empty(&self) -> bool {
        self.actuators.is_empty() && self.seats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Orientation;
    use crate::vessel::{ActuatorClass, SeatReading};

    fn actuator(id: u64, class: ActuatorClass) -> Device {
        Device::Actuator(Arc::new(Actuator::new(id, format!("gyro {}", id), class, Orientation::identity())))
    }

    fn seat(id: u64, can_control: bool) -> Device {
        let reading = SeatReading { can_control, ..Default::default() };
        Device::Seat(Arc::new(ControlSeat::new(id, format!("seat {}", id), reading)))
    }

    #[test]
    fn classify_splits_and_filters() {
        let devices = vec![
            actuator(1, ActuatorClass::Dedicated),
            Device::Other,
            seat(10, true),
            actuator(2, ActuatorClass::Relaxed),
            actuator(3, ActuatorClass::Ineligible),
            seat(11, false),
            seat(12, true),
        ];
        let set = DeviceSet::classify(devices.clone(), true).unwrap();
        let ids: Vec<u64> = set.actuators().iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec![1, 2]);
        let seats: Vec<u64> = set.seats().iter().map(|s| s.id()).collect();
        assert_eq!(seats, vec![10, 12]);

        let strict = DeviceSet::classify(devices, false).unwrap();
        assert_eq!(strict.actuators().len(), 1);
    }

    #[test]
    fn classify_keeps_discovery_order() {
        let devices: Vec<Device> = (0..500)
            .map(|i| if i % 7 == 0 { seat(i, true) } else { actuator(i, ActuatorClass::Dedicated) })
            .collect();
        let set = DeviceSet::classify(devices, false).unwrap();
        let ids: Vec<u64> = set.actuators().iter().map(|a| a.id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn missing_side_is_an_error() {
        let no_seat = vec![actuator(1, ActuatorClass::Dedicated), seat(2, false)];
        assert_eq!(DeviceSet::classify(no_seat, true).unwrap_err(), DiscoveryError::NoControllers);

        let no_actuator = vec![seat(1, true), actuator(2, ActuatorClass::Relaxed)];
        assert_eq!(DeviceSet::classify(no_actuator, false).unwrap_err(), DiscoveryError::NoActuators);
    }
}

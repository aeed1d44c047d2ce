pub mod actuator;
pub mod body;
pub mod device;
pub mod seat;

pub use actuator::{Actuator, ActuatorClass, ActuatorId, ActuatorState};
pub use body::{Vessel, VesselId};
pub use device::{Device, DeviceSet};
pub use seat::{ControlSeat, SeatId, SeatReading};

use thiserror::Error;

use crate::vessel::SeatId;

/// Transient discovery failures. Never fatal: the vessel stays "not ready"
/// and discovery is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiscoveryError {
    #[error("Device enumeration unavailable: {0}")]
    Unavailable(String),
    #[error("No control-capable seat found")]
    NoControllers,
    #[error("No eligible actuator found")]
    NoActuators,
}

/// Unexpected failures inside one control tick.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    #[error("Seat {0} lock poisoned")]
    SeatPoisoned(SeatId),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange { name: &'static str, value: f64, min: f64, max: f64 },
    #[error("Malformed config: {0}")]
    Parse(String),
}

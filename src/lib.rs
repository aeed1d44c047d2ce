pub mod config;
pub mod control;
pub mod error;
pub mod host;
pub mod io;
pub mod logger;
pub mod math;
pub mod ship;
pub mod sim;
pub mod snapshot;
pub mod vessel;

pub use config::{ConfigHandle, ControlConfig};
pub use error::{ConfigError, ControlError, DiscoveryError};
pub use host::{DeviceDiscovery, GravityField, Notifier, Severity};
pub use ship::{Fleet, ShipController, TickContext, TickOutcome};

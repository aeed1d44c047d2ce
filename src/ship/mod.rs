pub mod controller;
pub mod fleet;

pub use controller::{ShipController, TickContext, TickOutcome, DISCOVERY_PERIOD_TICKS};
pub use fleet::Fleet;

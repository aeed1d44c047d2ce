pub mod event;
pub mod integrator;
pub mod rig;
pub mod runner;
pub mod scenario;

pub use rig::SimRig;
pub use runner::{run, Sample, SimError};
pub use scenario::{presets, Scenario, ScenarioBuilder, TurnInput};

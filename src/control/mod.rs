pub mod allocator;
pub mod attitude;
pub mod correction;
pub mod pid;
pub mod shaping;

pub use allocator::{correction_vector, TorqueAllocator, FULL_POWER, IDLE_POWER};
pub use attitude::{estimate, has_gravity, Attitude};
pub use correction::{CorrectionState, HardLimits, Mode, Thresholds};
pub use pid::Pid;
pub use shaping::{easing_gain, forward_speed, yaw_command};

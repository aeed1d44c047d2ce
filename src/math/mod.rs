pub mod frame;
pub mod vector;

pub use frame::Orientation;
pub use vector::{angle_between, direction_sign, projection, soft_clamp};

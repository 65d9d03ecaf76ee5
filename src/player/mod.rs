//! Player module - components, the character motor and its systems

mod components;
mod motor;
mod physics;

pub use components::*;
pub use motor::{MotorEvent, MotorFrame};
pub use physics::*;

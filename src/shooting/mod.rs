//! Shooting module - charge state and the shooting system

mod charge;
mod throw;

pub use charge::*;
pub use throw::*;

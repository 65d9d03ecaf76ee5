//! Ball module - components, physics, and interaction systems

mod components;
mod interaction;
mod physics;

pub use components::*;
pub use interaction::*;
pub use physics::*;

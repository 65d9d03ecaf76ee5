//! Gameplay events
//!
//! The EventBus carries typed events between systems in place of named
//! messages. The EventLogger persists them for later analysis.

mod bus;
mod logger;
mod types;

pub use bus::{BusEvent, EventBus, TickCounter, begin_tick};
pub use logger::{EventLogConfig, EventLogger};
pub use types::{GameEvent, RoundOutcome};

//! Headless simulation - plugin, app builder and tick stepping

mod app_builder;
mod plugin;

pub use app_builder::{HeadlessAppBuilder, elapsed, run_ticks, step, validate_scene};
pub use plugin::{PitballPlugin, TickSet};

//! Pitball - a two-player ball game core built on Bevy
//!
//! Headless gameplay: ball physics, the character motor, shooting, scoring and
//! the round state machine, all stepped on the fixed clock. The crate provides
//! the components, resources and systems organized into modules, plus the
//! scenario tooling used to test them.

// Core modules
pub mod constants;
pub mod error;
pub mod events;
pub mod helpers;
pub mod simulation;
pub mod testing;
pub mod tuning;

// Game logic modules
pub mod ball;
pub mod input;
pub mod player;
pub mod scoring;
pub mod shooting;
pub mod world;

// Re-export commonly used types for convenience
pub use ball::{Ball, BallBody, BallState, LastShooter, ShotGrace};
pub use constants::*;
pub use error::SetupError;
pub use events::{BusEvent, EventBus, EventLogConfig, EventLogger, GameEvent, RoundOutcome};
pub use input::{InputConfig, InputSampler, KeyBindings};
pub use player::{CharacterMotor, ControlsEnabled, MotorInput, Player, PlayerSlot, SpawnPoint};
pub use scoring::{GameState, RoundControl, RoundPhase, Scores};
pub use shooting::ShootingState;
pub use simulation::{HeadlessAppBuilder, PitballPlugin, TickSet};
pub use tuning::{GameplayTuning, load_global_tuning};
pub use world::{ArenaResolver, Collider, MoveResolver, Net};

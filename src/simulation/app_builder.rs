//! Headless App Builder
//!
//! Builds a headless Bevy app with the arena, both players and the ball
//! spawned, ready to be stepped tick by tick. Used by the headless binary,
//! the scenario runner and the integration tests.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::time::Duration;

use crate::ball::{Ball, spawn_ball};
use crate::error::SetupError;
use crate::player::{Player, PlayerSlot, spawn_player};
use crate::scoring::RoundControl;
use crate::simulation::PitballPlugin;
use crate::tuning::{GameplayTuning, load_global_tuning};
use crate::world::{Net, spawn_arena};

/// Builder for creating headless Bevy apps
pub struct HeadlessAppBuilder {
    tuning: GameplayTuning,
    /// When set, tuning is loaded from this file at build time
    config_file: Option<String>,
    minimal_threads: bool,
    start_game: bool,
    logging: bool,
}

impl HeadlessAppBuilder {
    /// Create a new builder with default tuning
    pub fn new() -> Self {
        Self {
            tuning: GameplayTuning::default(),
            config_file: None,
            minimal_threads: false,
            start_game: false,
            logging: false,
        }
    }

    pub fn with_tuning(mut self, tuning: GameplayTuning) -> Self {
        self.tuning = tuning;
        self.config_file = None;
        self
    }

    /// Load tuning from a JSON file; a missing file falls back to defaults
    pub fn with_config_file(mut self, path: impl Into<String>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Install Bevy's LogPlugin so info!/warn! reach the terminal
    pub fn with_logging(mut self) -> Self {
        self.logging = true;
        self
    }

    /// Request a new game so the first tick opens the round
    pub fn with_new_game(mut self) -> Self {
        self.start_game = true;
        self
    }

    /// Enable minimal thread mode (task pools = 1)
    ///
    /// Use this when running many apps side by side to stay under OS thread limits.
    pub fn with_minimal_threads(mut self) -> Self {
        self.minimal_threads = true;
        self
    }

    /// Build the app: plugins, resources, arena, players and ball
    pub fn build(self) -> Result<App, SetupError> {
        let mut app = App::new();

        if self.minimal_threads {
            app.add_plugins(MinimalPlugins.set(TaskPoolPlugin {
                task_pool_options: TaskPoolOptions::with_num_threads(1),
            }));
        } else {
            app.add_plugins(MinimalPlugins);
        }
        if self.logging {
            app.add_plugins(LogPlugin::default());
        }

        // After the LogPlugin so config diagnostics are visible
        let tuning = match &self.config_file {
            Some(path) => load_global_tuning(path)?,
            None => self.tuning,
        };
        tuning.validate()?;

        let layout = tuning.arena.clone();
        app.add_plugins(PitballPlugin { tuning });

        let world = app.world_mut();
        {
            let mut commands = world.commands();
            spawn_arena(&mut commands, &layout);
            spawn_player(&mut commands, PlayerSlot::One, layout.player1_spawn);
            spawn_player(&mut commands, PlayerSlot::Two, layout.player2_spawn);
            spawn_ball(&mut commands, layout.ball_drop_point);
        }
        world.flush();

        validate_scene(app.world_mut())?;

        if self.start_game {
            app.world_mut()
                .resource_mut::<RoundControl>()
                .request_new_game();
        }

        app.finish();
        app.cleanup();
        Ok(app)
    }
}

impl Default for HeadlessAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Every player slot, every net and the ball must be present
pub fn validate_scene(world: &mut World) -> Result<(), SetupError> {
    let players: Vec<PlayerSlot> = world
        .query_filtered::<&PlayerSlot, With<Player>>()
        .iter(world)
        .copied()
        .collect();
    let nets: Vec<PlayerSlot> = world.query::<&Net>().iter(world).map(|n| n.player).collect();

    for slot in PlayerSlot::ALL {
        if !players.contains(&slot) {
            return Err(SetupError::MissingPlayer(slot));
        }
        if !nets.contains(&slot) {
            return Err(SetupError::MissingNet(slot));
        }
    }

    if world
        .query_filtered::<(), With<Ball>>()
        .iter(world)
        .next()
        .is_none()
    {
        return Err(SetupError::MissingBall);
    }
    Ok(())
}

/// Advance the fixed clock by one timestep and run one fixed tick
pub fn step(app: &mut App) {
    let dt = app.world().resource::<Time<Fixed>>().timestep();
    let world = app.world_mut();
    world.resource_mut::<Time<Fixed>>().advance_by(dt);
    world.run_schedule(FixedUpdate);
}

/// Run `ticks` fixed ticks
pub fn run_ticks(app: &mut App, ticks: u64) {
    for _ in 0..ticks {
        step(app);
    }
}

/// Fixed-clock time elapsed so far
pub fn elapsed(app: &App) -> Duration {
    app.world().resource::<Time<Fixed>>().elapsed()
}

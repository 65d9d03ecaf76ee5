//! Gameplay plugin: resources and the fixed-step system order

use bevy::prelude::*;

use crate::ball::{ball_collisions, ball_follow_attachment, integrate_balls, pickup_ball};
use crate::events::{EventBus, TickCounter, begin_tick};
use crate::input::{KeyBindings, capture_keyboard_input};
use crate::player::drive_motors;
use crate::scoring::{
    GameState, RoundControl, check_goals, check_hits, start_requested_game, update_round,
};
use crate::shooting::update_shooting;
use crate::tuning::GameplayTuning;

/// Stages of one fixed tick, run in this order
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Tick counter, new-game requests
    Begin,
    /// Scripted or captured input lands in MotorInput
    Input,
    /// Character motors, shooting, pickup
    Players,
    /// Ball integration, collisions, attachment
    Ball,
    /// Hit and goal triggers, round clock, serves
    Scoring,
}

/// Registers every gameplay system with the given tuning
pub struct PitballPlugin {
    pub tuning: GameplayTuning,
}

impl Plugin for PitballPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_seconds(
            self.tuning.fixed_timestep as f64,
        ))
        .insert_resource(self.tuning.clone())
        .insert_resource(GameState::new(self.tuning.rules.clone()))
        .insert_resource(EventBus::new())
        .init_resource::<TickCounter>()
        .init_resource::<RoundControl>()
        .init_resource::<KeyBindings>();

        app.configure_sets(
            FixedUpdate,
            (
                TickSet::Begin,
                TickSet::Input,
                TickSet::Players,
                TickSet::Ball,
                TickSet::Scoring,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                (begin_tick, start_requested_game)
                    .chain()
                    .in_set(TickSet::Begin),
                (drive_motors, update_shooting, pickup_ball)
                    .chain()
                    .in_set(TickSet::Players),
                (integrate_balls, ball_collisions, ball_follow_attachment)
                    .chain()
                    .in_set(TickSet::Ball),
                (check_hits, check_goals, update_round)
                    .chain()
                    .in_set(TickSet::Scoring),
            ),
        );

        // Only when an input plugin provides keyboard state
        app.add_systems(
            Update,
            capture_keyboard_input.run_if(resource_exists::<ButtonInput<KeyCode>>),
        );
    }
}

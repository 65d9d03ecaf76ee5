//! Player spawning and the motor system

use bevy::prelude::*;

use crate::events::{EventBus, GameEvent};
use crate::helpers::facing_rotation;
use crate::input::InputConfig;
use crate::player::components::*;
use crate::player::motor::{MotorEvent, MotorFrame};
use crate::shooting::ShootingState;
use crate::tuning::GameplayTuning;
use crate::world::{ArenaResolver, Collider, collect_colliders};

/// Direction each player faces at kickoff: towards the net it scores on
pub fn kickoff_facing(slot: PlayerSlot) -> Quat {
    let towards = match slot {
        PlayerSlot::One => Vec3::X,
        PlayerSlot::Two => Vec3::NEG_X,
    };
    facing_rotation(towards).unwrap_or_default()
}

/// Spawn a player at `position`, recording it as the spawn point
pub fn spawn_player(commands: &mut Commands, slot: PlayerSlot, position: Vec3) -> Entity {
    commands
        .spawn((
            Name::new(slot.to_string()),
            Player,
            slot,
            Transform::from_translation(position).with_rotation(kickoff_facing(slot)),
            SpawnPoint(position),
            InputConfig::for_player(slot),
            MotorInput::default(),
            ControlsEnabled::default(),
            CharacterMotor::default(),
            ShootingState::default(),
        ))
        .id()
}

/// Runs in FixedUpdate: one motor tick per player
pub fn drive_motors(
    tuning: Res<GameplayTuning>,
    time: Res<Time<Fixed>>,
    mut bus: ResMut<EventBus>,
    colliders: Query<(&Collider, &Transform), Without<Player>>,
    mut players: Query<
        (
            &PlayerSlot,
            &MotorInput,
            &ControlsEnabled,
            &mut CharacterMotor,
            &mut Transform,
        ),
        With<Player>,
    >,
) {
    let boxes = collect_colliders(colliders.iter());

    for (&slot, input, controls, mut motor, mut transform) in &mut players {
        // Disabled players keep falling and landing but ignore input
        let input = if controls.0 {
            *input
        } else {
            MotorInput::default()
        };

        if let Some(rotation) = facing_rotation(input.direction) {
            transform.rotation = rotation;
        }

        let frame = MotorFrame {
            now: time.elapsed_secs(),
            dt: time.delta_secs(),
            rotation: transform.rotation,
        };
        let mut resolver = ArenaResolver::new(&boxes, tuning.motor.half_extents);
        let mut position = transform.translation;
        let events = motor.tick(&input, &mut position, &frame, &tuning, &mut resolver);
        transform.translation = position;

        bus.emit_all(events.into_iter().map(|event| match event {
            MotorEvent::Jump => GameEvent::Jump { player: slot },
            MotorEvent::Land => GameEvent::Land { player: slot },
            MotorEvent::Fall => GameEvent::Fall { player: slot },
        }));
    }
}

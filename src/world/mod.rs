//! Arena geometry: floor, walls and the two goal nets

mod collision;

pub use collision::{
    Aabb, ArenaResolver, COLLISION_EPSILON, ControllerHit, MoveOutcome, MoveResolver,
    SphereContact, sphere_contact,
};

use bevy::prelude::*;

use crate::constants::{FLOOR_THICKNESS, WALL_THICKNESS};
use crate::player::PlayerSlot;
use crate::tuning::ArenaLayout;

/// Static box collider centred on the entity's translation
#[derive(Component, Debug, Clone, Copy)]
pub struct Collider {
    pub half_extents: Vec3,
}

impl Collider {
    pub fn aabb(&self, transform: &Transform) -> Aabb {
        Aabb::new(transform.translation, self.half_extents)
    }
}

/// Goal trigger volume. A free ball entering it scores for `player`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Net {
    pub player: PlayerSlot,
    pub half_extents: Vec3,
}

impl Net {
    pub fn volume(&self, transform: &Transform) -> Aabb {
        Aabb::new(transform.translation, self.half_extents)
    }
}

/// Gather every static collider as a plain box list for the resolvers
pub fn collect_colliders<'a>(
    colliders: impl IntoIterator<Item = (&'a Collider, &'a Transform)>,
) -> Vec<Aabb> {
    colliders
        .into_iter()
        .map(|(collider, transform)| collider.aabb(transform))
        .collect()
}

/// Spawn the arena floor, top face at y = 0
pub fn spawn_floor(commands: &mut Commands, layout: &ArenaLayout) {
    commands.spawn((
        Name::new("Floor"),
        Transform::from_xyz(0.0, -FLOOR_THICKNESS / 2.0, 0.0),
        Collider {
            half_extents: Vec3::new(
                layout.half_width + WALL_THICKNESS,
                FLOOR_THICKNESS / 2.0,
                layout.half_depth + WALL_THICKNESS,
            ),
        },
    ));
}

/// Spawn the four walls around the playing area
pub fn spawn_walls(commands: &mut Commands, layout: &ArenaLayout) {
    let half_height = layout.wall_height / 2.0;
    let end_x = layout.half_width + WALL_THICKNESS / 2.0;
    let side_z = layout.half_depth + WALL_THICKNESS / 2.0;

    // End walls behind the nets
    for x in [-end_x, end_x] {
        commands.spawn((
            Name::new("End Wall"),
            Transform::from_xyz(x, half_height, 0.0),
            Collider {
                half_extents: Vec3::new(WALL_THICKNESS / 2.0, half_height, layout.half_depth),
            },
        ));
    }
    // Side walls
    for z in [-side_z, side_z] {
        commands.spawn((
            Name::new("Side Wall"),
            Transform::from_xyz(0.0, half_height, z),
            Collider {
                half_extents: Vec3::new(
                    layout.half_width + WALL_THICKNESS,
                    half_height,
                    WALL_THICKNESS / 2.0,
                ),
            },
        ));
    }
}

/// Net position for the slot it credits. Player 1 attacks towards +X.
pub fn net_position(player: PlayerSlot, layout: &ArenaLayout) -> Vec3 {
    let x = layout.half_width - layout.net_inset;
    let x = match player {
        PlayerSlot::One => x,
        PlayerSlot::Two => -x,
    };
    Vec3::new(x, layout.net_half_extents.y, 0.0)
}

/// Spawn both goal nets
pub fn spawn_nets(commands: &mut Commands, layout: &ArenaLayout) {
    for player in PlayerSlot::ALL {
        commands.spawn((
            Name::new(format!("Net ({})", player)),
            Transform::from_translation(net_position(player, layout)),
            Net {
                player,
                half_extents: layout.net_half_extents,
            },
        ));
    }
}

/// Floor, walls and nets
pub fn spawn_arena(commands: &mut Commands, layout: &ArenaLayout) {
    spawn_floor(commands, layout);
    spawn_walls(commands, layout);
    spawn_nets(commands, layout);
}

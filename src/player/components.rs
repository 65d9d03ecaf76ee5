//! Player-related components

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker for player entities
#[derive(Component)]
pub struct Player;

/// Which of the two players an entity (or a net, or a score) belongs to
#[derive(Component, Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    pub fn opponent(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }

    /// Parse "1"/"2"/"player1"/"p2" style identifiers
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "one" | "p1" | "player1" => Some(PlayerSlot::One),
            "2" | "two" | "p2" | "player2" => Some(PlayerSlot::Two),
            _ => None,
        }
    }

    /// 1-based number used in input axis names and log output
    pub fn number(self) -> u8 {
        match self {
            PlayerSlot::One => 1,
            PlayerSlot::Two => 2,
        }
    }
}

impl std::fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Input the motor and shooting controller consume each tick
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct MotorInput {
    /// World-space steer direction, length <= 1, already eased by the input mapper
    pub direction: Vec3,
    pub jump: bool,
    pub shoot: bool,
}

/// Whether the round currently lets this player act.
/// Disabled players still fall and land but ignore their input.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlsEnabled(pub bool);

impl Default for ControlsEnabled {
    fn default() -> Self {
        Self(true)
    }
}

/// Position recorded at spawn; a new game puts the player back here
#[derive(Component, Debug, Clone, Copy)]
pub struct SpawnPoint(pub Vec3);

/// Flags reported by the move resolver for the last sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub sides: bool,
    pub above: bool,
    pub below: bool,
}

impl CollisionFlags {
    pub fn none(&self) -> bool {
        !(self.sides || self.above || self.below)
    }
}

/// Velocity bookkeeping for the motor
#[derive(Debug, Clone)]
pub struct MotorMovement {
    pub velocity: Vec3,
    pub hit_point: Vec3,
    /// Hit point from the previous tick, used to de-duplicate repeated contacts
    pub last_hit_point: Vec3,
    pub collision_flags: CollisionFlags,
}

impl Default for MotorMovement {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            hit_point: Vec3::ZERO,
            last_hit_point: Vec3::new(f32::INFINITY, 0.0, 0.0),
            collision_flags: CollisionFlags::default(),
        }
    }
}

/// Jump bookkeeping for variable-height jumps
#[derive(Debug, Clone, Default)]
pub struct JumpState {
    /// In a jump that has not landed yet
    pub jumping: bool,
    /// Jump button down this tick
    pub input: bool,
    /// Extra-height force still allowed
    pub input_held: bool,
    pub last_start_time: f32,
    /// Time of the last fresh press; `None` once consumed or released
    pub last_button_time: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct GroundState {
    pub grounded: bool,
    pub normal: Vec3,
    /// Ground normal from the previous tick
    pub last_normal: Vec3,
}

impl Default for GroundState {
    fn default() -> Self {
        Self {
            grounded: true,
            normal: Vec3::ZERO,
            last_normal: Vec3::ZERO,
        }
    }
}

/// Character motor state, mutated only during the owning player's tick
#[derive(Component, Debug, Clone, Default)]
pub struct CharacterMotor {
    pub movement: MotorMovement,
    pub jumping: JumpState,
    pub ground: GroundState,
}

//! Tunable constants for Pitball
//!
//! Compiled-in defaults for every gameplay value. `GameplayTuning` starts from
//! these and may be overridden by `config/gameplay_tuning.json`.

use bevy::prelude::*;

// =============================================================================
// SIMULATION
// =============================================================================

pub const FIXED_TIMESTEP: f32 = 0.02; // Seconds per simulation tick (50 Hz)

// =============================================================================
// BALL PHYSICS
// =============================================================================

pub const BALL_FALL_SPEED: f32 = 5.0; // Below this speed the ball starts to drop
pub const BALL_GRAVITY: f32 = 5.0; // Velocity removed per tick at zero speed
pub const BALL_DAMPING: f32 = 0.95; // Fraction of speed kept each tick
pub const BALL_MAX_FALL_SPEED: f32 = 20.0;
pub const BALL_RADIUS: f32 = 0.5;
pub const BALL_FLOOR_NORMAL_Y: f32 = 0.3; // Contact normals steeper than this count as floor

// =============================================================================
// CHARACTER MOTOR
// =============================================================================

pub const MOVE_SPEED: f32 = 10.0;
pub const PLAYER_GRAVITY: f32 = 10.0;
pub const PLAYER_MAX_FALL_SPEED: f32 = 20.0; // Terminal velocity
pub const GROUND_ACCEL: f32 = 30.0;
pub const AIR_ACCEL: f32 = 20.0;
pub const STEP_OFFSET: f32 = 0.3; // Minimum push-down while grounded
pub const PLAYER_HALF_EXTENTS: Vec3 = Vec3::new(0.5, 1.0, 0.5);
pub const GROUNDED_NORMAL_Y: f32 = 0.01; // Ground test threshold on the contact normal

// =============================================================================
// JUMPING
// =============================================================================

pub const JUMP_BASE_HEIGHT: f32 = 1.0; // Height of a tapped jump
pub const JUMP_EXTRA_HEIGHT: f32 = 2.0; // Extra height available while holding jump
pub const JUMP_BUFFER_TIME: f32 = 0.2; // Early press window before the jump is taken

// =============================================================================
// SHOOTING
// =============================================================================

pub const SHOOT_SPEED: f32 = 20.0;
pub const SHOOT_CHARGE_TIME: f32 = 2.0;
pub const PICKUP_RADIUS: f32 = 1.5; // Ball centre distance from player centre
pub const PICKUP_GRACE: f32 = 0.3; // Seconds after a shot before the ball can be grabbed
pub const CARRY_OFFSET: Vec3 = Vec3::new(0.0, 0.5, -1.0); // Held ball position in player space

// =============================================================================
// SCORING & ROUND
// =============================================================================

pub const MAX_SCORE: u32 = 10;
pub const POINTS_PER_HIT: u32 = 1;
pub const POINTS_PER_GOAL: u32 = 2;
pub const ROUND_DURATION: f32 = 60.0;
pub const SERVE_DELAY: f32 = 1.0; // Seconds a captured ball stays in the net
pub const SERVE_JITTER: f32 = 0.0; // Max horizontal randomisation of the drop point

// =============================================================================
// ARENA
// =============================================================================

pub const ARENA_HALF_WIDTH: f32 = 20.0; // X extent from centre
pub const ARENA_HALF_DEPTH: f32 = 12.0; // Z extent from centre
pub const WALL_HEIGHT: f32 = 10.0;
pub const WALL_THICKNESS: f32 = 1.0;
pub const FLOOR_THICKNESS: f32 = 1.0;
pub const NET_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 2.0, 3.0);
pub const NET_INSET: f32 = 2.0; // Distance from the end wall to the net centre

pub const PLAYER1_SPAWN: Vec3 = Vec3::new(-8.0, 1.0, 0.0);
pub const PLAYER2_SPAWN: Vec3 = Vec3::new(8.0, 1.0, 0.0);
pub const BALL_DROP_POINT: Vec3 = Vec3::new(0.0, 6.0, 0.0);

// =============================================================================
// CONFIG FILES
// =============================================================================

pub const GAMEPLAY_TUNING_FILE: &str = "config/gameplay_tuning.json";

//! Gameplay tuning loaded from config
//!
//! Every section falls back to the compiled-in constants, so a config file only
//! needs the values it changes.

use bevy::log::{info, warn};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::SetupError;

/// Ball integrator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    /// Speed below which the ball starts to drop
    pub fall_speed: f32,
    pub gravity: f32,
    /// Fraction of speed kept each tick
    pub damping: f32,
    pub max_fall_speed: f32,
    pub radius: f32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            fall_speed: BALL_FALL_SPEED,
            gravity: BALL_GRAVITY,
            damping: BALL_DAMPING,
            max_fall_speed: BALL_MAX_FALL_SPEED,
            radius: BALL_RADIUS,
        }
    }
}

/// Character motor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorTuning {
    pub speed: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub max_ground_acceleration: f32,
    pub max_air_acceleration: f32,
    pub step_offset: f32,
    pub half_extents: Vec3,
}

impl Default for MotorTuning {
    fn default() -> Self {
        Self {
            speed: MOVE_SPEED,
            gravity: PLAYER_GRAVITY,
            max_fall_speed: PLAYER_MAX_FALL_SPEED,
            max_ground_acceleration: GROUND_ACCEL,
            max_air_acceleration: AIR_ACCEL,
            step_offset: STEP_OFFSET,
            half_extents: PLAYER_HALF_EXTENTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpTuning {
    pub base_height: f32,
    pub extra_height: f32,
    pub buffer_time: f32,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            base_height: JUMP_BASE_HEIGHT,
            extra_height: JUMP_EXTRA_HEIGHT,
            buffer_time: JUMP_BUFFER_TIME,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingTuning {
    pub shoot_speed: f32,
    pub shoot_charge_time: f32,
    pub pickup_radius: f32,
    pub pickup_grace: f32,
    pub carry_offset: Vec3,
}

impl Default for ShootingTuning {
    fn default() -> Self {
        Self {
            shoot_speed: SHOOT_SPEED,
            shoot_charge_time: SHOOT_CHARGE_TIME,
            pickup_radius: PICKUP_RADIUS,
            pickup_grace: PICKUP_GRACE,
            carry_offset: CARRY_OFFSET,
        }
    }
}

/// Score limits and round timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundRules {
    pub max_score: u32,
    pub points_per_hit: u32,
    pub points_per_goal: u32,
    pub round_duration: f32,
    pub serve_delay: f32,
    pub serve_jitter: f32,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            max_score: MAX_SCORE,
            points_per_hit: POINTS_PER_HIT,
            points_per_goal: POINTS_PER_GOAL,
            round_duration: ROUND_DURATION,
            serve_delay: SERVE_DELAY,
            serve_jitter: SERVE_JITTER,
        }
    }
}

/// Arena layout used by `spawn_arena`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaLayout {
    pub half_width: f32,
    pub half_depth: f32,
    pub wall_height: f32,
    pub net_half_extents: Vec3,
    pub net_inset: f32,
    pub player1_spawn: Vec3,
    pub player2_spawn: Vec3,
    pub ball_drop_point: Vec3,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            half_width: ARENA_HALF_WIDTH,
            half_depth: ARENA_HALF_DEPTH,
            wall_height: WALL_HEIGHT,
            net_half_extents: NET_HALF_EXTENTS,
            net_inset: NET_INSET,
            player1_spawn: PLAYER1_SPAWN,
            player2_spawn: PLAYER2_SPAWN,
            ball_drop_point: BALL_DROP_POINT,
        }
    }
}

/// All static gameplay configuration, supplied at construction
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayTuning {
    pub fixed_timestep: f32,
    pub ball: BallTuning,
    pub motor: MotorTuning,
    pub jumping: JumpTuning,
    pub shooting: ShootingTuning,
    pub rules: RoundRules,
    pub arena: ArenaLayout,
}

impl Default for GameplayTuning {
    fn default() -> Self {
        Self {
            fixed_timestep: FIXED_TIMESTEP,
            ball: BallTuning::default(),
            motor: MotorTuning::default(),
            jumping: JumpTuning::default(),
            shooting: ShootingTuning::default(),
            rules: RoundRules::default(),
            arena: ArenaLayout::default(),
        }
    }
}

impl GameplayTuning {
    /// Reject values the integrators cannot run with
    pub fn validate(&self) -> Result<(), SetupError> {
        fn positive(field: &'static str, value: f32) -> Result<(), SetupError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SetupError::InvalidTuning {
                    field,
                    value,
                    reason: "must be a positive number",
                })
            }
        }

        positive("fixed_timestep", self.fixed_timestep)?;
        positive("motor.gravity", self.motor.gravity)?;
        positive("jumping.base_height", self.jumping.base_height)?;
        positive("shooting.shoot_charge_time", self.shooting.shoot_charge_time)?;
        positive("ball.radius", self.ball.radius)?;

        if !(0.0..=1.0).contains(&self.ball.damping) {
            return Err(SetupError::InvalidTuning {
                field: "ball.damping",
                value: self.ball.damping,
                reason: "must be within [0, 1]",
            });
        }
        if self.rules.serve_delay < 0.0 {
            return Err(SetupError::InvalidTuning {
                field: "rules.serve_delay",
                value: self.rules.serve_delay,
                reason: "must not be negative",
            });
        }
        Ok(())
    }
}

pub fn load_gameplay_tuning_from_file(path: &str) -> Result<GameplayTuning, SetupError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SetupError::ConfigRead {
        path: path.to_string(),
        source,
    })?;
    let tuning: GameplayTuning =
        serde_json::from_str(&contents).map_err(|source| SetupError::ConfigParse {
            path: path.to_string(),
            source,
        })?;
    tuning.validate()?;
    Ok(tuning)
}

/// Load the global tuning file, falling back to defaults when it is absent.
///
/// A file that exists but does not parse or validate is a setup error.
pub fn load_global_tuning(path: &str) -> Result<GameplayTuning, SetupError> {
    match load_gameplay_tuning_from_file(path) {
        Ok(tuning) => {
            info!("Loaded gameplay tuning from {}", path);
            Ok(tuning)
        }
        Err(SetupError::ConfigRead { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            warn!("No tuning file at {}, using defaults", path);
            Ok(GameplayTuning::default())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let json = r#"{ "ball": { "damping": 0.9 }, "rules": { "points_per_goal": 3 } }"#;
        let tuning: GameplayTuning = serde_json::from_str(json).unwrap();
        assert_eq!(tuning.ball.damping, 0.9);
        assert_eq!(tuning.ball.fall_speed, BALL_FALL_SPEED);
        assert_eq!(tuning.rules.points_per_goal, 3);
        assert_eq!(tuning.rules.max_score, MAX_SCORE);
        assert_eq!(tuning.fixed_timestep, FIXED_TIMESTEP);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_default_is_valid() {
        assert!(GameplayTuning::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut tuning = GameplayTuning::default();
        tuning.shooting.shoot_charge_time = 0.0;
        assert!(matches!(
            tuning.validate(),
            Err(SetupError::InvalidTuning {
                field: "shooting.shoot_charge_time",
                ..
            })
        ));

        let mut tuning = GameplayTuning::default();
        tuning.ball.damping = 1.5;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let tuning = load_gameplay_tuning_from_file(GAMEPLAY_TUNING_FILE).unwrap();
        assert_eq!(tuning.arena.ball_drop_point, BALL_DROP_POINT);
        assert_eq!(tuning.motor.half_extents, PLAYER_HALF_EXTENTS);
        assert_eq!(tuning.rules.points_per_goal, POINTS_PER_GOAL);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let tuning = load_global_tuning("config/does_not_exist.json").unwrap();
        assert_eq!(tuning.motor.speed, MOVE_SPEED);
    }
}

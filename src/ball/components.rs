//! Ball-related components

use bevy::prelude::*;

use crate::constants::BALL_FLOOR_NORMAL_Y;
use crate::helpers::{damp, reflect};
use crate::player::PlayerSlot;
use crate::tuning::BallTuning;

/// Marker for ball entities
#[derive(Component)]
pub struct Ball;

/// Who controls the ball's position
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallState {
    /// Integrated by the ball physics
    #[default]
    Free,
    /// Carried by a player (Entity = holder)
    Held(Entity),
    /// Captured, position driven by the target (a net)
    Locked(Entity),
}

/// Ball velocity, floor contact and attachment
#[derive(Component, Default, Debug, Clone, PartialEq)]
pub struct BallBody {
    pub velocity: Vec3,
    pub grounded: bool,
    pub state: BallState,
}

impl BallBody {
    /// One fixed step of free flight. Returns the displacement to apply;
    /// zero while held or locked.
    pub fn integrate(&mut self, dt: f32, tuning: &BallTuning) -> Vec3 {
        if !self.is_free() {
            return Vec3::ZERO;
        }

        let mut velocity = damp(self.velocity, tuning.damping);

        let speed = velocity.length();
        if !self.grounded && tuning.fall_speed != 0.0 && speed < tuning.fall_speed {
            // Slow balls drop harder the slower they are
            let scale = (tuning.fall_speed - speed) / tuning.fall_speed;
            velocity.y -= scale * scale * tuning.gravity;
            velocity.y = velocity.y.min(tuning.max_fall_speed);
        }

        self.velocity = velocity;
        velocity * dt
    }

    /// Contact entry with a surface whose normal points towards the ball
    pub fn on_contact(&mut self, normal: Vec3) {
        if normal.y > BALL_FLOOR_NORMAL_Y {
            self.grounded = true;
            self.velocity.y = 0.0;
        } else {
            self.velocity = reflect(self.velocity, normal);
        }
    }

    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
        self.grounded = false;
        self.state = BallState::Free;
    }

    /// Release from any holder or lock and fly off with `velocity`
    pub fn shoot(&mut self, velocity: Vec3) {
        self.unlock();
        self.velocity = velocity;
    }

    /// Capture the ball on `target`. `None` leaves the ball untouched.
    pub fn lock(&mut self, target: Option<Entity>) {
        if let Some(target) = target {
            self.grounded = false;
            self.state = BallState::Locked(target);
        }
    }

    pub fn unlock(&mut self) {
        self.state = BallState::Free;
    }

    /// Attach a free ball to `holder`. Returns false if it was not free.
    pub fn pickup(&mut self, holder: Entity) -> bool {
        if !self.is_free() {
            return false;
        }
        self.grounded = false;
        self.velocity = Vec3::ZERO;
        self.state = BallState::Held(holder);
        true
    }

    pub fn is_free(&self) -> bool {
        self.state == BallState::Free
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, BallState::Locked(_))
    }

    pub fn holder(&self) -> Option<Entity> {
        match self.state {
            BallState::Held(holder) => Some(holder),
            _ => None,
        }
    }
}

/// Seconds left before a just-shot ball can be picked up again
#[derive(Component, Default, Debug)]
pub struct ShotGrace(pub f32);

/// Player whose shot is still in flight; cleared when it scores a hit or
/// touches the floor
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastShooter(pub Option<PlayerSlot>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FIXED_TIMESTEP;

    fn tuning() -> BallTuning {
        BallTuning::default()
    }

    #[test]
    fn test_damping_reduces_speed_without_reversing() {
        let mut body = BallBody {
            velocity: Vec3::new(30.0, 10.0, -5.0),
            grounded: true,
            ..default()
        };
        let before = body.velocity;
        body.integrate(FIXED_TIMESTEP, &tuning());

        assert!(body.velocity.length() < before.length());
        assert!(body.velocity.dot(before) > 0.0);
        assert!((body.velocity.normalize() - before.normalize()).length() < 1e-5);
    }

    #[test]
    fn test_resting_ball_starts_falling() {
        let mut body = BallBody::default();
        let t = tuning();
        let displacement = body.integrate(FIXED_TIMESTEP, &t);

        // Zero speed: full gravity in one tick
        assert!((body.velocity.y + t.gravity).abs() < 1e-6);
        assert!(body.velocity.y <= t.max_fall_speed);
        assert!(displacement.y < 0.0);
    }

    #[test]
    fn test_fast_ball_ignores_gravity() {
        let mut body = BallBody {
            velocity: Vec3::new(20.0, 0.0, 0.0),
            ..default()
        };
        body.integrate(FIXED_TIMESTEP, &tuning());
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_zero_fall_speed_disables_gravity() {
        let mut body = BallBody::default();
        let t = BallTuning {
            fall_speed: 0.0,
            ..tuning()
        };
        body.integrate(FIXED_TIMESTEP, &t);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_wall_contact_reflects() {
        let mut body = BallBody {
            velocity: Vec3::new(0.0, -10.0, 0.0),
            ..default()
        };
        body.on_contact(Vec3::X);
        assert_eq!(body.velocity.y, -10.0);
        assert!(!body.grounded);

        let mut body = BallBody {
            velocity: Vec3::new(8.0, -1.0, 0.0),
            ..default()
        };
        body.on_contact(Vec3::NEG_X);
        assert_eq!(body.velocity.x, -8.0);
    }

    #[test]
    fn test_floor_contact_grounds() {
        let mut body = BallBody {
            velocity: Vec3::new(2.0, -10.0, 0.0),
            ..default()
        };
        body.on_contact(Vec3::Y);
        assert!(body.grounded);
        assert_eq!(body.velocity, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_locked_ball_does_not_integrate() {
        let mut world = World::new();
        let net = world.spawn_empty().id();
        let mut body = BallBody {
            velocity: Vec3::new(3.0, 0.0, 0.0),
            grounded: true,
            ..default()
        };
        body.lock(Some(net));

        assert!(body.is_locked());
        assert!(!body.grounded);
        assert_eq!(body.integrate(FIXED_TIMESTEP, &tuning()), Vec3::ZERO);
        assert_eq!(body.velocity, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_lock_none_is_noop() {
        let mut body = BallBody {
            grounded: true,
            ..default()
        };
        body.lock(None);
        assert!(body.is_free());
        assert!(body.grounded);
    }

    #[test]
    fn test_reset_twice_equals_once() {
        let mut world = World::new();
        let net = world.spawn_empty().id();
        let mut body = BallBody {
            velocity: Vec3::new(1.0, 2.0, 3.0),
            grounded: true,
            ..default()
        };
        body.lock(Some(net));

        body.reset();
        let once = body.clone();
        body.reset();
        assert_eq!(body, once);
        assert_eq!(once, BallBody::default());
    }

    #[test]
    fn test_shoot_releases_holder() {
        let mut world = World::new();
        let player = world.spawn_empty().id();
        let mut body = BallBody::default();

        assert!(body.pickup(player));
        assert_eq!(body.holder(), Some(player));
        assert!(!body.pickup(player));

        body.shoot(Vec3::new(0.0, 0.0, -20.0));
        assert!(body.is_free());
        assert_eq!(body.velocity, Vec3::new(0.0, 0.0, -20.0));
    }

    #[test]
    fn test_shoot_releases_lock() {
        let mut world = World::new();
        let net = world.spawn_empty().id();
        let mut body = BallBody::default();
        body.lock(Some(net));

        body.shoot(Vec3::new(4.0, 1.0, 0.0));
        assert!(body.is_free());
        assert_eq!(body.velocity, Vec3::new(4.0, 1.0, 0.0));
        assert_ne!(body.integrate(FIXED_TIMESTEP, &tuning()), Vec3::ZERO);
    }

    #[test]
    fn test_unlock_frees_locked_ball_in_place() {
        let mut world = World::new();
        let net = world.spawn_empty().id();
        let mut body = BallBody {
            velocity: Vec3::new(0.0, -3.0, 0.0),
            ..default()
        };
        body.lock(Some(net));

        body.unlock();
        assert!(body.is_free());
        assert!(!body.is_locked());
        assert_eq!(body.velocity, Vec3::new(0.0, -3.0, 0.0));
    }
}

//! Vector helpers shared by the ball and the character motor
//!
//! All of these short-circuit on zero-length input instead of producing NaN.

use bevy::prelude::*;

/// Reflect a velocity about a surface normal: `v - 2(v·n)n`
pub fn reflect(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Remove `(1 - damping)` of the speed while keeping the direction
pub fn damp(velocity: Vec3, damping: f32) -> Vec3 {
    let speed = velocity.length();
    if speed == 0.0 {
        return velocity;
    }
    let damping_delta = (1.0 - damping) * speed;
    velocity / speed * (speed - damping_delta)
}

/// Clamp a vector to a maximum length, keeping its direction
pub fn clamp_length(v: Vec3, max: f32) -> Vec3 {
    if v.length_squared() > max * max {
        v.normalize_or_zero() * max
    } else {
        v
    }
}

/// Re-project a horizontal velocity onto the ground plane so movement follows
/// slopes. The result keeps the input's magnitude; a zero normal or zero
/// velocity yields zero.
pub fn project_on_ground(horizontal: Vec3, ground_normal: Vec3) -> Vec3 {
    let sideways = Vec3::Y.cross(horizontal);
    sideways.cross(ground_normal).normalize_or_zero() * horizontal.length()
}

/// Upward speed needed to reach `height` against `gravity`
pub fn jump_launch_speed(height: f32, gravity: f32) -> f32 {
    (2.0 * height * gravity).sqrt()
}

/// Drop the vertical component
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Yaw rotation that makes `-Z` (forward) point along a horizontal direction
pub fn facing_rotation(direction: Vec3) -> Option<Quat> {
    let flat = horizontal(direction);
    if flat.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(Quat::from_rotation_y(f32::atan2(-flat.x, -flat.z)))
}

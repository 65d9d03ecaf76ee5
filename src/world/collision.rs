//! Collision queries against axis-aligned arena geometry
//!
//! The motor only sees the `MoveResolver` trait: sweep a body by a delta, get
//! back where it ended up, and hear about every contact along the way.
//! `ArenaResolver` is the box-vs-box implementation used in the arena.

use bevy::prelude::*;

use crate::player::CollisionFlags;

/// Penetration below this is treated as touching, not overlapping
pub const COLLISION_EPSILON: f32 = 1e-4;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// True when the boxes overlap by more than the skin width on every axis
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let diff = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents - Vec3::splat(COLLISION_EPSILON);
        diff.x < reach.x && diff.y < reach.y && diff.z < reach.z
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        let diff = (point - self.center).abs();
        diff.x < self.half_extents.x && diff.y < self.half_extents.y && diff.z < self.half_extents.z
    }
}

/// One contact reported during a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerHit {
    pub point: Vec3,
    pub normal: Vec3,
    /// Normalized direction of the whole sweep
    pub move_direction: Vec3,
}

/// Where a sweep left the body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub position: Vec3,
    pub flags: CollisionFlags,
}

/// Sweep-and-slide collaborator used by the character motor
pub trait MoveResolver {
    /// Move a body at `position` by `delta`, calling `on_hit` for every contact
    fn sweep(
        &mut self,
        position: Vec3,
        delta: Vec3,
        on_hit: &mut dyn FnMut(&ControllerHit),
    ) -> MoveOutcome;
}

/// Box-shaped body sliding through static boxes, one axis at a time
pub struct ArenaResolver<'a> {
    pub colliders: &'a [Aabb],
    pub half_extents: Vec3,
}

impl<'a> ArenaResolver<'a> {
    pub fn new(colliders: &'a [Aabb], half_extents: Vec3) -> Self {
        Self {
            colliders,
            half_extents,
        }
    }
}

impl MoveResolver for ArenaResolver<'_> {
    fn sweep(
        &mut self,
        position: Vec3,
        delta: Vec3,
        on_hit: &mut dyn FnMut(&ControllerHit),
    ) -> MoveOutcome {
        let move_direction = delta.normalize_or_zero();
        let mut pos = position;
        let mut flags = CollisionFlags::default();

        // Horizontal first so a push-down never snags on the floor edge
        for axis in [0usize, 2, 1] {
            let step = delta[axis];
            if step == 0.0 {
                continue;
            }
            pos[axis] += step;

            for collider in self.colliders {
                let body = Aabb::new(pos, self.half_extents);
                if !body.overlaps(collider) {
                    continue;
                }

                let mut normal = Vec3::ZERO;
                if step > 0.0 {
                    pos[axis] = collider.min()[axis] - self.half_extents[axis];
                    normal[axis] = -1.0;
                } else {
                    pos[axis] = collider.max()[axis] + self.half_extents[axis];
                    normal[axis] = 1.0;
                }

                match (axis, step > 0.0) {
                    (1, true) => flags.above = true,
                    (1, false) => flags.below = true,
                    _ => flags.sides = true,
                }

                let mut point = pos;
                point[axis] -= normal[axis] * self.half_extents[axis];
                on_hit(&ControllerHit {
                    point,
                    normal,
                    move_direction,
                });
            }
        }

        MoveOutcome {
            position: pos,
            flags,
        }
    }
}

/// Contact between a sphere and a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereContact {
    /// Points from the box towards the sphere centre
    pub normal: Vec3,
    pub depth: f32,
}

/// Test a sphere against a box. A centre inside the box resolves along the
/// shallowest face.
pub fn sphere_contact(center: Vec3, radius: f32, aabb: &Aabb) -> Option<SphereContact> {
    let closest = center.clamp(aabb.min(), aabb.max());
    let diff = center - closest;
    let dist_sq = diff.length_squared();

    if dist_sq > 0.0 {
        if dist_sq >= radius * radius {
            return None;
        }
        let dist = dist_sq.sqrt();
        return Some(SphereContact {
            normal: diff / dist,
            depth: radius - dist,
        });
    }

    // Centre inside: leave through the nearest face
    let to_max = aabb.max() - center;
    let to_min = center - aabb.min();
    let mut best = SphereContact {
        normal: Vec3::Y,
        depth: to_max.y + radius,
    };
    for axis in 0..3 {
        for (dist, sign) in [(to_max[axis], 1.0), (to_min[axis], -1.0)] {
            if dist + radius < best.depth {
                let mut normal = Vec3::ZERO;
                normal[axis] = sign;
                best = SphereContact {
                    normal,
                    depth: dist + radius,
                };
            }
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Aabb {
        Aabb::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(10.0, 0.5, 10.0))
    }

    fn wall() -> Aabb {
        Aabb::new(Vec3::new(3.0, 2.0, 0.0), Vec3::new(0.5, 2.0, 10.0))
    }

    #[test]
    fn test_push_down_lands_on_floor() {
        let colliders = [floor()];
        let mut resolver = ArenaResolver::new(&colliders, Vec3::new(0.5, 1.0, 0.5));
        let mut hits = Vec::new();
        let outcome = resolver.sweep(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -0.3, 0.0), &mut |h| {
            hits.push(*h)
        });

        assert!((outcome.position.y - 1.0).abs() < 1e-6);
        assert!(outcome.flags.below);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].normal, Vec3::Y);
        assert!(hits[0].move_direction.y < 0.0);
        assert!((hits[0].point.y - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_walk_along_floor_without_side_hits() {
        let colliders = [floor()];
        let mut resolver = ArenaResolver::new(&colliders, Vec3::new(0.5, 1.0, 0.5));
        let mut hits = Vec::new();
        let outcome = resolver.sweep(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.2, -0.3, 0.0), &mut |h| {
            hits.push(*h)
        });

        assert!((outcome.position.x - 0.2).abs() < 1e-6);
        assert!(!outcome.flags.sides);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_wall_blocks_horizontal_motion() {
        let colliders = [floor(), wall()];
        let mut resolver = ArenaResolver::new(&colliders, Vec3::new(0.5, 1.0, 0.5));
        let outcome = resolver.sweep(Vec3::new(1.8, 1.0, 0.0), Vec3::new(0.5, 0.0, 0.0), &mut |_| {});
        assert!((outcome.position.x - 2.0).abs() < 1e-6);
        assert!(outcome.flags.sides);
    }

    #[test]
    fn test_sphere_contact_floor() {
        let contact = sphere_contact(Vec3::new(0.0, 0.4, 0.0), 0.5, &floor()).unwrap();
        assert!((contact.normal - Vec3::Y).length() < 1e-6);
        assert!((contact.depth - 0.1).abs() < 1e-5);

        assert!(sphere_contact(Vec3::new(0.0, 0.6, 0.0), 0.5, &floor()).is_none());
    }

    #[test]
    fn test_sphere_centre_inside_uses_shallowest_face() {
        let contact = sphere_contact(Vec3::new(2.9, 2.0, 0.0), 0.5, &wall()).unwrap();
        assert_eq!(contact.normal, Vec3::NEG_X);
    }
}

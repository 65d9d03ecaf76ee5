//! Character motor tick
//!
//! One call to `CharacterMotor::tick` is one fixed step for one player:
//! input velocity change, gravity and jumping, the resolver sweep, velocity
//! reconciliation and the grounded/airborne transition. Nothing here touches
//! the ECS so the whole state machine can be driven from plain tests.

use bevy::prelude::*;

use crate::constants::GROUNDED_NORMAL_Y;
use crate::helpers::{clamp_length, horizontal, jump_launch_speed, project_on_ground};
use crate::player::components::*;
use crate::tuning::{GameplayTuning, MotorTuning};
use crate::world::{ControllerHit, MoveResolver};

/// Squared distance a new contact must move before its normal replaces the last one
const HIT_POINT_MOVED_SQ: f32 = 0.001;
/// Reconciled vertical speed below the prediction by more than this is an artifact
const VERTICAL_SLACK: f32 = 0.001;

/// Clock and orientation for one motor tick
#[derive(Debug, Clone, Copy)]
pub struct MotorFrame {
    /// Fixed-clock time at this tick
    pub now: f32,
    pub dt: f32,
    /// Body yaw; the input direction is taken through this basis
    pub rotation: Quat,
}

/// Transition reported by a motor tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorEvent {
    Jump,
    Land,
    Fall,
}

impl CharacterMotor {
    pub fn is_grounded(&self) -> bool {
        self.ground.grounded
    }

    pub fn velocity(&self) -> Vec3 {
        self.movement.velocity
    }

    fn grounded_test(&self) -> bool {
        self.ground.normal.y > GROUNDED_NORMAL_Y
    }

    /// Run one fixed step, moving `position` through `resolver`
    pub fn tick<R: MoveResolver + ?Sized>(
        &mut self,
        input: &MotorInput,
        position: &mut Vec3,
        frame: &MotorFrame,
        tuning: &GameplayTuning,
        resolver: &mut R,
    ) -> Vec<MotorEvent> {
        let mut events = Vec::new();
        self.jumping.input = input.jump;

        let velocity = self.movement.velocity;
        let velocity =
            self.apply_input_velocity_change(velocity, input.direction, frame, &tuning.motor);
        let velocity = self.apply_gravity_and_jumping(velocity, frame, tuning, &mut events);

        let last_position = *position;
        let mut offset = velocity * frame.dt;

        // Bias towards the ground so walking down a step keeps contact
        let push_down = tuning.motor.step_offset.max(horizontal(offset).length());
        if self.ground.grounded {
            offset.y -= push_down;
        }

        self.ground.normal = Vec3::ZERO;
        let outcome = {
            let ground = &mut self.ground;
            let movement = &mut self.movement;
            resolver.sweep(*position, offset, &mut |hit| {
                record_controller_hit(ground, movement, hit)
            })
        };
        *position = outcome.position;
        self.movement.collision_flags = outcome.flags;
        self.movement.last_hit_point = self.movement.hit_point;
        self.ground.last_normal = self.ground.normal;

        self.reconcile_velocity(velocity, *position - last_position, frame.dt);

        if self.ground.grounded && !self.grounded_test() {
            self.ground.grounded = false;
            events.push(MotorEvent::Fall);
            position.y += push_down;
        } else if !self.ground.grounded && self.grounded_test() {
            self.ground.grounded = true;
            self.jumping.jumping = false;
            events.push(MotorEvent::Land);
        }

        events
    }

    fn apply_input_velocity_change(
        &self,
        mut velocity: Vec3,
        direction: Vec3,
        frame: &MotorFrame,
        motor: &MotorTuning,
    ) -> Vec3 {
        let local = frame.rotation.inverse() * direction;
        let mut desired = frame.rotation * (local * motor.speed);

        if self.ground.grounded {
            desired = project_on_ground(desired, self.ground.normal);
        } else {
            velocity.y = 0.0;
        }

        let max_change = if self.ground.grounded {
            motor.max_ground_acceleration
        } else {
            motor.max_air_acceleration
        } * frame.dt;
        let change = clamp_length(desired - velocity, max_change);

        // No air control
        if self.ground.grounded {
            velocity += change;
        }
        velocity
    }

    fn apply_gravity_and_jumping(
        &mut self,
        mut velocity: Vec3,
        frame: &MotorFrame,
        tuning: &GameplayTuning,
        events: &mut Vec<MotorEvent>,
    ) -> Vec3 {
        let gravity = tuning.motor.gravity;
        let jump = &tuning.jumping;
        let launch = jump_launch_speed(jump.base_height, gravity);

        if !self.jumping.input {
            self.jumping.input_held = false;
            self.jumping.last_button_time = None;
        }
        if self.jumping.input && self.jumping.last_button_time.is_none() {
            self.jumping.last_button_time = Some(frame.now);
        }

        if self.ground.grounded {
            velocity.y = velocity.y.min(0.0) - gravity * frame.dt;
        } else {
            velocity.y = self.movement.velocity.y - gravity * frame.dt;

            // Holding jump cancels gravity for the extra-height window
            if self.jumping.jumping
                && self.jumping.input_held
                && frame.now < self.jumping.last_start_time + jump.extra_height / launch
            {
                velocity.y += gravity * frame.dt;
            }

            velocity.y = velocity.y.max(-tuning.motor.max_fall_speed);
        }

        if self.ground.grounded {
            let buffered = self
                .jumping
                .last_button_time
                .is_some_and(|pressed| frame.now - pressed < jump.buffer_time);
            if buffered {
                self.ground.grounded = false;
                self.jumping.jumping = true;
                self.jumping.last_start_time = frame.now;
                self.jumping.last_button_time = None;
                self.jumping.input_held = true;
                velocity.y = launch;
                events.push(MotorEvent::Jump);
            } else {
                self.jumping.input_held = false;
            }
        }

        velocity
    }

    /// Replace the stored velocity with what the sweep actually allowed
    fn reconcile_velocity(&mut self, predicted: Vec3, displacement: Vec3, dt: f32) {
        let actual = displacement / dt;
        let old_horizontal = horizontal(predicted);

        let mut reconciled = if old_horizontal == Vec3::ZERO {
            Vec3::new(0.0, actual.y, 0.0)
        } else {
            let projected =
                horizontal(actual).dot(old_horizontal) / old_horizontal.length_squared();
            old_horizontal * projected.clamp(0.0, 1.0) + Vec3::Y * actual.y
        };

        if reconciled.y < predicted.y - VERTICAL_SLACK {
            if reconciled.y < 0.0 {
                // Pushed down harder than predicted; keep the prediction
                reconciled.y = predicted.y;
            } else {
                // Ceiling
                self.jumping.input_held = false;
            }
        }

        self.movement.velocity = reconciled;
    }

    /// Put the motor back in its spawn state
    pub fn reset(&mut self) {
        *self = CharacterMotor::default();
    }
}

/// Contact callback: keep the flattest downward contact as the ground normal
fn record_controller_hit(ground: &mut GroundState, movement: &mut MotorMovement, hit: &ControllerHit) {
    if hit.normal.y > 0.0 && hit.normal.y > ground.normal.y && hit.move_direction.y < 0.0 {
        if (hit.point - movement.last_hit_point).length_squared() > HIT_POINT_MOVED_SQ
            || ground.last_normal == Vec3::ZERO
        {
            ground.normal = hit.normal;
        } else {
            ground.normal = ground.last_normal;
        }
        movement.hit_point = hit.point;
    }
}

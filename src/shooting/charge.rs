//! Shot charging state

use bevy::prelude::*;

/// Per-player shooting state: the held ball and the charge timer
#[derive(Component, Default, Debug, Clone, PartialEq)]
pub struct ShootingState {
    pub ball: Option<Entity>,
    /// Shoot button down this tick
    pub input: bool,
    /// Button has been down since the last release
    pub input_held: bool,
    pub last_start_time: f32,
}

/// A shot fired this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRelease {
    pub ball: Entity,
    /// Multiplier on the shoot speed
    pub charge: f32,
}

impl ShootingState {
    /// Feed one tick of the shoot button. Returns the shot when the button
    /// is released while a ball is held.
    pub fn update(&mut self, now: f32, pressed: bool, charge_time: f32) -> Option<ShotRelease> {
        self.input = pressed;
        let mut release = None;

        if !self.input && self.input_held {
            if let Some(ball) = self.ball.take() {
                let charge = (now - self.last_start_time).max(charge_time) / charge_time;
                release = Some(ShotRelease { ball, charge });
            }
            self.input_held = false;
        }

        if self.input {
            self.input_held = true;
            if self.ball.is_some() {
                self.last_start_time = now;
            }
        }

        release
    }

    /// Drop the button state without firing; the ball stays held
    pub fn cancel(&mut self) {
        self.input = false;
        self.input_held = false;
    }

    pub fn is_holding(&self) -> bool {
        self.ball.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHARGE_TIME: f32 = 2.0;

    fn holding() -> (ShootingState, Entity) {
        let mut world = World::new();
        let ball = world.spawn_empty().id();
        let state = ShootingState {
            ball: Some(ball),
            ..default()
        };
        (state, ball)
    }

    #[test]
    fn test_release_after_hold_shoots() {
        let (mut state, ball) = holding();
        assert_eq!(state.update(0.0, true, CHARGE_TIME), None);
        assert_eq!(state.update(0.02, true, CHARGE_TIME), None);

        let shot = state.update(0.04, false, CHARGE_TIME).unwrap();
        assert_eq!(shot.ball, ball);
        assert_eq!(shot.charge, 1.0);
        assert!(!state.is_holding());
        assert!(!state.input_held);
    }

    #[test]
    fn test_stale_stamp_scales_charge() {
        let (mut state, _) = holding();
        state.update(1.0, true, CHARGE_TIME);
        // Stamp never refreshed: elapsed past the charge time
        state.last_start_time = 0.0;
        let shot = state.update(5.0, false, CHARGE_TIME).unwrap();
        assert_eq!(shot.charge, 2.5);
    }

    #[test]
    fn test_release_without_ball_clears_hold() {
        let mut state = ShootingState::default();
        state.update(0.0, true, CHARGE_TIME);
        assert!(state.input_held);
        assert_eq!(state.update(0.02, false, CHARGE_TIME), None);
        assert!(!state.input_held);
    }

    #[test]
    fn test_cancel_keeps_ball() {
        let (mut state, ball) = holding();
        state.update(0.0, true, CHARGE_TIME);
        state.cancel();

        assert!(!state.input_held);
        assert_eq!(state.update(0.02, false, CHARGE_TIME), None);
        assert_eq!(state.ball, Some(ball));
    }

    #[test]
    fn test_no_release_without_press() {
        let (mut state, _) = holding();
        assert_eq!(state.update(0.0, false, CHARGE_TIME), None);
        assert!(state.is_holding());
    }
}

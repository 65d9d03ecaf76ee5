//! Input module - raw axis sampling and the mapping onto motor input
//!
//! Each player reads named axes and buttons ("Player1Horizontal", ...) from an
//! `InputSampler`. The keyboard sampler is used when Bevy's input plugin is
//! present; scenarios supply a scripted sampler instead.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::player::{MotorInput, Player, PlayerSlot};

/// Names of the axes and buttons a player reads
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct InputConfig {
    pub horizontal: String,
    pub vertical: String,
    pub jump: String,
    pub shoot: String,
}

impl InputConfig {
    pub fn for_player(slot: PlayerSlot) -> Self {
        let n = slot.number();
        Self {
            horizontal: format!("Player{}Horizontal", n),
            vertical: format!("Player{}Vertical", n),
            jump: format!("Player{}Jump", n),
            shoot: format!("Player{}Shoot", n),
        }
    }
}

/// Source of raw input values
pub trait InputSampler {
    /// Axis value in -1..1; unknown names read as 0
    fn axis(&self, name: &str) -> f32;
    /// Unknown names read as released
    fn button(&self, name: &str) -> bool;
}

/// Normalize the stick and square its length (capped at 1) for finer control
/// near the centre. Zero stays zero.
pub fn ease_direction(raw: Vec3) -> Vec3 {
    if raw == Vec3::ZERO {
        return raw;
    }
    let length = raw.length();
    let eased = length.min(1.0);
    raw / length * eased * eased
}

/// Sample one player's input. Vertical axis up moves towards -Z.
pub fn sample_motor_input(sampler: &dyn InputSampler, config: &InputConfig) -> MotorInput {
    let raw = Vec3::new(
        sampler.axis(&config.horizontal),
        0.0,
        -sampler.axis(&config.vertical),
    );
    MotorInput {
        direction: ease_direction(raw),
        jump: sampler.button(&config.jump),
        shoot: sampler.button(&config.shoot),
    }
}

/// Keys behind each named axis and button
#[derive(Resource, Clone, Debug)]
pub struct KeyBindings {
    /// (negative, positive)
    pub axes: HashMap<String, (KeyCode, KeyCode)>,
    pub buttons: HashMap<String, KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut axes = HashMap::new();
        let mut buttons = HashMap::new();

        let p1 = InputConfig::for_player(PlayerSlot::One);
        axes.insert(p1.horizontal, (KeyCode::KeyA, KeyCode::KeyD));
        axes.insert(p1.vertical, (KeyCode::KeyS, KeyCode::KeyW));
        buttons.insert(p1.jump, KeyCode::Space);
        buttons.insert(p1.shoot, KeyCode::KeyF);

        let p2 = InputConfig::for_player(PlayerSlot::Two);
        axes.insert(p2.horizontal, (KeyCode::ArrowLeft, KeyCode::ArrowRight));
        axes.insert(p2.vertical, (KeyCode::ArrowDown, KeyCode::ArrowUp));
        buttons.insert(p2.jump, KeyCode::Enter);
        buttons.insert(p2.shoot, KeyCode::ShiftRight);

        Self { axes, buttons }
    }
}

/// Keyboard-backed sampler: an axis is -1, 0 or 1
pub struct KeyboardSampler<'a> {
    pub keys: &'a ButtonInput<KeyCode>,
    pub bindings: &'a KeyBindings,
}

impl InputSampler for KeyboardSampler<'_> {
    fn axis(&self, name: &str) -> f32 {
        let Some(&(negative, positive)) = self.bindings.axes.get(name) else {
            return 0.0;
        };
        let mut value = 0.0;
        if self.keys.pressed(negative) {
            value -= 1.0;
        }
        if self.keys.pressed(positive) {
            value += 1.0;
        }
        value
    }

    fn button(&self, name: &str) -> bool {
        self.bindings
            .buttons
            .get(name)
            .is_some_and(|&key| self.keys.pressed(key))
    }
}

/// Runs in Update: copy keyboard state into each player's MotorInput
pub fn capture_keyboard_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut players: Query<(&InputConfig, &mut MotorInput), With<Player>>,
) {
    let sampler = KeyboardSampler {
        keys: &keys,
        bindings: &bindings,
    };
    for (config, mut input) in &mut players {
        *input = sample_motor_input(&sampler, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSampler {
        horizontal: f32,
        vertical: f32,
        jump: bool,
    }

    impl InputSampler for FixedSampler {
        fn axis(&self, name: &str) -> f32 {
            if name.ends_with("Horizontal") {
                self.horizontal
            } else {
                self.vertical
            }
        }

        fn button(&self, name: &str) -> bool {
            name.ends_with("Jump") && self.jump
        }
    }

    #[test]
    fn test_ease_squares_length() {
        let eased = ease_direction(Vec3::new(0.5, 0.0, 0.0));
        assert!((eased - Vec3::new(0.25, 0.0, 0.0)).length() < 1e-6);

        // Diagonal past the unit circle is capped at length 1
        let eased = ease_direction(Vec3::new(1.0, 0.0, 1.0));
        assert!((eased.length() - 1.0).abs() < 1e-6);

        assert_eq!(ease_direction(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_vertical_axis_moves_forward() {
        let sampler = FixedSampler {
            horizontal: 0.0,
            vertical: 1.0,
            jump: true,
        };
        let input = sample_motor_input(&sampler, &InputConfig::for_player(PlayerSlot::One));
        assert_eq!(input.direction, Vec3::NEG_Z);
        assert!(input.jump);
        assert!(!input.shoot);
    }

    #[test]
    fn test_keyboard_sampler_reads_bindings() {
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyD);
        keys.press(KeyCode::ArrowLeft);
        keys.press(KeyCode::ArrowRight);
        keys.press(KeyCode::ShiftRight);
        let bindings = KeyBindings::default();
        let sampler = KeyboardSampler {
            keys: &keys,
            bindings: &bindings,
        };

        assert_eq!(sampler.axis("Player1Horizontal"), 1.0);
        // Opposite keys cancel
        assert_eq!(sampler.axis("Player2Horizontal"), 0.0);
        assert!(sampler.button("Player2Shoot"));
        assert!(!sampler.button("Player1Jump"));
        assert_eq!(sampler.axis("NoSuchAxis"), 0.0);
    }
}

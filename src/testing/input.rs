//! Scripted input injection for tests

use bevy::prelude::*;
use std::collections::HashMap;

use super::parser::{FrameInput, InputSnapshot};
use crate::events::TickCounter;
use crate::input::{InputConfig, InputSampler, sample_motor_input};
use crate::player::{MotorInput, Player, PlayerSlot};

/// Raw input held for one player; persists between frames
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentInputState {
    pub horizontal: f32,
    pub vertical: f32,
    pub jump: bool,
    pub shoot: bool,
}

impl CurrentInputState {
    fn apply(&mut self, snapshot: &InputSnapshot) {
        if let Some(horizontal) = snapshot.horizontal {
            self.horizontal = horizontal;
        }
        if let Some(vertical) = snapshot.vertical {
            self.vertical = vertical;
        }
        if let Some(jump) = snapshot.jump {
            self.jump = jump;
        }
        if let Some(shoot) = snapshot.shoot {
            self.shoot = shoot;
        }
    }
}

/// Sampler answering a player's named axes from its scripted state
pub struct ScriptedSampler<'a> {
    pub state: &'a CurrentInputState,
    pub config: &'a InputConfig,
}

impl InputSampler for ScriptedSampler<'_> {
    fn axis(&self, name: &str) -> f32 {
        if name == self.config.horizontal {
            self.state.horizontal
        } else if name == self.config.vertical {
            self.state.vertical
        } else {
            0.0
        }
    }

    fn button(&self, name: &str) -> bool {
        (name == self.config.jump && self.state.jump)
            || (name == self.config.shoot && self.state.shoot)
    }
}

/// Resource holding scripted inputs for a test
#[derive(Resource, Default, Debug)]
pub struct ScriptedInputs {
    /// (frame, player, snapshot), sorted by frame
    frames: Vec<(u64, PlayerSlot, InputSnapshot)>,
    next: usize,
    pub current_state: HashMap<PlayerSlot, CurrentInputState>,
}

impl ScriptedInputs {
    /// Create from parsed frame inputs. Fails on an unknown player id.
    pub fn from_inputs(inputs: &[FrameInput]) -> Result<Self, String> {
        let mut frames = Vec::new();
        for fi in inputs {
            for (id, snapshot) in &fi.inputs {
                let slot = PlayerSlot::parse(id)
                    .ok_or_else(|| format!("Unknown player '{}' at frame {}", id, fi.frame))?;
                frames.push((fi.frame, slot, snapshot.clone()));
            }
        }
        frames.sort_by_key(|(frame, _, _)| *frame);

        Ok(Self {
            frames,
            next: 0,
            current_state: HashMap::new(),
        })
    }

    /// Apply every snapshot scheduled at or before `frame`
    pub fn advance_to(&mut self, frame: u64) {
        while let Some((at, slot, snapshot)) = self.frames.get(self.next) {
            if *at > frame {
                break;
            }
            self.current_state.entry(*slot).or_default().apply(snapshot);
            self.next += 1;
        }
    }

    pub fn state(&self, slot: PlayerSlot) -> CurrentInputState {
        self.current_state.get(&slot).cloned().unwrap_or_default()
    }
}

/// Runs in TickSet::Input: feed the scripted state through the input mapper
pub fn apply_scripted_input(
    tick: Res<TickCounter>,
    mut scripted: ResMut<ScriptedInputs>,
    mut players: Query<(&PlayerSlot, &InputConfig, &mut MotorInput), With<Player>>,
) {
    scripted.advance_to(tick.0);

    for (&slot, config, mut input) in &mut players {
        let state = scripted.state(slot);
        let sampler = ScriptedSampler {
            state: &state,
            config,
        };
        *input = sample_motor_input(&sampler, config);
    }
}

//! Scoring module - round state machine, goal and hit triggers

mod systems;

pub use systems::*;

use bevy::prelude::*;
use serde::Serialize;

use crate::events::RoundOutcome;
use crate::player::PlayerSlot;
use crate::tuning::RoundRules;

/// Where the round is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RoundPhase {
    /// Waiting for the first new game
    #[default]
    NotStarted,
    Active,
    /// Time ran out or a score passed the maximum
    Ended,
}

/// Score counters for both players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Scores {
    pub player1: u32,
    pub player2: u32,
}

impl Scores {
    pub fn get(&self, slot: PlayerSlot) -> u32 {
        match slot {
            PlayerSlot::One => self.player1,
            PlayerSlot::Two => self.player2,
        }
    }

    fn get_mut(&mut self, slot: PlayerSlot) -> &mut u32 {
        match slot {
            PlayerSlot::One => &mut self.player1,
            PlayerSlot::Two => &mut self.player2,
        }
    }
}

/// Scoreboard and round clock, owned by the scoring systems
#[derive(Resource, Debug, Clone)]
pub struct GameState {
    pub scores: Scores,
    pub rules: RoundRules,
    pub round_start: f32,
    pub round_end: f32,
    pub phase: RoundPhase,
    /// Time at which a captured ball goes back into play
    pub serve_at: Option<f32>,
}

impl GameState {
    pub fn new(rules: RoundRules) -> Self {
        Self {
            scores: Scores::default(),
            rules,
            round_start: 0.0,
            round_end: 0.0,
            phase: RoundPhase::NotStarted,
            serve_at: None,
        }
    }

    /// Zero the scores and open a new round clock at `now`
    pub fn new_game(&mut self, now: f32) {
        self.round_start = now;
        self.round_end = now + self.rules.round_duration;
        self.scores = Scores::default();
        self.serve_at = None;
        self.phase = RoundPhase::Active;
    }

    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    fn award(&mut self, slot: PlayerSlot, points: u32) -> bool {
        if !self.is_active() {
            return false;
        }
        *self.scores.get_mut(slot) += points;
        true
    }

    /// Goal for `slot`. Returns false outside an active round.
    pub fn player_scored(&mut self, slot: PlayerSlot) -> bool {
        self.award(slot, self.rules.points_per_goal)
    }

    /// Shot by `slot` struck the opponent. Returns false outside an active round.
    pub fn player_hit(&mut self, slot: PlayerSlot) -> bool {
        self.award(slot, self.rules.points_per_hit)
    }

    /// Advance the round clock. Returns the outcome on the tick the round ends.
    pub fn update(&mut self, now: f32) -> Option<RoundOutcome> {
        if !self.is_active() {
            return None;
        }
        let max = self.rules.max_score;
        if now > self.round_end || self.scores.player1 > max || self.scores.player2 > max {
            self.phase = RoundPhase::Ended;
            return Some(self.outcome());
        }
        None
    }

    pub fn outcome(&self) -> RoundOutcome {
        use std::cmp::Ordering;
        match self.scores.player1.cmp(&self.scores.player2) {
            Ordering::Greater => RoundOutcome::Winner(PlayerSlot::One),
            Ordering::Less => RoundOutcome::Winner(PlayerSlot::Two),
            Ordering::Equal => RoundOutcome::Tie,
        }
    }

    pub fn time_remaining(&self, now: f32) -> f32 {
        match self.phase {
            RoundPhase::Active => (self.round_end - now).max(0.0),
            _ => 0.0,
        }
    }

    /// Hold the captured ball for the serve delay
    pub fn schedule_serve(&mut self, now: f32) {
        self.serve_at = Some(now + self.rules.serve_delay);
    }

    /// True once when a scheduled serve falls due
    pub fn take_due_serve(&mut self, now: f32) -> bool {
        match self.serve_at {
            Some(at) if now >= at => {
                self.serve_at = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(RoundRules::default())
    }
}

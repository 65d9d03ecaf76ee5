//! Event type definitions

use serde::{Deserialize, Serialize};

use crate::player::PlayerSlot;

/// Result of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Winner(PlayerSlot),
    Tie,
}

/// All gameplay events. Emitting one never requires a listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Session Events ===
    /// Log session started
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,  // RFC 3339
    },

    // === Round Events ===
    RoundStart {
        duration: f32,
    },
    RoundEnd {
        score_1: u32,
        score_2: u32,
        outcome: RoundOutcome,
    },
    /// Controls switched on or off for a player
    Controls {
        player: PlayerSlot,
        enabled: bool,
    },

    // === Scoring Events ===
    /// Ball captured by the net crediting `player`
    Goal {
        player: PlayerSlot,
        score_1: u32,
        score_2: u32,
    },
    /// A shot ball struck the opposing player
    Hit {
        shooter: PlayerSlot,
        score_1: u32,
        score_2: u32,
    },
    /// Captured ball returned to the drop point
    BallServed {
        pos: (f32, f32, f32),
    },

    // === Ball Events ===
    Pickup {
        player: PlayerSlot,
    },
    Shot {
        player: PlayerSlot,
        charge: f32,
        speed: f32,
    },

    // === Movement Events ===
    Jump {
        player: PlayerSlot,
    },
    Land {
        player: PlayerSlot,
    },
    Fall {
        player: PlayerSlot,
    },
}

impl GameEvent {
    /// Short variant name, used by scenario expectations
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "SessionStart",
            GameEvent::RoundStart { .. } => "RoundStart",
            GameEvent::RoundEnd { .. } => "RoundEnd",
            GameEvent::Controls { .. } => "Controls",
            GameEvent::Goal { .. } => "Goal",
            GameEvent::Hit { .. } => "Hit",
            GameEvent::BallServed { .. } => "BallServed",
            GameEvent::Pickup { .. } => "Pickup",
            GameEvent::Shot { .. } => "Shot",
            GameEvent::Jump { .. } => "Jump",
            GameEvent::Land { .. } => "Land",
            GameEvent::Fall { .. } => "Fall",
        }
    }

    /// Player the event is about, if any
    pub fn player(&self) -> Option<PlayerSlot> {
        match self {
            GameEvent::Controls { player, .. }
            | GameEvent::Goal { player, .. }
            | GameEvent::Pickup { player }
            | GameEvent::Shot { player, .. }
            | GameEvent::Jump { player }
            | GameEvent::Land { player }
            | GameEvent::Fall { player } => Some(*player),
            GameEvent::Hit { shooter, .. } => Some(*shooter),
            _ => None,
        }
    }
}

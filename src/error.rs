//! Setup diagnostics
//!
//! Everything that can go wrong is caught while building the app. Once the
//! simulation runs, no operation fails.

use thiserror::Error;

use crate::player::PlayerSlot;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid tuning value {field} = {value}: {reason}")]
    InvalidTuning {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },

    #[error("{0} hasn't been set")]
    MissingPlayer(PlayerSlot),

    #[error("no net credits {0}")]
    MissingNet(PlayerSlot),

    #[error("arena has no ball")]
    MissingBall,
}

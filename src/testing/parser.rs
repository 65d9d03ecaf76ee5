//! TOML test file parsing

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::tuning::GameplayTuning;

/// Complete test definition from TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: TestSetup,
    #[serde(default)]
    pub input: Vec<FrameInput>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Test setup configuration
///
/// With `start_game` the first tick opens the round (which respawns both
/// players and serves the ball), so entity placements are applied after it.
#[derive(Debug, Default, Deserialize)]
pub struct TestSetup {
    #[serde(default)]
    pub start_game: bool,
    /// Run at least this many ticks even without later inputs or checks
    pub frames: Option<u64>,
    /// Partial tuning; omitted values keep their defaults
    pub tuning: Option<GameplayTuning>,
    #[serde(default)]
    pub entities: Vec<EntityDef>,
}

/// Placement overrides for the spawned scene
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum EntityDef {
    #[serde(rename = "player")]
    Player {
        /// "player1" / "player2"
        id: String,
        x: f32,
        y: f32,
        #[serde(default)]
        z: f32,
        #[serde(default)]
        holding_ball: bool,
    },
    #[serde(rename = "ball")]
    Ball {
        x: f32,
        y: f32,
        #[serde(default)]
        z: f32,
        #[serde(default)]
        velocity_x: f32,
        #[serde(default)]
        velocity_y: f32,
        #[serde(default)]
        velocity_z: f32,
    },
}

/// Input state at a specific frame
#[derive(Debug, Clone, Deserialize)]
pub struct FrameInput {
    pub frame: u64,
    #[serde(flatten)]
    pub inputs: HashMap<String, InputSnapshot>,
}

/// Raw axis and button values for one player.
/// Unset fields keep whatever the previous frame set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputSnapshot {
    #[serde(default)]
    pub horizontal: Option<f32>,
    #[serde(default)]
    pub vertical: Option<f32>,
    #[serde(default)]
    pub jump: Option<bool>,
    #[serde(default)]
    pub shoot: Option<bool>,
}

/// Expected test outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Multiple state assertions at different frames (uses [[expect.state]] TOML syntax)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event in sequence
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    pub player: Option<String>,
    pub frame_min: Option<u64>,
    pub frame_max: Option<u64>,
}

/// State assertion checked once `after_frame` ticks have run
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_frame: u64,
    #[serde(default)]
    pub checks: Vec<String>,
}

impl TestDefinition {
    /// Last tick the runner has to reach
    pub fn last_frame(&self) -> u64 {
        let inputs = self.input.iter().map(|i| i.frame);
        let checks = self.expect.state.iter().map(|s| s.after_frame);
        let events = self.expect.sequence.iter().filter_map(|e| e.frame_max);
        inputs
            .chain(checks)
            .chain(events)
            .chain(self.setup.frames)
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

/// Parse a test file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    parse_test_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

pub fn parse_test_str(content: &str) -> Result<TestDefinition, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let toml = r#"
name = "Test"
[setup]
start_game = true

[[setup.entities]]
type = "player"
id = "player1"
x = -3.0
y = 1.0

[[setup.entities]]
type = "ball"
x = 1.0
y = 2.0
velocity_x = 5.0

[[input]]
frame = 3
player1 = { horizontal = 1.0, jump = true }

[[expect.state]]
after_frame = 10
checks = ["player1.grounded = true"]
"#;
        let def = parse_test_str(toml).unwrap();
        assert_eq!(def.name, "Test");
        assert!(def.setup.start_game);
        assert_eq!(def.setup.entities.len(), 2);
        assert!(matches!(
            def.setup.entities[1],
            EntityDef::Ball { velocity_x, z, .. } if velocity_x == 5.0 && z == 0.0
        ));

        let snapshot = &def.input[0].inputs["player1"];
        assert_eq!(snapshot.horizontal, Some(1.0));
        assert_eq!(snapshot.vertical, None);
        assert_eq!(snapshot.jump, Some(true));
        assert_eq!(def.last_frame(), 10);
    }

    #[test]
    fn test_partial_tuning_keeps_defaults() {
        let toml = r#"
name = "Tuned"
[setup.tuning.rules]
serve_delay = 0.5
"#;
        let def = parse_test_str(toml).unwrap();
        let tuning = def.setup.tuning.unwrap();
        assert_eq!(tuning.rules.serve_delay, 0.5);
        assert_eq!(tuning.rules.points_per_goal, 2);
        assert_eq!(tuning.fixed_timestep, 0.02);
    }

    #[test]
    fn test_empty_definition_runs_one_frame() {
        let def = parse_test_str("name = \"Empty\"").unwrap();
        assert!(!def.setup.start_game);
        assert_eq!(def.last_frame(), 1);
    }
}

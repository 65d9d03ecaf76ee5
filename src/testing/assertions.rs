//! Assertion checking for test expectations

use bevy::prelude::*;
use std::collections::HashMap;

use super::parser::{ExpectedEvent, StateAssertion};
use crate::ball::{Ball, BallBody, BallState};
use crate::events::BusEvent;
use crate::player::{CharacterMotor, ControlsEnabled, Player, PlayerSlot};
use crate::scoring::{GameState, RoundPhase};
use crate::shooting::ShootingState;

/// Tolerance for float `=` / `!=` checks
const FLOAT_TOLERANCE: f32 = 0.1;

/// Error when an assertion fails
#[derive(Debug, Clone)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n    Expected: {}\n    Actual: {}",
            self.message, self.expected, self.actual
        )
    }
}

/// Captured event with timing info
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub frame: u64,
    pub event_type: String,
    /// "player1" / "player2"
    pub player: Option<String>,
}

pub fn player_id(slot: PlayerSlot) -> String {
    format!("player{}", slot.number())
}

impl CapturedEvent {
    pub fn from_bus_event(event: &BusEvent) -> Self {
        Self {
            frame: event.tick,
            event_type: event.event.name().to_string(),
            player: event.event.player().map(player_id),
        }
    }
}

/// Check if captured events match expected sequence
pub fn check_sequence(
    expected: &[ExpectedEvent],
    captured: &[CapturedEvent],
) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        // Find matching event starting from current position
        let found = captured[captured_idx..].iter().enumerate().find(|(_, cap)| {
            cap.event_type == exp.event
                && exp
                    .player
                    .as_ref()
                    .is_none_or(|p| cap.player.as_ref() == Some(p))
        });

        let Some((offset, cap)) = found else {
            let player_str = exp
                .player
                .as_ref()
                .map(|p| format!(" (player: {})", p))
                .unwrap_or_default();
            return Err(AssertionError {
                message: format!("Event #{} '{}'{} not found", i + 1, exp.event, player_str),
                expected: format!("'{}' event in sequence", exp.event),
                actual: format!(
                    "events after position {}: {:?}",
                    captured_idx,
                    captured[captured_idx..]
                        .iter()
                        .map(|e| &e.event_type)
                        .collect::<Vec<_>>()
                ),
            });
        };

        if let Some(min) = exp.frame_min
            && cap.frame < min
        {
            return Err(AssertionError {
                message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                expected: format!("frame >= {}", min),
                actual: format!("frame {}", cap.frame),
            });
        }
        if let Some(max) = exp.frame_max
            && cap.frame > max
        {
            return Err(AssertionError {
                message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                expected: format!("frame <= {}", max),
                actual: format!("frame {}", cap.frame),
            });
        }
        captured_idx += offset + 1;
    }

    Ok(())
}

/// A value read out of the world for a check
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f32),
    Bool(bool),
    Text(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Snapshot of one player for assertions
#[derive(Debug, Clone)]
pub struct PlayerView {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    pub jumping: bool,
    pub holding_ball: bool,
    pub controls: bool,
}

#[derive(Debug, Clone)]
pub struct BallView {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    /// "Free", "Held" or "Locked"
    pub state: String,
}

/// World state for assertions
#[derive(Debug, Clone)]
pub struct WorldState {
    pub players: HashMap<String, PlayerView>,
    pub ball: Option<BallView>,
    pub score_1: u32,
    pub score_2: u32,
    pub phase: RoundPhase,
}

impl WorldState {
    pub fn capture(world: &mut World) -> Self {
        let players = world
            .query_filtered::<(
                &PlayerSlot,
                &Transform,
                &CharacterMotor,
                &ShootingState,
                &ControlsEnabled,
            ), With<Player>>()
            .iter(world)
            .map(|(&slot, transform, motor, shooting, controls)| {
                (
                    player_id(slot),
                    PlayerView {
                        position: transform.translation,
                        velocity: motor.velocity(),
                        grounded: motor.is_grounded(),
                        jumping: motor.jumping.jumping,
                        holding_ball: shooting.is_holding(),
                        controls: controls.0,
                    },
                )
            })
            .collect();

        let ball = world
            .query_filtered::<(&Transform, &BallBody), With<Ball>>()
            .iter(world)
            .next()
            .map(|(transform, body)| BallView {
                position: transform.translation,
                velocity: body.velocity,
                grounded: body.grounded,
                state: match body.state {
                    BallState::Free => "Free",
                    BallState::Held(_) => "Held",
                    BallState::Locked(_) => "Locked",
                }
                .to_string(),
            });

        let game = world.resource::<GameState>();
        Self {
            players,
            ball,
            score_1: game.scores.player1,
            score_2: game.scores.player2,
            phase: game.phase,
        }
    }

    /// Resolve a dotted path such as `player1.y` or `score.player2`
    pub fn lookup(&self, path: &str) -> Result<Value, AssertionError> {
        let unknown = || AssertionError {
            message: format!("Unknown property '{}'", path),
            expected: "score.*, round.phase, ball.* or playerN.*".to_string(),
            actual: path.to_string(),
        };

        let (head, field) = path.split_once('.').ok_or_else(unknown)?;
        match head {
            "score" => match field {
                "player1" => Ok(Value::Number(self.score_1 as f32)),
                "player2" => Ok(Value::Number(self.score_2 as f32)),
                _ => Err(unknown()),
            },
            "round" if field == "phase" => Ok(Value::Text(format!("{:?}", self.phase))),
            "ball" => {
                let ball = self.ball.as_ref().ok_or_else(|| AssertionError {
                    message: "Ball state check failed".to_string(),
                    expected: "ball exists".to_string(),
                    actual: "no ball".to_string(),
                })?;
                match field {
                    "state" => Ok(Value::Text(ball.state.clone())),
                    "grounded" => Ok(Value::Bool(ball.grounded)),
                    _ => vector_field(ball.position, ball.velocity, field).ok_or_else(unknown),
                }
            }
            id => {
                let player = self.players.get(id).ok_or_else(|| AssertionError {
                    message: format!("Entity '{}' not found", id),
                    expected: format!("entity '{}'", id),
                    actual: format!("available: {:?}", self.players.keys().collect::<Vec<_>>()),
                })?;
                match field {
                    "grounded" => Ok(Value::Bool(player.grounded)),
                    "jumping" => Ok(Value::Bool(player.jumping)),
                    "holding_ball" => Ok(Value::Bool(player.holding_ball)),
                    "controls" => Ok(Value::Bool(player.controls)),
                    _ => vector_field(player.position, player.velocity, field).ok_or_else(unknown),
                }
            }
        }
    }
}

fn vector_field(position: Vec3, velocity: Vec3, field: &str) -> Option<Value> {
    let value = match field {
        "x" => position.x,
        "y" => position.y,
        "z" => position.z,
        "velocity_x" => velocity.x,
        "velocity_y" => velocity.y,
        "velocity_z" => velocity.z,
        "speed" => velocity.length(),
        _ => return None,
    };
    Some(Value::Number(value))
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Try operators in order of specificity (>= before >, etc.)
    for op in &[">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

fn compare(actual: &Value, operator: &str, expected: &str) -> Option<bool> {
    match actual {
        Value::Number(actual) => {
            let expected: f32 = expected.parse().ok()?;
            Some(match operator {
                "=" => (actual - expected).abs() <= FLOAT_TOLERANCE,
                "!=" => (actual - expected).abs() > FLOAT_TOLERANCE,
                ">" => *actual > expected,
                "<" => *actual < expected,
                ">=" => *actual >= expected,
                "<=" => *actual <= expected,
                _ => return None,
            })
        }
        Value::Bool(actual) => {
            let expected: bool = expected.parse().ok()?;
            match operator {
                "=" => Some(*actual == expected),
                "!=" => Some(*actual != expected),
                _ => None,
            }
        }
        Value::Text(actual) => {
            let expected = expected.trim_matches('"');
            match operator {
                "=" => Some(actual == expected),
                "!=" => Some(actual != expected),
                _ => None,
            }
        }
    }
}

/// Check state assertions against world state
pub fn check_state(assertion: &StateAssertion, state: &WorldState) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'entity.property = value' or 'entity.property > value'"
                .to_string(),
            actual: check.clone(),
        })?;

        let actual = state.lookup(path)?;
        match compare(&actual, operator, expected) {
            Some(true) => {}
            Some(false) => {
                return Err(AssertionError {
                    message: format!(
                        "Check failed after frame {}: {}",
                        assertion.after_frame, check
                    ),
                    expected: format!("{} {}", operator, expected),
                    actual: actual.to_string(),
                });
            }
            None => {
                return Err(AssertionError {
                    message: format!("Cannot compare {} with '{} {}'", path, operator, expected),
                    expected: "a value of the property's type".to_string(),
                    actual: actual.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(frame: u64, event_type: &str, player: Option<&str>) -> CapturedEvent {
        CapturedEvent {
            frame,
            event_type: event_type.to_string(),
            player: player.map(str::to_string),
        }
    }

    fn expected(event: &str, player: Option<&str>) -> ExpectedEvent {
        ExpectedEvent {
            event: event.to_string(),
            player: player.map(str::to_string),
            frame_min: None,
            frame_max: None,
        }
    }

    fn state() -> WorldState {
        let mut players = HashMap::new();
        players.insert(
            "player1".to_string(),
            PlayerView {
                position: Vec3::new(-8.0, 1.0, 0.0),
                velocity: Vec3::new(0.0, -0.2, 0.0),
                grounded: true,
                jumping: false,
                holding_ball: false,
                controls: true,
            },
        );
        WorldState {
            players,
            ball: Some(BallView {
                position: Vec3::new(18.0, 2.0, 0.0),
                velocity: Vec3::ZERO,
                grounded: false,
                state: "Locked".to_string(),
            }),
            score_1: 2,
            score_2: 0,
            phase: RoundPhase::Active,
        }
    }

    fn assertion(checks: &[&str]) -> StateAssertion {
        StateAssertion {
            after_frame: 5,
            checks: checks.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_sequence_in_order() {
        let events = vec![
            captured(1, "RoundStart", None),
            captured(4, "Jump", Some("player2")),
            captured(4, "Jump", Some("player1")),
            captured(30, "Land", Some("player1")),
        ];
        let exp = vec![expected("Jump", Some("player1")), expected("Land", None)];
        assert!(check_sequence(&exp, &events).is_ok());

        // Land before Jump is out of order
        let exp = vec![expected("Land", None), expected("Jump", None)];
        assert!(check_sequence(&exp, &events).is_err());
    }

    #[test]
    fn test_sequence_frame_bounds() {
        let events = vec![captured(12, "Goal", Some("player1"))];
        let mut exp = expected("Goal", Some("player1"));
        exp.frame_max = Some(10);
        let err = check_sequence(&[exp], &events).unwrap_err();
        assert!(err.message.contains("too late"));
    }

    #[test]
    fn test_state_checks() {
        let state = state();
        assert!(
            check_state(
                &assertion(&[
                    "score.player1 = 2",
                    "score.player2 = 0",
                    "round.phase = Active",
                    "ball.state = \"Locked\"",
                    "ball.x > 17",
                    "player1.grounded = true",
                    "player1.y = 1.05",
                ]),
                &state
            )
            .is_ok()
        );

        assert!(check_state(&assertion(&["score.player1 >= 3"]), &state).is_err());
        assert!(check_state(&assertion(&["player2.x = 0"]), &state).is_err());
        assert!(check_state(&assertion(&["player1.grounded > 1"]), &state).is_err());
        assert!(check_state(&assertion(&["nonsense"]), &state).is_err());
    }
}

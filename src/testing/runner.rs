//! Test execution engine
//!
//! Builds the headless scene, applies the scenario's placements, then steps
//! the fixed schedule frame by frame while draining the event bus and checking
//! state assertions as their frames come up.

use bevy::prelude::*;

use crate::ball::{Ball, BallBody};
use crate::events::{BusEvent, EventBus};
use crate::player::{CharacterMotor, Player, PlayerSlot, SpawnPoint};
use crate::shooting::ShootingState;
use crate::simulation::{HeadlessAppBuilder, TickSet, step};

use super::assertions::{AssertionError, CapturedEvent, WorldState, check_sequence, check_state};
use super::input::{ScriptedInputs, apply_scripted_input};
use super::parser::{EntityDef, TestDefinition};

/// Result of running a test
#[derive(Debug)]
pub enum TestResult {
    Pass { frames: u64 },
    Fail { error: AssertionError },
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }
}

/// Run a single test and return the result
pub fn run_test(test: &TestDefinition) -> TestResult {
    run_test_with(test, HeadlessAppBuilder::new().with_minimal_threads(), |_| {})
}

/// Run a test on an app from `builder`, handing each tick's drained events
/// to `on_events` before they are checked. Tuning in the scenario overrides
/// the builder's.
pub fn run_test_with(
    test: &TestDefinition,
    mut builder: HeadlessAppBuilder,
    mut on_events: impl FnMut(&[BusEvent]),
) -> TestResult {
    let scripted = match ScriptedInputs::from_inputs(&test.input) {
        Ok(scripted) => scripted,
        Err(message) => return TestResult::Error { message },
    };

    if let Some(tuning) = &test.setup.tuning {
        builder = builder.with_tuning(tuning.clone());
    }
    if test.setup.start_game {
        builder = builder.with_new_game();
    }
    let mut app = match builder.build() {
        Ok(app) => app,
        Err(e) => {
            return TestResult::Error {
                message: format!("Setup failed: {}", e),
            };
        }
    };

    app.insert_resource(scripted);
    app.add_systems(FixedUpdate, apply_scripted_input.in_set(TickSet::Input));

    let last_frame = test.last_frame();
    let mut captured: Vec<CapturedEvent> = Vec::new();
    let mut state_checks = test.expect.state.clone();
    state_checks.sort_by_key(|s| s.after_frame);
    let mut next_check = 0;

    // Placements go in after the opening tick so the new game does not undo them
    let mut first_frame = 1;
    if test.setup.start_game {
        step(&mut app);
        drain_events(&mut app, &mut captured, &mut on_events);
        first_frame = 2;
    }
    if let Err(message) = apply_entities(app.world_mut(), &test.setup.entities) {
        return TestResult::Error { message };
    }

    for frame in first_frame..=last_frame {
        step(&mut app);
        drain_events(&mut app, &mut captured, &mut on_events);

        while let Some(assertion) = state_checks.get(next_check) {
            if assertion.after_frame > frame {
                break;
            }
            let state = WorldState::capture(app.world_mut());
            if let Err(error) = check_state(assertion, &state) {
                return TestResult::Fail { error };
            }
            next_check += 1;
        }
    }

    if let Err(error) = check_sequence(&test.expect.sequence, &captured) {
        return TestResult::Fail { error };
    }

    TestResult::Pass { frames: last_frame }
}

fn drain_events(
    app: &mut App,
    captured: &mut Vec<CapturedEvent>,
    on_events: &mut impl FnMut(&[BusEvent]),
) {
    let events = app.world_mut().resource_mut::<EventBus>().drain();
    on_events(&events);
    captured.extend(events.iter().map(CapturedEvent::from_bus_event));
}

/// Move players and the ball to the scenario's starting placements
fn apply_entities(world: &mut World, entities: &[EntityDef]) -> Result<(), String> {
    let ball = world
        .query_filtered::<Entity, With<Ball>>()
        .iter(world)
        .next()
        .ok_or("No ball in scene")?;

    for def in entities {
        match def {
            EntityDef::Player {
                id,
                x,
                y,
                z,
                holding_ball,
            } => {
                let slot = PlayerSlot::parse(id).ok_or_else(|| format!("Unknown player '{}'", id))?;
                let player = world
                    .query_filtered::<(Entity, &PlayerSlot), With<Player>>()
                    .iter(world)
                    .find(|(_, s)| **s == slot)
                    .map(|(e, _)| e)
                    .ok_or_else(|| format!("{} not spawned", slot))?;

                let position = Vec3::new(*x, *y, *z);
                let mut entity = world.entity_mut(player);
                if let Some(mut transform) = entity.get_mut::<Transform>() {
                    transform.translation = position;
                }
                if let Some(mut spawn) = entity.get_mut::<SpawnPoint>() {
                    spawn.0 = position;
                }
                if let Some(mut motor) = entity.get_mut::<CharacterMotor>() {
                    motor.reset();
                }

                if *holding_ball {
                    let picked_up = world
                        .get_mut::<BallBody>(ball)
                        .is_some_and(|mut body| body.pickup(player));
                    if !picked_up {
                        return Err(format!("{} cannot hold the ball: it is not free", slot));
                    }
                    if let Some(mut shooting) = world.get_mut::<ShootingState>(player) {
                        shooting.ball = Some(ball);
                    }
                }
            }
            EntityDef::Ball {
                x,
                y,
                z,
                velocity_x,
                velocity_y,
                velocity_z,
            } => {
                let mut entity = world.entity_mut(ball);
                if let Some(mut transform) = entity.get_mut::<Transform>() {
                    transform.translation = Vec3::new(*x, *y, *z);
                }
                if let Some(mut body) = entity.get_mut::<BallBody>() {
                    body.reset();
                    body.velocity = Vec3::new(*velocity_x, *velocity_y, *velocity_z);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::parser::parse_test_str;

    fn run(toml: &str) -> TestResult {
        run_test(&parse_test_str(toml).unwrap())
    }

    #[test]
    fn test_idle_players_stay_grounded() {
        let result = run(r#"
name = "idle"
[[expect.state]]
after_frame = 20
checks = ["player1.grounded = true", "player2.y = 1.0", "round.phase = NotStarted"]
"#);
        assert!(result.is_pass(), "{:?}", result);
    }

    #[test]
    fn test_failed_check_reports_fail() {
        let result = run(r#"
name = "fails"
[[expect.state]]
after_frame = 2
checks = ["score.player1 = 5"]
"#);
        assert!(matches!(result, TestResult::Fail { .. }));
    }

    #[test]
    fn test_events_reach_callback() {
        let def = parse_test_str(
            r#"
name = "events"
[setup]
start_game = true
frames = 3
"#,
        )
        .unwrap();
        let mut names = Vec::new();
        let result = run_test_with(
            &def,
            HeadlessAppBuilder::new().with_minimal_threads(),
            |events| names.extend(events.iter().map(|e| e.event.name())),
        );
        assert!(result.is_pass(), "{:?}", result);
        assert_eq!(names.first(), Some(&"RoundStart"));
        assert!(names.contains(&"BallServed"));
    }

    #[test]
    fn test_unknown_player_is_error() {
        let result = run(r#"
name = "bad entity"
[[setup.entities]]
type = "player"
id = "player7"
x = 0.0
y = 1.0
"#);
        assert!(matches!(result, TestResult::Error { .. }));
    }

    #[test]
    fn test_held_ball_placement() {
        let result = run(r#"
name = "held"
[[setup.entities]]
type = "player"
id = "player2"
x = 3.0
y = 1.0
holding_ball = true
[[expect.state]]
after_frame = 3
checks = ["player2.holding_ball = true", "ball.state = Held"]
"#);
        assert!(result.is_pass(), "{:?}", result);
    }
}

//! Round, goal and hit systems

use bevy::prelude::*;
use rand::Rng;

use crate::ball::{Ball, BallBody, LastShooter, ShotGrace, serve_ball};
use crate::events::{EventBus, GameEvent};
use crate::player::{
    CharacterMotor, ControlsEnabled, Player, PlayerSlot, SpawnPoint, kickoff_facing,
};
use crate::scoring::GameState;
use crate::shooting::ShootingState;
use crate::tuning::GameplayTuning;
use crate::world::{Aabb, Net, sphere_contact};

/// Pending round commands from outside the simulation (binaries, scenarios)
#[derive(Resource, Default, Debug)]
pub struct RoundControl {
    pub new_game_requested: bool,
}

impl RoundControl {
    pub fn request_new_game(&mut self) {
        self.new_game_requested = true;
    }
}

/// Drop point for a serve, jittered horizontally when configured
fn serve_position(tuning: &GameplayTuning) -> Vec3 {
    let drop = tuning.arena.ball_drop_point;
    let jitter = tuning.rules.serve_jitter;
    if jitter <= 0.0 {
        return drop;
    }
    let mut rng = rand::thread_rng();
    drop + Vec3::new(
        rng.gen_range(-jitter..=jitter),
        0.0,
        rng.gen_range(-jitter..=jitter),
    )
}

fn emit_served(bus: &mut EventBus, position: Vec3) {
    bus.emit(GameEvent::BallServed {
        pos: (position.x, position.y, position.z),
    });
}

/// Start a new game when one was requested: scores, clock, spawns, ball
#[allow(clippy::too_many_arguments)]
pub fn start_requested_game(
    mut control: ResMut<RoundControl>,
    mut game: ResMut<GameState>,
    tuning: Res<GameplayTuning>,
    time: Res<Time<Fixed>>,
    mut bus: ResMut<EventBus>,
    mut players: Query<
        (
            &PlayerSlot,
            &SpawnPoint,
            &mut Transform,
            &mut CharacterMotor,
            &mut ShootingState,
            &mut ControlsEnabled,
        ),
        With<Player>,
    >,
    mut balls: Query<
        (
            &mut BallBody,
            &mut Transform,
            &mut LastShooter,
            &mut ShotGrace,
        ),
        (With<Ball>, Without<Player>),
    >,
) {
    if !control.new_game_requested {
        return;
    }
    control.new_game_requested = false;

    let now = time.elapsed_secs();
    game.new_game(now);
    bus.emit(GameEvent::RoundStart {
        duration: game.rules.round_duration,
    });
    info!(
        "New game: {}s round, first past {} wins",
        game.rules.round_duration, game.rules.max_score
    );

    for (&slot, spawn, mut transform, mut motor, mut shooting, mut controls) in &mut players {
        transform.translation = spawn.0;
        transform.rotation = kickoff_facing(slot);
        motor.reset();
        *shooting = ShootingState::default();
        controls.0 = true;
        bus.emit(GameEvent::Controls {
            player: slot,
            enabled: true,
        });
    }

    for (mut body, mut transform, mut last_shooter, mut grace) in &mut balls {
        let position = serve_position(&tuning);
        serve_ball(&mut body, &mut transform, &mut last_shooter, position);
        grace.0 = 0.0;
        emit_served(&mut bus, position);
    }
}

/// A shot ball touching the shooter's opponent scores a hit
pub fn check_hits(
    tuning: Res<GameplayTuning>,
    mut game: ResMut<GameState>,
    mut bus: ResMut<EventBus>,
    mut balls: Query<(&Transform, &BallBody, &mut LastShooter), With<Ball>>,
    players: Query<(&PlayerSlot, &Transform), (With<Player>, Without<Ball>)>,
) {
    for (ball_transform, body, mut last_shooter) in &mut balls {
        let Some(shooter) = last_shooter.0 else {
            continue;
        };
        if !body.is_free() {
            continue;
        }

        let struck = players.iter().any(|(&slot, transform)| {
            slot == shooter.opponent()
                && sphere_contact(
                    ball_transform.translation,
                    tuning.ball.radius,
                    &Aabb::new(transform.translation, tuning.motor.half_extents),
                )
                .is_some()
        });
        if !struck {
            continue;
        }

        last_shooter.0 = None;
        if game.player_hit(shooter) {
            info!(
                "{} hit {}! Score: {} - {}",
                shooter,
                shooter.opponent(),
                game.scores.player1,
                game.scores.player2
            );
            bus.emit(GameEvent::Hit {
                shooter,
                score_1: game.scores.player1,
                score_2: game.scores.player2,
            });
        }
    }
}

/// A free ball whose centre enters a net is captured and scores for the net's player
pub fn check_goals(
    time: Res<Time<Fixed>>,
    mut game: ResMut<GameState>,
    mut bus: ResMut<EventBus>,
    mut balls: Query<(&Transform, &mut BallBody, &mut LastShooter), With<Ball>>,
    nets: Query<(Entity, &Net, &Transform), Without<Ball>>,
) {
    let now = time.elapsed_secs();

    for (ball_transform, mut body, mut last_shooter) in &mut balls {
        if !body.is_free() {
            continue;
        }

        for (net_entity, net, net_transform) in &nets {
            if !net
                .volume(net_transform)
                .contains_point(ball_transform.translation)
            {
                continue;
            }

            if game.player_scored(net.player) {
                info!(
                    "GOAL! {} scores. Score: {} - {}",
                    net.player, game.scores.player1, game.scores.player2
                );
                bus.emit(GameEvent::Goal {
                    player: net.player,
                    score_1: game.scores.player1,
                    score_2: game.scores.player2,
                });
            }

            body.lock(Some(net_entity));
            last_shooter.0 = None;
            game.schedule_serve(now);
            break;
        }
    }
}

/// Round clock and serves: end the round when due, return captured balls
pub fn update_round(
    tuning: Res<GameplayTuning>,
    time: Res<Time<Fixed>>,
    mut game: ResMut<GameState>,
    mut bus: ResMut<EventBus>,
    mut players: Query<(&PlayerSlot, &mut ControlsEnabled), With<Player>>,
    mut balls: Query<(&mut BallBody, &mut Transform, &mut LastShooter), With<Ball>>,
) {
    let now = time.elapsed_secs();

    if let Some(outcome) = game.update(now) {
        for (&slot, mut controls) in &mut players {
            controls.0 = false;
            bus.emit(GameEvent::Controls {
                player: slot,
                enabled: false,
            });
        }
        info!(
            "Game over: {:?} ({} - {})",
            outcome, game.scores.player1, game.scores.player2
        );
        bus.emit(GameEvent::RoundEnd {
            score_1: game.scores.player1,
            score_2: game.scores.player2,
            outcome,
        });
    }

    if game.take_due_serve(now) {
        for (mut body, mut transform, mut last_shooter) in &mut balls {
            if !body.is_locked() {
                continue;
            }
            let position = serve_position(&tuning);
            serve_ball(&mut body, &mut transform, &mut last_shooter, position);
            emit_served(&mut bus, position);
        }
    }
}

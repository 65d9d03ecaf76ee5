//! Ball-player interaction systems

use bevy::prelude::*;

use crate::ball::components::*;
use crate::events::{EventBus, GameEvent};
use crate::player::{ControlsEnabled, Player, PlayerSlot};
use crate::shooting::ShootingState;
use crate::tuning::GameplayTuning;

/// A player with free hands and enabled controls grabs a free ball in reach.
/// A shot still in flight cannot be caught by the player it is aimed at.
pub fn pickup_ball(
    tuning: Res<GameplayTuning>,
    mut bus: ResMut<EventBus>,
    mut players: Query<
        (
            Entity,
            &PlayerSlot,
            &Transform,
            &ControlsEnabled,
            &mut ShootingState,
        ),
        With<Player>,
    >,
    mut balls: Query<
        (Entity, &Transform, &mut BallBody, &ShotGrace, &LastShooter),
        (With<Ball>, Without<Player>),
    >,
) {
    for (ball_entity, ball_transform, mut body, grace, last_shooter) in &mut balls {
        if !body.is_free() || grace.0 > 0.0 {
            continue;
        }

        for (player_entity, &slot, player_transform, controls, mut shooting) in &mut players {
            if !controls.0 || shooting.ball.is_some() {
                continue;
            }
            if last_shooter.0.is_some_and(|shooter| shooter != slot) {
                continue;
            }

            let distance = player_transform
                .translation
                .distance(ball_transform.translation);
            if distance < tuning.shooting.pickup_radius && body.pickup(player_entity) {
                shooting.ball = Some(ball_entity);
                bus.emit(GameEvent::Pickup { player: slot });
                break;
            }
        }
    }
}

/// Held balls ride at the carry offset; locked balls sit on their target
pub fn ball_follow_attachment(
    tuning: Res<GameplayTuning>,
    mut balls: Query<(&BallBody, &mut Transform), With<Ball>>,
    anchors: Query<&Transform, Without<Ball>>,
) {
    for (body, mut transform) in &mut balls {
        match body.state {
            BallState::Free => {}
            BallState::Held(holder) => {
                if let Ok(anchor) = anchors.get(holder) {
                    transform.translation =
                        anchor.translation + anchor.rotation * tuning.shooting.carry_offset;
                }
            }
            BallState::Locked(target) => {
                if let Ok(anchor) = anchors.get(target) {
                    transform.translation = anchor.translation;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;

    fn setup_app() -> App {
        let mut app = App::new();
        app.insert_resource(GameplayTuning::default())
            .insert_resource(EventBus::new())
            .add_systems(FixedUpdate, pickup_ball);
        app
    }

    fn spawn_player(app: &mut App, slot: PlayerSlot, position: Vec3) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                slot,
                Transform::from_translation(position),
                ControlsEnabled(true),
                ShootingState::default(),
            ))
            .id()
    }

    fn spawn_ball(app: &mut App, position: Vec3, shooter: Option<PlayerSlot>) -> Entity {
        app.world_mut()
            .spawn((
                Ball,
                BallBody::default(),
                ShotGrace::default(),
                LastShooter(shooter),
                Transform::from_translation(position),
            ))
            .id()
    }

    #[test]
    fn test_free_ball_in_reach_is_picked_up() {
        let mut app = setup_app();
        let player = spawn_player(&mut app, PlayerSlot::Two, Vec3::new(8.0, 1.0, 0.0));
        let ball = spawn_ball(&mut app, Vec3::new(7.0, 1.5, 0.0), None);

        app.world_mut().run_schedule(FixedUpdate);

        assert_eq!(app.world().get::<BallBody>(ball).unwrap().holder(), Some(player));
        assert_eq!(
            app.world().get::<ShootingState>(player).unwrap().ball,
            Some(ball)
        );
    }

    #[test]
    fn test_target_cannot_catch_live_shot() {
        let mut app = setup_app();
        let target = spawn_player(&mut app, PlayerSlot::Two, Vec3::new(8.0, 1.0, 0.0));
        let ball = spawn_ball(&mut app, Vec3::new(7.0, 1.5, 0.0), Some(PlayerSlot::One));

        app.world_mut().run_schedule(FixedUpdate);

        assert!(app.world().get::<BallBody>(ball).unwrap().is_free());
        assert!(!app.world().get::<ShootingState>(target).unwrap().is_holding());
    }

    #[test]
    fn test_shooter_can_catch_own_shot() {
        let mut app = setup_app();
        let shooter = spawn_player(&mut app, PlayerSlot::One, Vec3::new(-8.0, 1.0, 0.0));
        let ball = spawn_ball(&mut app, Vec3::new(-7.0, 1.5, 0.0), Some(PlayerSlot::One));

        app.world_mut().run_schedule(FixedUpdate);

        assert_eq!(app.world().get::<BallBody>(ball).unwrap().holder(), Some(shooter));
    }
}

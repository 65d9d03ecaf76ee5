//! Ball physics systems

use bevy::prelude::*;

use crate::ball::components::*;
use crate::player::Player;
use crate::tuning::GameplayTuning;
use crate::world::{Collider, sphere_contact};

/// Spawn a free ball at `position`
pub fn spawn_ball(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Name::new("Ball"),
            Ball,
            BallBody::default(),
            ShotGrace::default(),
            LastShooter::default(),
            Transform::from_translation(position),
        ))
        .id()
}

/// Free flight for every ball, and the pickup grace countdown
pub fn integrate_balls(
    tuning: Res<GameplayTuning>,
    time: Res<Time<Fixed>>,
    mut balls: Query<(&mut BallBody, &mut Transform, &mut ShotGrace), With<Ball>>,
) {
    let dt = time.delta_secs();

    for (mut body, mut transform, mut grace) in &mut balls {
        if grace.0 > 0.0 {
            grace.0 = (grace.0 - dt).max(0.0);
        }
        transform.translation += body.integrate(dt, &tuning.ball);
    }
}

/// Push free balls out of arena geometry and bounce them on contact entry.
/// Touching the floor ends a shot.
pub fn ball_collisions(
    tuning: Res<GameplayTuning>,
    mut balls: Query<(&mut BallBody, &mut Transform, Option<&mut LastShooter>), With<Ball>>,
    colliders: Query<(&Collider, &Transform), (Without<Ball>, Without<Player>)>,
) {
    let radius = tuning.ball.radius;

    for (mut body, mut transform, mut last_shooter) in &mut balls {
        if !body.is_free() {
            continue;
        }

        for (collider, collider_transform) in &colliders {
            let aabb = collider.aabb(collider_transform);
            let Some(contact) = sphere_contact(transform.translation, radius, &aabb) else {
                continue;
            };

            transform.translation += contact.normal * contact.depth;

            // Resting or sliding along the surface is not a new contact
            if body.velocity.dot(contact.normal) < 0.0 {
                body.on_contact(contact.normal);
                if body.grounded
                    && let Some(shooter) = last_shooter.as_mut()
                {
                    shooter.0 = None;
                }
            }
        }
    }
}

/// Return the ball to `position` as a fresh free ball
pub fn serve_ball(
    body: &mut BallBody,
    transform: &mut Transform,
    last_shooter: &mut LastShooter,
    position: Vec3,
) {
    body.reset();
    transform.translation = position;
    last_shooter.0 = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use crate::player::PlayerSlot;
    use std::time::Duration;

    fn setup_app() -> App {
        let mut app = App::new();
        app.insert_resource(GameplayTuning::default())
            .insert_resource(EventBus::new())
            .init_resource::<Time<Fixed>>()
            .add_systems(FixedUpdate, (integrate_balls, ball_collisions).chain());
        app
    }

    fn step(app: &mut App, ticks: u32) {
        let dt = GameplayTuning::default().fixed_timestep;
        for _ in 0..ticks {
            app.world_mut()
                .resource_mut::<Time<Fixed>>()
                .advance_by(Duration::from_secs_f32(dt));
            app.world_mut().run_schedule(FixedUpdate);
        }
    }

    fn spawn_floor(app: &mut App) {
        app.world_mut().spawn((
            Collider {
                half_extents: Vec3::new(10.0, 0.5, 10.0),
            },
            Transform::from_xyz(0.0, -0.5, 0.0),
        ));
    }

    #[test]
    fn test_dropped_ball_lands_and_rests() {
        let mut app = setup_app();
        spawn_floor(&mut app);
        let ball = app
            .world_mut()
            .spawn((
                Ball,
                BallBody::default(),
                ShotGrace::default(),
                Transform::from_xyz(0.0, 3.0, 0.0),
            ))
            .id();

        step(&mut app, 200);

        let body = app.world().get::<BallBody>(ball).unwrap();
        let pos = app.world().get::<Transform>(ball).unwrap().translation;
        assert!(body.grounded);
        assert_eq!(body.velocity.y, 0.0);
        assert!((pos.y - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_floor_contact_ends_shot() {
        let mut app = setup_app();
        spawn_floor(&mut app);
        let ball = app
            .world_mut()
            .spawn((
                Ball,
                BallBody {
                    velocity: Vec3::new(0.0, -10.0, 0.0),
                    ..default()
                },
                ShotGrace::default(),
                LastShooter(Some(PlayerSlot::One)),
                Transform::from_xyz(0.0, 1.0, 0.0),
            ))
            .id();

        step(&mut app, 10);

        assert!(app.world().get::<BallBody>(ball).unwrap().grounded);
        assert_eq!(app.world().get::<LastShooter>(ball).unwrap().0, None);
    }

    #[test]
    fn test_wall_contact_keeps_shot_live() {
        let mut app = setup_app();
        app.world_mut().spawn((
            Collider {
                half_extents: Vec3::new(0.5, 5.0, 5.0),
            },
            Transform::from_xyz(3.0, 0.0, 0.0),
        ));
        let ball = app
            .world_mut()
            .spawn((
                Ball,
                BallBody {
                    velocity: Vec3::new(20.0, 0.0, 0.0),
                    ..default()
                },
                ShotGrace::default(),
                LastShooter(Some(PlayerSlot::Two)),
                Transform::from_xyz(0.0, 0.0, 0.0),
            ))
            .id();

        step(&mut app, 10);

        assert!(app.world().get::<BallBody>(ball).unwrap().velocity.x < 0.0);
        assert_eq!(
            app.world().get::<LastShooter>(ball).unwrap().0,
            Some(PlayerSlot::Two)
        );
    }

    #[test]
    fn test_ball_bounces_off_wall() {
        let mut app = setup_app();
        app.world_mut().spawn((
            Collider {
                half_extents: Vec3::new(0.5, 5.0, 5.0),
            },
            Transform::from_xyz(3.0, 0.0, 0.0),
        ));
        let ball = app
            .world_mut()
            .spawn((
                Ball,
                BallBody {
                    velocity: Vec3::new(20.0, 0.0, 0.0),
                    grounded: true,
                    ..default()
                },
                ShotGrace::default(),
                Transform::from_xyz(0.0, 0.0, 0.0),
            ))
            .id();

        step(&mut app, 10);

        let body = app.world().get::<BallBody>(ball).unwrap();
        let pos = app.world().get::<Transform>(ball).unwrap().translation;
        assert!(body.velocity.x < 0.0);
        assert!(pos.x <= 2.0 + 1e-4);
    }

    #[test]
    fn test_held_ball_ignores_collisions() {
        let mut app = setup_app();
        spawn_floor(&mut app);
        let holder = app.world_mut().spawn_empty().id();
        let mut body = BallBody::default();
        body.pickup(holder);
        let ball = app
            .world_mut()
            .spawn((
                Ball,
                body,
                ShotGrace::default(),
                Transform::from_xyz(0.0, 0.2, 0.0),
            ))
            .id();

        step(&mut app, 5);

        let pos = app.world().get::<Transform>(ball).unwrap().translation;
        assert_eq!(pos, Vec3::new(0.0, 0.2, 0.0));
    }
}

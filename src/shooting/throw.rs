//! Ball shooting system

use bevy::prelude::*;

use crate::ball::{Ball, BallBody, LastShooter, ShotGrace};
use crate::events::{EventBus, GameEvent};
use crate::player::{ControlsEnabled, MotorInput, Player, PlayerSlot};
use crate::shooting::ShootingState;
use crate::tuning::GameplayTuning;

/// Runs in FixedUpdate: charge while the shoot button is held, fire on release
pub fn update_shooting(
    tuning: Res<GameplayTuning>,
    time: Res<Time<Fixed>>,
    mut bus: ResMut<EventBus>,
    mut players: Query<
        (
            Entity,
            &PlayerSlot,
            &MotorInput,
            &ControlsEnabled,
            &Transform,
            &mut ShootingState,
        ),
        With<Player>,
    >,
    mut balls: Query<(&mut BallBody, &mut ShotGrace, &mut LastShooter), With<Ball>>,
) {
    let now = time.elapsed_secs();
    let shooting_tuning = &tuning.shooting;

    for (entity, &slot, input, controls, transform, mut shooting) in &mut players {
        // Drop a stale reference if the ball was reset or taken away
        if let Some(ball) = shooting.ball {
            let still_held = balls
                .get(ball)
                .is_ok_and(|(body, _, _)| body.holder() == Some(entity));
            if !still_held {
                shooting.ball = None;
            }
        }

        // Losing control is not a release; the held button is forgotten
        if !controls.0 {
            shooting.cancel();
            continue;
        }

        let Some(release) = shooting.update(now, input.shoot, shooting_tuning.shoot_charge_time)
        else {
            continue;
        };
        let Ok((mut body, mut grace, mut last_shooter)) = balls.get_mut(release.ball) else {
            continue;
        };

        let speed = shooting_tuning.shoot_speed * release.charge;
        let forward = transform.rotation * Vec3::NEG_Z;
        body.shoot(forward * speed);
        grace.0 = shooting_tuning.pickup_grace;
        last_shooter.0 = Some(slot);

        bus.emit(GameEvent::Shot {
            player: slot,
            charge: release.charge,
            speed,
        });
    }
}

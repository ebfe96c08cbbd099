//! Patrolling melee knight.
//!
//! Decision priority each tick:
//! 1. mid-swing → hold position (the arbiter owns the hit window)
//! 2. target in range + vertically aligned + cooldown ready → start a
//!    swing, facing the target
//! 3. target in range, cooldown pending → face the target and stand ready
//!    (telegraphs the next strike)
//! 4. patrol between boundaries; turn-around is a discrete
//!    pause-then-flip, never an instant reversal — no jitter at the edges

use bevy::prelude::*;

use crate::combat::events::{AttackKind, AttackStarted};
use crate::combat::swing::{SwingCooldown, SwingSpec, SwingState};
use crate::components::{
    Body, Combatant, Dead, DeathStyle, Facing, Faction, Health, Hurt, HurtProfile,
};
use crate::player::Player;

/// Marker for the patrolling knight.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(PatrolConfig, SwingCooldown)]
pub struct Patroller;

/// Patrol boundaries and gait.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PatrolConfig {
    pub origin_x: f32,
    /// Max displacement from origin before turning
    pub range: f32,
    pub walk_speed: f32,
    /// Turn-around pause (seconds)
    pub wait: f32,
    /// +1 right, -1 left
    pub direction: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            range: 70.0,
            walk_speed: 30.0,
            wait: 1.0,
            direction: 1.0,
        }
    }
}

/// Pause before flipping patrol direction.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct TurnWait {
    pub remaining: f32,
}

/// The knight's strike: the hit window opens on frame 2 and stays open
/// through the end of the swing.
pub fn patrol_strike() -> SwingSpec {
    SwingSpec {
        frame_duration: 0.1,
        total_frames: 6,
        active_from: 2,
        active_to: 6,
        damage: 1,
        range: 100.0,
        vertical_tolerance: 80.0,
        cooldown: 2.0,
    }
}

/// System: patroller decisions.
pub fn patroller_decide(
    mut commands: Commands,
    mut patrollers: Query<
        (
            Entity,
            &Transform,
            &mut Body,
            &mut Facing,
            &mut PatrolConfig,
            &mut SwingCooldown,
            Option<&mut TurnWait>,
            Option<&SwingState>,
        ),
        (With<Patroller>, Without<Dead>, Without<Hurt>),
    >,
    players: Query<&Transform, (With<Player>, Without<Dead>)>,
    time: Res<Time<Fixed>>,
    mut attack_events: EventWriter<AttackStarted>,
) {
    let delta = time.delta_secs();
    let player_tf = players.single().ok();

    for (entity, transform, mut body, mut facing, mut config, mut cooldown, turn_wait, swing) in
        patrollers.iter_mut()
    {
        // 1. Mid-swing: hold position; the arbiter evaluates the hit window.
        if swing.is_some() {
            body.velocity.x = 0.0;
            continue;
        }

        // 2/3. Engage a live, aligned target inside attack range.
        if let Some(player_tf) = player_tf {
            let spec = patrol_strike();
            let dist = transform
                .translation
                .truncate()
                .distance(player_tf.translation.truncate());
            let aligned = (transform.translation.y - player_tf.translation.y).abs()
                < spec.vertical_tolerance;

            if dist < spec.range && aligned {
                *facing = Facing::toward(player_tf.translation.x - transform.translation.x);
                body.velocity.x = 0.0;

                if cooldown.ready() {
                    cooldown.arm(spec.cooldown);
                    commands
                        .entity(entity)
                        .insert(SwingState::new(AttackKind::PatrolStrike, spec));
                    attack_events.write(AttackStarted {
                        entity,
                        kind: AttackKind::PatrolStrike,
                    });
                }
                // Cooldown pending: stand ready, facing the target.
                continue;
            }
        }

        // 4. Patrol.
        if let Some(mut wait) = turn_wait {
            body.velocity.x = 0.0;
            wait.remaining -= delta;
            if wait.remaining <= 0.0 {
                config.direction = -config.direction;
                *facing = Facing::toward(config.direction);
                commands.entity(entity).remove::<TurnWait>();
            }
            continue;
        }

        let past_boundary = (config.direction > 0.0
            && transform.translation.x > config.origin_x + config.range)
            || (config.direction < 0.0
                && transform.translation.x < config.origin_x - config.range);
        let at_wall = body.blocked_toward(config.direction);
        // About to walk off a ledge: airborne and descending, not a jump
        let falling = !body.on_ground && body.velocity.y < 0.0;

        if at_wall || falling || past_boundary {
            body.velocity.x = 0.0;
            commands.entity(entity).insert(TurnWait {
                remaining: config.wait,
            });
        } else {
            body.velocity.x = config.walk_speed * config.direction;
            *facing = Facing::toward(config.direction);
        }
    }
}

/// Spawn a patroller with the given patrol tuning.
pub fn spawn_patroller(commands: &mut Commands, position: Vec2, config: PatrolConfig) -> Entity {
    commands
        .spawn((
            Patroller,
            Combatant {
                faction: Faction::Monster,
            },
            Health::new(3),
            config,
            Facing::Right,
            Body {
                on_ground: true,
                ..Default::default()
            },
            HurtProfile {
                invulnerability: 0.3,
                stun: 0.4,
                knockback: Vec2::new(50.0, 100.0),
            },
            DeathStyle {
                notify_after_hold: false,
                hold: 1.5,
                fade: 1.0,
                despawn: true,
            },
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patrol_strike_window_opens_on_frame_two() {
        let spec = patrol_strike();
        assert_eq!(spec.active_from, 2);
        assert_eq!(spec.active_to, spec.total_frames);
        assert_eq!(spec.damage, 1);
    }

    #[test]
    fn test_patrol_config_default_range() {
        let config = PatrolConfig::default();
        assert_eq!(config.range, 70.0);
        assert_eq!(config.direction, 1.0);
    }
}

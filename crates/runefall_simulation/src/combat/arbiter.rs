//! Scene-level combat arbiter.
//!
//! Once per tick, after every decision and phase advance, the arbiter reads
//! transient combat state (active swing frames, boss ability state,
//! projectile positions) and rules on who damages whom. It only ever emits
//! `DamageInflicted`; the funnel in damage.rs owns the actual mutation and
//! the invulnerability policy, so a qualifying event here is applied at most
//! once there.

use bevy::prelude::*;

use crate::ai::boss::{Boss, BossAttackState};
use crate::ai::patroller::Patroller;
use crate::combat::events::{DamageInflicted, ProjectileExploded};
use crate::combat::projectile::Projectile;
use crate::combat::swing::SwingState;
use crate::components::{Combatant, Dead, Facing, Faction};
use crate::physics::Arena;
use crate::player::{Player, PlayerStats};

/// Flame jet reach in front of the boss.
pub const FLAME_JET_RANGE: f32 = 180.0;
/// Vertical window shared by the jet and the charge contact check.
pub const BOSS_VERTICAL_WINDOW: f32 = 100.0;
/// Body-contact distance for the charge overlap check.
pub const CHARGE_CONTACT_RANGE: f32 = 80.0;
/// Charge knockback impulse (|x|, +y) — stronger than the default hurt push.
pub const CHARGE_KNOCKBACK: Vec2 = Vec2::new(400.0, 200.0);
/// Player body radius for projectile contact.
pub const PLAYER_CONTACT_RADIUS: f32 = 25.0;

fn distance(a: &Transform, b: &Transform) -> f32 {
    a.translation.truncate().distance(b.translation.truncate())
}

fn push_dir_away_from(attacker_x: f32, target_x: f32) -> f32 {
    if target_x < attacker_x {
        -1.0
    } else {
        1.0
    }
}

/// System: player melee swings vs enemies.
///
/// A target qualifies while the swing is in its active frame window, within
/// range (+ a reach buffer for boss-class bodies), vertically aligned, in
/// front of the player's facing, and not yet in this swing's hit ledger.
/// The ledger consumes the hit even when the funnel later no-ops it
/// (invulnerable target) — one qualifying event per target per swing.
pub fn resolve_player_melee(
    mut players: Query<
        (Entity, &Transform, &Facing, &PlayerStats, &mut SwingState),
        (With<Player>, Without<Dead>),
    >,
    enemies: Query<
        (Entity, &Transform, &Combatant, Option<&Boss>),
        (Without<Player>, Without<Dead>),
    >,
    mut damage_events: EventWriter<DamageInflicted>,
) {
    for (player, player_tf, facing, stats, mut swing) in players.iter_mut() {
        if !swing.in_active_window() {
            continue;
        }

        for (enemy, enemy_tf, combatant, boss) in enemies.iter() {
            if combatant.faction == Faction::Hero {
                continue;
            }
            if swing.has_hit(enemy) {
                continue;
            }

            let reach = swing.spec.range
                + if boss.is_some() {
                    stats.boss_reach_buffer
                } else {
                    0.0
                };
            let aligned = (player_tf.translation.y - enemy_tf.translation.y).abs()
                < swing.spec.vertical_tolerance;
            let in_front = facing.is_toward(player_tf.translation.x, enemy_tf.translation.x);

            if distance(player_tf, enemy_tf) < reach && aligned && in_front {
                swing.register_hit(enemy);
                damage_events.write(DamageInflicted {
                    attacker: player,
                    target: enemy,
                    amount: swing.spec.damage,
                    push_dir: push_dir_away_from(player_tf.translation.x, enemy_tf.translation.x),
                    knockback_override: None,
                });
            }
        }
    }
}

/// System: patroller melee swings vs the player.
///
/// The patroller holds position during its swing; the hit window opens at
/// the spec's active frame and lands at most once per attack instance.
pub fn resolve_enemy_melee(
    mut attackers: Query<
        (Entity, &Transform, &Facing, &mut SwingState),
        (With<Patroller>, Without<Dead>),
    >,
    players: Query<(Entity, &Transform), (With<Player>, Without<Dead>)>,
    mut damage_events: EventWriter<DamageInflicted>,
) {
    let Ok((player, player_tf)) = players.single() else {
        return;
    };

    for (attacker, attacker_tf, facing, mut swing) in attackers.iter_mut() {
        if !swing.in_active_window() || swing.has_hit(player) {
            continue;
        }

        let aligned = (attacker_tf.translation.y - player_tf.translation.y).abs()
            < swing.spec.vertical_tolerance;
        let in_front = facing.is_toward(attacker_tf.translation.x, player_tf.translation.x);

        if distance(attacker_tf, player_tf) <= swing.spec.range && aligned && in_front {
            swing.register_hit(player);
            damage_events.write(DamageInflicted {
                attacker,
                target: player,
                amount: swing.spec.damage,
                push_dir: push_dir_away_from(attacker_tf.translation.x, player_tf.translation.x),
                knockback_override: None,
            });
        }
    }
}

/// System: boss charge body contact.
///
/// Damage applies via overlap only while the charge state is active — the
/// tick the charge ends, persisting overlap stops mattering. The funnel
/// engages the player's invulnerability within the same tick, so
/// consecutive-tick overlap cannot double-hit.
pub fn resolve_boss_charge(
    bosses: Query<(Entity, &Transform, &BossAttackState), (With<Boss>, Without<Dead>)>,
    players: Query<(Entity, &Transform), (With<Player>, Without<Dead>)>,
    mut damage_events: EventWriter<DamageInflicted>,
) {
    let Ok((player, player_tf)) = players.single() else {
        return;
    };

    for (boss, boss_tf, attack) in bosses.iter() {
        if !matches!(attack, BossAttackState::Charging { .. }) {
            continue;
        }

        let dx = (player_tf.translation.x - boss_tf.translation.x).abs();
        let dy = (player_tf.translation.y - boss_tf.translation.y).abs();

        if dx < CHARGE_CONTACT_RANGE && dy < BOSS_VERTICAL_WINDOW {
            damage_events.write(DamageInflicted {
                attacker: boss,
                target: player,
                amount: 1,
                push_dir: push_dir_away_from(boss_tf.translation.x, player_tf.translation.x),
                knockback_override: Some(CHARGE_KNOCKBACK),
            });
        }
    }
}

/// System: boss flame jet cone.
///
/// Damage while the jet is active AND the player is short-range, vertically
/// aligned, and in front of the boss's facing.
pub fn resolve_boss_flame_jet(
    bosses: Query<(Entity, &Transform, &Facing, &BossAttackState), (With<Boss>, Without<Dead>)>,
    players: Query<(Entity, &Transform), (With<Player>, Without<Dead>)>,
    mut damage_events: EventWriter<DamageInflicted>,
) {
    let Ok((player, player_tf)) = players.single() else {
        return;
    };

    for (boss, boss_tf, facing, attack) in bosses.iter() {
        if !matches!(attack, BossAttackState::FlameJet { .. }) {
            continue;
        }

        let dy = (player_tf.translation.y - boss_tf.translation.y).abs();
        let in_front = facing.is_toward(boss_tf.translation.x, player_tf.translation.x);

        if distance(boss_tf, player_tf) < FLAME_JET_RANGE && in_front && dy < BOSS_VERTICAL_WINDOW
        {
            damage_events.write(DamageInflicted {
                attacker: boss,
                target: player,
                amount: 1,
                push_dir: push_dir_away_from(boss_tf.translation.x, player_tf.translation.x),
                knockback_override: None,
            });
        }
    }
}

/// System: projectile collisions — world geometry first, then the player.
///
/// The projectile despawns on its first contact; a despawned projectile can
/// never deal damage again.
pub fn resolve_projectiles(
    mut commands: Commands,
    arena: Res<Arena>,
    projectiles: Query<(Entity, &Projectile, &Transform)>,
    players: Query<(Entity, &Transform), (With<Player>, Without<Dead>)>,
    mut damage_events: EventWriter<DamageInflicted>,
    mut exploded_events: EventWriter<ProjectileExploded>,
) {
    let player = players.single().ok();

    for (entity, projectile, transform) in projectiles.iter() {
        let position = transform.translation.truncate();

        // World geometry: the arena floor and outer bounds.
        let hit_world = position.y <= arena.floor_y
            || position.x < arena.min_x - projectile.radius
            || position.x > arena.max_x + projectile.radius;
        if hit_world {
            exploded_events.write(ProjectileExploded { position });
            commands.entity(entity).despawn();
            continue;
        }

        let Some((player_entity, player_tf)) = player else {
            continue;
        };
        if player_entity == projectile.owner {
            continue;
        }

        if position.distance(player_tf.translation.truncate())
            < projectile.radius + PLAYER_CONTACT_RADIUS
        {
            exploded_events.write(ProjectileExploded { position });
            commands.entity(entity).despawn();
            damage_events.write(DamageInflicted {
                attacker: projectile.owner,
                target: player_entity,
                amount: 1,
                push_dir: push_dir_away_from(position.x, player_tf.translation.x),
                knockback_override: None,
            });
        }
    }
}

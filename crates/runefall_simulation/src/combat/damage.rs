//! The damage funnel: single authority over Health mutation.
//!
//! # Contract (shared by every combatant)
//!
//! - damage on a dead or invulnerable target is a silent no-op
//! - lethal damage: `Dead` (terminal), motion stopped, collision disabled,
//!   death sequence scheduled per `DeathStyle`
//! - non-lethal: the invulnerability window engages inside the same drain —
//!   two qualifying damage sources in one tick can never double-apply —
//!   then any in-progress attack is cancelled, `Hurt` stun begins and a
//!   knockback impulse pushes the target away from the attacker's side
//!
//! The arbiter and the AI only ever emit `DamageInflicted`; nothing else in
//! the crate writes Health.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::ai::boss::{BossAttackState, BossMove};
use crate::ai::patroller::TurnWait;
use crate::combat::events::{
    AttackInterrupted, CombatantDied, DamageInflicted, HealthChanged, HitLanded,
};
use crate::combat::swing::SwingState;
use crate::components::{
    Body, Dead, DeathSequence, DeathStyle, Health, Hurt, HurtProfile, Invulnerable,
};

/// System: apply damage events.
pub fn apply_damage(
    mut events: EventReader<DamageInflicted>,
    mut commands: Commands,
    mut targets: Query<(
        &mut Health,
        &mut Body,
        &HurtProfile,
        &DeathStyle,
        Option<&Invulnerable>,
        Option<&Dead>,
        Option<&SwingState>,
        Option<&BossAttackState>,
    )>,
    mut health_events: EventWriter<HealthChanged>,
    mut died_events: EventWriter<CombatantDied>,
    mut hit_events: EventWriter<HitLanded>,
    mut interrupted_events: EventWriter<AttackInterrupted>,
) {
    // Targets already struck during THIS drain. The Invulnerable insert below
    // is deferred until the command flush, so the set is what actually closes
    // the same-tick double-hit window.
    let mut struck: HashSet<Entity> = HashSet::new();

    for event in events.read() {
        let Ok((mut health, mut body, profile, style, invulnerable, dead, swing, boss_attack)) =
            targets.get_mut(event.target)
        else {
            crate::log_warning(&format!(
                "DamageInflicted: target {:?} has no combatant components",
                event.target
            ));
            continue;
        };

        // Silent no-ops by contract.
        if dead.is_some() || invulnerable.is_some() || struck.contains(&event.target) {
            continue;
        }
        struck.insert(event.target);

        health.take_damage(event.amount);
        health_events.write(HealthChanged {
            entity: event.target,
            current: health.current,
            max: health.max,
        });
        hit_events.write(HitLanded {
            attacker: event.attacker,
            target: event.target,
        });

        // Cancel whatever the target was doing. If an attack was in progress
        // the host must tear down its residual presentation (charge audio).
        if swing.is_some() || boss_attack.is_some() {
            interrupted_events.write(AttackInterrupted {
                entity: event.target,
            });
        }

        let mut target_commands = commands.entity(event.target);
        target_commands
            .remove::<SwingState>()
            .remove::<BossAttackState>()
            .remove::<BossMove>()
            .remove::<TurnWait>();

        if !health.is_alive() {
            // Terminal transition: stop motion, disable collision, schedule
            // the death sequence. Notification timing is per DeathStyle.
            body.halt();
            body.collision_enabled = false;
            target_commands
                .remove::<Hurt>()
                .remove::<Invulnerable>()
                .insert((Dead, DeathSequence::from_style(*style)));

            if !style.notify_after_hold {
                died_events.write(CombatantDied {
                    entity: event.target,
                });
            }

            crate::log_info(&format!(
                "Combatant {:?} slain by {:?}",
                event.target, event.attacker
            ));
        } else {
            let knockback = event.knockback_override.unwrap_or(profile.knockback);
            body.velocity = Vec2::new(event.push_dir * knockback.x, knockback.y);
            body.on_ground = false;
            target_commands.insert((
                Invulnerable {
                    remaining: profile.invulnerability,
                },
                Hurt {
                    remaining: profile.stun,
                },
            ));

            crate::log(&format!(
                "Damage {} applied: {:?} -> {:?} (hp: {}/{})",
                event.amount, event.attacker, event.target, health.current, health.max
            ));
        }
    }
}

/// System: expire invulnerability windows.
///
/// Dead combatants are skipped — the window auto-expires only for the
/// living (expiry on a corpse would be meaningless state churn).
pub fn tick_invulnerability(
    mut commands: Commands,
    mut windows: Query<(Entity, &mut Invulnerable), Without<Dead>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut window) in windows.iter_mut() {
        window.remaining -= delta;
        if window.remaining <= 0.0 {
            commands.entity(entity).remove::<Invulnerable>();
        }
    }
}

/// System: recover from hurt stun (Hurt → Idle, always).
pub fn tick_hurt(
    mut commands: Commands,
    mut stuns: Query<(Entity, &mut Hurt), Without<Dead>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut stun) in stuns.iter_mut() {
        stun.remaining -= delta;
        if stun.remaining <= 0.0 {
            commands.entity(entity).remove::<Hurt>();
        }
    }
}

/// System: advance death sequences (hold → notify → fade → despawn).
pub fn advance_death_sequences(
    mut commands: Commands,
    mut sequences: Query<(Entity, &mut DeathSequence)>,
    time: Res<Time<Fixed>>,
    mut died_events: EventWriter<CombatantDied>,
) {
    let delta = time.delta_secs();

    for (entity, mut sequence) in sequences.iter_mut() {
        if sequence.hold_remaining > 0.0 {
            sequence.hold_remaining -= delta;
            if sequence.hold_remaining > 0.0 {
                continue;
            }
        }

        // Hold complete: the deferred notification fires exactly once here —
        // after the terminal animation hold, never before.
        if !sequence.notified {
            sequence.notified = true;
            died_events.write(CombatantDied { entity });
        }

        if sequence.fade_remaining > 0.0 {
            sequence.fade_remaining -= delta;
            if sequence.fade_remaining > 0.0 {
                continue;
            }
        }

        if sequence.despawn {
            commands.entity(entity).despawn();
        } else {
            commands.entity(entity).remove::<DeathSequence>();
        }
    }
}

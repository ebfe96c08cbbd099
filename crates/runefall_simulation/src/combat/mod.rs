//! Combat module: swings, projectiles, arbiter, damage funnel.
//!
//! # Resolution order (one FixedUpdate tick)
//!
//! ```text
//! timers → player intent → enemy AI → swing clocks → projectiles
//!   ↓
//! arbiter (overlap/distance/facing rulings) → DamageInflicted
//!   ↓
//! apply_damage (single Health authority) → Hurt/Dead transitions
//!   ↓
//! death sequences → physics integration
//! ```
//!
//! Invulnerability engages inside the funnel before any further same-tick
//! source resolves, so simultaneous damage sources cannot double-apply.

use bevy::prelude::*;

pub mod arbiter;
pub mod damage;
pub mod events;
pub mod projectile;
pub mod swing;

pub use events::{
    AttackInterrupted, AttackKind, AttackStarted, CombatantDied, DamageInflicted, HealthChanged,
    HitLanded, ProjectileExploded,
};
pub use projectile::{LaunchProjectile, Projectile, FIREBALL_RADIUS, FIREBALL_SPEED};
pub use swing::{SwingCooldown, SwingSpec, SwingState};

use crate::SimulationSet;

/// Combat Plugin
///
/// Registers combat systems in FixedUpdate across the simulation sets:
/// 1. Tick — swing cooldowns, invulnerability, hurt stun
/// 2. Swings — frame clocks
/// 3. Projectiles — spawn + flight
/// 4. Arbiter — melee windows, boss specials, projectile contacts
/// 5. Damage — the apply_damage funnel
/// 6. Deaths — hold/notify/fade/despawn
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HealthChanged>()
            .add_event::<CombatantDied>()
            .add_event::<AttackStarted>()
            .add_event::<HitLanded>()
            .add_event::<AttackInterrupted>()
            .add_event::<ProjectileExploded>()
            .add_event::<DamageInflicted>()
            .add_event::<LaunchProjectile>();

        app.add_systems(
            FixedUpdate,
            (
                swing::tick_swing_cooldowns,
                damage::tick_invulnerability,
                damage::tick_hurt,
            )
                .in_set(SimulationSet::Tick),
        );

        app.add_systems(
            FixedUpdate,
            swing::update_swings.in_set(SimulationSet::Swings),
        );

        app.add_systems(
            FixedUpdate,
            (projectile::spawn_projectiles, projectile::update_projectiles)
                .chain()
                .in_set(SimulationSet::Projectiles),
        );

        app.add_systems(
            FixedUpdate,
            (
                arbiter::resolve_player_melee,
                arbiter::resolve_enemy_melee,
                arbiter::resolve_boss_charge,
                arbiter::resolve_boss_flame_jet,
                arbiter::resolve_projectiles,
            )
                .chain()
                .in_set(SimulationSet::Arbiter),
        );

        app.add_systems(FixedUpdate, damage::apply_damage.in_set(SimulationSet::Damage));

        app.add_systems(
            FixedUpdate,
            damage::advance_death_sequences.in_set(SimulationSet::Deaths),
        );
    }
}

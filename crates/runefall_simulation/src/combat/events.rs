//! Combat events: notifications for the host layer + the internal damage channel.
//!
//! The core stays correct with every observer removed — notification events
//! are only published, never read back for gameplay decisions. The one
//! internal event is `DamageInflicted`: the arbiter's output, consumed solely
//! by the `apply_damage` funnel.

use bevy::prelude::*;

/// Attack variant identifier (drives host animation/audio selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackKind {
    /// Player attack-1: fast, weak
    LightSlash,
    /// Player attack-2: slow, strong
    HeavySlash,
    /// Patroller melee strike
    PatrolStrike,
    /// Boss short-range cone
    FlameJet,
    /// Boss ranged projectile
    Fireball,
    /// Boss telegraphed charge
    Charge,
}

/// Event: a combatant's health changed (UI health bars, hearts).
#[derive(Event, Debug, Clone)]
pub struct HealthChanged {
    pub entity: Entity,
    pub current: u32,
    pub max: u32,
}

/// Event: a combatant died.
///
/// For the player this fires only AFTER the terminal-animation hold
/// completes (`DeathStyle::notify_after_hold`); for enemies it fires at the
/// moment of death.
#[derive(Event, Debug, Clone)]
pub struct CombatantDied {
    pub entity: Entity,
}

/// Event: an attack began (windup/telegraph included).
#[derive(Event, Debug, Clone)]
pub struct AttackStarted {
    pub entity: Entity,
    pub kind: AttackKind,
}

/// Event: a hit connected and damage was applied.
#[derive(Event, Debug, Clone)]
pub struct HitLanded {
    pub attacker: Entity,
    pub target: Entity,
}

/// Event: an in-progress attack was cancelled by incoming damage.
///
/// The host MUST tear down residual presentation on this signal — the charge
/// audio loop in particular must not keep playing.
#[derive(Event, Debug, Clone)]
pub struct AttackInterrupted {
    pub entity: Entity,
}

/// Event: a projectile detonated (world geometry or a target).
#[derive(Event, Debug, Clone)]
pub struct ProjectileExploded {
    pub position: Vec2,
}

/// Internal event: the arbiter ruled that damage should be dealt.
///
/// The only path to Health mutation is the `apply_damage` system draining
/// these; nothing else in the crate writes Health.
#[derive(Event, Debug, Clone)]
pub struct DamageInflicted {
    pub attacker: Entity,
    pub target: Entity,
    pub amount: u32,
    /// Knockback direction: +1 pushes right, -1 pushes left
    pub push_dir: f32,
    /// Impulse override; None uses the target's `HurtProfile` magnitudes
    pub knockback_override: Option<Vec2>,
}

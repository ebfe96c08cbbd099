//! Multi-behavior boss: distance-banded weighted action selection.
//!
//! Each tick the boss, when not busy, classifies the distance to its target
//! into a band and draws a uniform roll in [0,100) from the injected RNG to
//! pick a weighted action. Every action arms the single global action gate
//! with its own cooldown, measured from invocation and independent of
//! animation length.
//!
//! Selection itself is a pure function of (table, distance, roll) — tests
//! exercise the exact thresholds without touching the RNG.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::events::{AttackKind, AttackStarted};
use crate::combat::projectile::LaunchProjectile;
use crate::components::{
    Body, Combatant, Dead, DeathStyle, Facing, Faction, Health, Hurt, HurtProfile, Invulnerable,
};
use crate::player::Player;
use crate::DeterministicRng;

pub const CHARGE_TELEGRAPH: f32 = 0.5;
pub const CHARGE_DURATION: f32 = 0.8;
pub const FLAME_JET_DURATION: f32 = 0.7;
pub const FIREBALL_WINDUP: f32 = 0.4;
/// Fireball spawn offset above the boss reference point.
pub const FIREBALL_SPAWN_OFFSET: Vec2 = Vec2::new(0.0, 20.0);
const CHASE_DURATION: f32 = 1.5;
const JUMP_AWAY_IMPULSE: Vec2 = Vec2::new(250.0, 550.0);

/// Boss marker + gait tuning.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(ActionGate, BossDecisionTable)]
pub struct Boss {
    pub move_speed: f32,
    pub charge_speed: f32,
}

impl Default for Boss {
    fn default() -> Self {
        Self {
            move_speed: 120.0,
            charge_speed: 200.0,
        }
    }
}

/// Global action cooldown — the single gate across all behaviors.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ActionGate {
    pub remaining: f32,
}

impl ActionGate {
    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn arm(&mut self, secs: f32) {
        self.remaining = secs;
    }
}

/// One selectable boss behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum BossAction {
    FlameJet,
    Fireball,
    Charge,
    Chase,
    JumpAway,
}

/// Weighted entry within a band.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct BandEntry {
    pub action: BossAction,
    pub weight: u32,
}

/// Half-open distance interval [min, max) with its weighted actions.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct DistanceBand {
    pub min: f32,
    pub max: f32,
    pub entries: Vec<BandEntry>,
    /// Chosen when the roll lands past every weighted entry
    /// (None = do nothing this tick, re-decide next tick).
    pub fallback: Option<BossAction>,
}

/// Ordered decision table over distance-to-target.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct BossDecisionTable {
    pub bands: Vec<DistanceBand>,
}

/// Table construction defects — logic errors, not runtime faults.
/// Guarded by `validate` at construction; production code never selects
/// against an invalid table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableDefect {
    Empty,
    /// Bands must start at 0 and tile the distance axis without gaps.
    NotContiguous { index: usize },
    /// The last band must be open-ended.
    NotOpenEnded,
    /// Weights in one band exceed the [0,100) roll space.
    WeightOverflow { index: usize, total: u32 },
}

impl Default for BossDecisionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl BossDecisionTable {
    /// The fire-wizard's table: Near [0,200) / Mid [200,550) / Far [550,∞).
    pub fn standard() -> Self {
        let table = Self {
            bands: vec![
                DistanceBand {
                    min: 0.0,
                    max: 200.0,
                    entries: vec![BandEntry {
                        action: BossAction::FlameJet,
                        weight: 60,
                    }],
                    fallback: Some(BossAction::JumpAway),
                },
                DistanceBand {
                    min: 200.0,
                    max: 550.0,
                    entries: vec![
                        BandEntry {
                            action: BossAction::Charge,
                            weight: 20,
                        },
                        BandEntry {
                            action: BossAction::Fireball,
                            weight: 10,
                        },
                    ],
                    fallback: None,
                },
                DistanceBand {
                    min: 550.0,
                    max: f32::INFINITY,
                    entries: vec![BandEntry {
                        action: BossAction::Fireball,
                        weight: 50,
                    }],
                    fallback: Some(BossAction::Chase),
                },
            ],
        };
        debug_assert!(table.validate().is_ok());
        table
    }

    /// Exhaustive construction check — fail fast in tests, never in play.
    pub fn validate(&self) -> Result<(), TableDefect> {
        if self.bands.is_empty() {
            return Err(TableDefect::Empty);
        }

        let mut expected_min = 0.0;
        for (index, band) in self.bands.iter().enumerate() {
            if band.min != expected_min {
                return Err(TableDefect::NotContiguous { index });
            }

            let total: u32 = band.entries.iter().map(|entry| entry.weight).sum();
            if total > 100 {
                return Err(TableDefect::WeightOverflow { index, total });
            }

            expected_min = band.max;
        }

        if self.bands.last().map(|band| band.max) != Some(f32::INFINITY) {
            return Err(TableDefect::NotOpenEnded);
        }

        Ok(())
    }

    /// Pure selection: roll ∈ [0,100) against cumulative weights.
    pub fn select(&self, distance: f32, roll: u32) -> Option<BossAction> {
        let band = self
            .bands
            .iter()
            .find(|band| distance >= band.min && distance < band.max)?;

        let mut threshold = 0;
        for entry in &band.entries {
            threshold += entry.weight;
            if roll < threshold {
                return Some(entry.action);
            }
        }
        band.fallback
    }
}

/// In-progress boss ability. Presence == attacking/busy; facing frozen.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum BossAttackState {
    /// Short-range cone, fixed duration
    FlameJet { remaining: f32 },
    /// Windup before the projectile spawns (aim sampled at spawn time)
    FireballWindup { remaining: f32 },
    /// Zero-velocity visual warning before the launch
    ChargeTelegraph { remaining: f32 },
    /// Launched: fixed speed along facing; the arbiter applies contact damage
    Charging { remaining: f32 },
}

/// Sustained repositioning: chase keeps velocity until it expires.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct BossMove {
    pub remaining: f32,
}

/// System: tick the global action gate.
pub fn tick_action_gates(mut gates: Query<&mut ActionGate>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut gate in gates.iter_mut() {
        if gate.remaining > 0.0 {
            gate.remaining -= delta;
        }
    }
}

/// System: boss decision step.
pub fn boss_decide(
    mut commands: Commands,
    mut bosses: Query<
        (
            Entity,
            &Transform,
            &mut Body,
            &mut Facing,
            &BossDecisionTable,
            &mut ActionGate,
            Option<&BossAttackState>,
            Option<&Invulnerable>,
            Option<&BossMove>,
        ),
        (With<Boss>, Without<Dead>, Without<Hurt>),
    >,
    players: Query<&Transform, (With<Player>, Without<Dead>)>,
    mut rng: ResMut<DeterministicRng>,
    mut attack_events: EventWriter<AttackStarted>,
) {
    let Ok(player_tf) = players.single() else {
        return;
    };

    for (entity, transform, mut body, mut facing, table, mut gate, attack, invulnerable, movement) in
        bosses.iter_mut()
    {
        // Busy: attacking or inside the post-hit window — hold ground.
        // The charge keeps its velocity; everything else plants the feet.
        if attack.is_some() || invulnerable.is_some() {
            let charging = matches!(attack, Some(BossAttackState::Charging { .. }));
            if body.on_ground && !charging {
                body.velocity.x = 0.0;
            }
            continue;
        }

        // Face the target whenever not mid-attack.
        *facing = Facing::toward(player_tf.translation.x - transform.translation.x);

        // Global gate: hold idle until it elapses.
        if !gate.ready() {
            if body.on_ground && movement.is_none() {
                body.velocity.x = 0.0;
            }
            continue;
        }

        let dist = transform
            .translation
            .truncate()
            .distance(player_tf.translation.truncate());
        let roll: u32 = rng.rng.gen_range(0..100);

        let Some(action) = table.select(dist, roll) else {
            // Nothing this tick; re-decide next tick.
            continue;
        };

        match action {
            BossAction::FlameJet => {
                body.velocity.x = 0.0;
                commands.entity(entity).insert(BossAttackState::FlameJet {
                    remaining: FLAME_JET_DURATION,
                });
                gate.arm(2.0);
                attack_events.write(AttackStarted {
                    entity,
                    kind: AttackKind::FlameJet,
                });
            }
            BossAction::Fireball => {
                body.velocity.x = 0.0;
                commands
                    .entity(entity)
                    .insert(BossAttackState::FireballWindup {
                        remaining: FIREBALL_WINDUP,
                    });
                gate.arm(2.5);
                attack_events.write(AttackStarted {
                    entity,
                    kind: AttackKind::Fireball,
                });
            }
            BossAction::Charge => {
                body.velocity.x = 0.0;
                commands
                    .entity(entity)
                    .insert(BossAttackState::ChargeTelegraph {
                        remaining: CHARGE_TELEGRAPH,
                    });
                gate.arm(3.0);
                attack_events.write(AttackStarted {
                    entity,
                    kind: AttackKind::Charge,
                });
            }
            BossAction::Chase => {
                commands.entity(entity).insert(BossMove {
                    remaining: CHASE_DURATION,
                });
                gate.arm(1.5);
            }
            BossAction::JumpAway => {
                // Leap backward, away from the target.
                let away = -facing.sign();
                body.velocity = Vec2::new(away * JUMP_AWAY_IMPULSE.x, JUMP_AWAY_IMPULSE.y);
                body.on_ground = false;
                gate.arm(2.0);
            }
        }
    }
}

/// System: advance boss ability phases.
///
/// Every expiry is re-checked against the owner being alive (the query
/// filters Dead) — a windup owned by a boss slain mid-cast never fires.
pub fn boss_attack_progress(
    mut commands: Commands,
    mut bosses: Query<
        (
            Entity,
            &Transform,
            &mut Body,
            &Facing,
            &Boss,
            &mut BossAttackState,
        ),
        Without<Dead>,
    >,
    players: Query<&Transform, (With<Player>, Without<Dead>)>,
    time: Res<Time<Fixed>>,
    mut launch_events: EventWriter<LaunchProjectile>,
) {
    let delta = time.delta_secs();
    let player_tf = players.single().ok();

    for (entity, transform, mut body, facing, boss, mut attack) in bosses.iter_mut() {
        match *attack {
            BossAttackState::FlameJet { remaining } => {
                let remaining = remaining - delta;
                if remaining <= 0.0 {
                    commands.entity(entity).remove::<BossAttackState>();
                } else {
                    *attack = BossAttackState::FlameJet { remaining };
                }
            }
            BossAttackState::FireballWindup { remaining } => {
                let remaining = remaining - delta;
                if remaining <= 0.0 {
                    // Aim at the target's position NOW — the projectile
                    // never re-aims in flight.
                    let origin = transform.translation.truncate() + FIREBALL_SPAWN_OFFSET;
                    let aim_at = player_tf
                        .map(|tf| tf.translation.truncate())
                        .unwrap_or(origin + Vec2::new(facing.sign(), 0.0));
                    launch_events.write(LaunchProjectile {
                        owner: entity,
                        origin,
                        aim_at,
                        fallback_dir: facing.sign(),
                    });
                    commands.entity(entity).remove::<BossAttackState>();
                } else {
                    *attack = BossAttackState::FireballWindup { remaining };
                }
            }
            BossAttackState::ChargeTelegraph { remaining } => {
                // Telegraph is stationary — the reaction window for the player.
                body.velocity.x = 0.0;
                let remaining = remaining - delta;
                if remaining <= 0.0 {
                    *attack = BossAttackState::Charging {
                        remaining: CHARGE_DURATION,
                    };
                    body.velocity.x = facing.sign() * boss.charge_speed;
                } else {
                    *attack = BossAttackState::ChargeTelegraph { remaining };
                }
            }
            BossAttackState::Charging { remaining } => {
                body.velocity.x = facing.sign() * boss.charge_speed;
                let remaining = remaining - delta;
                if remaining <= 0.0 {
                    body.velocity.x = 0.0;
                    commands.entity(entity).remove::<BossAttackState>();
                } else {
                    *attack = BossAttackState::Charging { remaining };
                }
            }
        }
    }
}

/// System: sustain chase movement while it lasts.
pub fn boss_move_tick(
    mut commands: Commands,
    mut bosses: Query<
        (Entity, &Transform, &mut Body, &Boss, &mut BossMove),
        (Without<Dead>, Without<Hurt>),
    >,
    players: Query<&Transform, (With<Player>, Without<Dead>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let player_tf = players.single().ok();

    for (entity, transform, mut body, boss, mut movement) in bosses.iter_mut() {
        movement.remaining -= delta;

        let Some(player_tf) = player_tf.filter(|_| movement.remaining > 0.0) else {
            body.velocity.x = 0.0;
            commands.entity(entity).remove::<BossMove>();
            continue;
        };

        let dir = if player_tf.translation.x < transform.translation.x {
            -1.0
        } else {
            1.0
        };
        body.velocity.x = dir * boss.move_speed;
    }
}

/// Spawn the fire-wizard boss.
pub fn spawn_boss(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            Boss::default(),
            Combatant {
                faction: Faction::Monster,
            },
            Health::new(30),
            Facing::Left,
            Body {
                on_ground: true,
                ..Default::default()
            },
            // The boss is never knocked back — a hit only stops it.
            HurtProfile {
                invulnerability: 0.4,
                stun: 0.4,
                knockback: Vec2::ZERO,
            },
            DeathStyle {
                notify_after_hold: false,
                hold: 2.0,
                fade: 0.0,
                despawn: false,
            },
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}

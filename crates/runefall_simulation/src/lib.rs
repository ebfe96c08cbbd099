//! RUNEFALL Simulation Core
//!
//! Headless combat & AI engine for a 2D action-platformer encounter:
//! player, patrolling knights, fire-wizard boss.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = combat rules, AI decisions, timers (this crate)
//! - Host = rendering, audio, device input, real collision geometry
//!
//! One simulation tick == one FixedUpdate run (60Hz). Every system lives in
//! a chained `SimulationSet`, so the whole tick resolves in a single
//! deterministic order: input → AI → swings → projectiles → arbiter →
//! damage → deaths → physics.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod ai;
pub mod combat;
pub mod components;
pub mod logger;
pub mod physics;
pub mod player;

pub use ai::boss::spawn_boss;
pub use ai::patroller::spawn_patroller;
pub use ai::{
    ActionGate, AIPlugin, Boss, BossAction, BossAttackState, BossDecisionTable, BossMove,
    PatrolConfig, Patroller, TurnWait,
};
pub use combat::{
    AttackInterrupted, AttackKind, AttackStarted, CombatPlugin, CombatantDied, DamageInflicted,
    HealthChanged, HitLanded, LaunchProjectile, Projectile, ProjectileExploded, SwingCooldown,
    SwingSpec, SwingState,
};
pub use components::*;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, ConsoleLogger,
    LogLevel, LogPrinter,
};
pub use physics::{Arena, Landed, PhysicsPlugin};
pub use player::{spawn_player, Player, PlayerInput, PlayerPlugin, PlayerStats, PLAYER_MAX_HEALTH};

/// Deterministic execution order of one simulation tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Timers: cooldowns, invulnerability, hurt stun
    Tick,
    /// Player input → intent
    Player,
    /// Enemy decisions (patrollers, boss)
    Ai,
    /// Swing frame clocks
    Swings,
    /// Projectile spawn + flight
    Projectiles,
    /// Cross-entity hit arbitration
    Arbiter,
    /// The single damage funnel
    Damage,
    /// Death sequences (hold, notify, fade, despawn)
    Deaths,
    /// Gravity + integration + contact flags
    Physics,
}

/// Root simulation plugin (wires every subsystem in tick order).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<Arena>()
            .init_resource::<CarriedProgress>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Tick,
                    SimulationSet::Player,
                    SimulationSet::Ai,
                    SimulationSet::Swings,
                    SimulationSet::Projectiles,
                    SimulationSet::Arbiter,
                    SimulationSet::Damage,
                    SimulationSet::Deaths,
                    SimulationSet::Physics,
                )
                    .chain(),
            )
            .add_plugins((PhysicsPlugin, PlayerPlugin, AIPlugin, CombatPlugin));

        // Seeded fallback; create_headless_app / the host usually install
        // their own seed first.
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Seeded RNG resource — the only randomness source in the simulation.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Create a minimal Bevy App for headless simulation.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Advance the simulation by exactly `ticks` fixed steps.
///
/// Bypasses the wall clock entirely — tests and the headless runner get the
/// same tick stream regardless of host timing.
pub fn run_fixed_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        let timestep = app.world().resource::<Time<Fixed>>().timestep();
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(timestep);
        app.world_mut().run_schedule(FixedUpdate);
    }
}

/// Snapshot of one component across the world, in a deterministic order.
/// Used by the determinism tests to compare runs byte-for-byte.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &T)>();
    let mut entries: Vec<_> = query.iter(world).collect();
    entries.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entries {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{component:?}").as_bytes());
    }

    snapshot
}

//! Enemy AI module: patrolling knights + the fire-wizard boss.
//!
//! Decisions only — every damage outcome still goes through the arbiter and
//! the damage funnel in the combat module.

use bevy::prelude::*;

pub mod boss;
pub mod patroller;

pub use boss::{
    ActionGate, BandEntry, Boss, BossAction, BossAttackState, BossDecisionTable, BossMove,
    DistanceBand, TableDefect,
};
pub use patroller::{PatrolConfig, Patroller, TurnWait};

/// AI Plugin
///
/// Registers enemy decision systems in FixedUpdate, chained for determinism:
/// 1. tick_action_gates — boss global cooldown
/// 2. patroller_decide — patrol / telegraph / swing
/// 3. boss_decide — band classification + weighted roll
/// 4. boss_attack_progress — telegraph/windup/jet/charge timers
/// 5. boss_move_tick — sustained chase
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                boss::tick_action_gates,
                patroller::patroller_decide,
                boss::boss_decide,
                boss::boss_attack_progress,
                boss::boss_move_tick,
            )
                .chain()
                .in_set(crate::SimulationSet::Ai),
        );
    }
}

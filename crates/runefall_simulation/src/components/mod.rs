//! ECS Components игровых entity
//!
//! Организация по доменам:
//! - combatant: общий контракт бойцов (Health, Facing, Body, Hurt, Dead)
//! - progress: переносимое состояние между уровнями (CarriedProgress)
//!
//! Archetype-специфичные компоненты живут рядом со своими системами:
//! player (Player, PlayerStats), ai::patroller (PatrolConfig, TurnWait),
//! ai::boss (Boss, BossDecisionTable, ActionGate).

pub mod combatant;
pub mod progress;

pub use combatant::*;
pub use progress::*;

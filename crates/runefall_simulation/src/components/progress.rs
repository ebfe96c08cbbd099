//! Переносимое состояние между уровнями

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Очки и здоровье, переносимые из энкаунтера в энкаунтер
///
/// Core принимает произвольное неотрицательное стартовое здоровье
/// (clamp к max при спавне игрока); сами значения для core opaque.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarriedProgress {
    pub score: u32,
    pub health: u32,
}

impl Default for CarriedProgress {
    fn default() -> Self {
        Self {
            score: 0,
            health: crate::player::PLAYER_MAX_HEALTH,
        }
    }
}

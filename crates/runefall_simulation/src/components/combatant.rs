//! Базовые компоненты бойцов: Combatant, Health, Facing, Body

use bevy::prelude::*;

/// Сторона конфликта (исключает friendly fire в арбитре)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Faction {
    #[default]
    Hero,
    Monster,
}

/// Боец (игрок, патрульный, босс) — базовый компонент живых существ
///
/// Автоматически добавляет Health, Facing, Body, HurtProfile, DeathStyle
/// через Required Components.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Health, Facing, Body, HurtProfile, DeathStyle)]
pub struct Combatant {
    pub faction: Faction,
}

/// Здоровье бойца
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Здоровье, перенесенное из прошлого энкаунтера (clamp к max)
    pub fn carried(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Направление взгляда
///
/// Пересчитывается от относительной позиции цели когда боец не в атаке;
/// на время swing/ability замораживается.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Направление к цели по смещению dx
    pub fn toward(dx: f32) -> Self {
        if dx < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    /// Смотрит ли боец в x на цель в target_x
    pub fn is_toward(self, self_x: f32, target_x: f32) -> bool {
        match self {
            Facing::Left => target_x < self_x,
            Facing::Right => target_x > self_x,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Кинематическое "тело" бойца (composition вместо наследования engine sprite)
///
/// Симуляция владеет velocity; контактные флаги пишет host
/// (или headless Arena из physics модуля). Координаты y-up.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Body {
    pub velocity: Vec2,
    /// Гравитация (units/s²), вниз
    pub gravity: f32,
    pub on_ground: bool,
    pub blocked_left: bool,
    pub blocked_right: bool,
    /// false после смерти — тело больше не участвует в коллизиях
    pub collision_enabled: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            gravity: 500.0,
            on_ground: false,
            blocked_left: false,
            blocked_right: false,
            collision_enabled: true,
        }
    }
}

impl Body {
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Уперлись ли в стену по направлению dir (+1 вправо, -1 влево)
    pub fn blocked_toward(&self, dir: f32) -> bool {
        if dir < 0.0 {
            self.blocked_left
        } else {
            self.blocked_right
        }
    }
}

/// Окно неуязвимости после полученного удара
///
/// Инвариант: пока компонент присутствует, Health бойца не уменьшается.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Invulnerable {
    pub remaining: f32,
}

/// Hurt-оглушение: движение и решения заблокированы до истечения
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hurt {
    pub remaining: f32,
}

/// Маркер: боец мертв (терминальное состояние, монотонное)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Реакция на удар (per-archetype настройки)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HurtProfile {
    /// Длительность окна неуязвимости (секунды)
    pub invulnerability: f32,
    /// Длительность hurt-оглушения (секунды)
    pub stun: f32,
    /// Импульс отбрасывания (|x|, +y); направление решает damage funnel
    pub knockback: Vec2,
}

impl Default for HurtProfile {
    fn default() -> Self {
        Self {
            invulnerability: 0.4,
            stun: 0.4,
            knockback: Vec2::new(50.0, 100.0),
        }
    }
}

/// Сценарий смерти: терминальная поза → (нотификация) → fade → удаление
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DeathStyle {
    /// Отложить died-нотификацию до конца hold (контракт игрока:
    /// событие не раньше завершения терминальной анимации)
    pub notify_after_hold: bool,
    /// Держать терминальную позу (секунды)
    pub hold: f32,
    /// Затухание перед удалением (секунды)
    pub fade: f32,
    /// Удалять ли entity после fade
    pub despawn: bool,
}

impl Default for DeathStyle {
    fn default() -> Self {
        Self {
            notify_after_hold: false,
            hold: 1.5,
            fade: 1.0,
            despawn: true,
        }
    }
}

/// Текущая фаза смерти (тикается advance_death_sequences)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct DeathSequence {
    pub hold_remaining: f32,
    pub fade_remaining: f32,
    /// Died-нотификация уже отправлена
    pub notified: bool,
    pub despawn: bool,
}

impl DeathSequence {
    pub fn from_style(style: DeathStyle) -> Self {
        Self {
            hold_remaining: style.hold,
            fade_remaining: style.fade,
            notified: !style.notify_after_hold,
            despawn: style.despawn,
        }
    }
}

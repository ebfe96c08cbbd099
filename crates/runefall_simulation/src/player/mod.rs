//! Player actor: input-directed movement + two swing variants.
//!
//! Input arrives as logical per-tick signals — the host polls devices and
//! writes `PlayerInput` before each tick; jump/attack signals are edges,
//! movement and run are level states. Edges are cleared at the end of every
//! tick so a missed host write can never replay a press.

use bevy::prelude::*;

use crate::combat::events::{AttackKind, AttackStarted};
use crate::combat::swing::{SwingSpec, SwingState};
use crate::components::{
    Body, CarriedProgress, Combatant, Dead, DeathStyle, Facing, Faction, Health, Hurt,
    HurtProfile,
};

/// Full player health (six hearts, two points each).
pub const PLAYER_MAX_HEALTH: u32 = 12;

/// Player marker.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(PlayerStats)]
pub struct Player;

/// Movement and reach tuning.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PlayerStats {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_impulse: f32,
    /// Extra melee reach against boss-class bodies
    pub boss_reach_buffer: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            walk_speed: 200.0,
            run_speed: 350.0,
            jump_impulse: 520.0,
            boss_reach_buffer: 40.0,
        }
    }
}

/// Logical input for the current tick (host writes, simulation reads).
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    pub move_left: bool,
    pub move_right: bool,
    pub run: bool,
    /// Edge: pressed this tick
    pub jump_pressed: bool,
    /// Edge: attack-1 (fast/weak)
    pub attack1_pressed: bool,
    /// Edge: attack-2 (slow/strong)
    pub attack2_pressed: bool,
}

impl PlayerInput {
    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.attack1_pressed = false;
        self.attack2_pressed = false;
    }
}

/// Attack-1: fast, weak. Damage window on frames 3–8.
pub fn light_slash() -> SwingSpec {
    SwingSpec {
        frame_duration: 0.06,
        total_frames: 10,
        active_from: 3,
        active_to: 8,
        damage: 1,
        range: 140.0,
        vertical_tolerance: 80.0,
        cooldown: 0.0,
    }
}

/// Attack-2: slow, strong. Damage window opens immediately (frames 1–4).
pub fn heavy_slash() -> SwingSpec {
    SwingSpec {
        frame_duration: 0.12,
        total_frames: 6,
        active_from: 1,
        active_to: 4,
        damage: 2,
        range: 140.0,
        vertical_tolerance: 80.0,
        cooldown: 0.0,
    }
}

/// System: translate logical input into player state.
///
/// Swings and hurt stun lock horizontal movement for their whole duration;
/// jumping is gated on ground contact (one jump per contact).
pub fn apply_player_input(
    mut commands: Commands,
    input: Res<PlayerInput>,
    mut players: Query<
        (
            Entity,
            &mut Body,
            &mut Facing,
            &PlayerStats,
            Option<&SwingState>,
            Option<&Hurt>,
        ),
        (With<Player>, Without<Dead>),
    >,
    mut attack_events: EventWriter<AttackStarted>,
) {
    for (entity, mut body, mut facing, stats, swing, hurt) in players.iter_mut() {
        // Busy: attacking or in hurt stun — movement locked.
        if swing.is_some() || hurt.is_some() {
            if body.on_ground {
                body.velocity.x = 0.0;
            }
            continue;
        }

        if input.attack1_pressed || input.attack2_pressed {
            let (kind, spec) = if input.attack1_pressed {
                (AttackKind::LightSlash, light_slash())
            } else {
                (AttackKind::HeavySlash, heavy_slash())
            };

            body.velocity.x = 0.0;
            commands.entity(entity).insert(SwingState::new(kind, spec));
            attack_events.write(AttackStarted { entity, kind });
            continue;
        }

        // Horizontal movement + facing from intent.
        let speed = if input.run {
            stats.run_speed
        } else {
            stats.walk_speed
        };
        if input.move_left && !input.move_right {
            body.velocity.x = -speed;
            *facing = Facing::Left;
        } else if input.move_right && !input.move_left {
            body.velocity.x = speed;
            *facing = Facing::Right;
        } else {
            body.velocity.x = 0.0;
        }

        // One jump per ground contact.
        if input.jump_pressed && body.on_ground {
            body.velocity.y = stats.jump_impulse;
            body.on_ground = false;
        }
    }
}

/// System: drop edge signals at the end of the tick.
pub fn clear_input_edges(mut input: ResMut<PlayerInput>) {
    input.clear_edges();
}

/// Spawn the player with carried progress (health clamped to max).
pub fn spawn_player(commands: &mut Commands, position: Vec2, progress: &CarriedProgress) -> Entity {
    commands
        .spawn((
            Player,
            PlayerStats::default(),
            Combatant {
                faction: Faction::Hero,
            },
            Health::carried(progress.health, PLAYER_MAX_HEALTH),
            Facing::Right,
            Body {
                on_ground: true,
                ..Default::default()
            },
            HurtProfile {
                invulnerability: 1.0,
                stun: 0.4,
                knockback: Vec2::new(150.0, 150.0),
            },
            // Died notification is deferred until the terminal animation
            // hold completes; the player entity itself is never despawned.
            DeathStyle {
                notify_after_hold: true,
                hold: 1.0,
                fade: 0.0,
                despawn: false,
            },
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}

/// Player Plugin
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .add_systems(
                FixedUpdate,
                apply_player_input.in_set(crate::SimulationSet::Player),
            )
            .add_systems(
                FixedUpdate,
                clear_input_edges
                    .in_set(crate::SimulationSet::Physics)
                    .after(crate::physics::integrate_bodies),
            );
    }
}

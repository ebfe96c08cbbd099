//! Kinematic движение для headless симуляции
//!
//! Архитектура:
//! - Host-слой владеет настоящей геометрией коллизий
//! - Headless режим: плоская Arena (пол + стены) выдает контактные флаги
//! - Custom velocity integration, gravity вниз (координаты y-up)
//!
//! Детерминизм: fixed timestep 60Hz, интеграция только в FixedUpdate.

use bevy::prelude::*;

use crate::components::{Body, Dead};

/// Геометрия headless-арены: пол и вертикальные границы
#[derive(Resource, Debug, Clone, Copy)]
pub struct Arena {
    pub floor_y: f32,
    pub min_x: f32,
    pub max_x: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            floor_y: 0.0,
            min_x: 0.0,
            max_x: 1280.0,
        }
    }
}

/// Event: боец приземлился (edge-сигнал для host SFX)
#[derive(Event, Debug, Clone)]
pub struct Landed {
    pub entity: Entity,
}

/// System: гравитация для тел в воздухе
pub fn apply_gravity(mut bodies: Query<&mut Body, Without<Dead>>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut body in bodies.iter_mut() {
        if !body.on_ground {
            body.velocity.y -= body.gravity * delta;
        }
    }
}

/// System: интеграция velocity + контактные флаги от Arena
///
/// Мертвые тела заморожены (physics отключена контрактом смерти).
pub fn integrate_bodies(
    arena: Res<Arena>,
    time: Res<Time<Fixed>>,
    mut bodies: Query<(Entity, &mut Transform, &mut Body), Without<Dead>>,
    mut landed_events: EventWriter<Landed>,
) {
    let delta = time.delta_secs();

    for (entity, mut transform, mut body) in bodies.iter_mut() {
        let was_airborne = !body.on_ground;

        transform.translation.x += body.velocity.x * delta;
        transform.translation.y += body.velocity.y * delta;

        // Контакт с полом
        if transform.translation.y <= arena.floor_y {
            transform.translation.y = arena.floor_y;
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
            body.on_ground = true;
            if was_airborne {
                landed_events.write(Landed { entity });
            }
        } else {
            body.on_ground = false;
        }

        // Стены арены
        body.blocked_left = false;
        body.blocked_right = false;
        if transform.translation.x <= arena.min_x {
            transform.translation.x = arena.min_x;
            body.blocked_left = true;
            if body.velocity.x < 0.0 {
                body.velocity.x = 0.0;
            }
        } else if transform.translation.x >= arena.max_x {
            transform.translation.x = arena.max_x;
            body.blocked_right = true;
            if body.velocity.x > 0.0 {
                body.velocity.x = 0.0;
            }
        }
    }
}

/// Physics Plugin (headless-замена host-коллизиям)
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Landed>().add_systems(
            FixedUpdate,
            (apply_gravity, integrate_bodies)
                .chain()
                .in_set(crate::SimulationSet::Physics),
        );
    }
}

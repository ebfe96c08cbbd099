//! Boss projectiles ("fireballs"): aim-at-spawn ballistic entities.
//!
//! Aiming uses the target's position at spawn time; the projectile never
//! re-aims in flight. Flight is straight-line at fixed speed, no gravity.
//! Collision policy (world first, then the player) lives in the arbiter.

use bevy::prelude::*;

/// Fireball flight speed (world units / s)
pub const FIREBALL_SPEED: f32 = 450.0;
/// Fireball contact radius
pub const FIREBALL_RADIUS: f32 = 30.0;

/// A live projectile.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub velocity: Vec2,
    /// Shooter — excluded from collision
    pub owner: Entity,
    pub radius: f32,
}

/// Event: spawn a projectile aimed at a world position.
#[derive(Event, Debug, Clone)]
pub struct LaunchProjectile {
    pub owner: Entity,
    pub origin: Vec2,
    /// Target position sampled at launch time
    pub aim_at: Vec2,
    /// Direction used when origin == aim_at (+1 right / -1 left)
    pub fallback_dir: f32,
}

/// Velocity from spawn point toward the aim point, at fixed magnitude.
pub fn aim_velocity(origin: Vec2, aim_at: Vec2, fallback_dir: f32) -> Vec2 {
    let to_target = aim_at - origin;
    if to_target.length_squared() > f32::EPSILON {
        to_target.normalize() * FIREBALL_SPEED
    } else {
        Vec2::new(fallback_dir * FIREBALL_SPEED, 0.0)
    }
}

/// System: spawn projectiles from launch events.
pub fn spawn_projectiles(mut commands: Commands, mut launches: EventReader<LaunchProjectile>) {
    for launch in launches.read() {
        commands.spawn((
            Projectile {
                velocity: aim_velocity(launch.origin, launch.aim_at, launch.fallback_dir),
                owner: launch.owner,
                radius: FIREBALL_RADIUS,
            },
            Transform::from_translation(launch.origin.extend(0.0)),
        ));

        crate::log(&format!(
            "Fireball launched by {:?} from {:?} toward {:?}",
            launch.owner, launch.origin, launch.aim_at
        ));
    }
}

/// System: straight-line flight.
pub fn update_projectiles(
    mut projectiles: Query<(&Projectile, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (projectile, mut transform) in projectiles.iter_mut() {
        transform.translation.x += projectile.velocity.x * delta;
        transform.translation.y += projectile.velocity.y * delta;
    }
}

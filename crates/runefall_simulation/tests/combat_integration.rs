//! Combat integration tests
//!
//! Headless encounters driven tick-by-tick with `run_fixed_ticks` — no wall
//! clock anywhere, every scenario fully deterministic.
//!
//! Covered contracts:
//! - patroller boundary patrol: pause-then-flip at the configured range
//! - per-swing hit ledger: N overlapping targets, each damaged at most once
//! - invulnerability: no health change while the window is open, and two
//!   qualifying damage sources in one tick apply exactly once
//! - boss charge: contact damage only while the charge is active
//! - projectile: aim at spawn-time target position, |v| = 450, destroyed on
//!   first contact, never damages after destruction
//! - death ordering: the player's died notification fires only after the
//!   terminal-animation hold
//! - boss interruption: incoming damage clears the attack state and emits
//!   the teardown notification

use bevy::prelude::*;
use runefall_simulation::*;

/// Helper: full simulation App
fn create_combat_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app
}

fn drain_died(app: &mut App) -> Vec<Entity> {
    app.world_mut()
        .resource_mut::<Events<CombatantDied>>()
        .drain()
        .map(|event| event.entity)
        .collect()
}

fn drain_interrupted(app: &mut App) -> Vec<Entity> {
    app.world_mut()
        .resource_mut::<Events<AttackInterrupted>>()
        .drain()
        .map(|event| event.entity)
        .collect()
}

fn live_projectiles(app: &mut App) -> Vec<Projectile> {
    let world = app.world_mut();
    let mut query = world.query::<&Projectile>();
    query.iter(world).cloned().collect()
}

fn health_of(app: &App, entity: Entity) -> u32 {
    app.world().get::<Health>(entity).map(|h| h.current).unwrap_or(0)
}

#[test]
fn test_patroller_turn_around_at_boundary() {
    let mut app = create_combat_app(42);

    let knight = {
        let mut commands = app.world_mut().commands();
        spawn_patroller(
            &mut commands,
            Vec2::new(500.0, 0.0),
            PatrolConfig {
                origin_x: 500.0,
                range: 70.0,
                walk_speed: 30.0,
                wait: 1.0,
                direction: 1.0,
            },
        )
    };
    app.world_mut().flush();

    // 30 units/s → the 70-unit boundary falls around tick 141
    run_fixed_ticks(&mut app, 145);

    let x = app.world().get::<Transform>(knight).unwrap().translation.x;
    assert!(x > 570.0, "patroller should have crossed the boundary, x = {x}");
    assert!(
        app.world().get::<TurnWait>(knight).is_some(),
        "crossing the boundary must start the turn-around wait"
    );
    assert_eq!(app.world().get::<Body>(knight).unwrap().velocity.x, 0.0);
    assert_eq!(app.world().get::<PatrolConfig>(knight).unwrap().direction, 1.0);

    // The 1s pause elapses, then the direction flips — never instantly
    run_fixed_ticks(&mut app, 70);

    assert_eq!(app.world().get::<PatrolConfig>(knight).unwrap().direction, -1.0);
    assert!(app.world().get::<TurnWait>(knight).is_none());
    assert!(app.world().get::<Body>(knight).unwrap().velocity.x < 0.0);
}

#[test]
fn test_swing_ledger_hits_each_target_once() {
    let mut app = create_combat_app(42);

    let (player, knight_near, knight_far) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, Vec2::new(300.0, 0.0), &CarriedProgress::default());
        // Out of the knights' 100-unit reach, inside the player's 140
        let near = spawn_patroller(
            &mut commands,
            Vec2::new(420.0, 0.0),
            PatrolConfig { origin_x: 420.0, walk_speed: 0.0, ..Default::default() },
        );
        let far = spawn_patroller(
            &mut commands,
            Vec2::new(430.0, 0.0),
            PatrolConfig { origin_x: 430.0, walk_speed: 0.0, ..Default::default() },
        );
        (player, near, far)
    };
    app.world_mut().flush();

    app.world_mut().resource_mut::<PlayerInput>().attack1_pressed = true;
    // Whole light slash: 10 frames × 0.06s, active frames 3–8
    run_fixed_ticks(&mut app, 40);

    assert_eq!(health_of(&app, knight_near), 2, "each overlapping target damaged exactly once");
    assert_eq!(health_of(&app, knight_far), 2, "each overlapping target damaged exactly once");
    assert_eq!(health_of(&app, player), PLAYER_MAX_HEALTH);
}

#[test]
fn test_damage_on_invulnerable_target_is_noop() {
    let mut app = create_combat_app(42);

    let (player, boss) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, Vec2::new(100.0, 0.0), &CarriedProgress::default());
        let boss = spawn_boss(&mut commands, Vec2::new(900.0, 0.0));
        (player, boss)
    };
    app.world_mut().flush();

    app.world_mut().entity_mut(boss).insert(Invulnerable { remaining: 10.0 });
    app.world_mut().send_event(DamageInflicted {
        attacker: player,
        target: boss,
        amount: 5,
        push_dir: 1.0,
        knockback_override: None,
    });
    run_fixed_ticks(&mut app, 5);

    assert_eq!(health_of(&app, boss), 30, "invulnerable target must not lose health");
}

#[test]
fn test_damage_on_dead_target_is_noop() {
    let mut app = create_combat_app(42);

    let (player, boss) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, Vec2::new(100.0, 0.0), &CarriedProgress::default());
        let boss = spawn_boss(&mut commands, Vec2::new(900.0, 0.0));
        (player, boss)
    };
    app.world_mut().flush();

    app.world_mut().send_event(DamageInflicted {
        attacker: player,
        target: boss,
        amount: 30,
        push_dir: 1.0,
        knockback_override: None,
    });
    run_fixed_ticks(&mut app, 2);

    assert_eq!(health_of(&app, boss), 0);
    assert!(app.world().get::<Dead>(boss).is_some());
    let deaths_so_far = drain_died(&mut app).len();
    assert_eq!(deaths_so_far, 1);

    // A second hit on the corpse is silently ignored — no second death
    app.world_mut().send_event(DamageInflicted {
        attacker: player,
        target: boss,
        amount: 5,
        push_dir: 1.0,
        knockback_override: None,
    });
    run_fixed_ticks(&mut app, 2);

    assert!(app.world().get::<Dead>(boss).is_some());
    assert_eq!(drain_died(&mut app).len(), 0);
}

#[test]
fn test_two_simultaneous_sources_apply_once() {
    let mut app = create_combat_app(42);

    let player = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, Vec2::new(600.0, 0.0), &CarriedProgress::default());
        // Both knights in reach with ready cooldowns: both swings open their
        // hit window on the same tick
        spawn_patroller(
            &mut commands,
            Vec2::new(540.0, 0.0),
            PatrolConfig { origin_x: 540.0, walk_speed: 0.0, ..Default::default() },
        );
        spawn_patroller(
            &mut commands,
            Vec2::new(660.0, 0.0),
            PatrolConfig { origin_x: 660.0, walk_speed: 0.0, ..Default::default() },
        );
        player
    };
    app.world_mut().flush();

    run_fixed_ticks(&mut app, 20);

    assert_eq!(
        health_of(&app, player),
        PLAYER_MAX_HEALTH - 1,
        "same-tick damage sources must collapse into a single application"
    );
}

#[test]
fn test_charge_hits_once_and_never_after_it_ends() {
    let mut app = create_combat_app(42);

    let (player, boss) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, Vec2::new(600.0, 0.0), &CarriedProgress::default());
        let boss = spawn_boss(&mut commands, Vec2::new(650.0, 0.0));
        (player, boss)
    };
    app.world_mut().flush();

    // Mid-charge, with the decision gate held shut so nothing else fires
    app.world_mut()
        .entity_mut(boss)
        .insert((BossAttackState::Charging { remaining: 0.5 }, ActionGate { remaining: 999.0 }));

    // Continuous overlap across many consecutive ticks
    run_fixed_ticks(&mut app, 30);
    assert_eq!(
        health_of(&app, player),
        PLAYER_MAX_HEALTH - 1,
        "multi-tick overlap during one charge must hit exactly once"
    );

    // Charge is over; park the player on top of the boss and outlast the
    // invulnerability window — overlap without an active charge is harmless
    run_fixed_ticks(&mut app, 20);
    assert!(app.world().get::<BossAttackState>(boss).is_none());

    let boss_pos = app.world().get::<Transform>(boss).unwrap().translation;
    app.world_mut().get_mut::<Transform>(player).unwrap().translation =
        boss_pos + Vec3::new(30.0, 0.0, 0.0);

    run_fixed_ticks(&mut app, 90);
    assert!(app.world().get::<Invulnerable>(player).is_none());
    assert_eq!(
        health_of(&app, player),
        PLAYER_MAX_HEALTH - 1,
        "no damage once the charge has ended, even with persistent overlap"
    );
}

#[test]
fn test_projectile_aims_at_spawn_time_position() {
    let mut app = create_combat_app(42);

    let (player, boss) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, Vec2::new(500.0, 0.0), &CarriedProgress::default());
        let boss = spawn_boss(&mut commands, Vec2::new(900.0, 0.0));
        (player, boss)
    };
    app.world_mut().flush();

    app.world_mut()
        .entity_mut(boss)
        .insert((BossAttackState::FireballWindup { remaining: 0.05 }, ActionGate { remaining: 999.0 }));

    run_fixed_ticks(&mut app, 5);

    let projectiles = live_projectiles(&mut app);
    assert_eq!(projectiles.len(), 1, "windup expiry must spawn exactly one fireball");
    let velocity = projectiles[0].velocity;
    assert!(
        (velocity.length() - 450.0).abs() < 1e-2,
        "fireball speed must be 450, got {}",
        velocity.length()
    );
    assert!(velocity.x < 0.0, "aimed toward the player on the left");

    // Flight until impact: destroyed on first contact, damage applied once
    run_fixed_ticks(&mut app, 60);
    assert!(live_projectiles(&mut app).is_empty(), "fireball must despawn on contact");
    assert_eq!(health_of(&app, player), PLAYER_MAX_HEALTH - 1);

    // Destroyed means gone for good — nothing left to deal damage
    run_fixed_ticks(&mut app, 60);
    assert_eq!(health_of(&app, player), PLAYER_MAX_HEALTH - 1);
}

#[test]
fn test_projectile_destroyed_by_world_geometry() {
    let mut app = create_combat_app(42);

    let (player, boss) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, Vec2::new(0.0, 0.0), &CarriedProgress::default());
        let boss = spawn_boss(&mut commands, Vec2::new(600.0, 0.0));
        (player, boss)
    };
    app.world_mut().flush();
    app.world_mut().entity_mut(boss).insert(ActionGate { remaining: 999.0 });

    // Steep downward shot: the floor is the first contact
    app.world_mut().send_event(LaunchProjectile {
        owner: boss,
        origin: Vec2::new(600.0, 20.0),
        aim_at: Vec2::new(500.0, -300.0),
        fallback_dir: -1.0,
    });

    run_fixed_ticks(&mut app, 10);

    assert!(live_projectiles(&mut app).is_empty(), "ground contact must destroy the fireball");
    assert_eq!(health_of(&app, player), PLAYER_MAX_HEALTH);
}

#[test]
fn test_player_died_notification_waits_for_death_animation() {
    let mut app = create_combat_app(42);

    let (player, _knight) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(
            &mut commands,
            Vec2::new(100.0, 0.0),
            &CarriedProgress { score: 0, health: 1 },
        );
        let knight = spawn_patroller(
            &mut commands,
            Vec2::new(160.0, 0.0),
            PatrolConfig { origin_x: 160.0, walk_speed: 0.0, ..Default::default() },
        );
        (player, knight)
    };
    app.world_mut().flush();

    // The knight's first strike is lethal within the first dozen ticks
    run_fixed_ticks(&mut app, 20);

    assert!(app.world().get::<Dead>(player).is_some(), "player should be dead");
    assert!(
        !drain_died(&mut app).contains(&player),
        "died notification must NOT fire before the death animation completes"
    );

    // Terminal-animation hold is 1s; afterwards the notification fires once
    run_fixed_ticks(&mut app, 70);

    let died = drain_died(&mut app);
    assert_eq!(
        died.iter().filter(|entity| **entity == player).count(),
        1,
        "died notification fires exactly once, after the hold"
    );
}

#[test]
fn test_patroller_death_sequence_fades_and_despawns() {
    let mut app = create_combat_app(42);

    let (player, knight) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, Vec2::new(300.0, 0.0), &CarriedProgress::default());
        let knight = spawn_patroller(
            &mut commands,
            Vec2::new(400.0, 0.0),
            PatrolConfig { origin_x: 400.0, walk_speed: 0.0, ..Default::default() },
        );
        (player, knight)
    };
    app.world_mut().flush();
    app.world_mut().get_mut::<Health>(knight).unwrap().current = 1;

    // Heavy slash: active from frame 1, lethal immediately
    app.world_mut().resource_mut::<PlayerInput>().attack2_pressed = true;
    run_fixed_ticks(&mut app, 5);

    assert!(app.world().get::<Dead>(knight).is_some());
    let body = app.world().get::<Body>(knight).unwrap();
    assert!(!body.collision_enabled, "death must disable collision");
    assert_eq!(body.velocity, Vec2::ZERO, "death must stop motion");
    assert!(drain_died(&mut app).contains(&knight), "enemy death notifies immediately");

    // 1.5s hold + 1.0s fade, then the corpse is removed from the simulation
    run_fixed_ticks(&mut app, 160);
    assert!(app.world().get_entity(knight).is_err(), "patroller must despawn after the fade");

    let _ = player;
}

#[test]
fn test_damage_interrupts_boss_charge() {
    let mut app = create_combat_app(42);

    let (player, boss) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, Vec2::new(300.0, 0.0), &CarriedProgress::default());
        let boss = spawn_boss(&mut commands, Vec2::new(400.0, 0.0));
        (player, boss)
    };
    app.world_mut().flush();

    app.world_mut()
        .entity_mut(boss)
        .insert((BossAttackState::Charging { remaining: 0.8 }, ActionGate { remaining: 999.0 }));

    // Heavy slash lands on its very first active frame
    app.world_mut().resource_mut::<PlayerInput>().attack2_pressed = true;
    run_fixed_ticks(&mut app, 3);

    assert_eq!(health_of(&app, boss), 28);
    assert!(
        app.world().get::<BossAttackState>(boss).is_none(),
        "damage must clear the in-progress attack"
    );
    assert!(app.world().get::<Hurt>(boss).is_some());
    assert!(app.world().get::<Invulnerable>(boss).is_some());
    assert_eq!(
        app.world().get::<Body>(boss).unwrap().velocity.x,
        0.0,
        "interrupted charge must stop moving"
    );
    assert!(
        drain_interrupted(&mut app).contains(&boss),
        "host must be told to tear down residual charge audio/visuals"
    );

    let _ = player;
}

#[test]
fn test_boss_decision_arms_the_global_gate() {
    let mut app = create_combat_app(42);

    let boss = {
        let mut commands = app.world_mut().commands();
        // Near band: 150 units away
        spawn_player(&mut commands, Vec2::new(750.0, 0.0), &CarriedProgress::default());
        spawn_boss(&mut commands, Vec2::new(900.0, 0.0))
    };
    app.world_mut().flush();

    run_fixed_ticks(&mut app, 1);

    // Near band offers flame jet (60%) or jump-away (else) — either way the
    // single global gate is armed from invocation
    let jetting = matches!(
        app.world().get::<BossAttackState>(boss),
        Some(BossAttackState::FlameJet { .. })
    );
    let jumping = app.world().get::<Body>(boss).unwrap().velocity.y > 0.0;
    assert!(jetting ^ jumping, "exactly one near-band behavior must fire");
    assert!(app.world().get::<ActionGate>(boss).unwrap().remaining > 0.0);
}

#[test]
fn test_health_invariants_and_dead_monotonicity() {
    let mut app = create_combat_app(7);

    let (player, knight, boss) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, Vec2::new(100.0, 0.0), &CarriedProgress::default());
        let knight = spawn_patroller(
            &mut commands,
            Vec2::new(500.0, 0.0),
            PatrolConfig { origin_x: 500.0, ..Default::default() },
        );
        let boss = spawn_boss(&mut commands, Vec2::new(1100.0, 0.0));
        (player, knight, boss)
    };
    app.world_mut().flush();

    let combatants = [player, knight, boss];
    let mut seen_dead = [false; 3];

    for tick in 0..1000 {
        {
            let mut input = app.world_mut().resource_mut::<PlayerInput>();
            input.move_right = tick % 120 < 60;
            input.attack1_pressed = tick % 45 == 0;
            input.attack2_pressed = tick % 130 == 0;
            input.jump_pressed = tick % 200 == 0;
        }
        run_fixed_ticks(&mut app, 1);

        for (slot, &entity) in combatants.iter().enumerate() {
            let Ok(entity_ref) = app.world().get_entity(entity) else {
                // Despawned (patroller fade-out) — stays gone
                continue;
            };
            if let Some(health) = entity_ref.get::<Health>() {
                assert!(
                    health.current <= health.max,
                    "tick {tick}: health invariant broken for {entity:?}"
                );
            }
            let dead_now = entity_ref.get::<Dead>().is_some();
            if seen_dead[slot] {
                assert!(dead_now, "tick {tick}: Dead must be monotonic for {entity:?}");
            }
            seen_dead[slot] |= dead_now;
        }
    }
}

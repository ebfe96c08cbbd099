//! Headless RUNEFALL encounter
//!
//! Runs the boss arena without a renderer: scripted player input, fixed
//! tick count, health printout along the way.

use bevy::prelude::*;
use runefall_simulation::{
    create_headless_app, run_fixed_ticks, spawn_boss, spawn_patroller, spawn_player,
    CarriedProgress, Health, PatrolConfig, PlayerInput, SimulationPlugin,
};

fn main() {
    let seed = 42;
    println!("Starting RUNEFALL headless encounter (seed: {seed})");

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let progress = CarriedProgress::default();
    let mut commands = app.world_mut().commands();
    let player = spawn_player(&mut commands, Vec2::new(100.0, 0.0), &progress);
    let knight = spawn_patroller(
        &mut commands,
        Vec2::new(500.0, 0.0),
        PatrolConfig {
            origin_x: 500.0,
            ..Default::default()
        },
    );
    let boss = spawn_boss(&mut commands, Vec2::new(1100.0, 0.0));
    app.world_mut().flush();

    for tick in 0..1200 {
        {
            let mut input = app.world_mut().resource_mut::<PlayerInput>();
            input.move_right = tick < 300;
            input.attack1_pressed = tick % 90 == 0;
        }
        run_fixed_ticks(&mut app, 1);

        if tick % 200 == 0 {
            let hp = |entity| {
                app.world()
                    .get::<Health>(entity)
                    .map(|h| h.current)
                    .unwrap_or(0)
            };
            println!(
                "Tick {tick}: player hp {}, knight hp {}, boss hp {}",
                hp(player),
                hp(knight),
                hp(boss)
            );
        }
    }

    println!("Encounter complete");
}

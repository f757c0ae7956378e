mod common;

use bevy::prelude::*;

use beamlance::plugins::projectiles::components::Projectile;
use beamlance::plugins::projectiles::messages::SpawnProjectileRequest;
use beamlance::plugins::projectiles::spawn::ProjectileParams;
use beamlance::plugins::targets::Hittable;

#[test]
fn boots_and_ticks() {
    // Configure your headless game (states + gameplay plugins)
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }
}

#[test]
fn demo_targets_spawn_on_ingame() {
    let mut app = common::app_headless();

    // First update runs the initial state transition (OnEnter(InGame)).
    app.update();

    let count = app
        .world_mut()
        .query::<&Hittable>()
        .iter(app.world())
        .count();
    assert_eq!(count, 3);
}

#[test]
fn spawn_request_pipeline_is_wired() {
    let mut app = common::app_headless();
    app.update();

    app.world_mut().write_message(SpawnProjectileRequest::new(
        ProjectileParams::new(Vec2::new(500.0, 0.0), Vec2::X),
    ));
    app.update();

    let count = app
        .world_mut()
        .query::<&Projectile>()
        .iter(app.world())
        .count();
    assert_eq!(count, 1);
}

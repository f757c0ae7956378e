use bevy::prelude::*;
use crate::plugins::core;
use crate::common::tunables::Tunables;

#[test]
fn inserts_resources() {
    let mut app = App::new();
    core::plugin(&mut app);
    assert!(app.world().get_resource::<Tunables>().is_some());
    assert!(app.world().get_resource::<ClearColor>().is_some());
}

#[test]
fn tunables_defaults_are_sane() {
    let t = Tunables::default();
    assert!(t.projectile_speed > 0.0);
    assert!(t.hit_thickness >= 0.0);
    assert!(t.hit_resolve_cap > 0.0);
    assert!(t.hit_resolve_scale > 0.0);
}

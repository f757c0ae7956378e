//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `beamlance::game::configure_headless` to install gameplay plugins.

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;

pub fn app_headless() -> App {
    let mut app = App::new();

    // Core ECS + states.
    // Add AssetPlugin + ScenePlugin so asset-backed components resolve.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    beamlance::game::configure_headless(&mut app);
    app
}

//! Tunable gameplay constants.
//!
//! [`Tunables`] is the compiled source of truth. At startup,
//! [`load_tunables`] reads `assets/tunables.toml` (if present) and
//! overwrites the defaults with any values found there; missing keys keep
//! their compiled defaults, so a minimal TOML can override just the
//! values you care about.

use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable projectile simulation constants.
///
/// `projectile_speed` is displacement per fixed tick, not per second; the
/// simulation advances one step each time the fixed schedule runs. Delay
/// fields are likewise counted in fixed ticks.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Displacement per fixed tick, in world units.
    pub projectile_speed: f32,
    /// Effective collision-volume inflation applied to every target disc.
    /// Compensates for discrete per-tick ray casting skipping thin targets.
    pub hit_thickness: f32,
    /// Ceiling on the raw time-to-impact (`distance / speed`) before it is
    /// scaled into a hit-resolution delay.
    pub hit_resolve_cap: f32,
    /// Fixed ticks per unit of capped time-to-impact.
    pub hit_resolve_scale: f32,
    /// Fixed ticks between pierce exhaustion and retirement, leaving room
    /// for an in-flight hit animation to play out.
    pub retire_delay_ticks: u32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            projectile_speed: 1.0,
            hit_thickness: 5.0,
            hit_resolve_cap: 0.5,
            hit_resolve_scale: 30.0,
            retire_delay_ticks: 12,
        }
    }
}

/// Startup system: overwrite [`Tunables`] with values from
/// `assets/tunables.toml` when the file exists and parses.
///
/// A missing file is not an error (the defaults are already in place); a
/// parse failure is logged and the defaults stay.
pub fn load_tunables(mut tunables: ResMut<Tunables>) {
    let path = "assets/tunables.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<Tunables>(&contents) {
            Ok(loaded) => {
                *tunables = loaded;
                info!("loaded tunables from {path}");
            }
            Err(e) => {
                warn!("failed to parse {path}: {e}; using compiled defaults");
            }
        },
        Err(_) => {
            debug!("no {path} found; using compiled defaults");
        }
    }
}

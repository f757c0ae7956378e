//! Spatial query engine: forward ray sweeps against the target registry.
//!
//! The math half ([`ray_disc_entry`], [`sweep`]) is pure: position,
//! direction, and the registry snapshot in; ordered intersections out.
//! It unit-tests without a `World`. The system half
//! ([`sweep_collisions`]) feeds accepted hits into the lifecycle
//! scheduler.
//!
//! Hit thickness inflates every target disc before intersection. This is
//! a tunneling mitigation for discrete per-tick casting, not a physical
//! property: a thin target sitting between two consecutive tick positions
//! would otherwise never intersect the ray.

use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::targets::{TargetRef, TargetRegistry};

use super::components::{FlightPath, PierceLedger, Projectile, ProjectileState};
use super::scheduler::{hit_resolution_delay, LifecycleScheduler};

/// One ray intersection: which target, how far along the ray, and where.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub target: Entity,
    pub distance: f32,
    pub point: Vec2,
}

/// Entry distance of a forward ray against a disc, or `None` if the ray
/// misses it.
///
/// `dir` must be unit-length. A disc wholly behind the origin is a miss;
/// an origin already inside the disc hits at distance 0. The ray itself
/// is unbounded forward; callers bound the consequences (pierce budget,
/// delay cap), not the geometry.
pub fn ray_disc_entry(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    // Closest-approach parameter along the ray.
    let along = to_center.dot(dir);
    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - closest_sq).sqrt();
    let exit = along + half_chord;
    if exit < 0.0 {
        return None;
    }
    Some((along - half_chord).max(0.0))
}

/// Sweep a thickness-inflated ray against a registry snapshot.
///
/// Returns every intersection, nearest first (`total_cmp`, stable sort:
/// equal distances keep registry order).
pub fn sweep(
    origin: Vec2,
    dir: Vec2,
    thickness: f32,
    targets: impl Iterator<Item = TargetRef>,
) -> Vec<RayHit> {
    let mut hits: Vec<RayHit> = targets
        .filter_map(|t| {
            ray_disc_entry(origin, dir, t.center, t.radius + thickness).map(|distance| RayHit {
                target: t.entity,
                distance,
                point: origin + dir * distance,
            })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Collision pass: cast, gate through the pierce ledger, schedule
/// resolutions.
///
/// Every accepted hit goes through `PierceLedger::try_register_hit`, the
/// single dedup/budget gate, and is then deferred by the
/// distance-scaled, capped resolution delay. Nearest hits are registered
/// first, so with equal delays they also resolve first.
pub fn sweep_collisions(
    tunables: Res<Tunables>,
    mut scheduler: ResMut<LifecycleScheduler>,
    registry: TargetRegistry,
    mut q: Query<
        (Entity, &Transform, &FlightPath, &mut PierceLedger, &ProjectileState),
        With<Projectile>,
    >,
) {
    for (e, tf, path, mut ledger, state) in &mut q {
        if *state != ProjectileState::InFlight {
            continue;
        }
        if ledger.exhausted() {
            continue;
        }

        let origin = tf.translation.truncate();
        for hit in sweep(origin, path.direction, tunables.hit_thickness, registry.hittable()) {
            if !ledger.try_register_hit(hit.target) {
                continue;
            }
            let delay = hit_resolution_delay(hit.distance, path.speed, &tunables);
            scheduler.schedule_hit_resolution(e, hit.target, hit.point, delay);
        }
    }
}

//! Buffered projectile messages.
//!
//! We use Bevy **Messages** for the boundaries of the pipeline:
//! - producers enqueue *intent* (`SpawnProjectileRequest`); the consumer
//!   applies it (validation + component writes).
//! - the pipeline announces *outcomes* (`TargetHit`, `ProjectileRetired`)
//!   for whoever is listening: the targets plugin applies damage from
//!   `TargetHit`, a presentation layer can sync removals from
//!   `ProjectileRetired`.
//!
//! This is a producer → queue → consumer pipeline.

use bevy::prelude::*;

use super::spawn::ProjectileParams;

/// Ask the consumer to spawn a projectile next `Update`.
///
/// Not `Clone`: the params may carry the projectile's hit callback, which
/// is moved into the spawned entity.
#[derive(Message, Debug)]
pub struct SpawnProjectileRequest {
    pub params: ProjectileParams,
}

impl SpawnProjectileRequest {
    pub fn new(params: ProjectileParams) -> Self {
        Self { params }
    }
}

/// A credited hit finished its resolution delay.
///
/// Written at most once per (projectile, target) pair; the pierce ledger
/// guarantees the pair was credited exactly once.
#[derive(Message, Clone, Copy, Debug)]
pub struct TargetHit {
    pub projectile: Entity,
    pub target: Entity,
    pub impact: Vec2,
}

/// The removal sink took a projectile out of the world.
#[derive(Message, Clone, Copy, Debug)]
pub struct ProjectileRetired {
    pub projectile: Entity,
}

//! Projectiles plugin: **message-based producer → consumer** spawning + a
//! fixed-tick flight/collision/retirement pipeline.
//!
//! # Philosophy: invariants first
//! Correctness checks are pushed to boundaries so the per-tick systems
//! stay straight-line:
//! - spawn validates once (`spawn_projectile`); after that `direction` is
//!   unit-length and the budgets are positive, and nothing downstream
//!   re-checks;
//! - every hit passes through one gate (`PierceLedger::try_register_hit`);
//! - retirement is a once-only state transition, committed by one system.
//!
//! # Data flow (big picture)
//! ```text
//!   Update schedule
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  (A) Producers write SpawnProjectileRequest messages               │
//! │  (B) Consumer: consume_spawn_requests                              │
//! │      - drains requests, validates, spawns the component bundle     │
//! └────────────────────────────────────────────────────────────────────┘
//!                 │
//!                 v
//!   FixedUpdate (one simulation tick per run)
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  (C) integrate_flight: translation += direction * speed; orient    │
//! │  (D) check_range: past max range -> request retirement (no delay)  │
//! │  (E) check_pierce_exhaustion: budget spent -> queue delayed        │
//! │      retirement, InFlight -> Expiring (armed exactly once)         │
//! │  (F) sweep_collisions: thick forward ray vs TargetRegistry,        │
//! │      nearest first; ledger gates each hit; accepted hits queue a   │
//! │      capped, distance-scaled resolution delay                      │
//! └────────────────────────────────────────────────────────────────────┘
//!                 │
//!                 v
//!   FixedPostUpdate
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  (G) drain_due_actions: due ResolveHit -> callback + TargetHit +   │
//! │      request retirement; due Retire -> request retirement          │
//! │  (H) retire_commit: despawn PendingRemoval projectiles (held while │
//! │      a hit resolution is still owed), write ProjectileRetired      │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Movement precedes the sweep so the ray reflects the post-move
//! position; the drain runs at the tick boundary, so deferred callbacks
//! never interleave with a tick in progress.

pub mod components;
pub mod flight;
pub mod messages;
pub mod retire;
pub mod scheduler;
pub mod spawn;
pub mod sweep;

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;

pub struct ProjectilesPlugin;

/// Maintain message buffers.
///
/// Messages are double-buffered; `update()` advances buffers.
fn update_message_buffers(
    mut spawns: ResMut<Messages<messages::SpawnProjectileRequest>>,
    mut hits: ResMut<Messages<messages::TargetHit>>,
    mut retired: ResMut<Messages<messages::ProjectileRetired>>,
) {
    spawns.update();
    hits.update();
    retired.update();
}

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(scheduler::LifecycleScheduler::default());

        // Message storage.
        app.init_resource::<Messages<messages::SpawnProjectileRequest>>();
        app.init_resource::<Messages<messages::TargetHit>>();
        app.init_resource::<Messages<messages::ProjectileRetired>>();
        app.add_systems(PostUpdate, update_message_buffers);

        // Spawn pipeline.
        app.add_systems(
            Update,
            spawn::consume_spawn_requests.run_if(in_state(GameState::InGame)),
        );

        // Simulation tick.
        app.add_systems(
            FixedUpdate,
            (
                flight::integrate_flight,
                flight::check_range.after(flight::integrate_flight),
                flight::check_pierce_exhaustion.after(flight::check_range),
                sweep::sweep_collisions.after(flight::check_pierce_exhaustion),
            )
                .run_if(in_state(GameState::InGame)),
        );

        // Deferred-action drain + removal commit.
        app.add_systems(
            FixedPostUpdate,
            (
                scheduler::drain_due_actions,
                retire::retire_commit.after(scheduler::drain_due_actions),
            )
                .run_if(in_state(GameState::InGame)),
        );

        retire::plugin(app);
    }
}

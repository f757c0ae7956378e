//! Retirement commit: the removal sink.
//!
//! This system is the only despawner of projectiles and the single
//! writer of `ProjectileRetired`. Centralizing the structural change
//! here is what makes retirement idempotent: upstream systems only ever
//! *request* retirement (a once-only state transition), and the commit
//! turns each request into at most one removal.
//!
//! Invariant: a projectile that still owes a hit resolution is held, not
//! despawned. Its callback lives on the entity; removing the entity
//! first would drop a credited hit.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::state::GameState;

use super::components::{Projectile, ProjectileState};
use super::messages::ProjectileRetired;
use super::scheduler::LifecycleScheduler;

pub fn retire_commit(
    mut commands: Commands,
    mut scheduler: ResMut<LifecycleScheduler>,
    mut retired: MessageWriter<ProjectileRetired>,
    q: Query<(Entity, &ProjectileState), With<Projectile>>,
) {
    for (e, state) in &q {
        if !state.is_retirement_requested() {
            continue;
        }
        // Hold while a credited hit is still waiting to resolve.
        if scheduler.has_pending_hits(e) {
            continue;
        }

        let cancelled = scheduler.cancel_projectile(e);
        if cancelled > 0 {
            debug!("cancelled {cancelled} pending action(s) for retiring projectile {e:?}");
        }

        retired.write(ProjectileRetired { projectile: e });
        commands.entity(e).despawn();
    }
}

/// Level reset: drop every pending deferred action.
///
/// `DespawnOnExit` removes the projectile entities themselves; this keeps
/// the scheduler from carrying timers into the next session, where they
/// could fire against recycled entity ids.
pub fn clear_scheduler_on_exit(mut scheduler: ResMut<LifecycleScheduler>) {
    let dropped = scheduler.pending_len();
    if dropped > 0 {
        debug!("dropped {dropped} pending lifecycle action(s) on state exit");
    }
    scheduler.clear();
}

/// Register the exit hook (called from the plugin).
pub fn plugin(app: &mut App) {
    app.add_systems(OnExit(GameState::InGame), clear_scheduler_on_exit);
}

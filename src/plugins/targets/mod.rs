//! Targets plugin: stationary hittable objects + the target registry.
//!
//! ---------------------------
//! HOW THIS IS DESIGNED (ECS)
//! ---------------------------
//! 1) FACTS live in components:
//!    - `Hittable` marks an entity as a member of the target registry.
//!    - `HitRadius` is its collision disc, `Health` its gameplay state.
//!
//! 2) RULES mutate facts in predictable places:
//!    - the projectile pipeline (elsewhere) announces resolved hits as
//!      `TargetHit` messages; `apply_projectile_hits` is the single
//!      writer of `Health`.
//!    - `mark_depleted_targets` retires dead targets from the registry
//!      (removing `Hittable`) so in-flight rays stop seeing them, and
//!      marks them `PendingDespawn`.
//!
//! 3) Structural changes are centralized:
//!    - `despawn_marked_targets` is the only despawner, and runs in
//!      `PostUpdate`, outside the fixed simulation step.
//!
//! The registry itself is [`TargetRegistry`]: an injected view over the
//! current `Hittable` set, queried once per tick by the projectile sweep.
//! `resolve` maps a bare entity back to its registry record, so no caller
//! ever needs to walk scene-graph ancestry to find "the real target".

use bevy::ecs::message::MessageReader;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::projectiles::messages::TargetHit;
use crate::plugins::projectiles::scheduler::drain_due_actions;

// -----------------------------------------------------------------------------
// Components
// -----------------------------------------------------------------------------

/// Registry membership marker: only `Hittable` entities are visible to
/// projectile ray sweeps. Removing it takes the target out of play
/// immediately, without structural despawn.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hittable;

/// Collision disc radius, in world units.
#[derive(Component, Debug, Clone, Copy)]
pub struct HitRadius(pub f32);

#[derive(Component, Debug, Clone)]
pub struct Health {
    pub hp: i32,
}

/// Marker: target should be removed from the world.
///
/// We don't despawn inside the fixed step; we mark and despawn later.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

// -----------------------------------------------------------------------------
// Target registry
// -----------------------------------------------------------------------------

/// One registry record: a target's identity and collision disc.
#[derive(Debug, Clone, Copy)]
pub struct TargetRef {
    pub entity: Entity,
    pub center: Vec2,
    pub radius: f32,
}

/// Injected view over the current hittable set.
///
/// This is the single source of truth for "what can a projectile hit
/// right now". Systems take it as a parameter instead of reaching into
/// shared world state.
#[derive(SystemParam)]
pub struct TargetRegistry<'w, 's> {
    targets: Query<'w, 's, (Entity, &'static Transform, &'static HitRadius), With<Hittable>>,
}

impl TargetRegistry<'_, '_> {
    /// Current hittable targets, in query order.
    pub fn hittable(&self) -> impl Iterator<Item = TargetRef> + '_ {
        self.targets.iter().map(|(entity, tf, radius)| TargetRef {
            entity,
            center: tf.translation.truncate(),
            radius: radius.0,
        })
    }

    /// Explicit identity lookup: `None` if the entity is not (or no
    /// longer) a registered target.
    pub fn resolve(&self, entity: Entity) -> Option<TargetRef> {
        self.targets.get(entity).ok().map(|(entity, tf, radius)| TargetRef {
            entity,
            center: tf.translation.truncate(),
            radius: radius.0,
        })
    }

    pub fn len(&self) -> usize {
        self.targets.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Plugin wiring
// -----------------------------------------------------------------------------

/// Register target systems.
///
/// Schedules:
/// - FixedPostUpdate: consume hit results after the projectile pipeline
///   has drained its due actions, then retire depleted targets.
/// - PostUpdate: structural cleanup.
pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_targets);

    app.add_systems(
        FixedPostUpdate,
        (
            apply_projectile_hits.after(drain_due_actions),
            mark_depleted_targets.after(apply_projectile_hits),
        )
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        PostUpdate,
        despawn_marked_targets.run_if(in_state(GameState::InGame)),
    );
}

// -----------------------------------------------------------------------------
// Spawn
// -----------------------------------------------------------------------------

/// Spawn a few stationary targets.
///
/// This is intentionally asset-free: plain sprites and disc hit shapes.
fn spawn_targets(mut commands: Commands) {
    let initial_hp: i32 = 5;

    for (i, x) in [-200.0, 0.0, 200.0].into_iter().enumerate() {
        commands.spawn((
            Name::new(format!("Target{i}")),
            Hittable,
            HitRadius(16.0),
            Health { hp: initial_hp },
            Sprite {
                color: Color::srgb(0.9, 0.25, 0.25),
                custom_size: Some(Vec2::splat(32.0)),
                ..default()
            },
            Transform::from_xyz(x, 120.0, 1.0),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

// -----------------------------------------------------------------------------
// Rules: damage + depletion
// -----------------------------------------------------------------------------

/// Apply resolved projectile hits to target health.
///
/// Hits on entities that have already left the registry are stale by
/// definition (the resolution delay outlived the target) and are dropped.
pub fn apply_projectile_hits(
    mut hits: MessageReader<TargetHit>,
    mut q: Query<&mut Health, With<Hittable>>,
) {
    for hit in hits.read() {
        let Ok(mut health) = q.get_mut(hit.target) else {
            debug!("hit resolved against departed target {:?}", hit.target);
            continue;
        };
        health.hp -= 1;
    }
}

/// Retire depleted targets from the registry and mark them for despawn.
pub fn mark_depleted_targets(
    mut commands: Commands,
    q: Query<(Entity, &Health), (With<Hittable>, Without<PendingDespawn>)>,
) {
    for (e, health) in &q {
        if health.hp <= 0 {
            commands.entity(e).remove::<Hittable>().insert(PendingDespawn);
        }
    }
}

/// Despawn targets marked for removal.
pub fn despawn_marked_targets(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}

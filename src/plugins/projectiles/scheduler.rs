//! Lifecycle scheduler: deferred, time-delayed transitions.
//!
//! Replaces ambient timer callbacks with an explicit delay queue owned by
//! the fixed simulation schedule:
//! - delays are whole fixed ticks, decremented once per drain, so timing
//!   is deterministic and testable as exact tick counts;
//! - due actions fire in scheduling order, so two hits registered
//!   nearest-first also resolve nearest-first when their delays tie;
//! - entries can be cancelled per projectile (forced destruction) or
//!   wholesale (level reset), so no callback ever fires against freed
//!   state.
//!
//! Deferred work runs at the same tick boundary that advances flight,
//! so a callback never interleaves with a tick in progress.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

use super::components::{OnHit, Projectile, ProjectileState};
use super::messages::TargetHit;

/// What to do when a delay expires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DueAction {
    /// Credit the hit to the outside world (callback + `TargetHit`), then
    /// request the projectile's retirement.
    ResolveHit {
        projectile: Entity,
        target: Entity,
        impact: Vec2,
    },
    /// Request the projectile's retirement.
    Retire {
        projectile: Entity,
    },
}

impl DueAction {
    fn projectile(&self) -> Entity {
        match *self {
            DueAction::ResolveHit { projectile, .. } | DueAction::Retire { projectile } => {
                projectile
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingAction {
    ticks_left: u32,
    action: DueAction,
}

/// Delay queue for projectile lifecycle transitions.
///
/// Entries keep insertion order; [`advance`](Self::advance) returns due
/// actions in that order.
#[derive(Resource, Debug, Default)]
pub struct LifecycleScheduler {
    pending: Vec<PendingAction>,
}

impl LifecycleScheduler {
    /// Defer a hit resolution by `delay_ticks` fixed ticks. Zero means
    /// "at the next drain".
    pub fn schedule_hit_resolution(
        &mut self,
        projectile: Entity,
        target: Entity,
        impact: Vec2,
        delay_ticks: u32,
    ) {
        self.pending.push(PendingAction {
            ticks_left: delay_ticks,
            action: DueAction::ResolveHit {
                projectile,
                target,
                impact,
            },
        });
    }

    /// Defer a retirement by `delay_ticks` fixed ticks.
    pub fn schedule_retirement(&mut self, projectile: Entity, delay_ticks: u32) {
        self.pending.push(PendingAction {
            ticks_left: delay_ticks,
            action: DueAction::Retire { projectile },
        });
    }

    /// Advance the queue one tick; remove and return the actions that
    /// came due, in scheduling order.
    pub fn advance(&mut self) -> Vec<DueAction> {
        let mut due = Vec::new();
        self.pending.retain_mut(|p| {
            if p.ticks_left == 0 {
                due.push(p.action);
                false
            } else {
                p.ticks_left -= 1;
                true
            }
        });
        due
    }

    /// Is a hit resolution still pending for this projectile?
    ///
    /// The removal sink holds a projectile while this is true: a credited
    /// hit must never lose its callback to an early despawn.
    pub fn has_pending_hits(&self, projectile: Entity) -> bool {
        self.pending.iter().any(|p| {
            matches!(p.action, DueAction::ResolveHit { projectile: pr, .. } if pr == projectile)
        })
    }

    /// Drop every pending action for `projectile`. Returns how many were
    /// cancelled.
    pub fn cancel_projectile(&mut self, projectile: Entity) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| p.action.projectile() != projectile);
        before - self.pending.len()
    }

    /// Drop everything (level reset).
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Ticks between detecting a hit and resolving it.
///
/// Raw time-to-impact (`distance / speed`, in ticks of flight) is capped
/// at `hit_resolve_cap` before scaling, so a hit detected far down the
/// ray cannot defer its feedback indefinitely.
pub fn hit_resolution_delay(distance: f32, speed: f32, tunables: &Tunables) -> u32 {
    let raw = distance / speed.max(f32::EPSILON);
    let capped = raw.min(tunables.hit_resolve_cap);
    (capped * tunables.hit_resolve_scale).round() as u32
}

/// Drain the queue once per fixed tick and apply due actions.
///
/// `ResolveHit`: invoke the projectile's callback with the target
/// identity (a missing callback is a configuration fault: logged, and
/// the resolution still proceeds, since the budget was spent at
/// registration and the hit must not be silently dropped), then write
/// `TargetHit` and request retirement. `Retire`: request retirement.
/// Both are no-ops for a
/// projectile that already left the world; that only happens on forced
/// teardown, and is logged at debug.
pub fn drain_due_actions(
    mut scheduler: ResMut<LifecycleScheduler>,
    mut q: Query<(&mut ProjectileState, &mut OnHit), With<Projectile>>,
    mut hits: MessageWriter<TargetHit>,
) {
    for action in scheduler.advance() {
        match action {
            DueAction::ResolveHit {
                projectile,
                target,
                impact,
            } => {
                let Ok((mut state, mut on_hit)) = q.get_mut(projectile) else {
                    debug!("hit resolution for departed projectile {projectile:?}");
                    continue;
                };
                match on_hit.0.as_mut() {
                    Some(callback) => callback(target),
                    None => warn!(
                        "projectile {projectile:?} resolved a hit on {target:?} with no on-hit callback configured"
                    ),
                }
                hits.write(TargetHit {
                    projectile,
                    target,
                    impact,
                });
                state.request_retirement();
            }
            DueAction::Retire { projectile } => {
                if let Ok((mut state, _)) = q.get_mut(projectile) {
                    state.request_retirement();
                } else {
                    debug!("retirement for departed projectile {projectile:?}");
                }
            }
        }
    }
}

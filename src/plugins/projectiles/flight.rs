//! Per-tick flight: movement integration, orientation, range check,
//! pierce-exhaustion check.
//!
//! Ordering matters and is enforced in the plugin wiring: movement and
//! orientation run before the collision sweep so the hit-detection ray
//! starts from the post-move position; a fast projectile casting from a
//! stale position would skip past thin targets.

use bevy::prelude::*;

use crate::common::tunables::Tunables;

use super::components::{FlightPath, PierceLedger, Projectile, ProjectileState};
use super::scheduler::LifecycleScheduler;

/// Advance every live projectile one tick and keep its long axis aligned
/// with the flight direction.
///
/// Constant velocity: `translation += direction * speed`, no
/// acceleration. `Expiring` projectiles keep flying; only a projectile
/// whose retirement has been requested stops being advanced.
pub fn integrate_flight(
    mut q: Query<(&mut Transform, &FlightPath, &ProjectileState), With<Projectile>>,
) {
    for (mut tf, path, state) in &mut q {
        if state.is_retirement_requested() {
            continue;
        }
        tf.translation += (path.direction * path.speed).extend(0.0);
        // Rotate local +Y (the beam's long axis) onto the velocity direction.
        tf.rotation = Quat::from_rotation_z(Vec2::Y.angle_to(path.direction));
    }
}

/// Retire projectiles that have flown past their max range.
///
/// Immediate, no delay: there is nothing left to animate for a shot that
/// hit nothing.
pub fn check_range(
    mut q: Query<(&Transform, &FlightPath, &mut ProjectileState), With<Projectile>>,
) {
    for (tf, path, mut state) in &mut q {
        if state.is_retirement_requested() {
            continue;
        }
        if path.exceeded_range(tf.translation.truncate()) {
            state.request_retirement();
        }
    }
}

/// Queue the delayed retirement for projectiles whose pierce budget is
/// spent.
///
/// The delay is fixed (`Tunables::retire_delay_ticks`), independent of
/// hit timing, so any in-flight hit animation gets room to play out. The
/// `InFlight -> Expiring` transition guarantees the timer is armed
/// exactly once.
pub fn check_pierce_exhaustion(
    tunables: Res<Tunables>,
    mut scheduler: ResMut<LifecycleScheduler>,
    mut q: Query<(Entity, &PierceLedger, &mut ProjectileState), With<Projectile>>,
) {
    for (e, ledger, mut state) in &mut q {
        if *state != ProjectileState::InFlight {
            continue;
        }
        if !ledger.exhausted() {
            continue;
        }
        scheduler.schedule_retirement(e, tunables.retire_delay_ticks);
        *state = ProjectileState::Expiring;
    }
}

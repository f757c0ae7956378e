//! Validated projectile construction + the spawn request consumer.
//!
//! # Fail-fast invariants
//! Everything downstream of spawn assumes:
//! - `FlightPath::direction` is unit-length,
//! - `max_range` is positive and finite enough to compare against,
//! - the pierce budget starts at ≥ 1.
//!
//! [`spawn_projectile`] is the only constructor and rejects anything that
//! would violate those, so the hot per-tick systems never re-validate.

use bevy::ecs::message::Messages;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use std::fmt;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;

use super::components::{FlightPath, HitCallback, OnHit, PierceLedger, Projectile, ProjectileState};
use super::messages::SpawnProjectileRequest;

/// Directions shorter than this cannot be normalized meaningfully.
const MIN_DIRECTION_LENGTH_SQ: f32 = 1e-8;

/// Construction fault: the request would produce undefined motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnError {
    /// Direction vector had (near-)zero length.
    ZeroDirection,
    /// Max range was zero, negative, or NaN.
    NonPositiveRange {
        range: f32,
    },
    /// A projectile that may hit nothing is not a projectile.
    ZeroPierce,
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::ZeroDirection => {
                write!(f, "projectile direction has zero length; cannot normalize")
            }
            SpawnError::NonPositiveRange { range } => {
                write!(f, "projectile max range {range} is not positive")
            }
            SpawnError::ZeroPierce => write!(f, "projectile pierce budget is zero"),
        }
    }
}

impl std::error::Error for SpawnError {}

/// Projectile construction parameters.
///
/// Builder-style: `new` fills the defaults, `with_*` overrides. The
/// direction is normalized at spawn, not here, so validation stays in one
/// place.
pub struct ProjectileParams {
    pub origin: Vec2,
    pub direction: Vec2,
    pub max_range: f32,
    pub pierce: u32,
    pub on_hit: Option<HitCallback>,
}

impl ProjectileParams {
    pub const DEFAULT_MAX_RANGE: f32 = 50.0;
    pub const DEFAULT_PIERCE: u32 = 1;

    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self {
            origin,
            direction,
            max_range: Self::DEFAULT_MAX_RANGE,
            pierce: Self::DEFAULT_PIERCE,
            on_hit: None,
        }
    }

    pub fn with_max_range(mut self, max_range: f32) -> Self {
        self.max_range = max_range;
        self
    }

    pub fn with_pierce(mut self, pierce: u32) -> Self {
        self.pierce = pierce;
        self
    }

    pub fn with_on_hit(mut self, on_hit: HitCallback) -> Self {
        self.on_hit = Some(on_hit);
        self
    }
}

impl fmt::Debug for ProjectileParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectileParams")
            .field("origin", &self.origin)
            .field("direction", &self.direction)
            .field("max_range", &self.max_range)
            .field("pierce", &self.pierce)
            .field("on_hit", &self.on_hit.is_some())
            .finish()
    }
}

/// Spawn a projectile, failing fast on invalid construction inputs.
///
/// The visual is an elongated beam sprite whose +Y long axis is aligned
/// with the flight direction from the first frame.
pub fn spawn_projectile(
    commands: &mut Commands,
    tunables: &Tunables,
    params: ProjectileParams,
) -> Result<Entity, SpawnError> {
    let ProjectileParams {
        origin,
        direction,
        max_range,
        pierce,
        on_hit,
    } = params;

    if direction.length_squared() < MIN_DIRECTION_LENGTH_SQ {
        return Err(SpawnError::ZeroDirection);
    }
    // Written with `!(.. > 0.0)` so NaN is rejected too.
    if !(max_range > 0.0) {
        return Err(SpawnError::NonPositiveRange { range: max_range });
    }
    if pierce == 0 {
        return Err(SpawnError::ZeroPierce);
    }

    let direction = direction.normalize();

    let e = commands
        .spawn((
            Name::new("Projectile"),
            Projectile,
            ProjectileState::InFlight,
            FlightPath {
                origin,
                direction,
                speed: tunables.projectile_speed,
                max_range,
            },
            PierceLedger::new(pierce),
            OnHit(on_hit),
            Sprite {
                color: Color::srgb(0.04, 1.0, 0.25),
                custom_size: Some(Vec2::new(3.0, 16.0)),
                ..default()
            },
            Transform {
                translation: origin.extend(2.0),
                rotation: Quat::from_rotation_z(Vec2::Y.angle_to(direction)),
                ..default()
            },
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    Ok(e)
}

/// Consumer: apply buffered spawn requests.
///
/// Drains (rather than reads) because the request owns the projectile's
/// hit callback, which must be moved into the spawned entity. Invalid
/// requests are a producer bug: logged and dropped, never a panic.
pub fn consume_spawn_requests(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut requests: ResMut<Messages<SpawnProjectileRequest>>,
) {
    for req in requests.drain() {
        if let Err(e) = spawn_projectile(&mut commands, &tunables, req.params) {
            warn!("rejected projectile spawn: {e}");
        }
    }
}

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

#[derive(Component)]
pub struct Projectile;

/// Projectile lifecycle state machine.
///
/// - `InFlight`: advancing, sweeping for hits.
/// - `Expiring`: pierce budget spent; a delayed retirement is queued.
///   Still advances (and stays visible) until the timer fires.
/// - `PendingRemoval`: retirement requested; the removal commit owns it
///   from here and no simulation system touches it again.
///
/// `Expiring` doubles as the "retirement already queued" guard, so the
/// exhaustion check cannot re-arm the timer every tick.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileState {
    #[default]
    InFlight,
    Expiring,
    PendingRemoval,
}

impl ProjectileState {
    /// Enter `PendingRemoval`. Returns `false` if retirement was already
    /// requested; the transition happens at most once per projectile.
    #[inline]
    pub fn request_retirement(&mut self) -> bool {
        if *self == Self::PendingRemoval {
            return false;
        }
        *self = Self::PendingRemoval;
        true
    }

    #[inline]
    pub fn is_retirement_requested(self) -> bool {
        self == Self::PendingRemoval
    }
}

/// Geometric flight truth: where the projectile started, where it points,
/// and how far it may go. The current position lives in `Transform`.
///
/// `direction` is unit-length by construction (spawn validation) and
/// `speed` is displacement per fixed tick.
#[derive(Component, Debug, Clone)]
pub struct FlightPath {
    pub origin: Vec2,
    pub direction: Vec2,
    pub speed: f32,
    pub max_range: f32,
}

impl FlightPath {
    /// Straight-line distance covered so far.
    #[inline]
    pub fn traveled(&self, position: Vec2) -> f32 {
        position.distance(self.origin)
    }

    #[inline]
    pub fn exceeded_range(&self, position: Vec2) -> bool {
        self.traveled(position) > self.max_range
    }
}

/// Caller-supplied hit hook, invoked once per distinct target credited to
/// this projectile, carrying the target's identity.
pub type HitCallback = Box<dyn FnMut(Entity) + Send + Sync + 'static>;

#[derive(Component, Default)]
pub struct OnHit(pub Option<HitCallback>);

/// Per-projectile record of credited targets and remaining pierce budget.
///
/// `try_register_hit` is the single gate all hit processing passes
/// through: it is what keeps repeated ray casts from crediting the same
/// target twice across ticks, and what makes the budget a hard ceiling on
/// damage instances.
#[derive(Component, Debug)]
pub struct PierceLedger {
    pierce_left: u32,
    hit_targets: HashSet<Entity>,
}

impl PierceLedger {
    pub fn new(budget: u32) -> Self {
        Self {
            pierce_left: budget,
            hit_targets: HashSet::default(),
        }
    }

    /// Try to credit a hit on `target`.
    ///
    /// Rejects when the target was already credited or the budget is
    /// spent. On acceptance the target is recorded and the budget
    /// decremented, so `pierce_left` is monotonically non-increasing.
    pub fn try_register_hit(&mut self, target: Entity) -> bool {
        if self.pierce_left == 0 || self.hit_targets.contains(&target) {
            return false;
        }
        self.hit_targets.insert(target);
        self.pierce_left -= 1;
        true
    }

    #[inline]
    pub fn pierce_left(&self) -> u32 {
        self.pierce_left
    }

    #[inline]
    pub fn exhausted(&self) -> bool {
        self.pierce_left == 0
    }

    #[inline]
    pub fn has_hit(&self, target: Entity) -> bool {
        self.hit_targets.contains(&target)
    }

    #[inline]
    pub fn hits_recorded(&self) -> usize {
        self.hit_targets.len()
    }
}

//! Damage, ammunition and pickup arithmetic.

use chess_with_guns_core::{PickupKind, WeaponStats};
use rand::Rng;

/// Rounds granted by an ammo pickup.
pub const AMMO_PICKUP_ROUNDS: u32 = 5;
/// Health restored by a health pickup.
pub const HEALTH_PICKUP_AMOUNT: f32 = 7.0;
/// Damage bonus granted by a boost pickup.
pub const BOOST_PICKUP_LEVEL: u32 = 5;

/// Health pool bounded by a maximum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vitals {
    health: f32,
    max: f32,
}

impl Vitals {
    /// Creates a full health pool.
    #[must_use]
    pub const fn full(max: f32) -> Self {
        Self { health: max, max }
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Health ceiling.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Subtracts `damage` and reports whether health is exhausted.
    pub fn hurt(&mut self, damage: f32) -> bool {
        self.health -= damage;
        self.health <= 0.0
    }

    /// Restores up to `amount`, never exceeding the ceiling.
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max);
    }
}

/// Magazine of the equipped weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Magazine {
    rounds: u32,
    capacity: u32,
}

impl Magazine {
    /// Creates a full magazine.
    #[must_use]
    pub const fn full(capacity: u32) -> Self {
        Self {
            rounds: capacity,
            capacity,
        }
    }

    /// Rounds left.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Magazine size.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Spends a round, returning `false` when the magazine is empty.
    pub fn take_round(&mut self) -> bool {
        if self.rounds == 0 {
            return false;
        }
        self.rounds -= 1;
        true
    }

    /// Adds rounds up to capacity.
    pub fn refill(&mut self, rounds: u32) {
        self.rounds = self.rounds.saturating_add(rounds).min(self.capacity);
    }
}

/// Temporary per-player state touched by pickups and discharges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Loadout {
    pub(crate) vitals: Vitals,
    pub(crate) magazine: Magazine,
    pub(crate) boost: u32,
}

impl Loadout {
    pub(crate) fn collect(&mut self, pickup: PickupKind) {
        match pickup {
            PickupKind::Ammo => self.magazine.refill(AMMO_PICKUP_ROUNDS),
            PickupKind::Health => self.vitals.heal(HEALTH_PICKUP_AMOUNT),
            PickupKind::Boost => self.boost = BOOST_PICKUP_LEVEL,
        }
    }
}

/// Uniform sample from `[-range, range]`; zero when the range is degenerate.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, range: f32) -> f32 {
    if range > 0.0 {
        rng.gen_range(-range..=range)
    } else {
        0.0
    }
}

/// Damage dealt by one projectile of a weapon carrying `boost`.
pub fn roll_damage<R: Rng + ?Sized>(rng: &mut R, stats: &WeaponStats, boost: u32) -> f32 {
    stats.damage + jitter(rng, stats.variance) + boost as f32
}

/// Decays a damage boost by zero or one, floored at zero.
pub fn decay_boost<R: Rng + ?Sized>(rng: &mut R, boost: u32) -> u32 {
    boost.saturating_sub(rng.gen_range(0..=1))
}

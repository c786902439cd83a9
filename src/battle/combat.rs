//! Attack resolution
//!
//! Base damage is rolled uniformly from the attacker's damage band; a flat
//! high-ground bonus applies when the attacker stands materially above the
//! target. HP mutation and death bookkeeping belong to the session, which
//! applies the outcome this module computes.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::constants::{HIGH_GROUND_BONUS, HIGH_GROUND_THRESHOLD};
use crate::battle::units::UnitEntity;

/// Result of one resolved attack
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttackOutcome {
    /// Damage actually subtracted from the target
    pub damage: i32,
    pub high_ground: bool,
    /// Target HP reached zero
    pub lethal: bool,
}

/// Final damage for a given base roll and elevation difference
///
/// Split out from the roll so the bonus rule is testable without an RNG.
pub fn applied_damage(base_roll: i32, elevation_delta: f32) -> (i32, bool) {
    if elevation_delta > HIGH_GROUND_THRESHOLD {
        (base_roll + HIGH_GROUND_BONUS, true)
    } else {
        (base_roll, false)
    }
}

/// Roll and apply an attack; the target's HP is mutated and clamped.
///
/// `elevation_delta` is attacker elevation minus target elevation.
pub fn resolve_attack(
    attacker: &UnitEntity,
    target: &mut UnitEntity,
    elevation_delta: f32,
    rng: &mut impl Rng,
) -> AttackOutcome {
    let band = attacker.stats.min_damage()..=attacker.stats.max_damage();
    let base_roll = rng.gen_range(band);
    let (damage, high_ground) = applied_damage(base_roll, elevation_delta);

    let lethal = target.apply_damage(damage);

    AttackOutcome {
        damage,
        high_ground,
        lethal,
    }
}

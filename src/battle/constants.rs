//! Tuning constants for combat and the enemy decision heuristic

/// Elevation advantage required before the high-ground bonus applies
pub const HIGH_GROUND_THRESHOLD: f32 = 0.15;

/// Flat damage added when attacking from high ground
pub const HIGH_GROUND_BONUS: i32 = 1;

/// Half-width of the damage roll band around a unit's damage total
pub const DAMAGE_SPREAD: i32 = 1;

/// Score for a target the enemy can attack this turn
pub const AI_ATTACKABLE_SCORE: i32 = 10_000;

/// Score when the attack would finish the target this turn
pub const AI_LETHAL_SCORE: i32 = 20_000;

/// Penalty per point of target HP (prefer wounded targets)
pub const AI_HP_WEIGHT: i32 = 10;

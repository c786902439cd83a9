//! Enemy decision procedure
//!
//! Runs once per enemy, in roster order, during the automated phase. Each
//! enemy scores every living friendly target and commits to the best one;
//! no multi-turn planning and no coordination between enemies. Tie-breaks
//! are enumeration-order dependent on purpose: first reachable attacking
//! tile in BFS discovery order, first max-score target in roster order.

use crate::battle::constants::{AI_ATTACKABLE_SCORE, AI_HP_WEIGHT, AI_LETHAL_SCORE};
use crate::battle::pathfinding::ReachableSet;
use crate::battle::units::UnitEntity;
use crate::core::types::UnitId;
use crate::grid::coord::GridCoord;

/// Snapshot of a potential target at evaluation time
#[derive(Debug, Clone, Copy)]
pub struct TargetInfo {
    pub id: UnitId,
    pub position: GridCoord,
    pub current_hp: i32,
}

/// The committed plan for one enemy's activation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyDecision {
    pub target: UnitId,
    /// Tile to stand on; equals the current position when no move is needed
    pub destination: GridCoord,
    /// The target is expected to be attackable from `destination`
    pub attack: bool,
}

/// Candidate destination for one target
struct Candidate {
    destination: GridCoord,
    attackable: bool,
    score: i32,
}

/// Pick a target and destination for the acting enemy.
///
/// Returns `None` when there is no living friendly target at all; the
/// enemy then stays in place and skips its attack.
pub fn decide(
    enemy: &UnitEntity,
    targets: &[TargetInfo],
    reachable: &ReachableSet,
) -> Option<EnemyDecision> {
    let mut best: Option<(Candidate, UnitId)> = None;

    for target in targets {
        let candidate = evaluate_target(enemy, target, reachable);
        let replace = match &best {
            // Strict comparison keeps the first max-score target
            Some((current, _)) => candidate.score > current.score,
            None => true,
        };
        if replace {
            best = Some((candidate, target.id));
        }
    }

    best.map(|(candidate, target)| EnemyDecision {
        target,
        destination: candidate.destination,
        attack: candidate.attackable,
    })
}

fn evaluate_target(enemy: &UnitEntity, target: &TargetInfo, reachable: &ReachableSet) -> Candidate {
    let range = enemy.stats.attack_range;
    let distance = enemy.position.distance(&target.position);

    let (destination, attackable) = if distance <= range {
        // Attack without moving
        (enemy.position, true)
    } else if let Some(tile) = reachable
        .iter()
        .find(|c| c.distance(&target.position) <= range)
    {
        // First attacking tile in discovery order, not necessarily nearest
        (tile, true)
    } else {
        (closest_approach(target.position, reachable), false)
    };

    let mut score = -(AI_HP_WEIGHT * target.current_hp) - distance as i32;
    if attackable {
        score += AI_ATTACKABLE_SCORE;
        // Guaranteed kill: even the minimum roll finishes the target
        if target.current_hp <= enemy.stats.min_damage() {
            score += AI_LETHAL_SCORE;
        }
    }

    Candidate {
        destination,
        attackable,
        score,
    }
}

/// Reachable tile minimizing remaining distance to the target; ties keep
/// the earlier-discovered tile. The set always contains the start, so this
/// never yields an unoccupied fallback.
fn closest_approach(target: GridCoord, reachable: &ReachableSet) -> GridCoord {
    let mut best = reachable.start;
    let mut best_distance = best.distance(&target);

    for coord in reachable.iter() {
        let d = coord.distance(&target);
        if d < best_distance {
            best = coord;
            best_distance = d;
        }
    }
    best
}

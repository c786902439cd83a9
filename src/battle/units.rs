//! Runtime battle state for a single combatant

use serde::{Deserialize, Serialize};

use crate::battle::constants::DAMAGE_SPREAD;
use crate::core::types::{Team, UnitId};
use crate::grid::coord::GridCoord;
use crate::roster::RosterId;

/// Computed stat totals (base + equipment bonus, fixed at spawn)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnitStats {
    pub max_hp: i32,
    pub damage: i32,
    pub movement: u32,
    pub attack_range: u32,
}

impl UnitStats {
    /// Lower end of the damage roll band
    pub fn min_damage(&self) -> i32 {
        (self.damage - DAMAGE_SPREAD).max(1)
    }

    /// Upper end of the damage roll band
    pub fn max_damage(&self) -> i32 {
        self.damage + DAMAGE_SPREAD
    }
}

/// Per-turn availability.
///
/// Tagged state instead of two independent booleans: the moved-and-attacked
/// and attacked-without-moving cases both collapse into `Exhausted`, which
/// removes the one ambiguous flag combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActionState {
    #[default]
    Fresh,
    /// Moved this turn, attack still available
    Moved,
    Exhausted,
}

impl ActionState {
    pub fn can_move(&self) -> bool {
        matches!(self, ActionState::Fresh)
    }

    pub fn can_attack(&self) -> bool {
        !matches!(self, ActionState::Exhausted)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, ActionState::Exhausted)
    }
}

/// One combatant on the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitEntity {
    pub id: UnitId,
    pub team: Team,
    pub position: GridCoord,
    pub current_hp: i32,
    pub stats: UnitStats,
    pub action: ActionState,
    /// Persistent record this unit was spawned from; enemies have none
    pub roster_ref: Option<RosterId>,
}

impl UnitEntity {
    pub fn new(team: Team, position: GridCoord, stats: UnitStats) -> Self {
        Self {
            id: UnitId::new(),
            team,
            position,
            current_hp: stats.max_hp,
            stats,
            action: ActionState::Fresh,
            roster_ref: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Reset per-turn availability
    pub fn new_turn(&mut self) {
        self.action = ActionState::Fresh;
    }

    pub fn mark_moved(&mut self) {
        if self.action == ActionState::Fresh {
            self.action = ActionState::Moved;
        }
    }

    /// Attacking always ends the unit's activation
    pub fn mark_attacked(&mut self) {
        self.action = ActionState::Exhausted;
    }

    pub fn exhaust(&mut self) {
        self.action = ActionState::Exhausted;
    }

    /// Apply damage, clamping HP to [0, max_hp]; returns true if this killed
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        self.current_hp = (self.current_hp - amount).clamp(0, self.stats.max_hp);
        self.current_hp == 0
    }
}

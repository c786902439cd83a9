//! Outbound notifications for the presentation and narrative layers
//!
//! Fire-and-forget: the session pushes these as it mutates state and the
//! caller drains them after every command. Nothing in the simulation waits
//! on a consumer.

use serde::{Deserialize, Serialize};

use crate::battle::pathfinding::PathStep;
use crate::core::types::{NarrativeRef, Team, UnitId};
use crate::grid::coord::GridCoord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    UnitSpawned {
        unit: UnitId,
        team: Team,
        position: GridCoord,
    },
    UnitMoved {
        unit: UnitId,
        path: Vec<PathStep>,
    },
    AttackResolved {
        attacker: UnitId,
        target: UnitId,
        damage: i32,
        high_ground: bool,
    },
    UnitDied {
        unit: UnitId,
        killer: Option<UnitId>,
    },
    TurnChanged {
        number: u32,
        side: Team,
    },
    /// Hand control to the narrative layer for a mid-battle beat
    PlayNarrative {
        reference: NarrativeRef,
    },
    BattleWon,
}

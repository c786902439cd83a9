//! Persistent party roster collaborator
//!
//! The battle engine reads additive stat totals from here and calls
//! `heal_between_battles`; equipment itself is owned by an external layer
//! and never mutated from battle code.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::battle::units::UnitStats;

/// Unique identifier for persistent roster records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterId(pub Uuid);

impl RosterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RosterId {
    fn default() -> Self {
        Self::new()
    }
}

/// One persistent party member: base stats plus equipment bonus totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRecord {
    pub id: RosterId,
    pub name: String,

    pub base_max_hp: i32,
    pub base_damage: i32,
    pub base_movement: u32,
    pub attack_range: u32,

    /// Additive totals computed by the equipment layer
    pub bonus_max_hp: i32,
    pub bonus_damage: i32,
    pub bonus_movement: u32,

    /// HP missing when the last battle ended
    pub wounds: i32,
}

impl RosterRecord {
    pub fn new(name: impl Into<String>, max_hp: i32, damage: i32, movement: u32, range: u32) -> Self {
        Self {
            id: RosterId::new(),
            name: name.into(),
            base_max_hp: max_hp,
            base_damage: damage,
            base_movement: movement,
            attack_range: range,
            bonus_max_hp: 0,
            bonus_damage: 0,
            bonus_movement: 0,
            wounds: 0,
        }
    }

    /// Computed totals a battle unit spawns with
    pub fn battle_stats(&self) -> UnitStats {
        UnitStats {
            max_hp: self.base_max_hp + self.bonus_max_hp,
            damage: self.base_damage + self.bonus_damage,
            movement: self.base_movement + self.bonus_movement,
            attack_range: self.attack_range,
        }
    }

    /// Spawn HP after carrying over wounds from the previous battle
    pub fn spawn_hp(&self) -> i32 {
        (self.battle_stats().max_hp - self.wounds).max(1)
    }
}

/// The persistent party
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub records: Vec<RosterRecord>,
}

impl Roster {
    pub fn new(records: Vec<RosterRecord>) -> Self {
        Self { records }
    }

    pub fn record(&self, id: RosterId) -> Option<&RosterRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn record_mut(&mut self, id: RosterId) -> Option<&mut RosterRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    /// Clear wounds on every record; called between missions
    pub fn heal_between_battles(&mut self) {
        for record in &mut self.records {
            record.wounds = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battle_stats_include_bonuses() {
        let mut record = RosterRecord::new("Aldric", 20, 5, 4, 1);
        record.bonus_max_hp = 5;
        record.bonus_damage = 2;

        let stats = record.battle_stats();
        assert_eq!(stats.max_hp, 25);
        assert_eq!(stats.damage, 7);
        assert_eq!(stats.movement, 4);
    }

    #[test]
    fn test_wounds_reduce_spawn_hp() {
        let mut record = RosterRecord::new("Mira", 18, 4, 5, 2);
        record.wounds = 6;
        assert_eq!(record.spawn_hp(), 12);
    }

    #[test]
    fn test_heal_between_battles() {
        let mut record = RosterRecord::new("Mira", 18, 4, 5, 2);
        record.wounds = 10;
        let mut roster = Roster::new(vec![record]);

        roster.heal_between_battles();
        assert_eq!(roster.records[0].wounds, 0);
        assert_eq!(roster.records[0].spawn_hp(), 18);
    }
}

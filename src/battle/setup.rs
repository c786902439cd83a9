//! Battle configuration and unit spawning
//!
//! The narrative layer hands the engine a `BattleSetup` value; setup-time
//! structural errors (unknown template, off-grid spawn) are fatal and leave
//! no partial battle state behind.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::battle::units::UnitStats;
use crate::core::error::{GridfallError, Result};
use crate::core::types::NarrativeRef;
use crate::grid::coord::GridCoord;
use crate::grid::elevation::ElevationConfig;

/// One enemy to place at battle start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub template: String,
    pub position: GridCoord,
}

/// A mid-battle narrative trigger from the script data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub turn: u32,
    pub reference: String,
}

/// Battle configuration produced by the narrative layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSetup {
    pub width: u32,
    pub height: u32,
    /// `None` leaves the map flat
    pub elevation: Option<ElevationConfig>,
    /// Paired positionally with the roster's records
    pub friendly_spawns: Vec<GridCoord>,
    pub enemy_spawns: Vec<EnemySpawn>,
    pub triggers: Vec<TriggerSpec>,
    pub obstacles: Vec<GridCoord>,
}

impl BattleSetup {
    pub fn trigger_list(&self) -> Vec<(u32, NarrativeRef)> {
        self.triggers
            .iter()
            .map(|t| (t.turn, NarrativeRef::new(t.reference.clone())))
            .collect()
    }
}

/// Stat template an enemy is spawned from; no persistence behind it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub name: String,
    pub stats: UnitStats,
}

/// Registry of enemy templates keyed by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemyTemplateSet {
    templates: HashMap<String, EnemyTemplate>,
}

impl EnemyTemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, template: EnemyTemplate) {
        self.templates.insert(id.into(), template);
    }

    /// Fatal when the id is unknown: the spawn list is structural data
    pub fn get(&self, id: &str) -> Result<&EnemyTemplate> {
        self.templates
            .get(id)
            .ok_or_else(|| GridfallError::UnknownTemplate(id.to_string()))
    }
}

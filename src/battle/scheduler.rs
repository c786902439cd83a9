//! Turn-indexed narrative triggers
//!
//! The battle setup schedules narrative beats against turn numbers; each
//! entry fires exactly once, the first time the turn counter equals its
//! turn number.

use serde::{Deserialize, Serialize};

use crate::core::types::NarrativeRef;

/// One scheduled narrative beat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub turn: u32,
    pub reference: NarrativeRef,
    pub fired: bool,
}

/// Holds the setup's trigger list and tracks what has fired
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MidBattleEventScheduler {
    entries: Vec<ScheduledEvent>,
}

impl MidBattleEventScheduler {
    pub fn new(triggers: Vec<(u32, NarrativeRef)>) -> Self {
        let entries = triggers
            .into_iter()
            .map(|(turn, reference)| ScheduledEvent {
                turn,
                reference,
                fired: false,
            })
            .collect();
        Self { entries }
    }

    /// Fire every unfired entry scheduled for `turn`, consuming each.
    ///
    /// Entries with an empty narrative reference are malformed; they are
    /// consumed with a diagnostic instead of aborting the battle.
    pub fn fire_due(&mut self, turn: u32) -> Vec<NarrativeRef> {
        let mut fired = Vec::new();

        for entry in &mut self.entries {
            if entry.fired || entry.turn != turn {
                continue;
            }
            entry.fired = true;

            if entry.reference.is_empty() {
                tracing::warn!(turn, "skipping mid-battle trigger with empty reference");
                continue;
            }
            fired.push(entry.reference.clone());
        }

        fired
    }

    pub fn pending(&self) -> usize {
        self.entries.iter().filter(|e| !e.fired).count()
    }
}

//! Turn-based tactical battle engine
//!
//! A battle runs on a rectangular elevation grid: the player moves and
//! attacks with roster-backed units, then an automated phase activates each
//! enemy in sequence. `state::BattleSession` owns the protocol; everything
//! else here is a collaborator it drives.

pub mod ai;
pub mod combat;
pub mod constants;
pub mod events;
pub mod pathfinding;
pub mod scheduler;
pub mod setup;
pub mod state;
pub mod units;

pub use events::BattleEvent;
pub use setup::{BattleSetup, EnemySpawn, EnemyTemplate, EnemyTemplateSet, TriggerSpec};
pub use state::{BattlePhase, BattleSession, Command};
pub use units::{ActionState, UnitEntity, UnitStats};

//! Gridfall - grid-based tactical battle engine
//!
//! Units occupy a rectangular grid and alternate between a player phase and
//! an automated enemy phase. The crate owns the simulation only: grid and
//! occupancy, reachability, turn protocol, combat resolution and the enemy
//! decision algorithm. Rendering, menus and the narrative pipeline are
//! external collaborators that consume the events the session emits.

pub mod battle;
pub mod core;
pub mod grid;
pub mod roster;

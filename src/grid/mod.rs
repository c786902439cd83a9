//! Rectangular battle grid: coordinates, tiles, occupancy and elevation

pub mod coord;
pub mod elevation;
pub mod map;

pub use coord::{GridCoord, NEIGHBOR_OFFSETS};
pub use elevation::{generate_elevation, ElevationConfig};
pub use map::{GridModel, Tile};

//! Battle grid with per-tile elevation and occupancy
//!
//! Tiles are created once at battle setup and never destroyed during a
//! battle; only their elevation changes between battles.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::types::UnitId;
use crate::grid::coord::GridCoord;

/// A single tile on the battle grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub coord: GridCoord,
    /// Height used by combat math and path waypoints, not appearance
    pub elevation: f32,
    /// Permanent obstacle (rock, wall) occupying the tile
    pub blocked: bool,
    pub occupant: Option<UnitId>,
}

impl Tile {
    pub fn new(coord: GridCoord) -> Self {
        Self {
            coord,
            elevation: 0.0,
            blocked: false,
            occupant: None,
        }
    }
}

/// The full battle grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridModel {
    pub width: u32,
    pub height: u32,
    tiles: HashMap<GridCoord, Tile>,
}

impl GridModel {
    /// Create a flat, empty grid
    pub fn new(width: u32, height: u32) -> Self {
        let mut tiles = HashMap::new();

        for col in 0..width as i32 {
            for row in 0..height as i32 {
                let coord = GridCoord::new(col, row);
                tiles.insert(coord, Tile::new(coord));
            }
        }

        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.col >= 0
            && coord.row >= 0
            && coord.col < self.width as i32
            && coord.row < self.height as i32
    }

    /// Get the tile at a coordinate, `None` when off-grid
    pub fn tile_at(&self, coord: GridCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    fn tile_at_mut(&mut self, coord: GridCoord) -> Option<&mut Tile> {
        self.tiles.get_mut(&coord)
    }

    /// True iff the tile exists, carries no obstacle and no living occupant
    pub fn is_free(&self, coord: GridCoord) -> bool {
        match self.tile_at(coord) {
            Some(tile) => !tile.blocked && tile.occupant.is_none(),
            None => false,
        }
    }

    pub fn set_elevation(&mut self, coord: GridCoord, height: f32) {
        if let Some(tile) = self.tile_at_mut(coord) {
            tile.elevation = height;
        }
    }

    /// Elevation at a coordinate, 0.0 off-grid
    pub fn elevation_at(&self, coord: GridCoord) -> f32 {
        self.tile_at(coord).map(|t| t.elevation).unwrap_or(0.0)
    }

    /// Elevation difference (positive = `from` is higher)
    pub fn elevation_difference(&self, from: GridCoord, to: GridCoord) -> f32 {
        self.elevation_at(from) - self.elevation_at(to)
    }

    pub fn set_blocked(&mut self, coord: GridCoord, blocked: bool) {
        if let Some(tile) = self.tile_at_mut(coord) {
            tile.blocked = blocked;
        }
    }

    /// Record a unit standing on a tile
    pub fn place(&mut self, unit: UnitId, coord: GridCoord) {
        if let Some(tile) = self.tile_at_mut(coord) {
            tile.occupant = Some(unit);
        }
    }

    /// Clear a tile's occupant
    pub fn vacate(&mut self, coord: GridCoord) {
        if let Some(tile) = self.tile_at_mut(coord) {
            tile.occupant = None;
        }
    }

    pub fn occupant(&self, coord: GridCoord) -> Option<UnitId> {
        self.tile_at(coord).and_then(|t| t.occupant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = GridModel::new(10, 8);
        assert!(grid.tile_at(GridCoord::new(9, 7)).is_some());
        assert!(grid.tile_at(GridCoord::new(10, 7)).is_none());
    }

    #[test]
    fn test_out_of_range_is_not_free() {
        let grid = GridModel::new(4, 4);
        assert!(!grid.is_free(GridCoord::new(-1, 0)));
        assert!(!grid.is_free(GridCoord::new(4, 0)));
    }

    #[test]
    fn test_occupancy_blocks_tile() {
        let mut grid = GridModel::new(4, 4);
        let coord = GridCoord::new(1, 1);
        assert!(grid.is_free(coord));

        grid.place(UnitId::new(), coord);
        assert!(!grid.is_free(coord));

        grid.vacate(coord);
        assert!(grid.is_free(coord));
    }

    #[test]
    fn test_obstacle_blocks_tile() {
        let mut grid = GridModel::new(4, 4);
        let coord = GridCoord::new(2, 3);
        grid.set_blocked(coord, true);
        assert!(!grid.is_free(coord));
        assert!(grid.occupant(coord).is_none());
    }

    #[test]
    fn test_elevation_difference() {
        let mut grid = GridModel::new(4, 4);
        grid.set_elevation(GridCoord::new(0, 0), 0.5);
        grid.set_elevation(GridCoord::new(1, 1), 0.2);

        let diff = grid.elevation_difference(GridCoord::new(0, 0), GridCoord::new(1, 1));
        assert!((diff - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_elevation_off_grid_is_zero() {
        let grid = GridModel::new(4, 4);
        assert_eq!(grid.elevation_at(GridCoord::new(99, 99)), 0.0);
    }
}

//! Grid coordinate system for battle maps
//!
//! Coordinates are (column, row) pairs over a fixed rectangular board.
//! Adjacency is 8-directional; range checks use Chebyshev distance.

use serde::{Deserialize, Serialize};

/// Neighbor enumeration order, fixed for the whole engine.
///
/// Reachability expansion and every downstream "first found" tie-break
/// depend on this order, so it must never be reordered casually.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Coordinate on the battle grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct GridCoord {
    pub col: i32,
    pub row: i32,
}

impl GridCoord {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Chebyshev distance: max(|dcol|, |drow|)
    ///
    /// One diagonal step covers one unit of distance, matching the
    /// 8-directional movement model.
    pub fn distance(&self, other: &Self) -> u32 {
        let dc = (self.col - other.col).abs();
        let dr = (self.row - other.row).abs();
        dc.max(dr) as u32
    }

    /// All 8 neighboring coordinates in the fixed enumeration order
    pub fn neighbors(&self) -> [GridCoord; 8] {
        let mut out = [GridCoord::default(); 8];
        for (i, (dc, dr)) in NEIGHBOR_OFFSETS.iter().enumerate() {
            out[i] = GridCoord::new(self.col + dc, self.row + dr);
        }
        out
    }

    /// Is `other` adjacent (including diagonals)?
    pub fn is_adjacent(&self, other: &Self) -> bool {
        self != other && self.distance(other) == 1
    }
}

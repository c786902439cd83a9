//! Reachability and path extraction under a movement budget
//!
//! Breadth-first expansion over 8-directional neighbors with uniform step
//! cost 1. Because all steps cost the same, the first-discovered
//! predecessor for a coordinate is kept: ties between equally short paths
//! are resolved by the fixed neighbor enumeration order, not by distance
//! to any goal.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use crate::grid::coord::GridCoord;
use crate::grid::map::GridModel;

/// One step of an extracted path, carrying its tile's elevation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub coord: GridCoord,
    pub elevation: f32,
}

/// Result of a reachability expansion.
///
/// `order` records BFS discovery order so "first found" scans over the set
/// are deterministic; the predecessor map alone would iterate in hash order.
#[derive(Debug, Clone)]
pub struct ReachableSet {
    pub start: GridCoord,
    order: Vec<GridCoord>,
    predecessor: HashMap<GridCoord, GridCoord>,
    cost: HashMap<GridCoord, u32>,
}

impl ReachableSet {
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.predecessor.contains_key(&coord)
    }

    pub fn predecessor(&self, coord: GridCoord) -> Option<GridCoord> {
        self.predecessor.get(&coord).copied()
    }

    /// Path cost in steps; 0 for the start itself
    pub fn cost(&self, coord: GridCoord) -> Option<u32> {
        self.cost.get(&coord).copied()
    }

    /// Coordinates in discovery order, the start first
    pub fn iter(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Compute every coordinate reachable from `start` within `budget` steps.
///
/// Neighbors that are off-grid, over budget or not free are pruned. The
/// start maps to itself at cost 0 even when the mover stands on it.
pub fn reachable(grid: &GridModel, start: GridCoord, budget: u32) -> ReachableSet {
    let mut order = Vec::new();
    let mut predecessor = HashMap::new();
    let mut cost = HashMap::new();
    let mut queue = VecDeque::new();

    order.push(start);
    predecessor.insert(start, start);
    cost.insert(start, 0);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let current_cost = cost[&current];
        if current_cost >= budget {
            continue;
        }

        for neighbor in current.neighbors() {
            if predecessor.contains_key(&neighbor) {
                continue;
            }
            if !grid.is_free(neighbor) {
                continue;
            }

            predecessor.insert(neighbor, current);
            cost.insert(neighbor, current_cost + 1);
            order.push(neighbor);
            queue.push_back(neighbor);
        }
    }

    ReachableSet {
        start,
        order,
        predecessor,
        cost,
    }
}

/// Walk predecessors from `destination` back to the start and reverse.
///
/// The returned path excludes the start tile and ends at `destination`;
/// each waypoint carries its tile's elevation. `None` when the destination
/// was never reached.
pub fn extract_path(
    grid: &GridModel,
    reachable: &ReachableSet,
    destination: GridCoord,
) -> Option<Vec<PathStep>> {
    if !reachable.contains(destination) {
        return None;
    }

    let mut path = Vec::new();
    let mut current = destination;
    while current != reachable.start {
        path.push(PathStep {
            coord: current,
            elevation: grid.elevation_at(current),
        });
        current = reachable.predecessor(current)?;
    }
    path.reverse();
    Some(path)
}

//! Noise-based elevation generation
//!
//! Produces a smooth height field in [0, amplitude]. The outermost ring of
//! tiles gets a reduced falloff multiplier so the map edge never towers
//! over the interior.

use serde::{Deserialize, Serialize};

use crate::grid::coord::GridCoord;
use crate::grid::map::GridModel;

/// Lattice cell size in tiles; larger cells give smoother hills
const NOISE_CELL_SIZE: f32 = 4.0;

/// Amplitude multiplier applied to the outermost tile ring
const EDGE_FALLOFF: f32 = 0.35;

/// Elevation settings from the battle setup
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ElevationConfig {
    /// Maximum tile height
    pub amplitude: f32,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self { amplitude: 1.0 }
    }
}

/// Fill the grid with a smooth seeded height field
pub fn generate_elevation(grid: &mut GridModel, config: &ElevationConfig, seed: u64) {
    let width = grid.width as i32;
    let height = grid.height as i32;

    for col in 0..width {
        for row in 0..height {
            let coord = GridCoord::new(col, row);
            let noise = smooth_noise(col as f32 / NOISE_CELL_SIZE, row as f32 / NOISE_CELL_SIZE, seed);

            let on_edge = col == 0 || row == 0 || col == width - 1 || row == height - 1;
            let falloff = if on_edge { EDGE_FALLOFF } else { 1.0 };

            grid.set_elevation(coord, noise * config.amplitude * falloff);
        }
    }
}

/// Hash noise at integer lattice points
fn lattice_noise(x: i64, y: i64, seed: u64) -> f32 {
    let n = (x as u64)
        .wrapping_mul(374761393)
        .wrapping_add((y as u64).wrapping_mul(668265263))
        .wrapping_add(seed);
    let n = n.wrapping_mul(n).wrapping_mul(n);
    (n as f32) / (u64::MAX as f32)
}

/// Bilinearly interpolated lattice noise in [0, 1]
fn smooth_noise(x: f32, y: f32, seed: u64) -> f32 {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = smoothstep(x - x0 as f32);
    let fy = smoothstep(y - y0 as f32);

    let n00 = lattice_noise(x0, y0, seed);
    let n10 = lattice_noise(x0 + 1, y0, seed);
    let n01 = lattice_noise(x0, y0 + 1, seed);
    let n11 = lattice_noise(x0 + 1, y0 + 1, seed);

    let top = n00 + (n10 - n00) * fx;
    let bottom = n01 + (n11 - n01) * fx;
    top + (bottom - top) * fy
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_within_amplitude() {
        let mut grid = GridModel::new(12, 12);
        let config = ElevationConfig { amplitude: 2.0 };
        generate_elevation(&mut grid, &config, 42);

        for col in 0..12 {
            for row in 0..12 {
                let h = grid.elevation_at(GridCoord::new(col, row));
                assert!((0.0..=2.0).contains(&h), "height {} out of range", h);
            }
        }
    }

    #[test]
    fn test_edge_ring_is_damped() {
        let mut grid = GridModel::new(12, 12);
        let config = ElevationConfig { amplitude: 2.0 };
        generate_elevation(&mut grid, &config, 42);

        for col in 0..12 {
            let h = grid.elevation_at(GridCoord::new(col, 0));
            assert!(h <= 2.0 * EDGE_FALLOFF + 1e-6);
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let config = ElevationConfig::default();
        let mut a = GridModel::new(8, 8);
        let mut b = GridModel::new(8, 8);
        generate_elevation(&mut a, &config, 7);
        generate_elevation(&mut b, &config, 7);

        for col in 0..8 {
            for row in 0..8 {
                let coord = GridCoord::new(col, row);
                assert_eq!(a.elevation_at(coord), b.elevation_at(coord));
            }
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let config = ElevationConfig::default();
        let mut a = GridModel::new(8, 8);
        let mut b = GridModel::new(8, 8);
        generate_elevation(&mut a, &config, 1);
        generate_elevation(&mut b, &config, 2);

        let any_diff = (0..8).any(|col| {
            (0..8).any(|row| {
                let coord = GridCoord::new(col, row);
                a.elevation_at(coord) != b.elevation_at(coord)
            })
        });
        assert!(any_diff);
    }
}

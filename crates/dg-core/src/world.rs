//! Grid ↔ world coordinate conversion
//!
//! World space is y-up: grid x maps to world x, grid y maps to world z.
//! Coordinates are `f64`, which holds every `i32` cell times any sane
//! spacing without two cells collapsing onto one position.

use serde::{Deserialize, Serialize};

use crate::grid::GridPos;

/// Default distance between neighbouring room centres
pub const DEFAULT_SPACING: f64 = 10.0;

/// Uniform scaling between grid cells and world positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldTransform {
    pub spacing: f64,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
        }
    }
}

impl WorldTransform {
    pub fn new(spacing: f64) -> Self {
        Self { spacing }
    }

    /// Centre of a grid cell in world space
    pub fn grid_to_world(&self, pos: GridPos) -> [f64; 3] {
        [f64::from(pos.x) * self.spacing, 0.0, f64::from(pos.y) * self.spacing]
    }

    /// Grid cell containing a world position (nearest centre)
    pub fn world_to_grid(&self, world: [f64; 3]) -> GridPos {
        GridPos::new(
            (world[0] / self.spacing).round() as i32,
            (world[2] / self.spacing).round() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_to_world() {
        let t = WorldTransform::default();
        assert_eq!(t.grid_to_world(GridPos::new(2, -3)), [20.0, 0.0, -30.0]);
    }

    #[test]
    fn test_round_trip_on_cells() {
        let t = WorldTransform::new(4.5);
        for x in -5..5 {
            for y in -5..5 {
                let p = GridPos::new(x, y);
                assert_eq!(t.world_to_grid(t.grid_to_world(p)), p);
            }
        }
    }

    #[test]
    fn test_world_to_grid_rounds_to_nearest() {
        let t = WorldTransform::default();
        assert_eq!(t.world_to_grid([14.0, 3.0, -6.0]), GridPos::new(1, -1));
        assert_eq!(t.world_to_grid([16.0, 0.0, 4.9]), GridPos::new(2, 0));
    }

    #[test]
    fn test_round_trip_far_from_origin() {
        for spacing in [0.25, 1.0, 10.0, 37.5] {
            let t = WorldTransform::new(spacing);
            for base in [20_000_001, 1 << 30, i32::MAX - 1, i32::MIN] {
                for dx in 0..2 {
                    let p = GridPos::new(base + dx, base / 2 - dx);
                    assert_eq!(t.world_to_grid(t.grid_to_world(p)), p, "spacing {spacing}");
                }
            }
            let a = t.grid_to_world(GridPos::new(20_000_001, 0));
            let b = t.grid_to_world(GridPos::new(20_000_002, 0));
            assert_ne!(a, b);
        }
    }
}

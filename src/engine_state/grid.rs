//! # Grid Quantization
//!
//! This module defines the placement grid and the snapping function that maps
//! arbitrary world-space points onto it. Every block in the world sits at the
//! center of a grid cell; pointer hits are quantized through [`snap_point_to_grid`]
//! before anything is placed.
//!
//! ## Key Properties
//! - Floor-based bucketing: a point exactly on a cell boundary always snaps
//!   into the cell whose lower edge is that boundary.
//! - Horizontal axes (X, Z) are clamped into the playable grid area.
//! - The vertical axis has a floor of half a cell (blocks rest on the ground
//!   plane) and no ceiling.

use cgmath::Point3;

/// The placement grid configuration.
///
/// All values are fixed at startup and never mutated by the core logic.
/// The grid is centered on the world origin: `grid_dimensions` cells per
/// horizontal side, each `cell_size` world units across.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// World units per grid cell
    pub cell_size: f32,
    /// Number of cells per horizontal side of the grid
    pub grid_dimensions: u32,
}

impl GridConfig {
    /// Creates a grid configuration.
    ///
    /// # Arguments
    /// * `cell_size` - World units per grid cell
    /// * `grid_dimensions` - Cells per horizontal side
    pub fn new(cell_size: f32, grid_dimensions: u32) -> Self {
        Self {
            cell_size,
            grid_dimensions,
        }
    }

    /// Half of one cell, the offset from a cell's lower edge to its center.
    pub fn half_cell(&self) -> f32 {
        self.cell_size / 2.0
    }

    /// The lowest cell-center coordinate on the X and Z axes.
    pub fn min_value(&self) -> f32 {
        -(self.grid_dimensions as f32 * self.cell_size) / 2.0 + self.half_cell()
    }

    /// The highest cell-center coordinate on the X and Z axes.
    pub fn max_value(&self) -> f32 {
        (self.grid_dimensions as f32 * self.cell_size) / 2.0 - self.half_cell()
    }

    /// Total world-unit extent of the grid per horizontal side.
    pub fn extent(&self) -> f32 {
        self.grid_dimensions as f32 * self.cell_size
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 4.0,
            grid_dimensions: 32,
        }
    }
}

/// Snaps a world-space point to the center of its containing grid cell.
///
/// X and Z are clamped into `[min_value, max_value]`; Y is floored at half a
/// cell and unbounded upward. Pure and deterministic for all finite inputs.
///
/// # Arguments
/// * `point` - The world-space point to snap
/// * `grid` - The grid configuration
///
/// # Returns
/// The center of the grid cell containing `point`
pub fn snap_point_to_grid(point: Point3<f32>, grid: &GridConfig) -> Point3<f32> {
    let cell = grid.cell_size;
    let half = grid.half_cell();

    let snap_axis = |a: f32| (a / cell).floor() * cell + half;

    Point3::new(
        snap_axis(point.x).clamp(grid.min_value(), grid.max_value()),
        snap_axis(point.y).max(half),
        snap_axis(point.z).clamp(grid.min_value(), grid.max_value()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn grid() -> GridConfig {
        GridConfig::new(4.0, 32)
    }

    #[test]
    fn derived_bounds_match_grid_extent() {
        let grid = grid();
        assert_relative_eq!(grid.min_value(), -62.0);
        assert_relative_eq!(grid.max_value(), 62.0);
        assert_relative_eq!(grid.half_cell(), 2.0);
    }

    #[test_case(5.9, 0.0, -1.2, 6.0, 2.0, -2.0 ; "interior point")]
    #[test_case(0.0, 0.0, 0.0, 2.0, 2.0, 2.0 ; "origin snaps to first positive cell")]
    #[test_case(-0.1, -5.0, -0.1, -2.0, 2.0, -2.0 ; "negative coordinates floor downward")]
    #[test_case(500.0, 3.0, -500.0, 62.0, 2.0, -62.0 ; "horizontal clamping")]
    #[test_case(1.0, 95.0, 1.0, 2.0, 94.0, 2.0 ; "no vertical ceiling")]
    fn snapping(x: f32, y: f32, z: f32, ex: f32, ey: f32, ez: f32) {
        let snapped = snap_point_to_grid(Point3::new(x, y, z), &grid());
        assert_relative_eq!(snapped.x, ex);
        assert_relative_eq!(snapped.y, ey);
        assert_relative_eq!(snapped.z, ez);
    }

    #[test]
    fn snapping_is_idempotent() {
        let grid = grid();
        for point in [
            Point3::new(5.9, 0.0, -1.2),
            Point3::new(-63.7, 12.4, 63.7),
            Point3::new(4.0, 8.0, -4.0),
            Point3::new(0.0, -10.0, 0.0),
        ] {
            let once = snap_point_to_grid(point, &grid);
            let twice = snap_point_to_grid(once, &grid);
            assert_relative_eq!(once.x, twice.x);
            assert_relative_eq!(once.y, twice.y);
            assert_relative_eq!(once.z, twice.z);
        }
    }

    #[test]
    fn snapping_stays_in_bounds() {
        let grid = grid();
        for point in [
            Point3::new(1.0e6, -1.0e6, 1.0e6),
            Point3::new(-1.0e6, 0.0, -1.0e6),
            Point3::new(63.99, 0.5, -63.99),
        ] {
            let snapped = snap_point_to_grid(point, &grid);
            assert!(snapped.x >= grid.min_value() && snapped.x <= grid.max_value());
            assert!(snapped.z >= grid.min_value() && snapped.z <= grid.max_value());
            assert!(snapped.y >= grid.half_cell());
        }
    }

    #[test]
    fn boundary_points_floor_bucket() {
        let grid = grid();
        // Exactly on the boundary: belongs to the cell whose lower edge it is.
        let on_boundary = snap_point_to_grid(Point3::new(4.0, 0.0, 0.0), &grid);
        assert_relative_eq!(on_boundary.x, 6.0);
        // Just below the boundary: previous cell.
        let below = snap_point_to_grid(Point3::new(4.0 - 1.0e-4, 0.0, 0.0), &grid);
        assert_relative_eq!(below.x, 2.0);
    }
}

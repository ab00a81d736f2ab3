use chase_core::{ensure_positive, ConfigError};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Vec2;

/// Largest grid the search scratch buffers are sized for.
const MAX_CELLS: usize = 1 << 24;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("grid of {cols}x{rows} cells exceeds the supported size")]
    TooLarge { cols: u64, rows: u64 },
}

/// Integer cell coordinates: `x` is the column, `z` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridCoord {
    pub x: i32,
    pub z: i32,
}

impl GridCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
    }

    pub fn is_adjacent(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }

    /// 4-connected neighborhood in a fixed order: -z, +x, +z, -x.
    pub fn neighbors(self) -> [GridCoord; 4] {
        [
            GridCoord::new(self.x, self.z - 1),
            GridCoord::new(self.x + 1, self.z),
            GridCoord::new(self.x, self.z + 1),
            GridCoord::new(self.x - 1, self.z),
        ]
    }
}

/// One unit of the navigable surface.
///
/// `world_x`/`world_z` are fixed at grid creation; only `walkable` and `cost` ever change.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridCell {
    pub x: i32,
    pub z: i32,
    pub world_x: f32,
    pub world_z: f32,
    pub walkable: bool,
    pub cost: u32,
}

impl GridCell {
    pub fn coord(&self) -> GridCoord {
        GridCoord::new(self.x, self.z)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.world_x, self.world_z)
    }
}

/// Geometric definition of the playable area.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridSpec {
    pub map_width: f32,
    pub map_height: f32,
    pub cell_size: f32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            map_width: 40.0,
            map_height: 40.0,
            cell_size: 1.0,
        }
    }
}

impl GridSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("map_width", self.map_width)?;
        ensure_positive("map_height", self.map_height)?;
        ensure_positive("cell_size", self.cell_size)?;
        Ok(())
    }

    pub fn cols(&self) -> u64 {
        (self.map_width / self.cell_size).ceil() as u64
    }

    pub fn rows(&self) -> u64 {
        (self.map_height / self.cell_size).ceil() as u64
    }
}

/// Per-cell walkability for a whole grid, applied in one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkabilityMask {
    cols: i32,
    rows: i32,
    walkable: Vec<bool>,
}

impl WalkabilityMask {
    pub fn set(&mut self, coord: GridCoord, walkable: bool) {
        if let Some(idx) = index_of(self.cols, self.rows, coord) {
            self.walkable[idx] = walkable;
        }
    }

    pub fn get(&self, coord: GridCoord) -> Option<bool> {
        index_of(self.cols, self.rows, coord).map(|idx| self.walkable[idx])
    }

    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|w| **w).count()
    }
}

/// Uniform row-major grid centered on the world origin.
#[derive(Debug, Clone)]
pub struct NavGrid {
    spec: GridSpec,
    cols: i32,
    rows: i32,
    origin: Vec2,
    cells: Vec<GridCell>,
    version: u64,
}

impl NavGrid {
    /// Build a grid covering `map_width` x `map_height` world units, every cell walkable.
    ///
    /// Cell (0, 0) is centered at `(-map_width / 2 + cell_size / 2, -map_height / 2 + cell_size / 2)`.
    pub fn new(map_width: f32, map_height: f32, cell_size: f32) -> Result<Self, GridError> {
        Self::from_spec(GridSpec {
            map_width,
            map_height,
            cell_size,
        })
    }

    pub fn from_spec(spec: GridSpec) -> Result<Self, GridError> {
        spec.validate()?;

        let (cols, rows) = (spec.cols(), spec.rows());
        let too_large = || GridError::TooLarge { cols, rows };
        let total = cols.checked_mul(rows).ok_or_else(too_large)?;
        if total > MAX_CELLS as u64 {
            return Err(too_large());
        }
        let cols = i32::try_from(cols).map_err(|_| too_large())?;
        let rows = i32::try_from(rows).map_err(|_| too_large())?;

        let origin = Vec2::new(-spec.map_width / 2.0, -spec.map_height / 2.0);
        let mut cells = Vec::with_capacity(total as usize);
        for z in 0..rows {
            for x in 0..cols {
                let center = cell_center(origin, spec.cell_size, GridCoord::new(x, z));
                cells.push(GridCell {
                    x,
                    z,
                    world_x: center.x,
                    world_z: center.z,
                    walkable: true,
                    cost: 1,
                });
            }
        }

        Ok(Self {
            spec,
            cols,
            rows,
            origin,
            cells,
            version: 0,
        })
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    pub fn cell_size(&self) -> f32 {
        self.spec.cell_size
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bumped once per bulk update or single-cell edit.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell(&self, coord: GridCoord) -> Option<&GridCell> {
        self.index(coord).map(|idx| &self.cells[idx])
    }

    pub fn is_walkable(&self, coord: GridCoord) -> bool {
        self.cell(coord).is_some_and(|c| c.walkable)
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.index(coord).is_some()
    }

    /// Containing cell of a world position, or `None` outside the grid (no clamping).
    pub fn world_to_grid(&self, x: f32, z: f32) -> Option<GridCoord> {
        if !x.is_finite() || !z.is_finite() {
            return None;
        }
        let gx = ((x - self.origin.x) / self.spec.cell_size).floor();
        let gz = ((z - self.origin.z) / self.spec.cell_size).floor();
        if gx < 0.0 || gz < 0.0 || gx >= self.cols as f32 || gz >= self.rows as f32 {
            return None;
        }
        Some(GridCoord::new(gx as i32, gz as i32))
    }

    /// World-space center of a cell. Defined for any coordinate, in bounds or not.
    pub fn grid_to_world(&self, coord: GridCoord) -> Vec2 {
        cell_center(self.origin, self.spec.cell_size, coord)
    }

    /// Set one cell's walkability. Out-of-range coordinates are ignored.
    pub fn set_cell_walkable(&mut self, x: i32, z: i32, walkable: bool) -> bool {
        let Some(idx) = self.index(GridCoord::new(x, z)) else {
            return false;
        };
        self.cells[idx].walkable = walkable;
        self.version += 1;
        true
    }

    /// Set walkability of the cell containing a world position. Outside the grid this is a no-op.
    pub fn update_cell_at_world(&mut self, x: f32, z: f32, walkable: bool) -> bool {
        match self.world_to_grid(x, z) {
            Some(coord) => self.set_cell_walkable(coord.x, coord.z, walkable),
            None => false,
        }
    }

    /// Set one cell's traversal cost (clamped to at least 1 so the heuristic stays admissible).
    pub fn set_cell_cost(&mut self, x: i32, z: i32, cost: u32) -> bool {
        let Some(idx) = self.index(GridCoord::new(x, z)) else {
            return false;
        };
        self.cells[idx].cost = cost.max(1);
        self.version += 1;
        true
    }

    /// Snapshot of the current walkability, shaped like this grid.
    pub fn walkability_mask(&self) -> WalkabilityMask {
        WalkabilityMask {
            cols: self.cols,
            rows: self.rows,
            walkable: self.cells.iter().map(|c| c.walkable).collect(),
        }
    }

    /// Mask of this grid's shape with every cell set to `walkable`.
    pub fn uniform_mask(&self, walkable: bool) -> WalkabilityMask {
        WalkabilityMask {
            cols: self.cols,
            rows: self.rows,
            walkable: vec![walkable; self.cells.len()],
        }
    }

    /// Replace every cell's walkability at once and bump the version exactly once.
    ///
    /// A mask shaped for a different grid is rejected and leaves the grid untouched.
    pub fn apply_walkability(&mut self, mask: &WalkabilityMask) -> bool {
        if mask.cols != self.cols || mask.rows != self.rows {
            tracing::warn!(
                grid_cols = self.cols,
                grid_rows = self.rows,
                mask_cols = mask.cols,
                mask_rows = mask.rows,
                "Rejected walkability mask with mismatched shape"
            );
            return false;
        }
        for (cell, walkable) in self.cells.iter_mut().zip(mask.walkable.iter().copied()) {
            cell.walkable = walkable;
        }
        self.version += 1;
        true
    }

    pub(crate) fn index(&self, coord: GridCoord) -> Option<usize> {
        index_of(self.cols, self.rows, coord)
    }

    pub(crate) fn cell_at_index(&self, idx: usize) -> &GridCell {
        &self.cells[idx]
    }
}

fn index_of(cols: i32, rows: i32, coord: GridCoord) -> Option<usize> {
    if coord.x < 0 || coord.z < 0 || coord.x >= cols || coord.z >= rows {
        return None;
    }
    Some((coord.z as usize) * (cols as usize) + coord.x as usize)
}

fn cell_center(origin: Vec2, cell_size: f32, coord: GridCoord) -> Vec2 {
    Vec2::new(
        origin.x + coord.x as f32 * cell_size + cell_size / 2.0,
        origin.z + coord.z as f32 * cell_size + cell_size / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_round_up() {
        let grid = NavGrid::new(10.5, 4.0, 1.0).unwrap();
        assert_eq!(grid.cols(), 11);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.len(), 44);
    }

    #[test]
    fn rejects_non_positive_cell_size() {
        let err = NavGrid::new(10.0, 10.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            GridError::Config(ConfigError::NonPositive {
                field: "cell_size",
                ..
            })
        ));
    }

    #[test]
    fn first_cell_is_anchored_at_corner() {
        let grid = NavGrid::new(40.0, 40.0, 1.0).unwrap();
        let first = grid.cells()[0];
        assert_eq!((first.world_x, first.world_z), (-19.5, -19.5));
        assert_eq!(first.cost, 1);
        assert!(first.walkable);
    }

    #[test]
    fn non_finite_positions_do_not_resolve() {
        let grid = NavGrid::new(4.0, 4.0, 1.0).unwrap();
        assert_eq!(grid.world_to_grid(f32::NAN, 0.0), None);
        assert_eq!(grid.world_to_grid(0.0, f32::INFINITY), None);
    }
}

//! Plain-text views of the grid.

use std::collections::HashSet;
use std::fmt::Write;

use chase_grid::{GridCell, GridCoord, NavGrid};

/// One character per cell, one line per row (`z` grows downward).
///
/// `.` walkable, `#` blocked, `*` a marked cell (e.g. a path).
pub fn render_ascii(grid: &NavGrid, marks: &[GridCoord]) -> String {
    let marks: HashSet<GridCoord> = marks.iter().copied().collect();
    let mut out = String::with_capacity(grid.len() + grid.rows() as usize);
    for z in 0..grid.rows() {
        for x in 0..grid.cols() {
            let coord = GridCoord::new(x, z);
            let c = if marks.contains(&coord) {
                '*'
            } else if grid.is_walkable(coord) {
                '.'
            } else {
                '#'
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}

/// `x,z (world wx, wz)` per path cell.
pub fn render_path(path: &[GridCell]) -> String {
    let mut out = String::new();
    for cell in path {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{:>3},{:<3} (world {:.1}, {:.1})",
            cell.x, cell.z, cell.world_x, cell.world_z
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_and_marked_cells_render() {
        let mut grid = NavGrid::new(3.0, 2.0, 1.0).unwrap();
        grid.set_cell_walkable(1, 0, false);

        let map = render_ascii(&grid, &[GridCoord::new(2, 1)]);
        assert_eq!(map, ".#.\n..*\n");
    }

    #[test]
    fn path_lines_carry_world_centers() {
        let grid = NavGrid::new(4.0, 4.0, 1.0).unwrap();
        let path = grid.find_path(-1.5, -1.5, -0.5, -1.5);

        let text = render_path(&path);
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().next().unwrap().contains("world -1.5, -1.5"));
    }
}

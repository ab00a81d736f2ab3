use core::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::{GridCell, GridCoord, NavGrid, Vec2};

#[derive(Debug)]
struct OpenNode {
    f: u32,
    h: u32,
    g: u32,
    seq: u64,
    idx: usize,
}

impl OpenNode {
    /// Lowest f first, then lowest heuristic, then earliest insertion.
    fn key(&self) -> (u32, u32, u64) {
        (self.f, self.h, self.seq)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// Reusable A* scratch buffers.
///
/// Holding one per caller avoids reallocating the score tables on every re-plan. Nothing carries
/// over between searches: each call starts from a clean slate.
#[derive(Debug, Default)]
pub struct PathQuery {
    open: BinaryHeap<OpenNode>,
    g_score: Vec<u32>,
    came_from: Vec<Option<usize>>,
    closed: Vec<bool>,
}

impl PathQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search from the cell containing `start` to the cell containing `goal`.
    ///
    /// `out` is cleared and, on success, filled start→goal inclusive. Returns `false` (and leaves
    /// `out` empty) when either endpoint is off the grid, the goal is not walkable, or no route
    /// exists.
    ///
    /// A blocked start cell (an agent pressed against a wall) is still searched from, but it is
    /// left out of `out`, which then begins at the first walkable step.
    pub fn find_path_into(
        &mut self,
        grid: &NavGrid,
        start: Vec2,
        goal: Vec2,
        out: &mut Vec<GridCell>,
    ) -> bool {
        out.clear();

        let Some(start) = grid.world_to_grid(start.x, start.z) else {
            return false;
        };
        let Some(goal) = grid.world_to_grid(goal.x, goal.z) else {
            return false;
        };
        self.search(grid, start, goal, out)
    }

    /// Same as [`find_path_into`](Self::find_path_into) with endpoints given as cells.
    pub fn find_cell_path_into(
        &mut self,
        grid: &NavGrid,
        start: GridCoord,
        goal: GridCoord,
        out: &mut Vec<GridCell>,
    ) -> bool {
        out.clear();
        self.search(grid, start, goal, out)
    }

    fn reset(&mut self, len: usize) {
        self.open.clear();
        self.g_score.clear();
        self.g_score.resize(len, u32::MAX);
        self.came_from.clear();
        self.came_from.resize(len, None);
        self.closed.clear();
        self.closed.resize(len, false);
    }

    fn search(
        &mut self,
        grid: &NavGrid,
        start: GridCoord,
        goal: GridCoord,
        out: &mut Vec<GridCell>,
    ) -> bool {
        let (Some(start_idx), Some(goal_idx)) = (grid.index(start), grid.index(goal)) else {
            return false;
        };
        if !grid.cell_at_index(goal_idx).walkable {
            return false;
        }

        self.reset(grid.len());
        let mut seq: u64 = 0;

        self.g_score[start_idx] = 0;
        let h0 = start.manhattan(goal);
        self.open.push(OpenNode {
            f: h0,
            h: h0,
            g: 0,
            seq,
            idx: start_idx,
        });
        seq += 1;

        while let Some(node) = self.open.pop() {
            if node.idx == goal_idx {
                self.reconstruct(grid, goal_idx, out);
                return true;
            }

            if self.closed[node.idx] || node.g != self.g_score[node.idx] {
                // Stale heap entry.
                continue;
            }
            self.closed[node.idx] = true;

            let current = grid.cell_at_index(node.idx).coord();
            for n in current.neighbors() {
                let Some(n_idx) = grid.index(n) else { continue };
                let neighbor = grid.cell_at_index(n_idx);
                if !neighbor.walkable || self.closed[n_idx] {
                    continue;
                }

                let tentative_g = node.g.saturating_add(neighbor.cost);
                if tentative_g >= self.g_score[n_idx] {
                    continue;
                }

                self.came_from[n_idx] = Some(node.idx);
                self.g_score[n_idx] = tentative_g;
                let h = n.manhattan(goal);
                self.open.push(OpenNode {
                    f: tentative_g.saturating_add(h),
                    h,
                    g: tentative_g,
                    seq,
                    idx: n_idx,
                });
                seq += 1;
            }
        }

        false
    }

    fn reconstruct(&self, grid: &NavGrid, goal_idx: usize, out: &mut Vec<GridCell>) {
        let mut current = goal_idx;
        out.push(*grid.cell_at_index(current));
        while let Some(prev) = self.came_from[current] {
            current = prev;
            out.push(*grid.cell_at_index(current));
        }
        if out.last().is_some_and(|start| !start.walkable) {
            out.pop();
        }
        out.reverse();
    }
}

/// Shortest 4-connected path between two world positions; empty when there is none.
pub fn find_path(grid: &NavGrid, start: Vec2, goal: Vec2) -> Vec<GridCell> {
    let mut query = PathQuery::new();
    let mut out = Vec::new();
    query.find_path_into(grid, start, goal, &mut out);
    out
}

impl NavGrid {
    /// Path consumer entry point: cells from `(start_x, start_z)` to `(end_x, end_z)`.
    ///
    /// An empty result means "no path, hold position": an endpoint off the grid, a goal on a
    /// blocked cell, or no walkable route. A blocked start is left behind through its walkable
    /// neighbors.
    pub fn find_path(&self, start_x: f32, start_z: f32, end_x: f32, end_z: f32) -> Vec<GridCell> {
        find_path(self, Vec2::new(start_x, start_z), Vec2::new(end_x, end_z))
    }
}

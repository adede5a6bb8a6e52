//! Masked triangulation of a regular grid.
//!
//! Each 2x2 cell with corners `p0` (top-left), `p1` (top-right), `p2`
//! (bottom-left) and `p3` (bottom-right) is split along one diagonal:
//!
//! ```text
//!   p0 ---- p1        p0 ---- p1
//!   |  \     |        |     /  |
//!   |    \   |        |   /    |
//!   p2 ---- p3        p2 ---- p3
//!   MainDiagonal      AntiDiagonal
//!   (p0,p1,p3)        (p1,p3,p2)
//!   (p0,p3,p2)        (p0,p1,p2)
//! ```
//!
//! The `p0-p3` split wins whenever both of its ends are present. Winding is
//! fixed by this table so neighbouring cells shade consistently; it is not
//! derived from geometry.
//!
//! With one corner missing the chosen split always leaves the three present
//! corners in one triangle. The other triangle of the pair still references
//! the missing corner and is emitted anyway; renderers discard it. Cells with
//! two or fewer present corners emit nothing.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::grid::GridIndex;

/// How one cell is covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellSplit {
    /// Split along `p0-p3`: triangles `(p0,p1,p3)` and `(p0,p3,p2)`.
    MainDiagonal,
    /// Split along `p1-p2`: triangles `(p1,p3,p2)` and `(p0,p1,p2)`.
    AntiDiagonal,
    /// Fewer than three present corners; no triangles.
    Skip,
}

/// Chooses the split for a cell from the presence of `[p0, p1, p2, p3]`.
#[must_use]
pub fn split_cell(present: [bool; 4]) -> CellSplit {
    let count = present.iter().filter(|&&p| p).count();
    if count < 3 {
        CellSplit::Skip
    } else if present[0] && present[3] {
        CellSplit::MainDiagonal
    } else {
        CellSplit::AntiDiagonal
    }
}

/// Triangles for a cell with corner indices `[p0, p1, p2, p3]`.
#[must_use]
pub fn cell_triangles(corners: [u32; 4], split: CellSplit) -> Option<[[u32; 3]; 2]> {
    let [p0, p1, p2, p3] = corners;
    match split {
        CellSplit::MainDiagonal => Some([[p0, p1, p3], [p0, p3, p2]]),
        CellSplit::AntiDiagonal => Some([[p1, p3, p2], [p0, p1, p2]]),
        CellSplit::Skip => None,
    }
}

/// Cell tallies by number of present corners.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CellStats {
    pub full_cells: usize,
    pub three_corner_cells: usize,
    /// Cells with exactly two present corners. These are left open; covering
    /// them would need a denser grid.
    pub two_corner_cells: usize,
    pub sparse_cells: usize,
}

impl CellStats {
    fn record(&mut self, present: [bool; 4]) {
        match present.iter().filter(|&&p| p).count() {
            4 => self.full_cells += 1,
            3 => self.three_corner_cells += 1,
            2 => self.two_corner_cells += 1,
            _ => self.sparse_cells += 1,
        }
    }

    fn merge(&mut self, other: Self) {
        self.full_cells += other.full_cells;
        self.three_corner_cells += other.three_corner_cells;
        self.two_corner_cells += other.two_corner_cells;
        self.sparse_cells += other.sparse_cells;
    }

    #[must_use]
    pub fn covered_cells(&self) -> usize {
        self.full_cells + self.three_corner_cells
    }

    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.covered_cells() + self.two_corner_cells + self.sparse_cells
    }
}

/// Triangles of a masked grid, in row-then-column cell order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MaskedTriangulation {
    pub triangles: Vec<[u32; 3]>,
    pub stats: CellStats,
}

/// Triangulates every cell of a `index.rows x index.cols` grid whose node
/// heights are `z` (row-major, `None` = missing).
///
/// `index.node_count()` must fit in `u32` and equal `z.len()`; both hold for
/// fields built through [`Grid`](super::Grid).
#[must_use]
pub fn triangulate_masked_grid(index: GridIndex, z: &[Option<f64>]) -> MaskedTriangulation {
    debug_assert_eq!(z.len(), index.node_count());
    let rows = collect_rows(index, z);

    let mut result = MaskedTriangulation {
        triangles: Vec::with_capacity(index.cell_count() * 2),
        stats: CellStats::default(),
    };
    for (triangles, stats) in rows {
        result.triangles.extend(triangles);
        result.stats.merge(stats);
    }
    result
}

#[cfg(feature = "parallel")]
fn collect_rows(index: GridIndex, z: &[Option<f64>]) -> Vec<(Vec<[u32; 3]>, CellStats)> {
    (0..index.rows.saturating_sub(1))
        .into_par_iter()
        .map(|row| triangulate_row(index, z, row))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn collect_rows(index: GridIndex, z: &[Option<f64>]) -> Vec<(Vec<[u32; 3]>, CellStats)> {
    (0..index.rows.saturating_sub(1))
        .map(|row| triangulate_row(index, z, row))
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn triangulate_row(index: GridIndex, z: &[Option<f64>], row: usize) -> (Vec<[u32; 3]>, CellStats) {
    let mut triangles = Vec::with_capacity(index.cols.saturating_sub(1) * 2);
    let mut stats = CellStats::default();
    for col in 0..index.cols.saturating_sub(1) {
        let corners = index.cell_corners(row, col);
        let present = corners.map(|p| z[p].is_some());
        stats.record(present);
        if let Some(pair) = cell_triangles(corners.map(|p| p as u32), split_cell(present)) {
            triangles.extend(pair);
        }
    }
    (triangles, stats)
}

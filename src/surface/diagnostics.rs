//! Diagnostics returned alongside every surface mesh.
//!
//! Missing data never fails a meshing call; it only leaves cells open. These
//! counts make those gaps visible to callers without inspecting the mesh.

use std::fmt;

use super::metrics::SurfaceTimingReport;
use super::triangulation::CellStats;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SurfaceMeshDiagnostics {
    /// Nodes in the (possibly resampled) grid, which is also the length of
    /// every coordinate buffer.
    pub node_count: usize,

    pub triangle_count: usize,

    /// Triangles touching a missing node (one per three-corner cell).
    pub partial_triangle_count: usize,

    /// Nodes whose height is missing.
    pub missing_node_count: usize,

    /// Nodes kept in the buffers but not referenced by any triangle.
    pub unreferenced_node_count: usize,

    pub cells: CellStats,

    /// Input and output grid shapes when resampling ran.
    pub resampled_from: Option<(usize, usize)>,
    pub resampled_to: Option<(usize, usize)>,

    /// Only populated with the `mesh_metrics` feature on native targets.
    pub timing: Option<SurfaceTimingReport>,

    pub warnings: Vec<String>,
}

impl SurfaceMeshDiagnostics {
    /// `true` when every cell produced two triangles.
    #[must_use]
    pub fn is_fully_covered(&self) -> bool {
        self.cells.covered_cells() == self.cells.total_cells()
    }

    /// Cells left open because of missing samples.
    #[must_use]
    pub fn open_cell_count(&self) -> usize {
        self.cells.two_corner_cells + self.cells.sparse_cells
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Format: `"N:{nodes} T:{triangles} [issues...]"`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("N:{} T:{}", self.node_count, self.triangle_count)];
        if self.missing_node_count > 0 {
            parts.push(format!("missing:{}", self.missing_node_count));
        }
        if self.partial_triangle_count > 0 {
            parts.push(format!("partial:{}", self.partial_triangle_count));
        }
        if self.cells.two_corner_cells > 0 {
            parts.push(format!("two-corner:{}", self.cells.two_corner_cells));
        }
        if self.cells.sparse_cells > 0 {
            parts.push(format!("sparse:{}", self.cells.sparse_cells));
        }
        if self.unreferenced_node_count > 0 {
            parts.push(format!("unreferenced:{}", self.unreferenced_node_count));
        }
        if let (Some(from), Some(to)) = (self.resampled_from, self.resampled_to) {
            parts.push(format!("resampled:{}x{}->{}x{}", from.0, from.1, to.0, to.1));
        }
        parts.join(" ")
    }
}

impl fmt::Display for SurfaceMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())?;
        for warning in &self.warnings {
            write!(f, "\n  warning: {warning}")?;
        }
        Ok(())
    }
}

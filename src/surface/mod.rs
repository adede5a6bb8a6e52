//! Grid-to-mesh triangulation for sampled surfaces.
//!
//! The pipeline is resample (optional) -> per-cell triangulation -> mesh
//! assembly, driven by [`surface_to_mesh3d`].

mod diagnostics;
mod grid;
mod mesh;
mod metrics;
mod resample;
mod triangulation;

pub use diagnostics::SurfaceMeshDiagnostics;
pub use grid::{Field, Grid, GridError, GridIndex};
pub use mesh::{
    Mesh3d, SurfaceMeshError, SurfaceMeshOptions, surface_to_mesh3d,
    surface_to_mesh3d_with_metrics,
};
pub use metrics::{SurfaceMetrics, SurfaceTimingReport, TimingBucket};
pub use resample::{
    MissingSampling, ResampleError, ResampleOptions, ResampledSurface, resample_surface,
};
pub use triangulation::{
    CellSplit, CellStats, MaskedTriangulation, cell_triangles, split_cell,
    triangulate_masked_grid,
};

#[cfg(test)]
mod tests;

use serde::Serialize;
use thiserror::Error;

use super::diagnostics::SurfaceMeshDiagnostics;
use super::grid::{Field, Grid, GridError};
use super::metrics::{SurfaceMetrics, TimingBucket};
use super::resample::{MissingSampling, ResampleError, ResampleOptions, resample_surface};
use super::triangulation::triangulate_masked_grid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceMeshError {
    #[error("invalid surface grid: {0}")]
    Grid(#[from] GridError),
    #[error("resampling failed: {0}")]
    Resample(#[from] ResampleError),
}

/// Triangle mesh in the column layout used by plotly's `Mesh3d` trace.
///
/// Every grid node appears in `x`/`y`/`z`/`intensity`, referenced or not,
/// so a node's position in these buffers is its row-major grid index.
/// Triangle `t` is `(i[t], j[t], k[t])`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Mesh3d {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<Option<f64>>,
    pub i: Vec<u32>,
    pub j: Vec<u32>,
    pub k: Vec<u32>,
    pub intensity: Vec<Option<f64>>,
}

impl Mesh3d {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.i.len()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.i
            .iter()
            .zip(&self.j)
            .zip(&self.k)
            .map(|((&a, &b), &c)| [a, b, c])
    }

    /// Per-node flag telling whether any triangle uses the node.
    #[must_use]
    pub fn referenced_nodes(&self) -> Vec<bool> {
        let mut used = vec![false; self.node_count()];
        for tri in self.triangles() {
            for idx in tri {
                if let Some(slot) = used.get_mut(idx as usize) {
                    *slot = true;
                }
            }
        }
        used
    }

    pub fn validate(&self) -> Result<(), String> {
        let n = self.x.len();
        if self.y.len() != n || self.z.len() != n || self.intensity.len() != n {
            return Err("mesh node buffers differ in length".to_string());
        }
        if self.j.len() != self.i.len() || self.k.len() != self.i.len() {
            return Err("mesh index buffers differ in length".to_string());
        }
        if self.x.iter().chain(&self.y).any(|v| !v.is_finite()) {
            return Err("mesh has non-finite horizontal coordinates".to_string());
        }
        if self.triangles().flatten().any(|idx| idx as usize >= n) {
            return Err("mesh has out-of-bounds node indices".to_string());
        }
        Ok(())
    }

    /// Triangles whose three nodes all have a height.
    ///
    /// A cell with one missing corner emits one such triangle plus one that
    /// touches the missing node; renderers drop the latter.
    pub fn complete_triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles()
            .filter(|tri| tri.iter().all(|&idx| self.z.get(idx as usize).is_some_and(Option::is_some)))
    }
}

/// Options for [`surface_to_mesh3d`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMeshOptions {
    /// Per-axis sample multiplier applied before triangulation; `<= 1` keeps
    /// the input grid.
    pub dense: f64,
    pub missing: MissingSampling,
}

impl Default for SurfaceMeshOptions {
    fn default() -> Self {
        Self {
            dense: 1.0,
            missing: MissingSampling::default(),
        }
    }
}

impl SurfaceMeshOptions {
    #[must_use]
    pub fn dense(dense: f64) -> Self {
        Self {
            dense,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_missing(mut self, missing: MissingSampling) -> Self {
        self.missing = missing;
        self
    }

    #[must_use]
    pub fn resample_options(&self) -> ResampleOptions {
        ResampleOptions::default()
            .with_dense(self.dense)
            .with_missing(self.missing)
    }
}

/// Converts a regular grid surface into an explicit triangle mesh.
///
/// `c` colours the nodes and defaults to `z`; it must have the grid's shape.
/// Cells with three or four present corners get two triangles and cells
/// with fewer get none. A three-corner cell's second triangle touches its
/// missing node; see [`Mesh3d::complete_triangles`].
pub fn surface_to_mesh3d(
    grid: &Grid,
    z: &Field,
    c: Option<&Field>,
    options: SurfaceMeshOptions,
) -> Result<(Mesh3d, SurfaceMeshDiagnostics), SurfaceMeshError> {
    let mut metrics = SurfaceMetrics::default();
    surface_to_mesh3d_with_metrics(grid, z, c, options, &mut metrics)
}

pub fn surface_to_mesh3d_with_metrics(
    grid: &Grid,
    z: &Field,
    c: Option<&Field>,
    options: SurfaceMeshOptions,
    metrics: &mut SurfaceMetrics,
) -> Result<(Mesh3d, SurfaceMeshDiagnostics), SurfaceMeshError> {
    metrics.begin();

    z.expect_shape("Z", grid.index())?;
    let c = c.unwrap_or(z);
    c.expect_shape("C", grid.index())?;

    let resampled = metrics.time(TimingBucket::Resample, || {
        resample_surface(grid.clone(), z.clone(), c.clone(), options.resample_options())
    })?;

    let index = resampled.grid.index();
    let triangulation = metrics.time(TimingBucket::Triangulation, || {
        triangulate_masked_grid(index, resampled.z.values())
    });

    let mut diagnostics = SurfaceMeshDiagnostics {
        node_count: index.node_count(),
        triangle_count: triangulation.triangles.len(),
        missing_node_count: resampled.z.missing_count(),
        cells: triangulation.stats,
        ..Default::default()
    };
    if let Some(from) = resampled.source_shape {
        diagnostics.resampled_from = Some(from);
        diagnostics.resampled_to = Some((index.rows, index.cols));
        if options.missing == MissingSampling::Nearest && z.has_missing() {
            diagnostics.add_warning(
                "nearest resampling treated missing nodes as ordinary sources; holes may have moved",
            );
        }
    }

    let mesh = metrics.time(TimingBucket::Assembly, || {
        assemble_mesh(resampled.grid, resampled.z, resampled.c, &triangulation.triangles)
    });

    diagnostics.unreferenced_node_count = mesh.referenced_nodes().iter().filter(|used| !**used).count();
    diagnostics.partial_triangle_count = diagnostics.triangle_count - mesh.complete_triangles().count();
    diagnostics.timing = metrics.end();

    log::debug!("surface mesh {}", diagnostics.summary());
    Ok((mesh, diagnostics))
}

fn assemble_mesh(grid: Grid, z: Field, c: Field, triangles: &[[u32; 3]]) -> Mesh3d {
    let (x, y) = grid.into_parts();
    let mut i = Vec::with_capacity(triangles.len());
    let mut j = Vec::with_capacity(triangles.len());
    let mut k = Vec::with_capacity(triangles.len());
    for &[a, b, d] in triangles {
        i.push(a);
        j.push(b);
        k.push(d);
    }
    Mesh3d {
        x,
        y,
        z: z.into_values(),
        i,
        j,
        k,
        intensity: c.into_values(),
    }
}

//! Grid densification by nearest-neighbour sampling.
//!
//! The source axes are recovered as the sorted distinct `X` and `Y` values,
//! each count is multiplied by `dense` (truncated), and the new axes span the
//! same extents with evenly spaced samples. Every new node then takes the `Z`
//! and `C` values of its nearest source node in the `(x, y)` plane.
//!
//! Missing source nodes take part in the search as ordinary points under
//! [`MissingSampling::Nearest`], so a hole can grow, shrink or shift after
//! densification. [`MissingSampling::NearestValid`] restricts the search to
//! present nodes instead, which fills holes from their nearest neighbour.

use thiserror::Error;

use super::grid::{Field, Grid, GridError, GridIndex};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResampleError {
    #[error("density multiplier must be finite, got {0}")]
    InvalidDensity(f64),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// How missing source nodes take part in nearest-neighbour sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingSampling {
    /// Missing nodes are ordinary sources: a new node whose nearest source
    /// is missing becomes missing, and vice versa.
    #[default]
    Nearest,
    /// Only nodes with a present `Z` are candidate sources.
    NearestValid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampleOptions {
    /// Sample-count multiplier per axis. Values `<= 1` leave the grid untouched.
    pub dense: f64,
    pub missing: MissingSampling,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self {
            dense: 1.0,
            missing: MissingSampling::Nearest,
        }
    }
}

impl ResampleOptions {
    #[must_use]
    pub fn with_dense(mut self, dense: f64) -> Self {
        self.dense = dense;
        self
    }

    #[must_use]
    pub fn with_missing(mut self, missing: MissingSampling) -> Self {
        self.missing = missing;
        self
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.dense <= 1.0
    }
}

/// Grid and fields after (optional) densification.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledSurface {
    pub grid: Grid,
    pub z: Field,
    pub c: Field,
    /// Shape of the input grid when resampling took place.
    pub source_shape: Option<(usize, usize)>,
}

/// Densifies `grid` and samples `z`/`c` onto it.
///
/// `z` and `c` must already match the grid shape. When
/// `options.is_identity()` the inputs are returned unchanged.
pub fn resample_surface(
    grid: Grid,
    z: Field,
    c: Field,
    options: ResampleOptions,
) -> Result<ResampledSurface, ResampleError> {
    if !options.dense.is_finite() {
        return Err(ResampleError::InvalidDensity(options.dense));
    }
    z.expect_shape("Z", grid.index())?;
    c.expect_shape("C", grid.index())?;

    if options.is_identity() {
        return Ok(ResampledSurface {
            grid,
            z,
            c,
            source_shape: None,
        });
    }

    let lattice = SourceLattice::new(&grid);
    let x_axis = DenseAxis::new(&lattice.cols.values, options.dense);
    let y_axis = DenseAxis::new(&lattice.rows.values, options.dense);
    GridIndex::checked(y_axis.count, x_axis.count)?;
    let x_dense = x_axis.samples();
    let y_dense = y_axis.samples();
    let dense_grid = Grid::meshgrid(&x_dense, &y_dense)?;

    log::debug!(
        "resampling {}x{} grid to {}x{} ({:?})",
        grid.index().rows,
        grid.index().cols,
        y_dense.len(),
        x_dense.len(),
        options.missing
    );
    if options.missing == MissingSampling::Nearest && z.has_missing() {
        log::warn!(
            "nearest resampling over {} missing nodes; holes may move after densification",
            z.missing_count()
        );
    }

    let z_values = z.values();
    let c_values = c.values();
    let mut z_dense = Vec::with_capacity(dense_grid.index().node_count());
    let mut c_dense = Vec::with_capacity(dense_grid.index().node_count());
    for &qy in &y_dense {
        for &qx in &x_dense {
            let source = match options.missing {
                MissingSampling::Nearest => lattice.nearest(qx, qy, |_| true),
                MissingSampling::NearestValid => lattice.nearest(qx, qy, |flat| z_values[flat].is_some()),
            };
            z_dense.push(source.and_then(|flat| z_values[flat]));
            c_dense.push(source.and_then(|flat| c_values[flat]));
        }
    }

    let index = dense_grid.index();
    Ok(ResampledSurface {
        grid: dense_grid,
        z: Field::from_options(index, z_dense)?,
        c: Field::from_options(index, c_dense)?,
        source_shape: Some((grid.index().rows, grid.index().cols)),
    })
}

/// A densified axis: `floor(len * dense)` samples over the distinct values.
struct DenseAxis {
    min: f64,
    max: f64,
    count: usize,
}

impl DenseAxis {
    fn new(sorted: &[f64], dense: f64) -> Self {
        let mut distinct = sorted.to_vec();
        distinct.dedup();
        let (Some(&min), Some(&max)) = (distinct.first(), distinct.last()) else {
            return Self {
                min: 0.0,
                max: 0.0,
                count: 0,
            };
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let count = (distinct.len() as f64 * dense).floor() as usize;
        Self { min, max, count }
    }

    fn samples(&self) -> Vec<f64> {
        linspace(self.min, self.max, self.count)
    }
}

#[allow(clippy::cast_precision_loss)]
fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            values[count - 1] = stop;
            values
        }
    }
}

/// One source axis sorted ascending, remembering where each sample came from.
struct SortedAxis {
    values: Vec<f64>,
    positions: Vec<usize>,
}

impl SortedAxis {
    fn new(axis: &[f64]) -> Self {
        let mut pairs: Vec<(f64, usize)> = axis.iter().copied().zip(0..).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let (values, positions) = pairs.into_iter().unzip();
        Self { values, positions }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    /// Sorted position of the sample closest to `q` (lower position on ties).
    fn nearest_position(&self, q: f64) -> usize {
        let upper = self.values.partition_point(|&v| v < q);
        if upper == 0 {
            return 0;
        }
        if upper == self.values.len() {
            return upper - 1;
        }
        let below = q - self.values[upper - 1];
        let above = self.values[upper] - q;
        if above < below { upper } else { upper - 1 }
    }

    /// Smallest `|value - q|` among samples exactly `ring` positions away
    /// from `center`, or infinity when both sides are out of range.
    fn ring_gap(&self, center: usize, ring: usize, q: f64) -> f64 {
        let left = center
            .checked_sub(ring)
            .map_or(f64::INFINITY, |p| (q - self.values[p]).abs());
        let right = self
            .values
            .get(center + ring)
            .map_or(f64::INFINITY, |v| (v - q).abs());
        left.min(right)
    }
}

/// The source grid viewed as two independently sorted axes.
struct SourceLattice {
    index: GridIndex,
    cols: SortedAxis,
    rows: SortedAxis,
}

impl SourceLattice {
    fn new(grid: &Grid) -> Self {
        Self {
            index: grid.index(),
            cols: SortedAxis::new(grid.x_axis()),
            rows: SortedAxis::new(&grid.y_axis()),
        }
    }

    /// Flat index of the accepted source node closest to `(qx, qy)`.
    ///
    /// Searches square rings of sorted positions outward from the closest
    /// lattice position and stops once no farther ring can beat the best
    /// candidate. Equal distances resolve to the lower flat index.
    #[allow(clippy::float_cmp)]
    fn nearest(&self, qx: f64, qy: f64, accept: impl Fn(usize) -> bool) -> Option<usize> {
        let ci = self.cols.nearest_position(qx);
        let ri = self.rows.nearest_position(qy);
        let max_ring = self.cols.len().max(self.rows.len());

        let mut best: Option<(f64, usize)> = None;
        for ring in 0..max_ring {
            let gap = self.cols.ring_gap(ci, ring, qx).min(self.rows.ring_gap(ri, ring, qy));
            if gap.is_infinite() {
                break;
            }
            if let Some((best_d, _)) = best {
                if gap * gap > best_d {
                    break;
                }
            }

            let r_lo = ri.saturating_sub(ring);
            let r_hi = (ri + ring).min(self.rows.len() - 1);
            let c_lo = ci.saturating_sub(ring);
            let c_hi = (ci + ring).min(self.cols.len() - 1);
            for sr in r_lo..=r_hi {
                let on_edge_row = sr.abs_diff(ri) == ring;
                for sc in c_lo..=c_hi {
                    if !on_edge_row && sc.abs_diff(ci) != ring {
                        continue;
                    }
                    let flat = self.index.flat(self.rows.positions[sr], self.cols.positions[sc]);
                    if !accept(flat) {
                        continue;
                    }
                    let dx = self.cols.values[sc] - qx;
                    let dy = self.rows.values[sr] - qy;
                    let d = dx * dx + dy * dy;
                    let better = best.is_none_or(|(best_d, best_flat)| {
                        d < best_d || (d == best_d && flat < best_flat)
                    });
                    if better {
                        best = Some((d, flat));
                    }
                }
            }
        }

        best.map(|(_, flat)| flat)
    }
}

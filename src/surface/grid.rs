//! Regular sampling grids and the per-node fields defined on them.
//!
//! A [`Grid`] is the pair of coordinate arrays `X`, `Y` produced by a
//! meshgrid: `X` varies by column, `Y` varies by row. Every node is
//! addressed by one row-major flat index, and [`GridIndex`] is the single
//! place where `(row, col) <-> flat` arithmetic lives.
//!
//! Height and scalar values are stored in a [`Field`], where a missing
//! sample is `None` rather than a NaN sentinel.

use thiserror::Error;

/// Errors raised when grid or field inputs violate their shape contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid must have at least 2 rows and 2 columns, got {rows}x{cols}")]
    TooSmall { rows: usize, cols: usize },
    #[error("row {row} of {name} has {found} entries, expected {expected}")]
    RaggedRow {
        name: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{name} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        name: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("grid coordinate at ({row}, {col}) is not finite")]
    NonFinite { row: usize, col: usize },
    #[error("grid is skewed at ({row}, {col}): X must vary by column and Y by row")]
    Skewed { row: usize, col: usize },
    #[error("flat arrays of length {len} cannot be reshaped into rows of {cols}")]
    FlatReshape { len: usize, cols: usize },
    #[error("flat {name} has {found} entries, expected {expected}")]
    FlatLength {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("grid of {rows}x{cols} nodes exceeds the u32 index range")]
    TooManyNodes { rows: usize, cols: usize },
}

/// Row-major node addressing for a `rows x cols` lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridIndex {
    pub rows: usize,
    pub cols: usize,
}

impl GridIndex {
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    #[must_use]
    pub const fn node_count(self) -> usize {
        self.rows * self.cols
    }

    /// Number of 2x2 cells; zero when either axis has fewer than two nodes.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.rows.saturating_sub(1) * self.cols.saturating_sub(1)
    }

    #[must_use]
    pub const fn flat(self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[must_use]
    pub const fn row_col(self, flat: usize) -> (usize, usize) {
        (flat / self.cols, flat % self.cols)
    }

    /// Corner nodes of the cell whose top-left node is `(row, col)`, in the
    /// order `[p0, p1, p2, p3]` = top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub const fn cell_corners(self, row: usize, col: usize) -> [usize; 4] {
        let p0 = self.flat(row, col);
        let p2 = p0 + self.cols;
        [p0, p0 + 1, p2, p2 + 1]
    }

    /// Builds an index whose node count fits in `u32` without overflowing.
    pub fn checked(rows: usize, cols: usize) -> Result<Self, GridError> {
        let index = Self::new(rows, cols);
        index.check_u32()?;
        Ok(index)
    }

    pub(crate) fn check_u32(self) -> Result<(), GridError> {
        let fits = self
            .rows
            .checked_mul(self.cols)
            .is_some_and(|n| u32::try_from(n).is_ok());
        if !fits {
            return Err(GridError::TooManyNodes {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }
}

/// Per-node values on a grid. `None` marks a missing sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    index: GridIndex,
    values: Vec<Option<f64>>,
}

impl Field {
    /// Builds a field from nested rows, mapping NaN to a missing sample.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, GridError> {
        let (index, flat) = flatten_rows("field", rows)?;
        Ok(Self {
            index,
            values: flat.into_iter().map(present).collect(),
        })
    }

    /// Builds a field from nested rows that already use `None` for missing.
    /// A NaN inside `Some` is still treated as missing.
    pub fn from_option_rows(rows: &[Vec<Option<f64>>]) -> Result<Self, GridError> {
        let (index, flat) = flatten_rows("field", rows)?;
        Ok(Self {
            index,
            values: flat.into_iter().map(|v| v.and_then(present)).collect(),
        })
    }

    /// Wraps a row-major value buffer of exactly `index.node_count()` entries.
    pub fn from_flat(index: GridIndex, values: &[f64]) -> Result<Self, GridError> {
        if values.len() != index.node_count() {
            return Err(GridError::FlatLength {
                name: "field",
                expected: index.node_count(),
                found: values.len(),
            });
        }
        Ok(Self {
            index,
            values: values.iter().copied().map(present).collect(),
        })
    }

    /// Wraps an already-masked row-major buffer.
    pub fn from_options(index: GridIndex, values: Vec<Option<f64>>) -> Result<Self, GridError> {
        if values.len() != index.node_count() {
            return Err(GridError::FlatLength {
                name: "field",
                expected: index.node_count(),
                found: values.len(),
            });
        }
        Ok(Self { index, values })
    }

    /// A field with every node set to `value`.
    #[must_use]
    pub fn filled(index: GridIndex, value: f64) -> Self {
        Self {
            index,
            values: vec![present(value); index.node_count()],
        }
    }

    #[must_use]
    pub fn index(&self) -> GridIndex {
        self.index
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.index.rows, self.index.cols)
    }

    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.index.rows || col >= self.index.cols {
            return None;
        }
        self.values[self.index.flat(row, col)]
    }

    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    #[must_use]
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Option::is_none)
    }

    /// Keeps this field's mask and replaces every present value with `value`.
    #[must_use]
    pub fn masked_constant(&self, value: f64) -> Self {
        Self {
            index: self.index,
            values: self.values.iter().map(|v| v.map(|_| value)).collect(),
        }
    }

    pub(crate) fn into_values(self) -> Vec<Option<f64>> {
        self.values
    }

    pub(crate) fn expect_shape(&self, name: &'static str, index: GridIndex) -> Result<(), GridError> {
        if self.index != index {
            return Err(GridError::ShapeMismatch {
                name,
                expected: (index.rows, index.cols),
                found: self.shape(),
            });
        }
        Ok(())
    }
}

/// Horizontal node coordinates of an axis-aligned rectangular lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    index: GridIndex,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Grid {
    /// Builds a grid from meshgrid-style `X` and `Y` rows.
    pub fn new(x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<Self, GridError> {
        let (index, x) = flatten_rows("X", x)?;
        let (y_index, y) = flatten_rows("Y", y)?;
        if y_index != index {
            return Err(GridError::ShapeMismatch {
                name: "Y",
                expected: (index.rows, index.cols),
                found: (y_index.rows, y_index.cols),
            });
        }
        Self::from_parts(index, x, y)
    }

    /// Equivalent of `meshgrid(xs, ys)`: `cols = xs.len()`, `rows = ys.len()`.
    pub fn meshgrid(xs: &[f64], ys: &[f64]) -> Result<Self, GridError> {
        let index = GridIndex::checked(ys.len(), xs.len())?;
        let mut x = Vec::with_capacity(index.node_count());
        let mut y = Vec::with_capacity(index.node_count());
        for &yv in ys {
            x.extend_from_slice(xs);
            y.extend(std::iter::repeat_n(yv, xs.len()));
        }
        Self::from_parts(index, x, y)
    }

    /// Rebuilds a grid from ravelled `X`/`Y` arrays.
    ///
    /// The row length is the number of entries equal to `Y[0]`, matching how
    /// flat contour inputs were reshaped by the plotting tools.
    pub fn from_flat(x: &[f64], y: &[f64]) -> Result<Self, GridError> {
        if x.len() != y.len() {
            return Err(GridError::FlatLength {
                name: "X",
                expected: y.len(),
                found: x.len(),
            });
        }
        let Some(&first_y) = y.first() else {
            return Err(GridError::TooSmall { rows: 0, cols: 0 });
        };
        if !first_y.is_finite() {
            return Err(GridError::NonFinite { row: 0, col: 0 });
        }
        #[allow(clippy::float_cmp)]
        let cols = y.iter().filter(|&&v| v == first_y).count();
        if y.len() % cols != 0 {
            return Err(GridError::FlatReshape { len: y.len(), cols });
        }
        let index = GridIndex::new(y.len() / cols, cols);
        Self::from_parts(index, x.to_vec(), y.to_vec())
    }

    fn from_parts(index: GridIndex, x: Vec<f64>, y: Vec<f64>) -> Result<Self, GridError> {
        if index.rows < 2 || index.cols < 2 {
            return Err(GridError::TooSmall {
                rows: index.rows,
                cols: index.cols,
            });
        }
        index.check_u32()?;

        for (flat, (&xv, &yv)) in x.iter().zip(&y).enumerate() {
            let (row, col) = index.row_col(flat);
            if !xv.is_finite() || !yv.is_finite() {
                return Err(GridError::NonFinite { row, col });
            }
            #[allow(clippy::float_cmp)]
            if xv != x[col] || yv != y[index.flat(row, 0)] {
                return Err(GridError::Skewed { row, col });
            }
        }

        Ok(Self { index, x, y })
    }

    #[must_use]
    pub fn index(&self) -> GridIndex {
        self.index
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.index.rows, self.index.cols)
    }

    /// Row-major `X` coordinates, one per node.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Row-major `Y` coordinates, one per node.
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// `X` along the first row, in column order.
    #[must_use]
    pub fn x_axis(&self) -> &[f64] {
        &self.x[..self.index.cols]
    }

    /// `Y` down the first column, in row order.
    #[must_use]
    pub fn y_axis(&self) -> Vec<f64> {
        self.y.iter().step_by(self.index.cols).copied().collect()
    }

    /// Reshapes a ravelled field to this grid's shape.
    pub fn field_from_flat(&self, values: &[f64]) -> Result<Field, GridError> {
        Field::from_flat(self.index, values)
    }

    pub(crate) fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.x, self.y)
    }
}

fn present(value: f64) -> Option<f64> {
    if value.is_nan() { None } else { Some(value) }
}

fn flatten_rows<T: Copy>(name: &'static str, rows: &[Vec<T>]) -> Result<(GridIndex, Vec<T>), GridError> {
    let cols = rows.first().map_or(0, Vec::len);
    let index = GridIndex::new(rows.len(), cols);
    let mut flat = Vec::with_capacity(index.node_count());
    for (row, values) in rows.iter().enumerate() {
        if values.len() != cols {
            return Err(GridError::RaggedRow {
                name,
                row,
                expected: cols,
                found: values.len(),
            });
        }
        flat.extend_from_slice(values);
    }
    Ok((index, flat))
}

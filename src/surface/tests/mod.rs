mod test_grid_basic;
mod test_triangulation_basic;

use crate::surface::{Field, Grid};

/// Unit-spaced `rows x cols` grid with `z = row + col`, NaN at `holes`.
pub(super) fn unit_surface(rows: usize, cols: usize, holes: &[usize]) -> (Grid, Field) {
    let xs: Vec<f64> = (0..cols).map(|c| c as f64).collect();
    let ys: Vec<f64> = (0..rows).map(|r| r as f64).collect();
    let grid = Grid::meshgrid(&xs, &ys).unwrap();
    let z: Vec<f64> = (0..rows * cols)
        .map(|p| {
            if holes.contains(&p) {
                f64::NAN
            } else {
                (p / cols + p % cols) as f64
            }
        })
        .collect();
    let field = grid.field_from_flat(&z).unwrap();
    (grid, field)
}

use crate::surface::{Field, Grid, GridError, GridIndex};

#[test]
fn meshgrid_lays_out_x_by_column_and_y_by_row() {
    let grid = Grid::meshgrid(&[0.0, 10.0, 20.0], &[5.0, 6.0]).unwrap();
    assert_eq!(grid.shape(), (2, 3));
    assert_eq!(grid.x(), &[0.0, 10.0, 20.0, 0.0, 10.0, 20.0]);
    assert_eq!(grid.y(), &[5.0, 5.0, 5.0, 6.0, 6.0, 6.0]);
    assert_eq!(grid.x_axis(), &[0.0, 10.0, 20.0]);
    assert_eq!(grid.y_axis(), vec![5.0, 6.0]);
}

#[test]
fn nested_rows_match_meshgrid() {
    let x = vec![vec![0.0, 1.0], vec![0.0, 1.0]];
    let y = vec![vec![0.0, 0.0], vec![2.0, 2.0]];
    let grid = Grid::new(&x, &y).unwrap();
    assert_eq!(grid, Grid::meshgrid(&[0.0, 1.0], &[0.0, 2.0]).unwrap());
}

#[test]
fn grids_without_cells_are_rejected() {
    assert_eq!(
        Grid::meshgrid(&[0.0], &[0.0, 1.0]).unwrap_err(),
        GridError::TooSmall { rows: 2, cols: 1 }
    );
    assert_eq!(
        Grid::meshgrid(&[0.0, 1.0, 2.0], &[0.0]).unwrap_err(),
        GridError::TooSmall { rows: 1, cols: 3 }
    );
}

#[test]
fn mismatched_x_and_y_shapes_are_rejected() {
    let x = vec![vec![0.0, 1.0], vec![0.0, 1.0]];
    let y = vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 1.0]];
    assert!(matches!(
        Grid::new(&x, &y),
        Err(GridError::ShapeMismatch { name: "Y", .. })
    ));
}

#[test]
fn skewed_lattice_is_rejected() {
    let x = vec![vec![0.0, 1.0], vec![0.5, 1.0]];
    let y = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
    assert_eq!(
        Grid::new(&x, &y).unwrap_err(),
        GridError::Skewed { row: 1, col: 0 }
    );

    let x = vec![vec![0.0, 1.0], vec![0.0, 1.0]];
    let y = vec![vec![0.0, 0.3], vec![1.0, 1.0]];
    assert_eq!(
        Grid::new(&x, &y).unwrap_err(),
        GridError::Skewed { row: 0, col: 1 }
    );
}

#[test]
fn non_finite_coordinates_are_rejected() {
    let err = Grid::meshgrid(&[0.0, f64::NAN], &[0.0, 1.0]).unwrap_err();
    assert_eq!(err, GridError::NonFinite { row: 0, col: 1 });
}

#[test]
fn flat_arrays_reshape_by_first_row_length() {
    let x = [0.0, 1.0, 2.0, 0.0, 1.0, 2.0];
    let y = [7.0, 7.0, 7.0, 8.0, 8.0, 8.0];
    let grid = Grid::from_flat(&x, &y).unwrap();
    assert_eq!(grid.shape(), (2, 3));

    let field = grid.field_from_flat(&[1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0]).unwrap();
    assert_eq!(field.get(0, 2), None);
    assert_eq!(field.get(1, 0), Some(4.0));
}

#[test]
fn flat_arrays_with_a_partial_row_are_rejected() {
    let x = [0.0, 1.0, 0.0, 1.0, 0.0];
    let y = [0.0, 0.0, 1.0, 1.0, 2.0];
    assert_eq!(
        Grid::from_flat(&x, &y).unwrap_err(),
        GridError::FlatReshape { len: 5, cols: 2 }
    );
}

#[test]
fn field_length_must_match_grid() {
    let err = Field::from_flat(GridIndex::new(2, 2), &[1.0, 2.0, 3.0]).unwrap_err();
    assert_eq!(
        err,
        GridError::FlatLength {
            name: "field",
            expected: 4,
            found: 3
        }
    );
}

#[test]
fn masked_constant_keeps_the_mask() {
    let field = Field::from_rows(&[vec![3.0, f64::NAN], vec![1.0, 2.0]]).unwrap();
    let plane = field.masked_constant(50.0);
    assert_eq!(plane.values(), &[Some(50.0), None, Some(50.0), Some(50.0)]);
}

#[test]
fn flat_arrays_with_non_finite_first_y_are_rejected() {
    let x = [0.0, 1.0, 0.0, 1.0];
    for first in [f64::NAN, f64::INFINITY] {
        let y = [first, first, 1.0, 1.0];
        assert_eq!(
            Grid::from_flat(&x, &y).unwrap_err(),
            GridError::NonFinite { row: 0, col: 0 }
        );
    }
}

#[test]
fn oversized_index_is_rejected_without_overflow() {
    assert_eq!(
        GridIndex::checked(usize::MAX, 2).unwrap_err(),
        GridError::TooManyNodes {
            rows: usize::MAX,
            cols: 2
        }
    );
    assert!(GridIndex::checked(1 << 16, 1 << 16).is_err());
    assert_eq!(GridIndex::checked(3, 4).unwrap(), GridIndex::new(3, 4));
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::surface::{CellSplit, GridIndex, split_cell, triangulate_masked_grid};

fn mask(rows: usize, cols: usize, missing: &[usize]) -> Vec<Option<f64>> {
    (0..rows * cols)
        .map(|p| if missing.contains(&p) { None } else { Some(1.0) })
        .collect()
}

#[test]
fn full_grid_emits_two_triangles_per_cell() {
    let index = GridIndex::new(4, 5);
    let result = triangulate_masked_grid(index, &mask(4, 5, &[]));

    assert_eq!(result.triangles.len(), 2 * 3 * 4);
    assert_eq!(result.stats.full_cells, 12);

    let mut used = vec![false; index.node_count()];
    for tri in &result.triangles {
        for &p in tri {
            used[p as usize] = true;
        }
    }
    assert!(used.iter().all(|u| *u));
}

#[test]
fn full_cells_split_along_main_diagonal() {
    let index = GridIndex::new(3, 3);
    let result = triangulate_masked_grid(index, &mask(3, 3, &[]));
    for (cell, pair) in result.triangles.chunks_exact(2).enumerate() {
        let [p0, p1, p2, p3] = index.cell_corners(cell / 2, cell % 2).map(|p| p as u32);
        assert_eq!(pair, &[[p0, p1, p3], [p0, p3, p2]]);
    }
}

#[test]
fn two_by_two_full_cell() {
    let result = triangulate_masked_grid(GridIndex::new(2, 2), &mask(2, 2, &[]));
    assert_eq!(result.triangles, vec![[0, 1, 3], [0, 3, 2]]);
}

#[test]
fn two_by_two_missing_bottom_right_uses_anti_diagonal() {
    let result = triangulate_masked_grid(GridIndex::new(2, 2), &mask(2, 2, &[3]));
    assert_eq!(result.triangles, vec![[1, 3, 2], [0, 1, 2]]);
    assert_eq!(result.stats.three_corner_cells, 1);
}

#[test]
fn two_by_two_opposite_corners_missing_emits_nothing() {
    let result = triangulate_masked_grid(GridIndex::new(2, 2), &mask(2, 2, &[0, 3]));
    assert!(result.triangles.is_empty());
    assert_eq!(result.stats.two_corner_cells, 1);
}

#[test]
fn three_by_three_missing_center() {
    let result = triangulate_masked_grid(GridIndex::new(3, 3), &mask(3, 3, &[4]));

    assert_eq!(result.stats.three_corner_cells, 4);
    assert_eq!(
        result.triangles,
        vec![
            // p3 missing
            [1, 4, 3],
            [0, 1, 3],
            // p2 missing
            [1, 2, 5],
            [1, 5, 4],
            // p1 missing
            [3, 4, 7],
            [3, 7, 6],
            // p0 missing
            [5, 8, 7],
            [4, 5, 7],
        ]
    );

    let complete: Vec<_> = result
        .triangles
        .iter()
        .filter(|tri| !tri.contains(&4))
        .collect();
    assert_eq!(complete.len(), 4);
}

#[test]
fn random_masks_respect_cell_policy() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..50 {
        let rows = rng.random_range(2..9);
        let cols = rng.random_range(2..9);
        let index = GridIndex::new(rows, cols);
        let z: Vec<Option<f64>> = (0..index.node_count())
            .map(|_| rng.random_bool(0.7).then_some(1.0))
            .collect();

        let result = triangulate_masked_grid(index, &z);
        assert_eq!(result.stats.total_cells(), index.cell_count());
        assert_eq!(result.triangles.len(), result.stats.covered_cells() * 2);
        assert_eq!(triangulate_masked_grid(index, &z), result);

        let mut expected = Vec::new();
        for row in 0..rows - 1 {
            for col in 0..cols - 1 {
                let corners = index.cell_corners(row, col);
                let present = corners.map(|p| z[p].is_some());
                let split = split_cell(present);
                let valid = present.iter().filter(|p| **p).count();
                assert_eq!(split == CellSplit::Skip, valid <= 2);
                if split != CellSplit::Skip {
                    let covered = result
                        .triangles
                        .iter()
                        .filter(|tri| tri.iter().all(|p| corners.contains(&(*p as usize))))
                        .count();
                    assert_eq!(covered, 2);
                    // One triangle of every emitted pair is fully present.
                    expected.push(corners);
                }
            }
        }
        for (pair, corners) in result.triangles.chunks_exact(2).zip(&expected) {
            assert!(pair.iter().all(|tri| tri.iter().all(|p| corners.contains(&(*p as usize)))));
            assert!(pair.iter().any(|tri| tri.iter().all(|&p| z[p as usize].is_some())));
        }
    }
}

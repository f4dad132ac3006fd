use super::{assert_corners, assert_tiles_unit_square, row_sizes, unit_grid};
use crate::tessellation::{EdgeFilter, SurfaceDirection};

#[test]
fn diamond_quads_two_by_two() {
    let mut grid = unit_grid();
    grid.set_diamond_quads(SurfaceDirection::U, 2, 2, false, EdgeFilter::All)
        .unwrap();
    assert_eq!(row_sizes(&grid), vec![(0, 2), (1, 1), (2, 2)]);
    assert_tiles_unit_square(&grid);
    let diamond = &grid.rows().nth(1).unwrap().1[0];
    assert_corners(diamond, &[(0.0, 0.5), (0.5, 1.0), (1.0, 0.5), (0.5, 0.0)]);
}

#[test]
fn diamond_edges_are_strictly_additive() {
    let mut grid = unit_grid();
    for (u, v, flip) in [(2, 2, false), (3, 3, true), (4, 3, false), (3, 4, true)] {
        grid.set_diamond_quads(SurfaceDirection::U, u, v, flip, EdgeFilter::All)
            .unwrap();
        let all = grid.face_count();
        assert_tiles_unit_square(&grid);
        grid.set_diamond_quads(SurfaceDirection::U, u, v, flip, EdgeFilter::InteriorOnly)
            .unwrap();
        let interior = grid.face_count();
        grid.set_diamond_quads(SurfaceDirection::U, u, v, flip, EdgeFilter::EdgesOnly)
            .unwrap();
        let edges = grid.face_count();
        assert!(interior < all);
        assert_eq!(interior + edges, all);
    }
}

#[test]
fn diamond_quads_single_cell_is_two_triangles() {
    let mut grid = unit_grid();
    grid.set_diamond_quads(SurfaceDirection::V, 1, 1, false, EdgeFilter::All)
        .unwrap();
    assert_eq!(grid.face_count(), 2);
    assert!(grid.faces().iter().all(|face| face.is_tri()));
    assert_tiles_unit_square(&grid);
}

#[test]
fn diamond_triangles_split_rows() {
    let mut grid = unit_grid();
    grid.set_diamond_triangles(SurfaceDirection::U, 2, 2, false, EdgeFilter::All)
        .unwrap();
    assert_eq!(row_sizes(&grid), vec![(0, 2), (1, 1), (2, 1), (4, 2)]);
    assert!(grid.faces().iter().all(|face| face.is_tri()));
    assert_tiles_unit_square(&grid);
}

#[test]
fn diamond_triangles_tile_larger_grids() {
    let mut grid = unit_grid();
    for (u, v, flip, cells) in [(3, 3, false, 12), (4, 3, false, 16), (3, 4, true, 15), (4, 4, false, 20)] {
        grid.set_diamond_triangles(SurfaceDirection::U, u, v, flip, EdgeFilter::All)
            .unwrap();
        assert_eq!(grid.face_count(), cells);
        assert_tiles_unit_square(&grid);
    }
}

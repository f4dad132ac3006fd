use super::{assert_tiles_unit_square, row_sizes, total_area, unit_grid};
use crate::tessellation::{EdgeFilter, HexTriStrategy, IsoFace, SurfaceDirection};

const T: f64 = 1.0 / 3.0;

fn kinds(faces: &[IsoFace]) -> (usize, usize, usize) {
    faces.iter().fold((0, 0, 0), |(tri, quad, hex), face| match face {
        IsoFace::Tri(_) => (tri + 1, quad, hex),
        IsoFace::Quad(_) => (tri, quad + 1, hex),
        IsoFace::Hex(_) => (tri, quad, hex + 1),
    })
}

#[test]
fn hexagons_tile_with_boundary_quads() {
    let mut grid = unit_grid();
    for (u, v, flip, hex, quad) in [
        (4, 4, false, 7, 6),
        (4, 4, true, 8, 4),
        (5, 5, false, 12, 6),
        (4, 5, false, 9, 6),
        (5, 4, true, 10, 5),
        (2, 3, false, 2, 4),
    ] {
        grid.set_hexagons(SurfaceDirection::U, u, v, T, flip, EdgeFilter::All)
            .unwrap();
        assert_eq!(kinds(&grid.faces()), (0, quad, hex), "{u}x{v} flip={flip}");
        assert_tiles_unit_square(&grid);
    }
}

#[test]
fn hexagon_rows_follow_primary_pairs() {
    let mut grid = unit_grid();
    grid.set_hexagons(SurfaceDirection::V, 4, 4, T, false, EdgeFilter::InteriorOnly)
        .unwrap();
    let keys: Vec<i32> = row_sizes(&grid).into_iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec![1, 2]);
    assert_eq!(kinds(&grid.faces()), (0, 0, 5));
}

#[test]
fn hexagon_filters_partition_the_cells() {
    let mut grid = unit_grid();
    grid.set_hexagons(SurfaceDirection::U, 5, 5, T, false, EdgeFilter::All)
        .unwrap();
    let all = grid.face_count();
    grid.set_hexagons(SurfaceDirection::U, 5, 5, T, false, EdgeFilter::InteriorOnly)
        .unwrap();
    let interior = grid.face_count();
    let interior_area = total_area(&grid.faces());
    grid.set_hexagons(SurfaceDirection::U, 5, 5, T, false, EdgeFilter::EdgesOnly)
        .unwrap();
    let edges = grid.face_count();
    let edge_area = total_area(&grid.faces());
    assert_eq!(interior + edges, all);
    assert!((interior_area + edge_area - 1.0).abs() < 1e-6);
}

#[test]
fn single_cell_hexagon_grid_is_two_quads() {
    let mut grid = unit_grid();
    grid.set_hexagons(SurfaceDirection::U, 1, 1, T, false, EdgeFilter::All)
        .unwrap();
    assert_eq!(kinds(&grid.faces()), (0, 2, 0));
    assert_tiles_unit_square(&grid);
}

#[test]
fn hexagons_reject_out_of_range_t() {
    let mut grid = unit_grid();
    assert!(
        grid.set_hexagons(SurfaceDirection::U, 4, 4, -0.1, false, EdgeFilter::All)
            .is_err()
    );
}

#[test]
fn hex_quads_split_every_hexagon_in_two() {
    let mut grid = unit_grid();
    grid.set_hex_quads(SurfaceDirection::U, 4, 4, T, false, EdgeFilter::All, 1)
        .unwrap();
    assert_eq!(kinds(&grid.faces()), (0, 6 + 7 * 2, 0));
    assert_tiles_unit_square(&grid);
}

#[test]
fn hex_radial_quads_split_every_hexagon_in_three() {
    let mut grid = unit_grid();
    grid.set_hex_radial_quads(SurfaceDirection::U, 4, 4, T, false, EdgeFilter::All, 0)
        .unwrap();
    assert_eq!(kinds(&grid.faces()), (0, 6 + 7 * 3, 0));
    assert_tiles_unit_square(&grid);
}

#[test]
fn hex_triangles_keep_boundary_quads() {
    let mut grid = unit_grid();
    grid.set_hex_triangles(
        SurfaceDirection::U,
        4,
        4,
        T,
        false,
        EdgeFilter::All,
        HexTriStrategy::Side,
    )
    .unwrap();
    assert_eq!(kinds(&grid.faces()), (7 * 4, 6, 0));
    assert_tiles_unit_square(&grid);

    grid.set_hex_triangles(
        SurfaceDirection::U,
        4,
        4,
        T,
        false,
        EdgeFilter::All,
        HexTriStrategy::Center,
    )
    .unwrap();
    assert_eq!(kinds(&grid.faces()), (7 * 6, 6, 0));
    assert_tiles_unit_square(&grid);
}

use super::{assert_tiles_unit_square, row_sizes, unit_grid};
use crate::geom::{PlaneSurface, Point3, Tolerance, Vec3};
use crate::tessellation::{
    Grid, GridOptions, IsoFace, SurfaceDirection, SurfaceKernel, TessellationError,
    TriangulationStyle,
};

const STYLES: [TriangulationStyle; 6] = [
    TriangulationStyle::Basic,
    TriangulationStyle::Wave,
    TriangulationStyle::Cross,
    TriangulationStyle::Ring,
    TriangulationStyle::Length,
    TriangulationStyle::Area,
];

#[test]
fn every_style_halves_each_basic_quad() {
    let mut grid = unit_grid();
    for style in STYLES {
        for flip in [false, true] {
            grid.set_triangles(SurfaceDirection::U, 3, 2, style, flip).unwrap();
            assert_eq!(grid.face_count(), 12, "{style:?}");
            assert!(grid.faces().iter().all(IsoFace::is_tri));
            assert_tiles_unit_square(&grid);
        }
    }
}

#[test]
fn wave_alternates_the_diagonal_per_row() {
    let mut quads = unit_grid();
    quads.set_basic_quads(SurfaceDirection::U, 2, 1).unwrap();
    let cells = quads.faces();

    let mut grid = unit_grid();
    grid.set_triangles(SurfaceDirection::U, 2, 1, TriangulationStyle::Wave, false)
        .unwrap();
    let tris = grid.faces();
    assert_eq!(tris[..2], cells[0].quad_to_tri(true).unwrap()[..]);
    assert_eq!(tris[2..], cells[1].quad_to_tri(false).unwrap()[..]);
}

#[test]
fn cross_alternates_like_a_checkerboard() {
    let mut quads = unit_grid();
    quads.set_basic_quads(SurfaceDirection::U, 2, 2).unwrap();
    let cells = quads.faces();

    let mut grid = unit_grid();
    grid.set_triangles(SurfaceDirection::U, 2, 2, TriangulationStyle::Cross, true)
        .unwrap();
    let tris = grid.faces();
    for (k, cell) in cells.iter().enumerate() {
        let (i, j) = (k / 2, k % 2);
        let expected = cell.quad_to_tri((i + j + 1) % 2 == 0).unwrap();
        assert_eq!(tris[k * 2..k * 2 + 2], expected[..]);
    }
}

#[test]
fn dense_triangles_fan_every_quad() {
    let mut grid = unit_grid();
    grid.set_dense_triangles(SurfaceDirection::V, 2, 3).unwrap();
    assert_eq!(grid.face_count(), 24);
    assert_eq!(row_sizes(&grid), vec![(0, 12), (1, 12)]);
    assert_tiles_unit_square(&grid);
}

#[test]
fn staggered_triangles_tile_each_row() {
    let mut grid = unit_grid();
    for direction in [SurfaceDirection::U, SurfaceDirection::V] {
        for flip in [false, true] {
            grid.set_staggered_triangles(direction, 2, 2, flip).unwrap();
            assert_eq!(row_sizes(&grid), vec![(0, 5), (1, 5)]);
            assert!(grid.faces().iter().all(IsoFace::is_tri));
            assert_tiles_unit_square(&grid);
        }
    }
    grid.set_staggered_triangles(SurfaceDirection::U, 1, 1, false)
        .unwrap();
    assert_eq!(grid.face_count(), 3);
    assert_tiles_unit_square(&grid);
}

#[test]
fn grid_tolerance_decides_collapsed_diagonals() {
    let plane = PlaneSurface::new(Point3::ORIGIN, Vec3::X, Vec3::Y);
    let options = GridOptions::new().with_tolerance(Tolerance::new(0.5));
    let mut coarse = Grid::with_options(SurfaceKernel::new(plane).unwrap(), options);

    for style in [TriangulationStyle::Length, TriangulationStyle::Area] {
        let err = coarse
            .set_triangles(SurfaceDirection::U, 4, 4, style, false)
            .unwrap_err();
        assert!(
            matches!(err, TessellationError::DegenerateGeometry { .. }),
            "{style:?}"
        );
        assert_eq!(coarse.face_count(), 0);
        coarse
            .set_triangles(SurfaceDirection::U, 1, 1, style, false)
            .unwrap();
        assert_eq!(coarse.face_count(), 2);
    }

    let mut fine = unit_grid();
    fine.set_triangles(SurfaceDirection::U, 4, 4, TriangulationStyle::Length, false)
        .unwrap();
    assert_eq!(fine.face_count(), 32);
}

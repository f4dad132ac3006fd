mod test_diamonds_basic;
mod test_hexagons_basic;
mod test_render_basic;
mod test_triangles_basic;

use crate::geom::{PlaneSurface, Point3, Tolerance, UvPoint, Vec3};
use crate::tessellation::{Grid, IsoFace, SurfaceKernel};

pub(super) type PlaneGrid = Grid<SurfaceKernel<PlaneSurface>>;

/// Grid over the unit square in the XY plane, so parameters equal coordinates.
pub(super) fn unit_grid() -> PlaneGrid {
    let plane = PlaneSurface::new(Point3::ORIGIN, Vec3::X, Vec3::Y);
    Grid::new(SurfaceKernel::new(plane).unwrap())
}

pub(super) fn total_area(faces: &[IsoFace]) -> f64 {
    faces.iter().map(IsoFace::parameter_area).sum()
}

pub(super) fn assert_tiles_unit_square(grid: &PlaneGrid) {
    let area = total_area(&grid.faces());
    assert!((area - 1.0).abs() < 1e-6, "cells cover {area}, expected 1");
}

pub(super) fn assert_corners(face: &IsoFace, expected: &[(f64, f64)]) {
    let corners = face.corners();
    assert_eq!(corners.len(), expected.len(), "{face:?}");
    for (got, &(u, v)) in corners.iter().zip(expected) {
        assert!(
            Tolerance::LOOSE.approx_eq_uv(*got, UvPoint::new(u, v)),
            "{got:?} != ({u}, {v}) in {face:?}"
        );
    }
}

pub(super) fn row_sizes(grid: &PlaneGrid) -> Vec<(i32, usize)> {
    grid.rows().map(|(key, row)| (key, row.len())).collect()
}

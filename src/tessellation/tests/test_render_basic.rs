use super::unit_grid;
use crate::geom::{Curve3, Surface, Tolerance};
use crate::tessellation::{
    EdgeFilter, KernelPatch, RenderMode, RenderOptions, RenderOutput, SurfaceDirection,
    TessellationError,
};

#[test]
fn uv_render_reproduces_cell_coordinates_exactly() {
    let mut grid = unit_grid();
    grid.set_cairo_quads(SurfaceDirection::U, 2, 2, 0.3, false)
        .unwrap();
    let faces = grid.faces();
    let polylines = grid.render_to_uv();
    assert_eq!(polylines.len(), faces.len());
    for (face, polyline) in faces.iter().zip(polylines) {
        let polyline = polyline.unwrap();
        assert!(!polyline.is_closed());
        let points = polyline.points();
        assert_eq!(points.len(), face.len());
        for (p, uv) in points.iter().zip(face.corners()) {
            assert_eq!((p.x, p.y, p.z), (uv.u, uv.v, 0.0));
        }
    }
}

#[test]
fn polygon_boundaries_close_on_the_first_corner() {
    let mut grid = unit_grid();
    grid.set_basic_quads(SurfaceDirection::U, 2, 2).unwrap();
    for curve in grid.render_to_polygon_boundaries() {
        let curve = curve.unwrap();
        assert!(curve.is_closed());
        assert!((curve.length() - 2.0).abs() < 1e-9);
    }
}

#[test]
fn facets_fail_per_cell_on_hexagons() {
    let mut grid = unit_grid();
    grid.set_hexagons(SurfaceDirection::U, 4, 4, 1.0 / 3.0, false, EdgeFilter::All)
        .unwrap();
    let facets = grid.render_to_facets();
    assert_eq!(facets.len(), grid.face_count());
    let failures = facets
        .iter()
        .filter(|entry| matches!(entry, Err(TessellationError::InvalidArity { .. })))
        .count();
    assert_eq!(failures, 7);
}

#[test]
fn iso_surfaces_cover_each_quad_rectangle() {
    let mut grid = unit_grid();
    for direction in [SurfaceDirection::U, SurfaceDirection::V] {
        grid.set_basic_quads(direction, 2, 2).unwrap();
        let faces = grid.faces();
        for (face, patch) in faces.iter().zip(grid.render_to_iso_surfaces()) {
            let patch = patch.unwrap();
            assert!(matches!(patch, KernelPatch::Trimmed(_)));
            let (u0, u1) = patch.domain_u();
            let (v0, v1) = patch.domain_v();
            let tol = Tolerance::LOOSE;
            let c = face.corners();
            let (lo, hi) = (c[0], c[2]);
            assert!(tol.approx_eq_f64(u0.min(u1), lo.u.min(hi.u)));
            assert!(tol.approx_eq_f64(v0.max(v1), lo.v.max(hi.v)));
        }
    }
}

#[test]
fn iso_boundaries_are_closed_rectangles() {
    let mut grid = unit_grid();
    grid.set_basic_quads(SurfaceDirection::V, 2, 2).unwrap();
    for curve in grid.render_to_iso_boundaries() {
        let curve = curve.unwrap();
        assert!(curve.is_closed());
        assert!((curve.length() - 2.0).abs() < 1e-6);
    }
}

#[test]
fn lofted_surfaces_span_the_quad() {
    let mut grid = unit_grid();
    grid.set_basic_quads(SurfaceDirection::U, 2, 2).unwrap();
    let faces = grid.faces();
    for (face, patch) in faces.iter().zip(grid.render_to_lofted_surfaces()) {
        let patch = patch.unwrap();
        assert!(matches!(patch, KernelPatch::Lofted(_)));
        let centre = face.centroid();
        let (u0, u1) = patch.domain_u();
        let (v0, v1) = patch.domain_v();
        let mid = patch.point_at((u0 + u1) * 0.5, (v0 + v1) * 0.5);
        assert!((mid.x - centre.u).abs() < 1e-6);
        assert!((mid.y - centre.v).abs() < 1e-6);
    }
}

#[test]
fn interpolated_and_geodesic_boundaries_join_into_loops() {
    let mut grid = unit_grid();
    grid.set_triangles(
        SurfaceDirection::U,
        2,
        1,
        crate::tessellation::TriangulationStyle::Basic,
        false,
    )
    .unwrap();
    let options = RenderOptions::default();
    for mode in [RenderMode::Interpolated, RenderMode::Geodesic] {
        for entry in grid.render(mode, &options) {
            match entry.unwrap() {
                RenderOutput::Curve(curve) => assert!(curve.is_closed()),
                _ => panic!("{} should produce curves", mode.name()),
            }
        }
    }
}

#[test]
fn render_dispatch_keeps_one_entry_per_cell() {
    let mut grid = unit_grid();
    grid.set_diamond_quads(SurfaceDirection::U, 3, 3, false, EdgeFilter::All)
        .unwrap();
    let options = RenderOptions::default();
    for mode in RenderMode::ALL {
        let out = grid.render(mode, &options);
        assert_eq!(out.len(), grid.face_count(), "{}", mode.name());
        if mode == RenderMode::Facet {
            assert!(out.iter().all(Result::is_ok));
        }
    }
}

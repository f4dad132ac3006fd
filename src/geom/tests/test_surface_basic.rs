use std::sync::Arc;

use crate::geom::{
    CylinderSurface, FourPointSurface, NurbsSurface, PlaneSurface, Point3, RuledSurface,
    SphereSurface, Surface, Tolerance, UnitizedSurface, UvPoint, Vec3, Polyline3,
    isotrim_surface, refine_uv_polyline, sample_surface_grid,
};

fn bilinear_nurbs() -> NurbsSurface {
    NurbsSurface::new(
        1,
        1,
        2,
        2,
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
        ],
        vec![0.0, 0.0, 1.0, 1.0],
        vec![0.0, 0.0, 1.0, 1.0],
        None,
    )
    .unwrap()
}

#[test]
fn nurbs_surface_bilinear_patch_matches_expected_point() {
    let p = bilinear_nurbs().point_at(0.5, 0.5);
    let tol = Tolerance::new(1e-9);
    assert!(tol.approx_eq_point3(p, Point3::new(0.5, 0.5, 0.25)));
}

#[test]
fn nurbs_surface_rejects_bad_knots() {
    let result = NurbsSurface::new(
        1,
        1,
        2,
        2,
        vec![Point3::ORIGIN; 4],
        vec![0.0, 1.0, 0.0, 1.0],
        vec![0.0, 0.0, 1.0, 1.0],
        None,
    );
    assert!(result.is_err());
}

#[test]
fn clamped_uniform_knots_have_expected_shape() {
    let knots = NurbsSurface::clamped_uniform_knots(5, 3);
    assert_eq!(knots, vec![0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn unitized_surface_maps_domain_to_unit_square() {
    let mut nurbs = bilinear_nurbs();
    nurbs.knots_u = vec![2.0, 2.0, 6.0, 6.0];
    let unit = UnitizedSurface::new(nurbs.clone()).unwrap();
    assert_eq!(unit.domain_u(), (0.0, 1.0));
    let tol = Tolerance::new(1e-9);
    assert!(tol.approx_eq_point3(unit.point_at(0.5, 0.5), nurbs.point_at(4.0, 0.5)));
}

#[test]
fn unitized_surface_rejects_empty_domain() {
    let mut nurbs = bilinear_nurbs();
    nurbs.knots_v = vec![1.0, 1.0, 1.0, 1.0];
    assert!(UnitizedSurface::new(nurbs).is_err());
}

#[test]
fn shared_surfaces_evaluate_through_arc() {
    let sphere: Arc<dyn Surface> = Arc::new(SphereSurface::new(Point3::ORIGIN, 2.0).unwrap());
    let tol = Tolerance::new(1e-9);
    assert!(tol.approx_eq_point3(sphere.point_at(0.0, 1.0), Point3::new(0.0, 0.0, 2.0)));
    assert!(sphere.is_u_closed());
}

#[test]
fn cylinder_seam_is_closed() {
    let cyl = CylinderSurface::new(Point3::ORIGIN, Vec3::new(0.0, 0.0, 2.0), 1.0).unwrap();
    let tol = Tolerance::new(1e-9);
    assert!(tol.approx_eq_point3(cyl.point_at(0.0, 0.3), cyl.point_at(1.0, 0.3)));
}

#[test]
fn isotrim_keeps_parent_parameters_and_flips_reversed_ranges() {
    let plane = PlaneSurface::new(Point3::ORIGIN, Vec3::X, Vec3::Y);
    let (trimmed, diag) = isotrim_surface(&plane, (0.75, 0.25), (0.0, 0.5));
    assert!(diag.reverse_u);
    assert!(!diag.reverse_v);
    assert_eq!(trimmed.u_range(), (0.25, 0.75));
    assert_eq!(trimmed.point_at(0.25, 0.0), Point3::new(0.75, 0.0, 0.0));

    let (clamped, diag) = isotrim_surface(&plane, (-1.0, 0.5), (0.0, 1.0));
    assert!(diag.clamped_u);
    assert_eq!(clamped.u_range(), (0.0, 0.5));
}

#[test]
fn four_point_surface_from_corner_loop() {
    let a = Point3::new(0.0, 0.0, 0.0);
    let b = Point3::new(1.0, 0.0, 0.0);
    let c = Point3::new(1.0, 1.0, 0.0);
    let d = Point3::new(0.0, 1.0, 0.0);
    let quad = FourPointSurface::from_corner_loop(&[a, b, c, d]).unwrap();
    assert_eq!(quad.corner_loop(), [a, b, c, d]);
    assert_eq!(quad.point_at(1.0, 1.0), c);

    let tri = FourPointSurface::from_corner_loop(&[a, b, c]).unwrap();
    assert_eq!(tri.point_at(0.0, 1.0), a);
    assert!(FourPointSurface::from_corner_loop(&[a, b]).is_err());
}

#[test]
fn ruled_surface_blends_between_rails() {
    let rail_a = Polyline3::new(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)], false).unwrap();
    let rail_b = Polyline3::new(vec![Point3::new(0.0, 1.0, 1.0), Point3::new(2.0, 1.0, 1.0)], false).unwrap();
    let ruled = RuledSurface::new(rail_a, rail_b);
    let tol = Tolerance::new(1e-12);
    assert!(tol.approx_eq_point3(ruled.point_at(0.5, 0.5), Point3::new(1.0, 0.5, 0.5)));
}

#[test]
fn sample_surface_grid_counts() {
    let plane = PlaneSurface::new(Point3::ORIGIN, Vec3::X, Vec3::Y);
    let (vertices, faces) = sample_surface_grid(&plane, 4, 3);
    assert_eq!(vertices.len(), 20);
    assert_eq!(faces.len(), 12);
    assert_eq!(vertices[4], Point3::new(1.0, 0.0, 0.0));
    assert_eq!(faces[0], [0, 1, 6, 5]);
}

#[test]
fn refine_uv_polyline_leaves_planar_segments_alone() {
    let plane = PlaneSurface::new(Point3::ORIGIN, Vec3::X, Vec3::Y);
    let uv = [UvPoint::new(0.0, 0.0), UvPoint::new(1.0, 1.0)];
    assert_eq!(refine_uv_polyline(&plane, &uv, 1e-3, 10), uv.to_vec());
}

#[test]
fn refine_uv_polyline_subdivides_curved_segments() {
    let cyl = CylinderSurface::new(Point3::ORIGIN, Vec3::Z, 1.0).unwrap();
    let uv = [UvPoint::new(0.0, 0.0), UvPoint::new(0.5, 0.0)];
    let refined = refine_uv_polyline(&cyl, &uv, 0.01, 10);
    assert!(refined.len() > 8);
    assert_eq!(refined[0], uv[0]);
    assert_eq!(*refined.last().unwrap(), uv[1]);
    for pair in refined.windows(2) {
        let mid = pair[0].midpoint(pair[1]);
        let chord = cyl.point_at(pair[0].u, 0.0).lerp(cyl.point_at(pair[1].u, 0.0), 0.5);
        assert!(cyl.point_at(mid.u, mid.v).distance_to(chord) <= 0.01);
    }
}

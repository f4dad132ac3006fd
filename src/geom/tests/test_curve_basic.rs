use crate::geom::{
    Curve3, Line3, PlaneSurface, Point3, Polyline3, SurfaceIsoCurve, Tolerance, Vec3,
    curve_arc_length, curve_parameters_by_count, extract_subcurve, tessellate_curve_uniform,
};

#[test]
fn tessellate_curve_preserves_endpoints() {
    let line = Line3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0));
    let pts = tessellate_curve_uniform(&line, 10);
    assert_eq!(pts.first().copied(), Some(line.start));
    assert_eq!(pts.last().copied(), Some(line.end));
    assert_eq!(pts.len(), 11);
}

#[test]
fn polyline_is_arc_length_parametrized() {
    let polyline = Polyline3::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
        ],
        false,
    )
    .unwrap();
    let tol = Tolerance::new(1e-12);
    assert!(tol.approx_eq_f64(polyline.length(), 4.0));
    assert!(tol.approx_eq_point3(polyline.point_at(0.25), Point3::new(1.0, 0.0, 0.0)));
    assert!(tol.approx_eq_point3(polyline.point_at(0.5), Point3::new(1.0, 1.0, 0.0)));
    assert_eq!(polyline.point_at(1.0), Point3::new(1.0, 3.0, 0.0));
}

#[test]
fn closed_polyline_drops_duplicate_endpoint() {
    let square = Polyline3::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ],
        true,
    )
    .unwrap();
    assert_eq!(square.points().len(), 3);
    assert_eq!(square.segment_count(), 3);
    assert_eq!(square.loop_points().len(), 4);
    assert_eq!(square.end(), square.start());
}

#[test]
fn polyline_rejects_single_point() {
    assert!(Polyline3::new(vec![Point3::ORIGIN], false).is_err());
}

#[test]
fn divide_by_count_keeps_polyline_corners() {
    let polyline = Polyline3::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(3.0, 1.0, 0.0),
        ],
        false,
    )
    .unwrap();
    assert_eq!(polyline.breakpoints(), vec![0.75]);

    let params = curve_parameters_by_count(&polyline, 4);
    let tol = Tolerance::new(1e-9);
    for (got, want) in params.iter().zip([0.0, 0.25, 0.5, 0.75, 1.0]) {
        assert!(tol.approx_eq_f64(*got, want), "{params:?}");
    }
    assert!(tol.approx_eq_point3(polyline.point_at(params[3]), Point3::new(3.0, 0.0, 0.0)));
}

#[test]
fn closed_polyline_breakpoints_include_the_last_vertex() {
    let square = Polyline3::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        true,
    )
    .unwrap();
    assert_eq!(square.breakpoints(), vec![0.25, 0.5, 0.75]);
}

#[test]
fn divide_by_count_has_exact_endpoints_and_equal_lengths() {
    let polyline = Polyline3::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
        ],
        false,
    )
    .unwrap();

    let params = curve_parameters_by_count(&polyline, 4);
    assert_eq!(params.len(), 5);
    assert_eq!(params[0], 0.0);
    assert_eq!(params[4], 1.0);

    let tol = Tolerance::new(1e-6);
    let points: Vec<Point3> = params.iter().map(|&t| polyline.point_at(t)).collect();
    for pair in points.windows(2) {
        assert!(tol.approx_eq_f64(pair[0].distance_to(pair[1]), 1.0));
    }
}

#[test]
fn divide_iso_curve_of_stretched_plane_follows_arc_length() {
    let plane = PlaneSurface::new(Point3::ORIGIN, Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
    let iso = SurfaceIsoCurve::new(&plane, true, 0.5);
    let params = curve_parameters_by_count(&iso, 3);
    let tol = Tolerance::new(1e-6);
    assert!(tol.approx_eq_f64(params[1], 1.0 / 3.0));
    assert!(tol.approx_eq_f64(params[2], 2.0 / 3.0));
    assert!(tol.approx_eq_f64(curve_arc_length(&iso, 8), 3.0));
}

#[test]
fn extract_subcurve_normalizes_reversed_range() {
    let line = Line3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 0.0));
    let sub = extract_subcurve(&line, 0.75, 0.25, 4);
    assert_eq!(sub.start_param, 0.25);
    assert_eq!(sub.end_param, 0.75);
    assert_eq!(sub.points.len(), 5);
    assert_eq!(sub.points[0], Point3::new(1.0, 0.0, 0.0));
    assert_eq!(sub.points[4], Point3::new(3.0, 0.0, 0.0));
}

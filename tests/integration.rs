use isogrid::Engine;
use isogrid::geom::{CylinderSurface, Curve3, PlaneSurface, Point3, UvPoint, Vec3};
use isogrid::scene::{SceneGeometry, SceneSpec, SurfaceSpec};
use isogrid::tessellation::{
    FaceMap, Grid, IsoFace, PATTERN_NAMES, Pattern, RenderMode, RenderOptions, RenderOutput,
    SurfaceDirection, SurfaceKernel,
};

fn plane_grid() -> Grid<SurfaceKernel<PlaneSurface>> {
    let plane = PlaneSurface::new(
        Point3::new(0.0, 0.0, 0.0),
        Vec3::new(3.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
    );
    Grid::new(SurfaceKernel::new(plane).expect("plane kernel"))
}

#[test]
fn engine_initializes() {
    let engine = Engine::new();
    assert!(engine.is_initialized());
}

#[test]
fn every_named_pattern_tiles_the_parameter_square() {
    let mut grid = plane_grid();
    for name in PATTERN_NAMES {
        let pattern = Pattern::from_name(name).expect("known pattern");
        assert_eq!(pattern.name(), name);
        grid.apply(&pattern).expect(name);
        assert!(grid.face_count() > 0, "{name}");
        assert!(grid.face_count() <= pattern.estimated_cells(), "{name}");
        let area: f64 = grid.faces().iter().map(IsoFace::parameter_area).sum();
        assert!((area - 1.0).abs() < 1e-6, "{name}: area {area}");
        for face in grid.faces() {
            for uv in face.corners() {
                assert!((-1e-12..=1.0 + 1e-12).contains(&uv.u), "{name}");
                assert!((-1e-12..=1.0 + 1e-12).contains(&uv.v), "{name}");
            }
        }
    }
}

#[test]
fn cylinder_hexagons_close_on_the_surface() {
    let cylinder = CylinderSurface::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0), 1.5)
        .expect("cylinder");
    let mut grid = Grid::new(SurfaceKernel::new(cylinder).expect("cylinder kernel"));
    grid.apply(&Pattern::from_name("hexagons").expect("hexagons"))
        .expect("apply");

    let options = RenderOptions::default();
    for mode in [RenderMode::Polygon, RenderMode::Interpolated] {
        let rendered = grid.render(mode, &options);
        assert_eq!(rendered.len(), grid.face_count());
        for entry in rendered {
            match entry.expect("rendered cell") {
                RenderOutput::Curve(curve) => {
                    assert!(curve.is_closed());
                    for p in curve.points() {
                        assert!((p.x.hypot(p.y) - 1.5).abs() < 1e-9);
                    }
                }
                _ => panic!("{} should produce curves", mode.name()),
            }
        }
    }
}

#[test]
fn grid_clones_are_independent() {
    let mut grid = plane_grid();
    grid.set_basic_quads(SurfaceDirection::U, 2, 2).expect("quads");
    let copy = grid.clone();
    grid.set_dense_triangles(SurfaceDirection::V, 3, 3).expect("dense");
    assert_eq!(copy.face_count(), 4);
    assert_eq!(grid.face_count(), 36);
    assert_eq!(copy.direction(), SurfaceDirection::U);
}

#[test]
fn caller_assembled_cells_render_like_built_ones() {
    let mut grid = plane_grid();
    let mut faces = FaceMap::new();
    faces.insert(
        3,
        vec![IsoFace::tri(
            UvPoint::new(0.0, 0.0),
            UvPoint::new(1.0, 0.0),
            UvPoint::new(0.0, 1.0),
        )],
    );
    grid.replace_faces(faces, SurfaceDirection::V);
    assert_eq!(grid.direction(), SurfaceDirection::V);

    let corners = grid.evaluate();
    assert_eq!(corners.len(), 1);
    assert_eq!(corners[0][1].to_array(), [3.0, 0.0, 0.0]);
    assert_eq!(corners[0][2].to_array(), [0.0, 2.0, 0.0]);

    let rendered = grid.render_to_facets();
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].is_ok());
}

#[test]
fn engine_runs_a_sphere_scene_end_to_end() {
    let mut engine = Engine::new();
    let scene = SceneSpec::new(
        SurfaceSpec::Sphere {
            center: [0.0, 0.0, 0.0],
            radius: 1.0,
        },
        Pattern::from_name("diamond_triangles").expect("diamond triangles"),
    )
    .with_render(RenderMode::Interpolated);
    engine.load_scene_spec(scene);
    engine.evaluate_scene().expect("evaluate");

    let cells = engine.cells().expect("cells");
    let output = engine.output().expect("output");
    assert_eq!(cells.len(), output.geometry.len());
    assert!(cells.iter().all(|cell| cell.kind == "tri"));
    for entry in &output.geometry {
        if let SceneGeometry::Polyline { points, closed } = entry {
            assert!(*closed);
            for p in points {
                let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
                assert!((r - 1.0).abs() < 1e-9);
            }
        }
    }

    engine
        .set_pattern_spec(Pattern::from_name("cairo_quads").expect("cairo"))
        .expect("set pattern");
    engine.set_render_mode_by_name("uv").expect("render mode");
    engine.evaluate_scene().expect("evaluate");
    let output = engine.output().expect("output");
    assert_eq!(output.failures, 0);
    assert_eq!(output.geometry.len(), 4 * 4 * 4);
}

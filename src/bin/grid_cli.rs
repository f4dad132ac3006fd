#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("grid_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use isogrid::scene::{SceneGeometry, SceneOutput, SceneSpec, SurfaceSpec};
    use isogrid::tessellation::{
        EdgeFilter, HexTriStrategy, Layout, Pattern, RandomDomain, RenderMode, SurfaceDirection,
        TriangulationStyle,
    };
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"grid_cli (isogrid)

USAGE:
  grid_cli list
  grid_cli run <scenario|all> [options]

SCENARIOS:
  plane_basic_quads
  plane_hexagons
  plane_random_sub_quads
  cylinder_diamond_quads
  cylinder_staggered_triangles
  sphere_cairo_quads
  saddle_hex_triangles
  saddle_facets

OPTIONS (run):
  --out-dir <dir>    Write <scenario>.obj and/or <scenario>.snap to this dir (required for `all`)
  --obj <path>       Write OBJ (single scenario only)
  --snap <path>      Write snapshot (single scenario only)
  --render <mode>    Override the scenario's render mode
  --no-obj           Skip OBJ when using --out-dir
  --no-snap          Skip snapshot when using --out-dir
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut render: Option<RenderMode> = None;
        let mut overwrite = false;
        let mut write_obj = true;
        let mut write_snap = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--render" => {
                    let name = args.value("--render")?;
                    render = Some(
                        RenderMode::from_name(&name)
                            .ok_or_else(|| format!("unknown render mode `{name}`"))?,
                    );
                }
                "--overwrite" => overwrite = true,
                "--no-obj" => write_obj = false,
                "--no-snap" => write_snap = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if obj_path.is_some() || snap_path.is_some() {
                return Err("use either --out-dir or --obj/--snap (not both)".to_string());
            }
            if !write_obj && !write_snap {
                return Err("nothing to write (both --no-obj and --no-snap set)".to_string());
            }

            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    let output = run_scenario(*scenario, render)?;
                    write_output_to_dir(&output, dir, write_obj, write_snap, overwrite)?;
                }
                return Ok(());
            }

            let scenario = Scenario::from_str(scenario_name.as_str())
                .ok_or_else(|| unknown_scenario(&scenario_name))?;
            let output = run_scenario(scenario, render)?;
            return write_output_to_dir(&output, dir, write_obj, write_snap, overwrite);
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario = Scenario::from_str(scenario_name.as_str())
            .ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario, render)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &output.scene, output.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        print_summary(&output);
        Ok(())
    }

    fn write_output_to_dir(
        output: &ScenarioOutput,
        dir: &Path,
        write_obj: bool,
        write_snap: bool,
        overwrite: bool,
    ) -> Result<(), String> {
        if write_snap {
            let path = dir.join(format!("{}.snap", output.name));
            write_text_file(&path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        if write_obj {
            let path = dir.join(format!("{}.obj", output.name));
            write_obj_file(&path, &output.scene, output.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        print_summary(output);
        Ok(())
    }

    fn print_summary(output: &ScenarioOutput) {
        eprintln!(
            "{}: cells={} render={} failures={}",
            output.name,
            output.scene.cells.len(),
            output.scene.render.name(),
            output.scene.failures
        );
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = String::new();
        let _ = writeln!(msg, "unknown scenario `{name}`\n\navailable scenarios:");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        check_target(path, overwrite)?;
        fs::write(path, normalize_snapshot_text(text))
            .map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn check_target(path: &Path, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        Ok(())
    }

    /// Curves become `l` elements, sampled patches `f` quads. Failed cells are
    /// listed as comments so element order still follows the cells.
    fn write_obj_file(
        path: &Path,
        scene: &SceneOutput,
        name: &str,
        overwrite: bool,
    ) -> Result<(), String> {
        check_target(path, overwrite)?;

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);
        let err = |e: std::io::Error| format!("write obj: {e}");

        writeln!(w, "# isogrid grid_cli").map_err(err)?;
        writeln!(w, "o {name}").map_err(err)?;

        let mut base = 1usize;
        for (index, entry) in scene.geometry.iter().enumerate() {
            match entry {
                SceneGeometry::Polyline { points, closed } => {
                    for p in points {
                        writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(err)?;
                    }
                    let mut line = String::from("l");
                    for k in 0..points.len() {
                        let _ = write!(line, " {}", base + k);
                    }
                    if *closed && !points.is_empty() {
                        let _ = write!(line, " {base}");
                    }
                    writeln!(w, "{line}").map_err(err)?;
                    base += points.len();
                }
                SceneGeometry::Mesh {
                    vertices, faces, ..
                } => {
                    for p in vertices {
                        writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(err)?;
                    }
                    for face in faces {
                        let [a, b, c, d] = face.map(|i| base + i as usize);
                        writeln!(w, "f {a} {b} {c} {d}").map_err(err)?;
                    }
                    base += vertices.len();
                }
                SceneGeometry::Failed { message } => {
                    writeln!(w, "# cell {index} failed: {message}").map_err(err)?;
                }
            }
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let value = if value == -0.0 { 0.0 } else { value };
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == -0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_values_line(out: &mut String, prefix: &str, values: &[f64]) {
        out.push_str(prefix);
        for value in values {
            out.push(' ');
            write_f64(out, *value);
        }
        out.push('\n');
    }

    fn write_cells(out: &mut String, scene: &SceneOutput, corners: &[Vec<[f64; 3]>]) {
        let _ = writeln!(out, "cells {}", scene.cells.len());
        for (index, cell) in scene.cells.iter().enumerate() {
            let _ = writeln!(out, "cell {index} row {} {}", cell.row, cell.kind);
            for uv in &cell.uv {
                write_values_line(out, "uv", uv);
            }
            for p in corners.get(index).into_iter().flatten() {
                write_values_line(out, "p", p);
            }
        }
    }

    fn write_geometry(out: &mut String, scene: &SceneOutput) {
        let _ = writeln!(out, "render {}", scene.render.name());
        let _ = writeln!(out, "failures {}", scene.failures);
        for (index, entry) in scene.geometry.iter().enumerate() {
            match entry {
                SceneGeometry::Polyline { points, closed } => {
                    let _ = writeln!(
                        out,
                        "geometry {index} polyline points={} closed={closed}",
                        points.len()
                    );
                }
                SceneGeometry::Mesh {
                    kind,
                    vertices,
                    faces,
                } => {
                    let _ = writeln!(
                        out,
                        "geometry {index} mesh kind={kind} vertices={} faces={}",
                        vertices.len(),
                        faces.len()
                    );
                }
                SceneGeometry::Failed { message } => {
                    let _ = writeln!(out, "geometry {index} failed {message}");
                }
            }
        }
    }

    fn snapshot(spec: &SceneSpec, sections: impl FnOnce(&mut String)) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# isogrid snapshot v1");
        let _ = writeln!(out, "surface {}", spec.surface.name());
        let _ = writeln!(out, "pattern {}", spec.pattern.name());
        let layout = spec.pattern.layout();
        let _ = writeln!(
            out,
            "layout {} {} {}",
            layout.direction.name(),
            layout.count_u,
            layout.count_v
        );
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        sections(&mut out);
        normalize_snapshot_text(&out)
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        PlaneBasicQuads,
        PlaneHexagons,
        PlaneRandomSubQuads,
        CylinderDiamondQuads,
        CylinderStaggeredTriangles,
        SphereCairoQuads,
        SaddleHexTriangles,
        SaddleFacets,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::PlaneBasicQuads,
            Scenario::PlaneHexagons,
            Scenario::PlaneRandomSubQuads,
            Scenario::CylinderDiamondQuads,
            Scenario::CylinderStaggeredTriangles,
            Scenario::SphereCairoQuads,
            Scenario::SaddleHexTriangles,
            Scenario::SaddleFacets,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::PlaneBasicQuads => "plane_basic_quads",
                Scenario::PlaneHexagons => "plane_hexagons",
                Scenario::PlaneRandomSubQuads => "plane_random_sub_quads",
                Scenario::CylinderDiamondQuads => "cylinder_diamond_quads",
                Scenario::CylinderStaggeredTriangles => "cylinder_staggered_triangles",
                Scenario::SphereCairoQuads => "sphere_cairo_quads",
                Scenario::SaddleHexTriangles => "saddle_hex_triangles",
                Scenario::SaddleFacets => "saddle_facets",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            Scenario::ALL
                .iter()
                .copied()
                .find(|scenario| scenario.name() == name)
        }

        fn spec(self) -> SceneSpec {
            let plane = SurfaceSpec::Plane {
                origin: [0.0, 0.0, 0.0],
                x_axis: [4.0, 0.0, 0.0],
                y_axis: [0.0, 3.0, 0.0],
            };
            let cylinder = SurfaceSpec::Cylinder {
                base: [0.0, 0.0, 0.0],
                axis: [0.0, 0.0, 3.0],
                radius: 1.0,
            };
            let u = |count_u, count_v| Layout::new(SurfaceDirection::U, count_u, count_v);
            let v = |count_u, count_v| Layout::new(SurfaceDirection::V, count_u, count_v);

            match self {
                Scenario::PlaneBasicQuads => SceneSpec::new(
                    plane,
                    Pattern::BasicQuads { layout: u(4, 3) },
                ),
                Scenario::PlaneHexagons => SceneSpec::new(
                    plane,
                    Pattern::Hexagons {
                        layout: u(4, 4),
                        t: 1.0 / 3.0,
                        flip: false,
                        filter: EdgeFilter::All,
                    },
                ),
                Scenario::PlaneRandomSubQuads => SceneSpec::new(
                    plane,
                    Pattern::RandomSubQuads {
                        layout: u(3, 4),
                        seed: 7,
                        domain: RandomDomain::default(),
                        increment: 3,
                    },
                ),
                Scenario::CylinderDiamondQuads => SceneSpec::new(
                    cylinder,
                    Pattern::DiamondQuads {
                        layout: u(8, 4),
                        flip: false,
                        filter: EdgeFilter::All,
                    },
                )
                .with_render(RenderMode::Interpolated),
                Scenario::CylinderStaggeredTriangles => SceneSpec::new(
                    cylinder,
                    Pattern::StaggeredTriangles {
                        layout: v(4, 8),
                        flip: true,
                    },
                ),
                Scenario::SphereCairoQuads => SceneSpec::new(
                    SurfaceSpec::Sphere {
                        center: [0.0, 0.0, 0.0],
                        radius: 2.0,
                    },
                    Pattern::CairoQuads {
                        layout: u(6, 4),
                        t: 0.5,
                        flip: false,
                    },
                ),
                Scenario::SaddleHexTriangles => SceneSpec::new(
                    saddle(),
                    Pattern::HexTriangles {
                        layout: u(4, 4),
                        t: 1.0 / 3.0,
                        flip: true,
                        filter: EdgeFilter::All,
                        strategy: HexTriStrategy::Center,
                    },
                )
                .with_render(RenderMode::Geodesic),
                Scenario::SaddleFacets => SceneSpec::new(
                    saddle(),
                    Pattern::Triangles {
                        layout: u(3, 3),
                        style: TriangulationStyle::Cross,
                        flip: false,
                    },
                )
                .with_render(RenderMode::Facet),
            }
        }
    }

    /// Degree 2 x 2 NURBS net with raised and lowered corners.
    fn saddle() -> SurfaceSpec {
        let mut points = Vec::with_capacity(9);
        for j in 0..3 {
            for i in 0..3 {
                let (x, y) = (f64::from(i), f64::from(j));
                let z = (x - 1.0) * (y - 1.0);
                points.push([x, y, z]);
            }
        }
        SurfaceSpec::Nurbs {
            degree_u: 2,
            degree_v: 2,
            u_count: 3,
            v_count: 3,
            points,
            knots_u: vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            knots_v: vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            weights: None,
        }
    }

    struct ScenarioOutput {
        name: &'static str,
        scene: SceneOutput,
        snapshot: String,
    }

    fn run_scenario(
        scenario: Scenario,
        render: Option<RenderMode>,
    ) -> Result<ScenarioOutput, String> {
        let mut spec = scenario.spec();
        if let Some(render) = render {
            spec = spec.with_render(render);
        }

        let grid = spec.build().map_err(|e| e.to_string())?;
        let scene = spec.render(&grid);
        let corners: Vec<Vec<[f64; 3]>> = grid
            .evaluate()
            .into_iter()
            .map(|cell| cell.into_iter().map(|p| p.to_array()).collect())
            .collect();

        let snap = snapshot(&spec, |out| {
            write_cells(out, &scene, &corners);
            write_geometry(out, &scene);
        });

        Ok(ScenarioOutput {
            name: scenario.name(),
            scene,
            snapshot: snap,
        })
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}

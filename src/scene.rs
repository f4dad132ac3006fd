//! Serializable scene descriptions: a surface, a pattern and a render mode.
//!
//! A [`SceneSpec`] is what the wasm [`Engine`](crate::Engine) receives from
//! JavaScript and what the native CLI builds its scenarios from. Rendering a
//! built grid yields a [`SceneOutput`], which keeps one geometry entry per
//! cell in read-out order, failed cells included.

use serde::{Deserialize, Serialize};

use crate::geom::{
    Curve3, CylinderSurface, NurbsSurface, PlaneSurface, Point3, Polyline3, SphereSurface,
    Surface, Vec3,
};
use crate::tessellation::{
    Grid, GridOptions, KernelOptions, KernelPatch, Pattern, RenderMode, RenderOptions,
    RenderOutput, SurfaceKernel, TessellationError,
};

pub type SceneKernel = SurfaceKernel<Box<dyn Surface>>;
pub type SceneGrid = Grid<SceneKernel>;

const fn unit_x() -> [f64; 3] {
    [1.0, 0.0, 0.0]
}

const fn unit_y() -> [f64; 3] {
    [0.0, 1.0, 0.0]
}

const fn unit_z() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

const fn unit_radius() -> f64 {
    1.0
}

/// The surface a scene is tessellated on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceSpec {
    Plane {
        #[serde(default)]
        origin: [f64; 3],
        #[serde(default = "unit_x")]
        x_axis: [f64; 3],
        #[serde(default = "unit_y")]
        y_axis: [f64; 3],
    },
    Cylinder {
        #[serde(default)]
        base: [f64; 3],
        #[serde(default = "unit_z")]
        axis: [f64; 3],
        #[serde(default = "unit_radius")]
        radius: f64,
    },
    Sphere {
        #[serde(default)]
        center: [f64; 3],
        #[serde(default = "unit_radius")]
        radius: f64,
    },
    /// Control points row-major with `u` varying fastest.
    Nurbs {
        degree_u: usize,
        degree_v: usize,
        u_count: usize,
        v_count: usize,
        points: Vec<[f64; 3]>,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        #[serde(default)]
        weights: Option<Vec<f64>>,
    },
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self::Plane {
            origin: [0.0; 3],
            x_axis: unit_x(),
            y_axis: unit_y(),
        }
    }
}

impl SurfaceSpec {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Plane { .. } => "plane",
            Self::Cylinder { .. } => "cylinder",
            Self::Sphere { .. } => "sphere",
            Self::Nurbs { .. } => "nurbs",
        }
    }

    /// Builds the kernel surface; invalid parameters surface as
    /// [`TessellationError::Kernel`].
    pub fn to_surface(&self) -> Result<Box<dyn Surface>, TessellationError> {
        let surface: Box<dyn Surface> = match self {
            Self::Plane {
                origin,
                x_axis,
                y_axis,
            } => {
                let x_axis = Vec3::from_array(*x_axis);
                let y_axis = Vec3::from_array(*y_axis);
                if x_axis.cross(y_axis).normalized().is_none() {
                    return Err(TessellationError::Kernel(
                        "plane axes must be non-zero and not parallel".to_string(),
                    ));
                }
                Box::new(PlaneSurface::new(Point3::from_array(*origin), x_axis, y_axis))
            }
            Self::Cylinder { base, axis, radius } => Box::new(
                CylinderSurface::new(Point3::from_array(*base), Vec3::from_array(*axis), *radius)
                    .map_err(TessellationError::Kernel)?,
            ),
            Self::Sphere { center, radius } => Box::new(
                SphereSurface::new(Point3::from_array(*center), *radius)
                    .map_err(TessellationError::Kernel)?,
            ),
            Self::Nurbs {
                degree_u,
                degree_v,
                u_count,
                v_count,
                points,
                knots_u,
                knots_v,
                weights,
            } => Box::new(
                NurbsSurface::new(
                    *degree_u,
                    *degree_v,
                    *u_count,
                    *v_count,
                    points.iter().copied().map(Point3::from_array).collect(),
                    knots_u.clone(),
                    knots_v.clone(),
                    weights.clone(),
                )
                .map_err(TessellationError::Kernel)?,
            ),
        };
        Ok(surface)
    }
}

/// Everything tunable about a scene besides the pattern itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    pub grid: GridOptions,
    pub kernel: KernelOptions,
    pub render: RenderOptions,
    /// Quads per side when a surface patch is sampled into a mesh.
    pub mesh_steps: usize,
}

impl SceneOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            grid: GridOptions::new(),
            kernel: KernelOptions::new(),
            render: RenderOptions::new(),
            mesh_steps: 4,
        }
    }
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSpec {
    #[serde(default)]
    pub surface: SurfaceSpec,
    pub pattern: Pattern,
    #[serde(default)]
    pub render: RenderMode,
    #[serde(default)]
    pub options: SceneOptions,
}

impl SceneSpec {
    #[must_use]
    pub fn new(surface: SurfaceSpec, pattern: Pattern) -> Self {
        Self {
            surface,
            pattern,
            render: RenderMode::default(),
            options: SceneOptions::default(),
        }
    }

    #[must_use]
    pub const fn with_render(mut self, render: RenderMode) -> Self {
        self.render = render;
        self
    }

    #[must_use]
    pub const fn with_options(mut self, options: SceneOptions) -> Self {
        self.options = options;
        self
    }

    /// Unitizes the surface and applies the pattern.
    pub fn build(&self) -> Result<SceneGrid, TessellationError> {
        let surface = self.surface.to_surface()?;
        let kernel = SurfaceKernel::with_options(surface, self.options.kernel)?;
        let mut grid = Grid::with_options(kernel, self.options.grid);
        grid.apply(&self.pattern)?;
        log::debug!(
            "scene: {} on {} gave {} cells",
            self.pattern.name(),
            self.surface.name(),
            grid.face_count()
        );
        Ok(grid)
    }

    /// Renders a grid built from this scene with the scene's mode and options.
    #[must_use]
    pub fn render<S: Surface>(&self, grid: &Grid<SurfaceKernel<S>>) -> SceneOutput {
        SceneOutput::collect(grid, self.render, &self.options)
    }
}

// ───── output ─────

/// One cell in parameter space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneCell {
    pub row: i32,
    pub kind: &'static str,
    pub uv: Vec<[f64; 2]>,
}

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneGeometry {
    Polyline {
        points: Vec<[f64; 3]>,
        closed: bool,
    },
    Mesh {
        kind: &'static str,
        vertices: Vec<[f64; 3]>,
        faces: Vec<[u32; 4]>,
    },
    Failed {
        message: String,
    },
}

impl SceneGeometry {
    fn polyline(polyline: &Polyline3) -> Self {
        Self::Polyline {
            points: polyline.points().iter().map(|p| p.to_array()).collect(),
            closed: polyline.is_closed(),
        }
    }

    fn mesh<S: Surface>(patch: &KernelPatch<S>, steps: usize) -> Self {
        let (vertices, faces) = patch.mesh(steps, steps);
        Self::Mesh {
            kind: patch.kind(),
            vertices: vertices.into_iter().map(Point3::to_array).collect(),
            faces,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Cells plus their rendered geometry, aligned by index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneOutput {
    pub render: RenderMode,
    pub cells: Vec<SceneCell>,
    pub geometry: Vec<SceneGeometry>,
    pub failures: usize,
}

impl SceneOutput {
    #[must_use]
    pub fn cells<S: Surface>(grid: &Grid<SurfaceKernel<S>>) -> Vec<SceneCell> {
        grid.rows()
            .flat_map(|(row, faces)| {
                faces.iter().map(move |face| SceneCell {
                    row,
                    kind: face.kind_name(),
                    uv: face.corners().iter().map(|p| [p.u, p.v]).collect(),
                })
            })
            .collect()
    }

    #[must_use]
    pub fn collect<S: Surface>(
        grid: &Grid<SurfaceKernel<S>>,
        mode: RenderMode,
        options: &SceneOptions,
    ) -> Self {
        let geometry: Vec<SceneGeometry> = grid
            .render(mode, &options.render)
            .into_iter()
            .map(|entry| match entry {
                Ok(RenderOutput::Uv(polyline) | RenderOutput::Curve(polyline)) => {
                    SceneGeometry::polyline(&polyline)
                }
                Ok(RenderOutput::Patch(patch)) => SceneGeometry::mesh(&patch, options.mesh_steps),
                Err(err) => SceneGeometry::Failed {
                    message: err.to_string(),
                },
            })
            .collect();
        let failures = geometry.iter().filter(|entry| entry.is_failed()).count();
        Self {
            render: mode,
            cells: Self::cells(grid),
            geometry,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tessellation::{EdgeFilter, Layout, SurfaceDirection};

    fn hexagons() -> Pattern {
        Pattern::Hexagons {
            layout: Layout::new(SurfaceDirection::U, 4, 4),
            t: 1.0 / 3.0,
            flip: false,
            filter: EdgeFilter::All,
        }
    }

    #[test]
    fn plane_scene_renders_one_entry_per_cell() {
        let spec = SceneSpec::new(SurfaceSpec::default(), hexagons())
            .with_render(RenderMode::Polygon);
        let grid = spec.build().unwrap();
        let output = spec.render(&grid);
        assert_eq!(output.cells.len(), 13);
        assert_eq!(output.geometry.len(), 13);
        assert_eq!(output.failures, 0);
        assert!(output.geometry.iter().all(|entry| matches!(
            entry,
            SceneGeometry::Polyline { closed: true, .. }
        )));
        let hexes = output.cells.iter().filter(|cell| cell.kind == "hex").count();
        assert_eq!(hexes, 7);
    }

    #[test]
    fn facet_failures_keep_their_slot() {
        let spec = SceneSpec::new(SurfaceSpec::default(), hexagons())
            .with_render(RenderMode::Facet);
        let grid = spec.build().unwrap();
        let output = spec.render(&grid);
        assert_eq!(output.failures, 7);
        for (cell, entry) in output.cells.iter().zip(&output.geometry) {
            assert_eq!(cell.kind == "hex", entry.is_failed());
        }
    }

    #[test]
    fn iso_surfaces_sample_into_meshes() {
        let surface = SurfaceSpec::Cylinder {
            base: [0.0; 3],
            axis: [0.0, 0.0, 2.0],
            radius: 1.0,
        };
        let pattern = Pattern::from_name("basic_quads").unwrap();
        let mut options = SceneOptions::new();
        options.mesh_steps = 2;
        let spec = SceneSpec::new(surface, pattern)
            .with_render(RenderMode::IsoSurface)
            .with_options(options);
        let output = spec.render(&spec.build().unwrap());
        assert_eq!(output.geometry.len(), 16);
        for entry in &output.geometry {
            match entry {
                SceneGeometry::Mesh {
                    kind,
                    vertices,
                    faces,
                } => {
                    assert_eq!(*kind, "trimmed");
                    assert_eq!(vertices.len(), 9);
                    assert_eq!(faces.len(), 4);
                    for v in vertices {
                        let radial = v[0].hypot(v[1]);
                        assert!((radial - 1.0).abs() < 1e-9);
                    }
                }
                other => panic!("expected mesh, got {other:?}"),
            }
        }
    }

    #[test]
    fn sphere_cells_lie_on_the_sphere() {
        let surface = SurfaceSpec::Sphere {
            center: [1.0, 2.0, 3.0],
            radius: 2.0,
        };
        let spec = SceneSpec::new(surface, Pattern::from_name("diamond_quads").unwrap());
        let grid = spec.build().unwrap();
        let centre = Point3::new(1.0, 2.0, 3.0);
        for corners in grid.evaluate() {
            for p in corners {
                assert!((p.distance_to(centre) - 2.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn nurbs_scene_builds_from_a_bilinear_net() {
        let surface = SurfaceSpec::Nurbs {
            degree_u: 1,
            degree_v: 1,
            u_count: 2,
            v_count: 2,
            points: vec![
                [0.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [2.0, 1.0, 0.0],
            ],
            knots_u: vec![0.0, 0.0, 1.0, 1.0],
            knots_v: vec![0.0, 0.0, 1.0, 1.0],
            weights: None,
        };
        let spec = SceneSpec::new(surface, Pattern::from_name("basic_quads").unwrap());
        let grid = spec.build().unwrap();
        assert_eq!(grid.face_count(), 16);
    }

    #[test]
    fn invalid_surfaces_report_kernel_errors() {
        let bad = [
            SurfaceSpec::Sphere {
                center: [0.0; 3],
                radius: -1.0,
            },
            SurfaceSpec::Cylinder {
                base: [0.0; 3],
                axis: [0.0; 3],
                radius: 1.0,
            },
            SurfaceSpec::Plane {
                origin: [0.0; 3],
                x_axis: [1.0, 0.0, 0.0],
                y_axis: [2.0, 0.0, 0.0],
            },
        ];
        for surface in bad {
            let spec = SceneSpec::new(surface, Pattern::from_name("basic_quads").unwrap());
            assert!(matches!(spec.build(), Err(TessellationError::Kernel(_))));
        }
    }

    #[test]
    fn pattern_errors_propagate_from_build() {
        let mut options = SceneOptions::new();
        options.grid = GridOptions::new().with_max_cells(4);
        let spec = SceneSpec::new(SurfaceSpec::default(), hexagons()).with_options(options);
        assert!(matches!(
            spec.build(),
            Err(TessellationError::TooManyCells { .. })
        ));
    }
}

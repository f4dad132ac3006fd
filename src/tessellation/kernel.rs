//! [`SurfaceEvaluator`] backed by the in-crate geometry kernel.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::direction::SurfaceDirection;
use super::error::TessellationError;
use super::evaluator::SurfaceEvaluator;
use crate::geom::{
    Curve3, FourPointSurface, GeodesicOptions, IsotrimSurface, JoinPolylinesOptions, Point3,
    Polyline3, RuledSurface, Surface, SurfaceIsoCurve, Tolerance, UnitizedSurface, UvPoint,
    curve_parameters_by_count, extract_subcurve, isotrim_surface, join_polylines,
    refine_uv_polyline, sample_surface_grid, shortest_path,
};

/// Sampling density of the kernel operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelOptions {
    /// Samples per iso-curve segment and per patch boundary side.
    pub curve_samples: usize,
    /// Upper bound on the vertices inserted into one interpolated edge.
    pub interpolation_samples_max: usize,
    /// Lattice nodes along the longer side of a geodesic search.
    pub geodesic_resolution: usize,
    /// Relaxation sweeps applied to each geodesic.
    pub geodesic_iterations: usize,
}

impl KernelOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            curve_samples: 16,
            interpolation_samples_max: 64,
            geodesic_resolution: 24,
            geodesic_iterations: 12,
        }
    }

    #[must_use]
    pub const fn with_curve_samples(mut self, samples: usize) -> Self {
        self.curve_samples = samples;
        self
    }

    #[must_use]
    pub const fn with_interpolation_samples_max(mut self, samples: usize) -> Self {
        self.interpolation_samples_max = samples;
        self
    }

    #[must_use]
    pub const fn with_geodesic_resolution(mut self, resolution: usize) -> Self {
        self.geodesic_resolution = resolution;
        self
    }

    #[must_use]
    pub const fn with_geodesic_iterations(mut self, iterations: usize) -> Self {
        self.geodesic_iterations = iterations;
        self
    }

    /// Bisection depth that keeps an edge below `interpolation_samples_max`.
    fn refine_depth(&self) -> usize {
        let samples = self.interpolation_samples_max.max(1);
        (usize::BITS - samples.leading_zeros()) as usize - 1
    }
}

impl Default for KernelOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Surface output of the kernel.
#[derive(Debug, Clone)]
pub enum KernelPatch<S: Surface> {
    /// Bilinear patch through evaluated corners.
    Facet(FourPointSurface),
    /// Ruled surface between two iso-curve segments.
    Lofted(RuledSurface),
    /// Parameter rectangle of the unitized source surface.
    Trimmed(IsotrimSurface<Arc<UnitizedSurface<S>>>),
}

impl<S: Surface> KernelPatch<S> {
    /// Samples the patch as a quad mesh over its own domain.
    #[must_use]
    pub fn mesh(&self, u_steps: usize, v_steps: usize) -> (Vec<Point3>, Vec<[u32; 4]>) {
        sample_surface_grid(self, u_steps, v_steps)
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Facet(_) => "facet",
            Self::Lofted(_) => "lofted",
            Self::Trimmed(_) => "trimmed",
        }
    }
}

impl<S: Surface> Surface for KernelPatch<S> {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        match self {
            Self::Facet(surface) => surface.point_at(u, v),
            Self::Lofted(surface) => surface.point_at(u, v),
            Self::Trimmed(surface) => surface.point_at(u, v),
        }
    }

    fn domain_u(&self) -> (f64, f64) {
        match self {
            Self::Facet(surface) => surface.domain_u(),
            Self::Lofted(surface) => surface.domain_u(),
            Self::Trimmed(surface) => surface.domain_u(),
        }
    }

    fn domain_v(&self) -> (f64, f64) {
        match self {
            Self::Facet(surface) => surface.domain_v(),
            Self::Lofted(surface) => surface.domain_v(),
            Self::Trimmed(surface) => surface.domain_v(),
        }
    }
}

/// A surface unitized to [0, 1]² together with the kernel options.
pub struct SurfaceKernel<S: Surface> {
    surface: Arc<UnitizedSurface<S>>,
    options: KernelOptions,
}

impl<S: Surface> Clone for SurfaceKernel<S> {
    fn clone(&self) -> Self {
        Self {
            surface: Arc::clone(&self.surface),
            options: self.options,
        }
    }
}

impl<S: Surface> SurfaceKernel<S> {
    pub fn new(surface: S) -> Result<Self, TessellationError> {
        Self::with_options(surface, KernelOptions::default())
    }

    pub fn with_options(surface: S, options: KernelOptions) -> Result<Self, TessellationError> {
        let surface = UnitizedSurface::new(surface).map_err(TessellationError::Kernel)?;
        Ok(Self {
            surface: Arc::new(surface),
            options,
        })
    }

    #[must_use]
    pub fn surface(&self) -> &UnitizedSurface<S> {
        &self.surface
    }

    #[must_use]
    pub const fn options(&self) -> KernelOptions {
        self.options
    }

    fn iso_curve(&self, direction: SurfaceDirection, constant: f64) -> SurfaceIsoCurve<'_, UnitizedSurface<S>> {
        SurfaceIsoCurve::new(self.surface.as_ref(), direction.varies_u(), constant)
    }

    fn uv_path(&self, uv: &[UvPoint]) -> Result<Polyline3, TessellationError> {
        let points = uv.iter().map(|p| self.point_at(*p)).collect();
        Polyline3::new(points, false).map_err(TessellationError::Kernel)
    }
}

fn check_finite(operation: &'static str, values: &[f64]) -> Result<(), TessellationError> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(TessellationError::parameter(
            operation,
            "parameter",
            "parameters must be finite",
        ))
    }
}

impl<S: Surface> SurfaceEvaluator for SurfaceKernel<S> {
    type Curve = Polyline3;
    type Patch = KernelPatch<S>;

    fn point_at(&self, uv: UvPoint) -> Point3 {
        self.surface.point_at(uv.u, uv.v)
    }

    fn divide_iso_curve(
        &self,
        direction: SurfaceDirection,
        constant: f64,
        count: usize,
    ) -> Result<Vec<f64>, TessellationError> {
        check_finite("divide_iso_curve", &[constant])?;
        if count == 0 {
            return Err(TessellationError::InvalidDivisionCount {
                operation: "divide_iso_curve",
                count_u: count,
                count_v: count,
            });
        }
        Ok(curve_parameters_by_count(
            &self.iso_curve(direction, constant),
            count,
        ))
    }

    fn iso_curve_segment(
        &self,
        direction: SurfaceDirection,
        constant: f64,
        range: (f64, f64),
    ) -> Result<Polyline3, TessellationError> {
        check_finite("iso_curve_segment", &[constant, range.0, range.1])?;
        let curve = self.iso_curve(direction, constant);
        let sub = extract_subcurve(&curve, range.0, range.1, self.options.curve_samples);
        if sub.points.len() < 2 {
            return Err(TessellationError::degenerate(
                "iso_curve_segment",
                format!("empty parameter range [{}, {}]", range.0, range.1),
            ));
        }
        Polyline3::new(sub.points, false).map_err(TessellationError::Kernel)
    }

    fn trim_to_rectangle(
        &self,
        u_range: (f64, f64),
        v_range: (f64, f64),
    ) -> Result<KernelPatch<S>, TessellationError> {
        check_finite("trim_to_rectangle", &[u_range.0, u_range.1, v_range.0, v_range.1])?;
        let (trimmed, diagnostics) = isotrim_surface(Arc::clone(&self.surface), u_range, v_range);
        let (u0, u1) = trimmed.u_range();
        let (v0, v1) = trimmed.v_range();
        if Tolerance::ZERO_LENGTH.is_zero_length(u1 - u0)
            || Tolerance::ZERO_LENGTH.is_zero_length(v1 - v0)
        {
            return Err(TessellationError::degenerate(
                "trim_to_rectangle",
                format!("rectangle [{u0}, {u1}] x [{v0}, {v1}] has no area"),
            ));
        }
        if diagnostics.clamped_u || diagnostics.clamped_v {
            log::debug!("trim_to_rectangle: range clamped to the unit square");
        }
        Ok(KernelPatch::Trimmed(trimmed))
    }

    fn patch_boundary(&self, patch: &KernelPatch<S>) -> Result<Polyline3, TessellationError> {
        let (u0, u1) = patch.domain_u();
        let (v0, v1) = patch.domain_v();
        let corners = [
            UvPoint::new(u0, v0),
            UvPoint::new(u1, v0),
            UvPoint::new(u1, v1),
            UvPoint::new(u0, v1),
        ];
        let samples = self.options.curve_samples.max(1);
        let mut sides = Vec::with_capacity(4);
        for k in 0..4 {
            let a = corners[k];
            let b = corners[(k + 1) % 4];
            let points: Vec<Point3> = (0..=samples)
                .map(|i| {
                    let p = a.tween(b, i as f64 / samples as f64);
                    patch.point_at(p.u, p.v)
                })
                .collect();
            sides.push(Polyline3::new(points, false).map_err(TessellationError::Kernel)?);
        }
        self.join_curves(sides)
    }

    fn polyline(&self, points: Vec<Point3>, closed: bool) -> Result<Polyline3, TessellationError> {
        Polyline3::new(points, closed).map_err(TessellationError::Kernel)
    }

    fn patch_from_corners(&self, corners: &[Point3]) -> Result<KernelPatch<S>, TessellationError> {
        FourPointSurface::from_corner_loop(corners)
            .map(KernelPatch::Facet)
            .map_err(TessellationError::Kernel)
    }

    fn interpolate_on_surface(
        &self,
        a: UvPoint,
        b: UvPoint,
        tolerance: f64,
    ) -> Result<Polyline3, TessellationError> {
        check_finite("interpolate_on_surface", &[a.u, a.v, b.u, b.v])?;
        if Tolerance::ZERO_LENGTH.approx_eq_uv(a, b) {
            return Err(TessellationError::degenerate(
                "interpolate_on_surface",
                "edge has zero length",
            ));
        }
        let uv = refine_uv_polyline(
            self.surface.as_ref(),
            &[a, b],
            tolerance,
            self.options.refine_depth(),
        );
        self.uv_path(&uv)
    }

    fn shortest_path(
        &self,
        a: UvPoint,
        b: UvPoint,
        tolerance: f64,
    ) -> Result<Polyline3, TessellationError> {
        let options = GeodesicOptions::new()
            .with_resolution(self.options.geodesic_resolution)
            .with_relax_iterations(self.options.geodesic_iterations);
        let path = shortest_path(self.surface.as_ref(), a, b, options)?;
        let uv = refine_uv_polyline(
            self.surface.as_ref(),
            &path.uv,
            tolerance,
            self.options.refine_depth(),
        );
        self.uv_path(&uv)
    }

    fn join_curves(&self, segments: Vec<Polyline3>) -> Result<Polyline3, TessellationError> {
        let count = segments.len();
        let options = JoinPolylinesOptions::new()
            .preserve_direction(false)
            .with_tolerance(Tolerance::LOOSE.eps);
        let (mut joined, _) =
            join_polylines(segments, options).map_err(TessellationError::Kernel)?;
        match joined.len() {
            1 if joined[0].is_closed() => Ok(joined.remove(0)),
            pieces => Err(TessellationError::BoundaryJoinFailure {
                segments: count,
                pieces,
            }),
        }
    }

    fn loft(&self, a: &Polyline3, b: &Polyline3) -> Result<KernelPatch<S>, TessellationError> {
        Ok(KernelPatch::Lofted(RuledSurface::new(a.clone(), b.clone())))
    }
}

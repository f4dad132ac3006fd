use std::sync::Arc;

use super::core::{Point3, Tolerance, UvPoint, Vec3};
use super::curve::{Curve3, Polyline3};

fn is_non_decreasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

fn wrap_param(value: f64, start: f64, end: f64) -> f64 {
    let span = end - start;
    if !span.is_finite() || span == 0.0 {
        return start;
    }
    let mut t = (value - start) % span;
    if t < 0.0 {
        t += span;
    }
    start + t
}

fn orthogonal_unit_vector(reference: Vec3) -> Vec3 {
    let candidate = if reference.x.abs() < reference.y.abs() {
        Vec3::new(0.0, -reference.z, reference.y)
    } else {
        Vec3::new(-reference.z, 0.0, reference.x)
    };

    candidate.normalized().unwrap_or(Vec3::X)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HPoint4 {
    x: f64,
    y: f64,
    z: f64,
    w: f64,
}

impl HPoint4 {
    const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    fn lerp(self, rhs: Self, t: f64) -> Self {
        let s = 1.0 - t;
        Self::new(
            self.x * s + rhs.x * t,
            self.y * s + rhs.y * t,
            self.z * s + rhs.z * t,
            self.w * s + rhs.w * t,
        )
    }

    fn to_point3(self) -> Option<Point3> {
        if self.w.is_finite() && self.w != 0.0 {
            Some(Point3::new(self.x / self.w, self.y / self.w, self.z / self.w))
        } else {
            None
        }
    }
}

fn find_span(n: usize, p: usize, u: f64, knots: &[f64]) -> usize {
    if u >= knots[n + 1] {
        return n;
    }
    if u <= knots[p] {
        return p;
    }

    let mut low = p;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

fn de_boor(d: &mut [HPoint4], span: usize, p: usize, u: f64, knots: &[f64]) {
    for r in 1..=p {
        for j in (r..=p).rev() {
            let i = span - p + j;
            let denom = knots[i + p + 1 - r] - knots[i];
            let alpha = if denom == 0.0 { 0.0 } else { (u - knots[i]) / denom };
            d[j] = d[j - 1].lerp(d[j], alpha);
        }
    }
}

pub trait Surface {
    fn point_at(&self, u: f64, v: f64) -> Point3;

    #[must_use]
    fn domain_u(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn domain_v(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn is_u_closed(&self) -> bool {
        false
    }

    #[must_use]
    fn is_v_closed(&self) -> bool {
        false
    }
}

impl<S: Surface + ?Sized> Surface for &S {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        (**self).point_at(u, v)
    }
    fn domain_u(&self) -> (f64, f64) {
        (**self).domain_u()
    }
    fn domain_v(&self) -> (f64, f64) {
        (**self).domain_v()
    }
    fn is_u_closed(&self) -> bool {
        (**self).is_u_closed()
    }
    fn is_v_closed(&self) -> bool {
        (**self).is_v_closed()
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        (**self).point_at(u, v)
    }
    fn domain_u(&self) -> (f64, f64) {
        (**self).domain_u()
    }
    fn domain_v(&self) -> (f64, f64) {
        (**self).domain_v()
    }
    fn is_u_closed(&self) -> bool {
        (**self).is_u_closed()
    }
    fn is_v_closed(&self) -> bool {
        (**self).is_v_closed()
    }
}

impl<S: Surface + ?Sized> Surface for Arc<S> {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        (**self).point_at(u, v)
    }
    fn domain_u(&self) -> (f64, f64) {
        (**self).domain_u()
    }
    fn domain_v(&self) -> (f64, f64) {
        (**self).domain_v()
    }
    fn is_u_closed(&self) -> bool {
        (**self).is_u_closed()
    }
    fn is_v_closed(&self) -> bool {
        (**self).is_v_closed()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Analytic surfaces
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSurface {
    pub origin: Point3,
    pub u_axis: Vec3,
    pub v_axis: Vec3,
}

impl PlaneSurface {
    #[must_use]
    pub const fn new(origin: Point3, u_axis: Vec3, v_axis: Vec3) -> Self {
        Self {
            origin,
            u_axis,
            v_axis,
        }
    }
}

impl Surface for PlaneSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        self.origin
            .add_vec(self.u_axis.mul_scalar(u))
            .add_vec(self.v_axis.mul_scalar(v))
    }
}

/// Cylinder around `axis`; `u` runs once around, `v` along the axis vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderSurface {
    pub base: Point3,
    pub axis: Vec3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub radius: f64,
}

impl CylinderSurface {
    pub fn new(base: Point3, axis: Vec3, radius: f64) -> Result<Self, String> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err("cylinder radius must be finite and > 0".to_string());
        }

        let axis_dir = axis
            .normalized()
            .ok_or_else(|| "cylinder axis must be non-zero".to_string())?;
        let x_axis = orthogonal_unit_vector(axis_dir);
        let y_axis = axis_dir.cross(x_axis).normalized().unwrap_or(Vec3::Y);

        Ok(Self {
            base,
            axis,
            x_axis,
            y_axis,
            radius,
        })
    }
}

impl Surface for CylinderSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let u = wrap_param(u, 0.0, 1.0);
        let angle = std::f64::consts::TAU * u;
        let radial = self
            .x_axis
            .mul_scalar(angle.cos())
            .add(self.y_axis.mul_scalar(angle.sin()))
            .mul_scalar(self.radius);

        self.base.add_vec(self.axis.mul_scalar(v)).add_vec(radial)
    }

    fn is_u_closed(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSurface {
    pub center: Point3,
    pub radius: f64,
}

impl SphereSurface {
    pub fn new(center: Point3, radius: f64) -> Result<Self, String> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err("sphere radius must be finite and > 0".to_string());
        }
        Ok(Self { center, radius })
    }
}

impl Surface for SphereSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let u = wrap_param(u, 0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let theta = std::f64::consts::TAU * u;
        let phi = std::f64::consts::PI * (v - 0.5);

        let cos_phi = phi.cos();
        self.center.add_vec(
            Vec3::new(cos_phi * theta.cos(), cos_phi * theta.sin(), phi.sin())
                .mul_scalar(self.radius),
        )
    }

    fn is_u_closed(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// NURBS
// ─────────────────────────────────────────────────────────────────────────────

/// Tensor-product NURBS surface. Control points are stored row-major with
/// `u` varying fastest: index = `v_index * u_count + u_index`.
#[derive(Debug, Clone, PartialEq)]
pub struct NurbsSurface {
    pub degree_u: usize,
    pub degree_v: usize,
    pub u_count: usize,
    pub v_count: usize,
    pub control_points: Vec<Point3>,
    pub knots_u: Vec<f64>,
    pub knots_v: Vec<f64>,
    pub weights: Option<Vec<f64>>,
}

impl NurbsSurface {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        u_count: usize,
        v_count: usize,
        control_points: Vec<Point3>,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self, String> {
        if u_count < 2 || v_count < 2 {
            return Err("nurbs surface requires at least a 2x2 control net".to_string());
        }
        if degree_u == 0 || degree_v == 0 {
            return Err("nurbs surface degrees must be >= 1".to_string());
        }
        if degree_u >= u_count || degree_v >= v_count {
            return Err("nurbs surface degrees must be < control point counts".to_string());
        }
        if control_points.len() != u_count * v_count {
            return Err("nurbs surface control point count must match u_count*v_count".to_string());
        }

        let expected_u_knots = u_count + degree_u + 1;
        if knots_u.len() != expected_u_knots {
            return Err(format!(
                "nurbs surface u knot length must be {}, got {}",
                expected_u_knots,
                knots_u.len()
            ));
        }

        let expected_v_knots = v_count + degree_v + 1;
        if knots_v.len() != expected_v_knots {
            return Err(format!(
                "nurbs surface v knot length must be {}, got {}",
                expected_v_knots,
                knots_v.len()
            ));
        }

        if !is_non_decreasing(&knots_u) || !is_non_decreasing(&knots_v) {
            return Err("nurbs surface knots must be non-decreasing".to_string());
        }

        if let Some(weights) = &weights {
            if weights.len() != control_points.len() {
                return Err(
                    "nurbs surface weights length must match control point count".to_string(),
                );
            }
            if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
                return Err("nurbs surface weights must be finite and > 0".to_string());
            }
        }

        Ok(Self {
            degree_u,
            degree_v,
            u_count,
            v_count,
            control_points,
            knots_u,
            knots_v,
            weights,
        })
    }

    /// Clamped uniform knot vector for `count` control points of degree `degree`.
    #[must_use]
    pub fn clamped_uniform_knots(count: usize, degree: usize) -> Vec<f64> {
        let interior = count.saturating_sub(degree + 1);
        let mut knots = vec![0.0; degree + 1];
        for i in 1..=interior {
            knots.push(i as f64 / (interior + 1) as f64);
        }
        knots.extend(std::iter::repeat_n(1.0, degree + 1));
        knots
    }

    fn control_hpoint(&self, u_index: usize, v_index: usize) -> HPoint4 {
        let idx = v_index * self.u_count + u_index;
        let p = self.control_points[idx];
        let w = self
            .weights
            .as_ref()
            .and_then(|weights| weights.get(idx).copied())
            .unwrap_or(1.0);
        HPoint4::new(p.x * w, p.y * w, p.z * w, w)
    }
}

impl Surface for NurbsSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let (u0, u1) = self.domain_u();
        let (v0, v1) = self.domain_v();
        let u = u.clamp(u0, u1);
        let v = v.clamp(v0, v1);

        let p = self.degree_u;
        let q = self.degree_v;
        let span_u = find_span(self.u_count - 1, p, u, &self.knots_u);
        let span_v = find_span(self.v_count - 1, q, v, &self.knots_v);

        let mut temp = vec![HPoint4::new(0.0, 0.0, 0.0, 0.0); q + 1];
        for (l, slot) in temp.iter_mut().enumerate() {
            let v_index = span_v - q + l;
            let mut d: Vec<HPoint4> = (0..=p)
                .map(|j| self.control_hpoint(span_u - p + j, v_index))
                .collect();
            de_boor(&mut d, span_u, p, u, &self.knots_u);
            *slot = d[p];
        }

        de_boor(&mut temp, span_v, q, v, &self.knots_v);
        temp[q].to_point3().unwrap_or(self.control_points[0])
    }

    fn domain_u(&self) -> (f64, f64) {
        (self.knots_u[self.degree_u], self.knots_u[self.u_count])
    }

    fn domain_v(&self) -> (f64, f64) {
        (self.knots_v[self.degree_v], self.knots_v[self.v_count])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reparametrization
// ─────────────────────────────────────────────────────────────────────────────

/// A surface reparametrized so both parameters run over [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct UnitizedSurface<S: Surface> {
    surface: S,
    u_range: (f64, f64),
    v_range: (f64, f64),
}

impl<S: Surface> UnitizedSurface<S> {
    pub fn new(surface: S) -> Result<Self, String> {
        let u_range = surface.domain_u();
        let v_range = surface.domain_v();
        for (name, (a, b)) in [("u", u_range), ("v", v_range)] {
            if !a.is_finite() || !b.is_finite() {
                return Err(format!("surface {name} domain must be finite"));
            }
            if Tolerance::ZERO_LENGTH.is_zero_length(b - a) {
                return Err(format!("surface {name} domain is empty"));
            }
        }
        Ok(Self {
            surface,
            u_range,
            v_range,
        })
    }

    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.surface
    }
}

impl<S: Surface> Surface for UnitizedSurface<S> {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let (u0, u1) = self.u_range;
        let (v0, v1) = self.v_range;
        self.surface
            .point_at(u0 + (u1 - u0) * u, v0 + (v1 - v0) * v)
    }

    fn is_u_closed(&self) -> bool {
        self.surface.is_u_closed()
    }

    fn is_v_closed(&self) -> bool {
        self.surface.is_v_closed()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IsotrimDiagnostics {
    pub reverse_u: bool,
    pub reverse_v: bool,
    pub clamped_u: bool,
    pub clamped_v: bool,
}

/// The sub-rectangle of a surface. Evaluated in the parent's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct IsotrimSurface<S: Surface> {
    surface: S,
    u_min: f64,
    u_max: f64,
    v_min: f64,
    v_max: f64,
    reverse_u: bool,
    reverse_v: bool,
}

impl<S: Surface> IsotrimSurface<S> {
    #[must_use]
    pub const fn u_range(&self) -> (f64, f64) {
        (self.u_min, self.u_max)
    }

    #[must_use]
    pub const fn v_range(&self) -> (f64, f64) {
        (self.v_min, self.v_max)
    }
}

impl<S: Surface> Surface for IsotrimSurface<S> {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let u = if self.reverse_u {
            self.u_min + (self.u_max - u)
        } else {
            u
        };
        let v = if self.reverse_v {
            self.v_min + (self.v_max - v)
        } else {
            v
        };
        self.surface.point_at(u, v)
    }

    fn domain_u(&self) -> (f64, f64) {
        (self.u_min, self.u_max)
    }

    fn domain_v(&self) -> (f64, f64) {
        (self.v_min, self.v_max)
    }
}

/// Trims a surface to `u_range` x `v_range`.
///
/// Non-finite bounds fall back to the parent domain, bounds outside the
/// domain are clamped, and a descending range flips that parameter.
#[must_use]
pub fn isotrim_surface<S: Surface>(
    surface: S,
    u_range: (f64, f64),
    v_range: (f64, f64),
) -> (IsotrimSurface<S>, IsotrimDiagnostics) {
    let (u0, u1) = surface.domain_u();
    let (v0, v1) = surface.domain_v();

    let ua = if u_range.0.is_finite() { u_range.0 } else { u0 };
    let ub = if u_range.1.is_finite() { u_range.1 } else { u1 };
    let va = if v_range.0.is_finite() { v_range.0 } else { v0 };
    let vb = if v_range.1.is_finite() { v_range.1 } else { v1 };

    let ua_clamped = ua.clamp(u0, u1);
    let ub_clamped = ub.clamp(u0, u1);
    let va_clamped = va.clamp(v0, v1);
    let vb_clamped = vb.clamp(v0, v1);

    let diagnostics = IsotrimDiagnostics {
        reverse_u: ua_clamped > ub_clamped,
        reverse_v: va_clamped > vb_clamped,
        clamped_u: ua_clamped != ua || ub_clamped != ub,
        clamped_v: va_clamped != va || vb_clamped != vb,
    };

    let (u_min, u_max) = if diagnostics.reverse_u {
        (ub_clamped, ua_clamped)
    } else {
        (ua_clamped, ub_clamped)
    };
    let (v_min, v_max) = if diagnostics.reverse_v {
        (vb_clamped, va_clamped)
    } else {
        (va_clamped, vb_clamped)
    };

    (
        IsotrimSurface {
            surface,
            u_min,
            u_max,
            v_min,
            v_max,
            reverse_u: diagnostics.reverse_u,
            reverse_v: diagnostics.reverse_v,
        },
        diagnostics,
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Iso-curves
// ─────────────────────────────────────────────────────────────────────────────

/// The curve traced on a surface when one parameter is held fixed.
///
/// With `varying_u` the curve is `t -> S(t, constant)`, otherwise
/// `t -> S(constant, t)`. The curve domain is the surface domain along the
/// varying parameter.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceIsoCurve<'a, S: Surface + ?Sized> {
    surface: &'a S,
    varying_u: bool,
    constant: f64,
}

impl<'a, S: Surface + ?Sized> SurfaceIsoCurve<'a, S> {
    #[must_use]
    pub const fn new(surface: &'a S, varying_u: bool, constant: f64) -> Self {
        Self {
            surface,
            varying_u,
            constant,
        }
    }
}

impl<S: Surface + ?Sized> Curve3 for SurfaceIsoCurve<'_, S> {
    fn point_at(&self, t: f64) -> Point3 {
        if self.varying_u {
            self.surface.point_at(t, self.constant)
        } else {
            self.surface.point_at(self.constant, t)
        }
    }

    fn domain(&self) -> (f64, f64) {
        if self.varying_u {
            self.surface.domain_u()
        } else {
            self.surface.domain_v()
        }
    }

    fn is_closed(&self) -> bool {
        if self.varying_u {
            self.surface.is_u_closed()
        } else {
            self.surface.is_v_closed()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Surface builders
// ─────────────────────────────────────────────────────────────────────────────

/// A bilinear surface through four corner points:
/// - `p00` at (u=0, v=0)
/// - `p10` at (u=1, v=0)
/// - `p01` at (u=0, v=1)
/// - `p11` at (u=1, v=1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourPointSurface {
    pub p00: Point3,
    pub p10: Point3,
    pub p01: Point3,
    pub p11: Point3,
}

impl FourPointSurface {
    #[must_use]
    pub const fn new(p00: Point3, p10: Point3, p01: Point3, p11: Point3) -> Self {
        Self { p00, p10, p01, p11 }
    }

    /// Builds the surface from corners given in boundary-loop order `a, b, c, d`.
    ///
    /// The loop maps to `p00 = a`, `p10 = b`, `p11 = c`, `p01 = d`. With three
    /// corners the edge from `c` back to `a` is collapsed (`d = a`).
    pub fn from_corner_loop(corners: &[Point3]) -> Result<Self, String> {
        let (a, b, c, d) = match corners {
            [a, b, c] => (*a, *b, *c, *a),
            [a, b, c, d] => (*a, *b, *c, *d),
            _ => {
                return Err(format!(
                    "four point surface requires 3 or 4 corners, got {}",
                    corners.len()
                ));
            }
        };
        if corners.iter().any(|p| !p.is_finite()) {
            return Err("four point surface corners must be finite".to_string());
        }
        Ok(Self::new(a, b, d, c))
    }

    /// Corners in boundary-loop order, starting at `p00`.
    #[must_use]
    pub const fn corner_loop(&self) -> [Point3; 4] {
        [self.p00, self.p10, self.p11, self.p01]
    }
}

impl Surface for FourPointSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let s = 1.0 - u;
        let t = 1.0 - v;

        Point3::new(
            s * t * self.p00.x + u * t * self.p10.x + s * v * self.p01.x + u * v * self.p11.x,
            s * t * self.p00.y + u * t * self.p10.y + s * v * self.p01.y + u * v * self.p11.y,
            s * t * self.p00.z + u * t * self.p10.z + s * v * self.p01.z + u * v * self.p11.z,
        )
    }
}

/// A ruled surface blending two polylines: `v = 0` on `curve_a`, `v = 1` on
/// `curve_b`, with `u` the normalized arc length along each.
#[derive(Debug, Clone, PartialEq)]
pub struct RuledSurface {
    pub curve_a: Polyline3,
    pub curve_b: Polyline3,
}

impl RuledSurface {
    #[must_use]
    pub const fn new(curve_a: Polyline3, curve_b: Polyline3) -> Self {
        Self { curve_a, curve_b }
    }
}

impl Surface for RuledSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let pa = self.curve_a.point_at(u);
        let pb = self.curve_b.point_at(u);
        pa.lerp(pb, v.clamp(0.0, 1.0))
    }
}

/// Samples a surface on a regular `u_steps` x `v_steps` lattice over its domain.
///
/// Vertices are row-major (u fastest); faces are quads as vertex indices.
#[must_use]
pub fn sample_surface_grid<S: Surface + ?Sized>(
    surface: &S,
    u_steps: usize,
    v_steps: usize,
) -> (Vec<Point3>, Vec<[u32; 4]>) {
    let u_steps = u_steps.max(1);
    let v_steps = v_steps.max(1);
    let (u0, u1) = surface.domain_u();
    let (v0, v1) = surface.domain_v();

    let mut vertices = Vec::with_capacity((u_steps + 1) * (v_steps + 1));
    for j in 0..=v_steps {
        let v = v0 + (v1 - v0) * (j as f64 / v_steps as f64);
        for i in 0..=u_steps {
            let u = u0 + (u1 - u0) * (i as f64 / u_steps as f64);
            vertices.push(surface.point_at(u, v));
        }
    }

    let stride = u_steps + 1;
    let mut faces = Vec::with_capacity(u_steps * v_steps);
    for j in 0..v_steps {
        for i in 0..u_steps {
            let a = j * stride + i;
            let index = |k: usize| u32::try_from(k).unwrap_or(u32::MAX);
            faces.push([
                index(a),
                index(a + 1),
                index(a + stride + 1),
                index(a + stride),
            ]);
        }
    }

    (vertices, faces)
}

/// Refines a UV polyline until every chord of its surface image lies within
/// `tolerance` of the surface point at the chord's parameter midpoint.
///
/// Input vertices are kept exactly; new vertices are inserted by bisection,
/// at most `max_depth` levels per input segment.
#[must_use]
pub fn refine_uv_polyline<S: Surface + ?Sized>(
    surface: &S,
    uv: &[UvPoint],
    tolerance: f64,
    max_depth: usize,
) -> Vec<UvPoint> {
    let Some(first) = uv.first() else {
        return Vec::new();
    };
    let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
        tolerance
    } else {
        Tolerance::LOOSE.eps
    };

    let mut out = vec![*first];
    for window in uv.windows(2) {
        refine_segment(surface, window[0], window[1], tolerance, max_depth, &mut out);
    }
    out
}

fn refine_segment<S: Surface + ?Sized>(
    surface: &S,
    a: UvPoint,
    b: UvPoint,
    tolerance: f64,
    depth: usize,
    out: &mut Vec<UvPoint>,
) {
    if depth > 0 {
        let mid = a.midpoint(b);
        let pa = surface.point_at(a.u, a.v);
        let pb = surface.point_at(b.u, b.v);
        let pm = surface.point_at(mid.u, mid.v);
        if pm.distance_to(pa.lerp(pb, 0.5)) > tolerance {
            refine_segment(surface, a, mid, tolerance, depth - 1, out);
            refine_segment(surface, mid, b, tolerance, depth - 1, out);
            return;
        }
    }
    out.push(b);
}

//! A single tessellation cell in parameter space.

use serde::{Deserialize, Serialize};

use super::direction::SurfaceDirection;
use super::error::TessellationError;
use super::evaluator::SurfaceEvaluator;
use super::options::HexTriStrategy;
use crate::geom::{Point3, Polyline3, Tolerance, UvPoint};

/// A triangle, quad or hexagon in the unit parameter square.
///
/// Corner order is the winding every subdivision and render relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "corners", rename_all = "snake_case")]
pub enum IsoFace {
    Tri([UvPoint; 3]),
    Quad([UvPoint; 4]),
    Hex([UvPoint; 6]),
}

impl IsoFace {
    #[must_use]
    pub const fn tri(a: UvPoint, b: UvPoint, c: UvPoint) -> Self {
        Self::Tri([a, b, c])
    }

    #[must_use]
    pub const fn quad(a: UvPoint, b: UvPoint, c: UvPoint, d: UvPoint) -> Self {
        Self::Quad([a, b, c, d])
    }

    #[must_use]
    pub const fn hex(corners: [UvPoint; 6]) -> Self {
        Self::Hex(corners)
    }

    pub fn from_corners(corners: &[UvPoint]) -> Result<Self, TessellationError> {
        match corners {
            [a, b, c] => Ok(Self::tri(*a, *b, *c)),
            [a, b, c, d] => Ok(Self::quad(*a, *b, *c, *d)),
            [a, b, c, d, e, f] => Ok(Self::hex([*a, *b, *c, *d, *e, *f])),
            _ => Err(TessellationError::InvalidArity {
                operation: "from_corners",
                expected: "tri, quad or hex",
                found: corners.len(),
            }),
        }
    }

    #[must_use]
    pub fn corners(&self) -> &[UvPoint] {
        match self {
            Self::Tri(c) => c,
            Self::Quad(c) => c,
            Self::Hex(c) => c,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.corners().len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub const fn is_tri(&self) -> bool {
        matches!(self, Self::Tri(_))
    }

    #[must_use]
    pub const fn is_quad(&self) -> bool {
        matches!(self, Self::Quad(_))
    }

    #[must_use]
    pub const fn is_hex(&self) -> bool {
        matches!(self, Self::Hex(_))
    }

    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Tri(_) => "tri",
            Self::Quad(_) => "quad",
            Self::Hex(_) => "hex",
        }
    }

    #[must_use]
    pub fn centroid(&self) -> UvPoint {
        UvPoint::centroid(self.corners())
    }

    /// Unsigned area of the polygon in parameter space.
    #[must_use]
    pub fn parameter_area(&self) -> f64 {
        let c = self.corners();
        let n = c.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = c[i];
                let b = c[(i + 1) % n];
                a.u * b.v - b.u * a.v
            })
            .sum();
        twice.abs() * 0.5
    }

    fn arity_error(&self, operation: &'static str, expected: &'static str) -> TessellationError {
        TessellationError::InvalidArity {
            operation,
            expected,
            found: self.len(),
        }
    }

    fn quad_corners(&self, operation: &'static str) -> Result<[UvPoint; 4], TessellationError> {
        match self {
            Self::Quad(c) => Ok(*c),
            _ => Err(self.arity_error(operation, "quad")),
        }
    }

    fn hex_corners(&self, operation: &'static str) -> Result<[UvPoint; 6], TessellationError> {
        match self {
            Self::Hex(c) => Ok(*c),
            _ => Err(self.arity_error(operation, "hex")),
        }
    }

    // ───── subdivision ─────

    /// Splits a quad along one diagonal.
    ///
    /// `flip = false` cuts 1-3 giving (0,1,3), (2,3,1); `flip = true` cuts 0-2
    /// giving (2,3,0), (0,1,2).
    pub fn quad_to_tri(&self, flip: bool) -> Result<Vec<Self>, TessellationError> {
        let c = self.quad_corners("quad_to_tri")?;
        Ok(if flip {
            vec![Self::tri(c[2], c[3], c[0]), Self::tri(c[0], c[1], c[2])]
        } else {
            vec![Self::tri(c[0], c[1], c[3]), Self::tri(c[2], c[3], c[1])]
        })
    }

    /// Four triangles fanned from the quad centroid, one per edge.
    pub fn quad_to_dense(&self) -> Result<Vec<Self>, TessellationError> {
        let c = self.quad_corners("quad_to_dense")?;
        let m = UvPoint::centroid(&c);
        Ok((0..4).map(|i| Self::tri(c[i], c[(i + 1) % 4], m)).collect())
    }

    /// Splits along the diagonal chosen by comparing both diagonals on the
    /// surface: `quad_to_tri((|p0 p2| > |p1 p3|) == flip)`.
    ///
    /// Diagonals within `tolerance` of zero length count as collapsed.
    pub fn quad_to_tri_by_length<E: SurfaceEvaluator + ?Sized>(
        &self,
        evaluator: &E,
        flip: bool,
        tolerance: Tolerance,
    ) -> Result<Vec<Self>, TessellationError> {
        let c = self.quad_corners("quad_to_tri_by_length")?;
        let p = c.map(|uv| evaluator.point_at(uv));
        let a = p[0].distance_to(p[2]);
        let b = p[1].distance_to(p[3]);
        if tolerance.is_zero_length(a) && tolerance.is_zero_length(b) {
            return Err(TessellationError::degenerate(
                "quad_to_tri_by_length",
                "both diagonals have zero length",
            ));
        }
        self.quad_to_tri((a > b) == flip)
    }

    /// Like [`quad_to_tri_by_length`](Self::quad_to_tri_by_length) but compares
    /// the summed area of the two candidate triangle pairs. Areas are checked
    /// against the squared tolerance.
    pub fn quad_to_tri_by_area<E: SurfaceEvaluator + ?Sized>(
        &self,
        evaluator: &E,
        flip: bool,
        tolerance: Tolerance,
    ) -> Result<Vec<Self>, TessellationError> {
        let c = self.quad_corners("quad_to_tri_by_area")?;
        let p = c.map(|uv| evaluator.point_at(uv));
        let a = triangle_area(p[0], p[1], p[2]) + triangle_area(p[2], p[3], p[0]);
        let b = triangle_area(p[0], p[1], p[3]) + triangle_area(p[2], p[3], p[1]);
        let eps = tolerance.eps_squared();
        if a.abs() <= eps && b.abs() <= eps {
            return Err(TessellationError::degenerate(
                "quad_to_tri_by_area",
                "both splits have zero area",
            ));
        }
        self.quad_to_tri((a > b) == flip)
    }

    /// Splits a hexagon into two quads; `shift` rotates the cut by whole corners
    /// and only matters mod 3.
    pub fn hex_to_split_quads(&self, shift: usize) -> Result<Vec<Self>, TessellationError> {
        let c = self.hex_corners("hex_to_split_quads")?;
        let s = shift % 3;
        Ok(vec![
            Self::quad(c[s], c[s + 1], c[s + 2], c[(s + 5) % 6]),
            Self::quad(c[(s + 5) % 6], c[s + 2], c[(s + 3) % 6], c[(s + 4) % 6]),
        ])
    }

    /// Splits a hexagon into three quads meeting at the midpoint of corners 2
    /// and 5.
    pub fn hex_to_radial_quads(&self, shift: usize) -> Result<Vec<Self>, TessellationError> {
        let c = self.hex_corners("hex_to_radial_quads")?;
        let m = c[2].midpoint(c[5]);
        let s = shift % 3;
        Ok(vec![
            Self::quad(c[s], c[s + 1], c[s + 2], m),
            Self::quad(c[s + 2], c[(s + 3) % 6], c[(s + 4) % 6], m),
            Self::quad(c[(s + 4) % 6], c[(s + 5) % 6], c[s], m),
        ])
    }

    pub fn hex_to_tris(&self, strategy: HexTriStrategy) -> Result<Vec<Self>, TessellationError> {
        let c = self.hex_corners("hex_to_tris")?;
        Ok(match strategy {
            HexTriStrategy::Side => vec![
                Self::tri(c[0], c[1], c[2]),
                Self::tri(c[3], c[4], c[2]),
                Self::tri(c[4], c[5], c[2]),
                Self::tri(c[5], c[0], c[2]),
            ],
            HexTriStrategy::Center => {
                let m = c[2].midpoint(c[5]);
                (0..6).map(|k| Self::tri(c[k], c[(k + 1) % 6], m)).collect()
            }
        })
    }

    // ───── rendering ─────

    /// Corner points on the surface, in corner order.
    pub fn evaluate<E: SurfaceEvaluator + ?Sized>(&self, evaluator: &E) -> Vec<Point3> {
        self.corners()
            .iter()
            .map(|uv| evaluator.point_at(*uv))
            .collect()
    }

    /// Open polyline through the corners in parameter space, at Z = 0.
    pub fn render_uv_polyline(&self) -> Result<Polyline3, TessellationError> {
        let points = self.corners().iter().map(|uv| uv.to_point3()).collect();
        Polyline3::new(points, false).map_err(TessellationError::Kernel)
    }

    /// Closed polyline through the evaluated corners.
    pub fn render_polygon<E: SurfaceEvaluator + ?Sized>(
        &self,
        evaluator: &E,
    ) -> Result<E::Curve, TessellationError> {
        let mut points = self.evaluate(evaluator);
        points.push(points[0]);
        evaluator.polyline(points, true)
    }

    /// Each edge interpolated on the surface, joined into one closed curve.
    pub fn render_interpolated_boundary<E: SurfaceEvaluator + ?Sized>(
        &self,
        evaluator: &E,
        tolerance: f64,
    ) -> Result<E::Curve, TessellationError> {
        let segments = self
            .edges()
            .map(|(a, b)| evaluator.interpolate_on_surface(a, b, tolerance))
            .collect::<Result<Vec<_>, _>>()?;
        evaluator.join_curves(segments)
    }

    /// Each edge as a shortest path on the surface, joined into one closed curve.
    pub fn render_geodesic_boundary<E: SurfaceEvaluator + ?Sized>(
        &self,
        evaluator: &E,
        tolerance: f64,
    ) -> Result<E::Curve, TessellationError> {
        let segments = self
            .edges()
            .map(|(a, b)| evaluator.shortest_path(a, b, tolerance))
            .collect::<Result<Vec<_>, _>>()?;
        evaluator.join_curves(segments)
    }

    /// Bilinear patch through the evaluated corners of a tri or quad.
    pub fn render_facet<E: SurfaceEvaluator + ?Sized>(
        &self,
        evaluator: &E,
        direction: SurfaceDirection,
    ) -> Result<E::Patch, TessellationError> {
        let p = |uv: UvPoint| evaluator.point_at(uv);
        let corners = match (self, direction) {
            (Self::Quad(c), SurfaceDirection::U) => vec![p(c[1]), p(c[0]), p(c[3]), p(c[2])],
            (Self::Quad(c), SurfaceDirection::V) => vec![p(c[0]), p(c[1]), p(c[2]), p(c[3])],
            (Self::Tri(c), SurfaceDirection::U) => vec![p(c[1]), p(c[0]), p(c[2])],
            (Self::Tri(c), SurfaceDirection::V) => vec![p(c[0]), p(c[1]), p(c[2])],
            (Self::Hex(_), _) => return Err(self.arity_error("render_facet", "tri or quad")),
        };
        evaluator.patch_from_corners(&corners)
    }

    /// The parameter rectangle spanned by an axis-aligned quad.
    fn iso_rectangle(
        &self,
        operation: &'static str,
        direction: SurfaceDirection,
    ) -> Result<((f64, f64), (f64, f64)), TessellationError> {
        let c = self.quad_corners(operation)?;
        Ok(match direction {
            SurfaceDirection::U => ((c[0].u, c[2].u), (c[0].v, c[1].v)),
            SurfaceDirection::V => ((c[0].u, c[1].u), (c[0].v, c[2].v)),
        })
    }

    /// The surface trimmed to the quad's parameter rectangle.
    pub fn render_iso_surface<E: SurfaceEvaluator + ?Sized>(
        &self,
        evaluator: &E,
        direction: SurfaceDirection,
    ) -> Result<E::Patch, TessellationError> {
        let (u, v) = self.iso_rectangle("render_iso_surface", direction)?;
        evaluator.trim_to_rectangle(u, v)
    }

    /// Boundary of [`render_iso_surface`](Self::render_iso_surface).
    pub fn render_iso_boundary<E: SurfaceEvaluator + ?Sized>(
        &self,
        evaluator: &E,
        direction: SurfaceDirection,
    ) -> Result<E::Curve, TessellationError> {
        let (u, v) = self.iso_rectangle("render_iso_boundary", direction)?;
        let patch = evaluator.trim_to_rectangle(u, v)?;
        evaluator.patch_boundary(&patch)
    }

    /// Lofts between the two transverse iso-curve segments at corners 0 and 2.
    ///
    /// The first rail spans corners 0 and 1 across the primary axis, the
    /// second spans corners 2 and 3.
    pub fn render_lofted_surface<E: SurfaceEvaluator + ?Sized>(
        &self,
        evaluator: &E,
        direction: SurfaceDirection,
    ) -> Result<E::Patch, TessellationError> {
        let c = self.quad_corners("render_lofted_surface")?;
        let d = direction.index();
        let t = 1 - d;
        let span = |a: UvPoint, b: UvPoint| {
            let (x, y) = (a.axis(t), b.axis(t));
            (x.min(y), x.max(y))
        };
        let transverse = direction.other();
        let rail_a = evaluator.iso_curve_segment(transverse, c[0].axis(d), span(c[0], c[1]))?;
        let rail_b = evaluator.iso_curve_segment(transverse, c[2].axis(d), span(c[2], c[3]))?;
        evaluator.loft(&rail_a, &rail_b)
    }

    fn edges(&self) -> impl Iterator<Item = (UvPoint, UvPoint)> + '_ {
        let c = self.corners();
        (0..c.len()).map(move |i| (c[i], c[(i + 1) % c.len()]))
    }
}

fn triangle_area(a: Point3, b: Point3, c: Point3) -> f64 {
    b.sub_point(a).cross(c.sub_point(a)).length() * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uv(u: f64, v: f64) -> UvPoint {
        UvPoint::new(u, v)
    }

    fn unit_quad() -> IsoFace {
        IsoFace::quad(uv(0.0, 0.0), uv(0.0, 1.0), uv(1.0, 1.0), uv(1.0, 0.0))
    }

    fn regular_hex() -> IsoFace {
        let corners: Vec<UvPoint> = (0..6)
            .map(|k| {
                let a = std::f64::consts::PI / 3.0 * k as f64;
                uv(0.5 + 0.4 * a.cos(), 0.5 + 0.4 * a.sin())
            })
            .collect();
        IsoFace::from_corners(&corners).unwrap()
    }

    #[test]
    fn from_corners_checks_arity() {
        assert!(IsoFace::from_corners(&[uv(0.0, 0.0), uv(1.0, 0.0), uv(0.0, 1.0)]).unwrap().is_tri());
        let err = IsoFace::from_corners(&[uv(0.0, 0.0), uv(1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, TessellationError::InvalidArity { found: 2, .. }));
    }

    #[test]
    fn quad_to_tri_flip_changes_diagonal() {
        let quad = unit_quad();
        let plain = quad.quad_to_tri(false).unwrap();
        let flipped = quad.quad_to_tri(true).unwrap();
        let c = quad.corners();

        // plain shares corners 1 and 3, flipped shares 0 and 2
        assert!(plain.iter().all(|t| t.corners().contains(&c[1]) && t.corners().contains(&c[3])));
        assert!(flipped.iter().all(|t| t.corners().contains(&c[0]) && t.corners().contains(&c[2])));
        assert_ne!(plain, flipped);
        let total: f64 = plain.iter().map(IsoFace::parameter_area).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn quad_to_dense_fans_from_centroid() {
        let tris = unit_quad().quad_to_dense().unwrap();
        assert_eq!(tris.len(), 4);
        for t in &tris {
            assert_eq!(t.corners()[2], uv(0.5, 0.5));
            assert!((t.parameter_area() - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn hex_split_preserves_area_and_cycles_mod_three() {
        let hex = regular_hex();
        for shift in 0..3 {
            let quads = hex.hex_to_split_quads(shift).unwrap();
            assert_eq!(quads.len(), 2);
            let area: f64 = quads.iter().map(IsoFace::parameter_area).sum();
            assert!((area - hex.parameter_area()).abs() < 1e-12);
            assert_eq!(quads, hex.hex_to_split_quads(shift + 3).unwrap());
        }
    }

    #[test]
    fn hex_triangulations_cover_the_hexagon() {
        let hex = regular_hex();
        for strategy in [HexTriStrategy::Side, HexTriStrategy::Center] {
            let tris = hex.hex_to_tris(strategy).unwrap();
            let area: f64 = tris.iter().map(IsoFace::parameter_area).sum();
            assert!((area - hex.parameter_area()).abs() < 1e-12);
        }
        assert_eq!(hex.hex_to_tris(HexTriStrategy::Side).unwrap().len(), 4);
        assert_eq!(hex.hex_to_tris(HexTriStrategy::Center).unwrap().len(), 6);
        let radial = hex.hex_to_radial_quads(1).unwrap();
        let area: f64 = radial.iter().map(IsoFace::parameter_area).sum();
        assert!((area - hex.parameter_area()).abs() < 1e-12);
    }

    #[test]
    fn wrong_arity_is_an_error_not_an_empty_list() {
        let quad = unit_quad();
        assert!(matches!(
            quad.hex_to_split_quads(0),
            Err(TessellationError::InvalidArity { expected: "hex", found: 4, .. })
        ));
        assert!(regular_hex().quad_to_tri(false).is_err());
    }

    #[test]
    fn uv_polyline_reproduces_corners() {
        let quad = unit_quad();
        let line = quad.render_uv_polyline().unwrap();
        let back: Vec<UvPoint> = line.points().iter().map(|p| uv(p.x, p.y)).collect();
        assert_eq!(back, quad.corners());
    }
}

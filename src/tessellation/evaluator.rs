//! The surface capability a [`Grid`](super::Grid) needs.
//!
//! Patterns only ever ask for iso-curve divisions; rendering asks for the
//! remaining operations. Parameters are always in the unit square.

use super::direction::SurfaceDirection;
use super::error::TessellationError;
use crate::geom::{Point3, UvPoint};

pub trait SurfaceEvaluator {
    /// Curve output of boundary renders.
    type Curve;
    /// Surface output of facet, loft and iso renders.
    type Patch;

    fn point_at(&self, uv: UvPoint) -> Point3;

    /// Divides the iso-curve along which `direction` varies, at `constant` on
    /// the other axis, into `count` pieces of equal length.
    ///
    /// Returns `count + 1` parameters along `direction`, starting at exactly 0
    /// and ending at exactly 1.
    fn divide_iso_curve(
        &self,
        direction: SurfaceDirection,
        constant: f64,
        count: usize,
    ) -> Result<Vec<f64>, TessellationError>;

    /// The part of an iso-curve between two parameters along `direction`.
    fn iso_curve_segment(
        &self,
        direction: SurfaceDirection,
        constant: f64,
        range: (f64, f64),
    ) -> Result<Self::Curve, TessellationError>;

    fn trim_to_rectangle(
        &self,
        u_range: (f64, f64),
        v_range: (f64, f64),
    ) -> Result<Self::Patch, TessellationError>;

    /// Closed outer boundary of a patch.
    fn patch_boundary(&self, patch: &Self::Patch) -> Result<Self::Curve, TessellationError>;

    fn polyline(&self, points: Vec<Point3>, closed: bool)
    -> Result<Self::Curve, TessellationError>;

    /// Bilinear patch through 3 or 4 corners given in boundary-loop order.
    fn patch_from_corners(&self, corners: &[Point3]) -> Result<Self::Patch, TessellationError>;

    /// The surface image of the straight parameter segment from `a` to `b`.
    fn interpolate_on_surface(
        &self,
        a: UvPoint,
        b: UvPoint,
        tolerance: f64,
    ) -> Result<Self::Curve, TessellationError>;

    fn shortest_path(
        &self,
        a: UvPoint,
        b: UvPoint,
        tolerance: f64,
    ) -> Result<Self::Curve, TessellationError>;

    /// Joins segments into one closed curve, or fails with
    /// [`TessellationError::BoundaryJoinFailure`].
    fn join_curves(&self, segments: Vec<Self::Curve>) -> Result<Self::Curve, TessellationError>;

    fn loft(&self, a: &Self::Curve, b: &Self::Curve) -> Result<Self::Patch, TessellationError>;
}

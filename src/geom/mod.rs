mod core;
mod curve;
mod curve_ops;
mod geodesic;
mod surface;

pub use core::{Point3, Tolerance, UvPoint, Vec3};
pub use curve::{
    Curve3, Line3, Polyline3, SubCurve, curve_arc_length, curve_parameters_by_count,
    extract_subcurve, tessellate_curve_uniform,
};
pub use curve_ops::{JoinPolylinesDiagnostics, JoinPolylinesOptions, join_polylines};
pub use geodesic::{GeodesicError, GeodesicOptions, GeodesicPath, shortest_path};
pub use surface::{
    CylinderSurface, FourPointSurface, IsotrimDiagnostics, IsotrimSurface, NurbsSurface,
    PlaneSurface, RuledSurface, SphereSurface, Surface, SurfaceIsoCurve, UnitizedSurface,
    isotrim_surface, refine_uv_polyline, sample_surface_grid,
};

#[cfg(test)]
mod tests;

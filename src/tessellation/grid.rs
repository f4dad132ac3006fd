//! The cell collection and its render entry points.
//!
//! Pattern builders live in `quads.rs`, `triangles.rs`, `diamonds.rs` and
//! `hexagons.rs`; each is an `impl Grid` block over the helpers here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::direction::SurfaceDirection;
use super::error::TessellationError;
use super::evaluator::SurfaceEvaluator;
use super::iso_face::IsoFace;
use super::options::{GridOptions, RenderOptions};
use crate::geom::{Point3, Polyline3, UvPoint};

/// Row key to cell list. Keys are read out in ascending order.
pub type FaceMap = BTreeMap<i32, Vec<IsoFace>>;

/// How [`Grid::render`] turns cells into geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Corner polylines in parameter space.
    #[default]
    Uv,
    Polygon,
    Interpolated,
    Geodesic,
    IsoBoundary,
    Facet,
    Loft,
    IsoSurface,
}

impl RenderMode {
    pub const ALL: [Self; 8] = [
        Self::Uv,
        Self::Polygon,
        Self::Interpolated,
        Self::Geodesic,
        Self::IsoBoundary,
        Self::Facet,
        Self::Loft,
        Self::IsoSurface,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uv => "uv",
            Self::Polygon => "polygon",
            Self::Interpolated => "interpolated",
            Self::Geodesic => "geodesic",
            Self::IsoBoundary => "iso_boundary",
            Self::Facet => "facet",
            Self::Loft => "loft",
            Self::IsoSurface => "iso_surface",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|mode| mode.name() == normalized)
    }

    /// Whether the mode produces surfaces rather than curves.
    #[must_use]
    pub const fn is_patch(self) -> bool {
        matches!(self, Self::Facet | Self::Loft | Self::IsoSurface)
    }
}

/// One rendered cell.
pub enum RenderOutput<E: SurfaceEvaluator> {
    Uv(Polyline3),
    Curve(E::Curve),
    Patch(E::Patch),
}

/// The lattice of division points most patterns are built from.
///
/// `at(i, j)` is the `j`-th secondary division on the `i`-th primary
/// iso-curve, whichever physical axis is primary.
pub(crate) struct UvLattice {
    operation: &'static str,
    count_u: usize,
    count_v: usize,
    rows: Vec<Vec<UvPoint>>,
}

impl UvLattice {
    pub(crate) fn at(&self, i: i64, j: i64) -> Result<UvPoint, TessellationError> {
        let row = usize::try_from(i).ok().and_then(|i| self.rows.get(i));
        row.and_then(|row| usize::try_from(j).ok().and_then(|j| row.get(j)))
            .copied()
            .ok_or(TessellationError::InvalidDivisionCount {
                operation: self.operation,
                count_u: self.count_u,
                count_v: self.count_v,
            })
    }

    pub(crate) fn into_rows(self) -> Vec<Vec<UvPoint>> {
        self.rows
    }
}

/// A tessellation of a unit-parameter surface.
#[derive(Clone)]
pub struct Grid<E: SurfaceEvaluator> {
    evaluator: E,
    faces: FaceMap,
    direction: SurfaceDirection,
    options: GridOptions,
}

impl<E: SurfaceEvaluator> Grid<E> {
    #[must_use]
    pub fn new(evaluator: E) -> Self {
        Self::with_options(evaluator, GridOptions::default())
    }

    #[must_use]
    pub fn with_options(evaluator: E, options: GridOptions) -> Self {
        Self {
            evaluator,
            faces: FaceMap::new(),
            direction: SurfaceDirection::U,
            options,
        }
    }

    #[must_use]
    pub const fn evaluator(&self) -> &E {
        &self.evaluator
    }

    #[must_use]
    pub const fn options(&self) -> GridOptions {
        self.options
    }

    /// Primary axis of the last pattern call.
    #[must_use]
    pub const fn direction(&self) -> SurfaceDirection {
        self.direction
    }

    /// All cells, rows in ascending key order.
    #[must_use]
    pub fn faces(&self) -> Vec<IsoFace> {
        self.faces.values().flatten().cloned().collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = (i32, &[IsoFace])> + '_ {
        self.faces.iter().map(|(key, row)| (*key, row.as_slice()))
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.values().map(Vec::len).sum()
    }

    /// Installs cells assembled by the caller.
    pub fn replace_faces(&mut self, faces: FaceMap, direction: SurfaceDirection) {
        self.faces = faces;
        self.direction = direction;
    }

    pub fn clear(&mut self) {
        self.faces.clear();
    }

    /// The `(count_u + 1) x (count_v + 1)` division lattice.
    ///
    /// The primary iso-curve at 0 on the other axis is divided into `count_u`
    /// pieces; the transverse iso-curve through each division is divided into
    /// `count_v` pieces.
    pub fn underlying_grid(
        &self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
    ) -> Result<Vec<Vec<UvPoint>>, TessellationError> {
        validate_counts("underlying_grid", count_u, count_v)?;
        Ok(self
            .lattice("underlying_grid", direction, count_u, count_v)?
            .into_rows())
    }

    // ───── pattern helpers ─────

    /// Validates counts and the cell budget, then clears the map.
    pub(crate) fn begin(
        &mut self,
        operation: &'static str,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        cells_per_division: usize,
    ) -> Result<(), TessellationError> {
        validate_counts(operation, count_u, count_v)?;
        let estimated = count_u
            .saturating_mul(count_v)
            .saturating_mul(cells_per_division);
        if estimated > self.options.max_cells {
            return Err(TessellationError::TooManyCells {
                operation,
                estimated,
                limit: self.options.max_cells,
            });
        }
        self.faces.clear();
        self.direction = direction;
        Ok(())
    }

    pub(crate) fn finish(&self, operation: &'static str) {
        log::debug!(
            "{operation}: {} cells in {} rows",
            self.face_count(),
            self.faces.len()
        );
    }

    pub(crate) fn primary_divisions(
        &self,
        direction: SurfaceDirection,
        count: usize,
    ) -> Result<Vec<f64>, TessellationError> {
        self.evaluator.divide_iso_curve(direction, 0.0, count)
    }

    pub(crate) fn secondary_divisions(
        &self,
        direction: SurfaceDirection,
        at: f64,
        count: usize,
    ) -> Result<Vec<f64>, TessellationError> {
        self.evaluator.divide_iso_curve(direction.other(), at, count)
    }

    pub(crate) fn lattice(
        &self,
        operation: &'static str,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
    ) -> Result<UvLattice, TessellationError> {
        let u = self.primary_divisions(direction, count_u)?;
        let rows = u
            .iter()
            .map(|&ui| {
                let v = self.secondary_divisions(direction, ui, count_v)?;
                Ok(v.into_iter().map(|vj| direction.compose(ui, vj)).collect())
            })
            .collect::<Result<Vec<Vec<UvPoint>>, TessellationError>>()?;
        Ok(UvLattice {
            operation,
            count_u,
            count_v,
            rows,
        })
    }

    pub(crate) fn row(&mut self, key: i64) -> &mut Vec<IsoFace> {
        self.faces.entry(row_key(key)).or_default()
    }

    /// Replaces every cell by the output of `split`, keeping row keys.
    /// `split` also sees the row key and the cell's index within its row.
    ///
    /// The split cells count against `max_cells` again. On overflow or a
    /// failed split the map is cleared.
    pub(crate) fn map_faces<F>(
        &mut self,
        operation: &'static str,
        mut split: F,
    ) -> Result<(), TessellationError>
    where
        F: FnMut(&E, i64, usize, &IsoFace) -> Result<Vec<IsoFace>, TessellationError>,
    {
        let limit = self.options.max_cells;
        let mut next = FaceMap::new();
        let mut total = 0usize;
        let mut failure = None;
        'rows: for (key, row) in &self.faces {
            let mut out = Vec::with_capacity(row.len() * 2);
            for (index, face) in row.iter().enumerate() {
                match split(&self.evaluator, i64::from(*key), index, face) {
                    Ok(cells) => out.extend(cells),
                    Err(err) => {
                        failure = Some(err);
                        break 'rows;
                    }
                }
            }
            total += out.len();
            if total > limit {
                failure = Some(TessellationError::TooManyCells {
                    operation,
                    estimated: total,
                    limit,
                });
                break;
            }
            next.insert(*key, out);
        }
        if let Some(err) = failure {
            self.faces.clear();
            return Err(err);
        }
        self.faces = next;
        Ok(())
    }

    // ───── rendering ─────

    /// Corner points of every cell on the surface.
    #[must_use]
    pub fn evaluate(&self) -> Vec<Vec<Point3>> {
        self.face_iter()
            .map(|face| face.evaluate(&self.evaluator))
            .collect()
    }

    fn face_iter(&self) -> impl Iterator<Item = &IsoFace> + '_ {
        self.faces.values().flatten()
    }

    fn render_each<T, F>(&self, mode: RenderMode, mut f: F) -> Vec<Result<T, TessellationError>>
    where
        F: FnMut(&IsoFace) -> Result<T, TessellationError>,
    {
        let out: Vec<_> = self.face_iter().map(&mut f).collect();
        let failed = out.iter().filter(|entry| entry.is_err()).count();
        if failed > 0 {
            log::warn!(
                "render {}: {failed} of {} cells failed",
                mode.name(),
                out.len()
            );
        }
        out
    }

    /// One entry per cell in read-out order, failures included.
    pub fn render(
        &self,
        mode: RenderMode,
        options: &RenderOptions,
    ) -> Vec<Result<RenderOutput<E>, TessellationError>> {
        fn wrap<T, U>(
            entries: Vec<Result<T, TessellationError>>,
            f: impl Fn(T) -> U,
        ) -> Vec<Result<U, TessellationError>> {
            entries.into_iter().map(|entry| entry.map(&f)).collect()
        }

        match mode {
            RenderMode::Uv => wrap(self.render_to_uv(), RenderOutput::Uv),
            RenderMode::Polygon => wrap(self.render_to_polygon_boundaries(), RenderOutput::Curve),
            RenderMode::Interpolated => wrap(
                self.render_to_interpolated_boundaries(options.interpolation_tolerance),
                RenderOutput::Curve,
            ),
            RenderMode::Geodesic => wrap(
                self.render_to_geodesic_boundaries(options.geodesic_tolerance),
                RenderOutput::Curve,
            ),
            RenderMode::IsoBoundary => wrap(self.render_to_iso_boundaries(), RenderOutput::Curve),
            RenderMode::Facet => wrap(self.render_to_facets(), RenderOutput::Patch),
            RenderMode::Loft => wrap(self.render_to_lofted_surfaces(), RenderOutput::Patch),
            RenderMode::IsoSurface => wrap(self.render_to_iso_surfaces(), RenderOutput::Patch),
        }
    }

    pub fn render_to_uv(&self) -> Vec<Result<Polyline3, TessellationError>> {
        self.render_each(RenderMode::Uv, IsoFace::render_uv_polyline)
    }

    pub fn render_to_polygon_boundaries(&self) -> Vec<Result<E::Curve, TessellationError>> {
        self.render_each(RenderMode::Polygon, |face| {
            face.render_polygon(&self.evaluator)
        })
    }

    pub fn render_to_interpolated_boundaries(
        &self,
        tolerance: f64,
    ) -> Vec<Result<E::Curve, TessellationError>> {
        self.render_each(RenderMode::Interpolated, |face| {
            face.render_interpolated_boundary(&self.evaluator, tolerance)
        })
    }

    pub fn render_to_geodesic_boundaries(
        &self,
        tolerance: f64,
    ) -> Vec<Result<E::Curve, TessellationError>> {
        self.render_each(RenderMode::Geodesic, |face| {
            face.render_geodesic_boundary(&self.evaluator, tolerance)
        })
    }

    pub fn render_to_iso_boundaries(&self) -> Vec<Result<E::Curve, TessellationError>> {
        self.render_each(RenderMode::IsoBoundary, |face| {
            face.render_iso_boundary(&self.evaluator, self.direction)
        })
    }

    pub fn render_to_facets(&self) -> Vec<Result<E::Patch, TessellationError>> {
        self.render_each(RenderMode::Facet, |face| {
            face.render_facet(&self.evaluator, self.direction)
        })
    }

    pub fn render_to_lofted_surfaces(&self) -> Vec<Result<E::Patch, TessellationError>> {
        self.render_each(RenderMode::Loft, |face| {
            face.render_lofted_surface(&self.evaluator, self.direction)
        })
    }

    pub fn render_to_iso_surfaces(&self) -> Vec<Result<E::Patch, TessellationError>> {
        self.render_each(RenderMode::IsoSurface, |face| {
            face.render_iso_surface(&self.evaluator, self.direction)
        })
    }
}

fn validate_counts(
    operation: &'static str,
    count_u: usize,
    count_v: usize,
) -> Result<(), TessellationError> {
    if count_u == 0 || count_v == 0 {
        return Err(TessellationError::InvalidDivisionCount {
            operation,
            count_u,
            count_v,
        });
    }
    Ok(())
}

fn row_key(key: i64) -> i32 {
    i32::try_from(key).unwrap_or(if key < 0 { i32::MIN } else { i32::MAX })
}

/// `t` must be finite and within [0, 1].
pub(crate) fn validate_fraction(
    operation: &'static str,
    name: &'static str,
    t: f64,
) -> Result<f64, TessellationError> {
    if t.is_finite() && (0.0..=1.0).contains(&t) {
        Ok(t)
    } else {
        Err(TessellationError::parameter(
            operation,
            name,
            format!("{t} is not within [0, 1]"),
        ))
    }
}

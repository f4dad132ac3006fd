//! Triangle patterns derived from the basic quad grid, plus staggered
//! triangles.

use super::direction::SurfaceDirection;
use super::error::TessellationError;
use super::evaluator::SurfaceEvaluator;
use super::grid::Grid;
use super::iso_face::IsoFace;
use super::options::TriangulationStyle;
use crate::geom::UvPoint;

impl<E: SurfaceEvaluator> Grid<E> {
    /// Basic quads, each split in two along the diagonal `style` picks.
    ///
    /// `flip` inverts the choice for every style; the length and area styles
    /// measure the diagonals on the surface.
    pub fn set_triangles(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        style: TriangulationStyle,
        flip: bool,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_triangles";
        self.begin(OP, direction, count_u, count_v, 2)?;
        self.set_basic_quads(direction, count_u, count_v)?;
        let f = i64::from(flip);
        let tolerance = self.options().tolerance;
        self.map_faces(OP, |evaluator, i, j, face| {
            let j = j as i64;
            match style {
                TriangulationStyle::Basic => face.quad_to_tri(flip),
                TriangulationStyle::Wave => face.quad_to_tri((i + f) % 2 == 0),
                TriangulationStyle::Cross => face.quad_to_tri((i + j + f) % 2 == 0),
                TriangulationStyle::Ring => face.quad_to_tri(((i % 2) * j + f) % 2 == 0),
                TriangulationStyle::Length => face.quad_to_tri_by_length(evaluator, flip, tolerance),
                TriangulationStyle::Area => {
                    face.quad_to_tri_by_area(evaluator, flip, tolerance)
                }
            }
        })?;
        self.finish(OP);
        Ok(())
    }

    /// Basic quads, each fanned into four triangles around its centroid.
    pub fn set_dense_triangles(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_dense_triangles";
        self.begin(OP, direction, count_u, count_v, 4)?;
        self.set_basic_quads(direction, count_u, count_v)?;
        self.map_faces(OP, |_, _, _, face| face.quad_to_dense())?;
        self.finish(OP);
        Ok(())
    }

    /// Rows of triangles pointing alternately up and down, offset half a
    /// cell between neighbouring rows.
    ///
    /// Each bounding iso-curve is divided into `2 * count_v` pieces; `flip`
    /// swaps which rows start with a full triangle.
    pub fn set_staggered_triangles(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        flip: bool,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_staggered_triangles";
        self.begin(OP, direction, count_u, count_v, 3)?;
        let u = self.primary_divisions(direction, count_u)?;
        let c = count_v * 2;
        let f = usize::from(flip);
        let pt = UvPoint::new;
        let pick = |p0: [UvPoint; 6], p1: [UvPoint; 6]| match direction {
            SurfaceDirection::U => p0,
            SurfaceDirection::V => p1,
        };
        let face = |p: [UvPoint; 6], k: usize| IsoFace::tri(p[1 + k * 3], p[k * 3], p[2 + k * 3]);

        for i in 1..=count_u {
            let k = (i + f) % 2;
            let m = 1 - k;
            let (u0, u1) = (u[i - 1], u[i]);
            let va = self.secondary_divisions(direction, u0, c)?;
            let vb = self.secondary_divisions(direction, u1, c)?;
            let inner = |j: usize| {
                pick(
                    [
                        pt(u0, va[j]),
                        pt(u0, va[j + 2]),
                        pt(u1, vb[j + 1]),
                        pt(u1, vb[j + 2]),
                        pt(u1, vb[j]),
                        pt(u0, va[j + 1]),
                    ],
                    [
                        pt(va[j + 2], u0),
                        pt(va[j], u0),
                        pt(vb[j + 1], u1),
                        pt(vb[j], u1),
                        pt(vb[j + 2], u1),
                        pt(va[j + 1], u0),
                    ],
                )
            };

            let mut row = Vec::with_capacity(c + 1);
            for j in (0..c - 1).step_by(2) {
                row.push(face(inner(j), k));
            }
            let start = pick(
                [
                    pt(u0, va[0]),
                    pt(u0, va[1]),
                    pt(u1, vb[0]),
                    pt(u1, vb[1]),
                    pt(u1, vb[0]),
                    pt(u0, va[0]),
                ],
                [
                    pt(va[1], u0),
                    pt(va[0], u0),
                    pt(vb[0], u1),
                    pt(vb[0], u1),
                    pt(vb[1], u1),
                    pt(va[0], u0),
                ],
            );
            row.push(face(start, m));
            for j in (1..c.saturating_sub(2)).step_by(2) {
                row.push(face(inner(j), m));
            }
            let end = pick(
                [
                    pt(u0, va[c - 1]),
                    pt(u0, va[c]),
                    pt(u1, vb[c]),
                    pt(u1, vb[c]),
                    pt(u1, vb[c - 1]),
                    pt(u0, va[c]),
                ],
                [
                    pt(va[c], u0),
                    pt(va[c - 1], u0),
                    pt(vb[c], u1),
                    pt(vb[c - 1], u1),
                    pt(vb[c], u1),
                    pt(va[c], u0),
                ],
            );
            row.push(face(end, m));
            self.row(i as i64 - 1).extend(row);
        }
        self.finish(OP);
        Ok(())
    }
}

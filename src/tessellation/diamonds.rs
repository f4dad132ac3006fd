//! Diamond patterns: cells rotated 45 degrees against the division lattice.

use super::direction::SurfaceDirection;
use super::error::TessellationError;
use super::evaluator::SurfaceEvaluator;
use super::grid::Grid;
use super::iso_face::IsoFace;
use super::options::EdgeFilter;

impl<E: SurfaceEvaluator> Grid<E> {
    /// Diamonds spanning two lattice cells in each direction, every diamond
    /// split into two triangles across the primary axis.
    ///
    /// Interior diamond halves go to rows `2i + 1` and `2i + 2`; boundary
    /// triangles along the first and last primary iso-curves go to rows 0 and
    /// `2 * count_u`. `filter` keeps the interior, the boundary, or both.
    #[allow(clippy::too_many_lines)]
    pub fn set_diamond_triangles(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        flip: bool,
        filter: EdgeFilter,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_diamond_triangles";
        self.begin(OP, direction, count_u, count_v, 2)?;
        let lat = self.lattice(OP, direction, count_u, count_v)?;
        let p = |i: i64, j: i64| lat.at(i, j);
        let f = i64::from(flip);
        let (nu, nv) = (count_u as i64, count_v as i64);
        let (cu, cv) = (nu + 1, nv + 1);

        if filter.interior() {
            for i in 0..nu - 1 {
                let k = (i + f) % 2;
                let a = i * 2;
                self.row(a + 1);
                self.row(a + 2);
                for j in (0..cv - 2 - k).step_by(2) {
                    let uv0 = p(i, j + k + 1)?;
                    let uv1 = p(i + 1, j + k + 2)?;
                    let uv2 = p(i + 2, j + k + 1)?;
                    let uv3 = p(i + 1, j + k)?;
                    self.row(a + 1).push(IsoFace::tri(uv0, uv1, uv3));
                    self.row(a + 2).push(IsoFace::tri(uv3, uv1, uv2));
                }
            }
        }

        if filter.edges() {
            let k = 1 - f;
            let mut first = Vec::new();
            if !flip {
                first.push(IsoFace::tri(p(0, 0)?, p(0, 1)?, p(1, 0)?));
            }
            for j in (0..cv - 2 - k).step_by(2) {
                first.push(IsoFace::tri(p(0, j + k)?, p(0, j + k + 2)?, p(1, j + k + 1)?));
            }
            if (f + nv) % 2 == 0 {
                first.push(IsoFace::tri(p(0, cv - 2)?, p(0, cv - 1)?, p(1, cv - 1)?));
            }
            self.row(0).extend(first);

            let k = (1 - f + nu) % 2;
            let mut last = Vec::new();
            if (f + nu) % 2 == 0 {
                last.push(IsoFace::tri(p(cu - 2, 0)?, p(cu - 1, 1)?, p(cu - 1, 0)?));
            }
            for j in (0..cv - 2 - k).step_by(2) {
                last.push(IsoFace::tri(p(nu, j + k)?, p(nu - 1, j + k + 1)?, p(nu, j + k + 2)?));
            }
            if (f + nu + nv) % 2 == 0 {
                last.push(IsoFace::tri(p(cu - 2, cv - 1)?, p(cu - 1, cv - 1)?, p(cu - 1, cv - 2)?));
            }
            self.row(nu * 2).extend(last);

            let k = 1 - f;
            for i in (0..nu - 1 - k).step_by(2) {
                let a = i * 2;
                let uv0 = p(i + k, 0)?;
                let uv1 = p(i + k + 1, 1)?;
                let uv2 = p(i + k + 2, 0)?;
                let uv3 = p(i + k + 1, 0)?;
                self.row(a + 1 + k * 2).insert(0, IsoFace::tri(uv0, uv1, uv3));
                self.row(a + 2 + k * 2).insert(0, IsoFace::tri(uv3, uv1, uv2));
            }

            let k = (1 - f + nv) % 2;
            for i in (0..nu - 1 - k).step_by(2) {
                let a = i * 2;
                let uv0 = p(i + k, cv - 1)?;
                let uv1 = p(i + k + 2, cv - 1)?;
                let uv2 = p(i + k + 1, cv - 2)?;
                let uv3 = p(i + k + 1, cv - 1)?;
                self.row(a + 1 + k * 2).push(IsoFace::tri(uv0, uv3, uv2));
                self.row(a + 2 + k * 2).push(IsoFace::tri(uv2, uv3, uv1));
            }
        }
        self.finish(OP);
        Ok(())
    }

    /// Whole diamonds as quads, one row per interior primary division, with
    /// boundary triangles along all four sides.
    ///
    /// Rows 0 and `count_u` hold the triangles along the first and last
    /// primary iso-curves.
    pub fn set_diamond_quads(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        flip: bool,
        filter: EdgeFilter,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_diamond_quads";
        self.begin(OP, direction, count_u, count_v, 2)?;
        let lat = self.lattice(OP, direction, count_u, count_v)?;
        let p = |i: i64, j: i64| lat.at(i, j);
        let f = i64::from(flip);
        let (nu, nv) = (count_u as i64, count_v as i64);
        let (cu, cv) = (nu + 1, nv + 1);

        if filter.interior() {
            for i in 0..nu - 1 {
                let k = (i + f) % 2;
                let mut row = Vec::new();
                for j in (0..cv - 2 - k).step_by(2) {
                    row.push(IsoFace::quad(
                        p(i, j + k + 1)?,
                        p(i + 1, j + k + 2)?,
                        p(i + 2, j + k + 1)?,
                        p(i + 1, j + k)?,
                    ));
                }
                self.row(i + 1).extend(row);
            }
        }

        if filter.edges() {
            let k = 1 - f;
            let mut first = Vec::new();
            if !flip {
                first.push(IsoFace::tri(p(0, 0)?, p(0, 1)?, p(1, 0)?));
            }
            for j in (0..cv - 2 - k).step_by(2) {
                first.push(IsoFace::tri(p(0, j + k)?, p(0, j + k + 2)?, p(1, j + k + 1)?));
            }
            if (f + nv) % 2 == 0 {
                first.push(IsoFace::tri(p(0, cv - 2)?, p(0, cv - 1)?, p(1, cv - 1)?));
            }
            self.row(0).extend(first);

            let k = (1 - f + nu) % 2;
            let mut last = Vec::new();
            if (f + nu) % 2 == 0 {
                last.push(IsoFace::tri(p(cu - 2, 0)?, p(cu - 1, 1)?, p(cu - 1, 0)?));
            }
            for j in (0..cv - 2 - k).step_by(2) {
                last.push(IsoFace::tri(p(nu, j + k)?, p(nu - 1, j + k + 1)?, p(nu, j + k + 2)?));
            }
            if (f + nu + nv) % 2 == 0 {
                last.push(IsoFace::tri(p(cu - 2, cv - 1)?, p(cu - 1, cv - 1)?, p(cu - 1, cv - 2)?));
            }
            self.row(nu).extend(last);

            let k = 1 - f;
            for i in (0..nu - 1 - k).step_by(2) {
                let face = IsoFace::tri(p(i + k, 0)?, p(i + k + 1, 1)?, p(i + k + 2, 0)?);
                self.row(i + 1 + k).insert(0, face);
            }

            let k = (1 - f + nv) % 2;
            for i in (0..nu - 1 - k).step_by(2) {
                let face = IsoFace::tri(p(i + k, cv - 1)?, p(i + k + 2, cv - 1)?, p(i + k + 1, cv - 2)?);
                self.row(i + 1 + k).push(face);
            }
        }
        self.finish(OP);
        Ok(())
    }
}

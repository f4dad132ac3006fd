//! Hexagon patterns and their quad and triangle splits.

use super::direction::SurfaceDirection;
use super::error::TessellationError;
use super::evaluator::SurfaceEvaluator;
use super::grid::{Grid, validate_fraction};
use super::iso_face::IsoFace;
use super::options::{EdgeFilter, HexTriStrategy};

impl<E: SurfaceEvaluator> Grid<E> {
    /// Offset hexagons on a lattice with `2 * count_v` secondary divisions.
    ///
    /// Each hexagon spans two primary divisions; `t` pulls its side corners
    /// towards the shared lattice point, so `t = 1/3` gives near-regular cells
    /// on a square lattice. Boundary cells are cut into quads and partial
    /// hexagons. Row `i / 2 + 1` holds the hexagons starting at primary
    /// division `i`; rows 0 and `count_u / 2 + 1` hold the boundary quads.
    pub fn set_hexagons(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        t: f64,
        flip: bool,
        filter: EdgeFilter,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_hexagons";
        self.build_hexagons(OP, direction, (count_u, count_v), t, flip, filter, 2)?;
        self.finish(OP);
        Ok(())
    }

    /// Shared hexagon builder; `cells_per_division` bounds what the caller
    /// will make of the hexagons.
    #[allow(clippy::too_many_lines, clippy::similar_names, clippy::too_many_arguments)]
    fn build_hexagons(
        &mut self,
        operation: &'static str,
        direction: SurfaceDirection,
        (count_u, count_v): (usize, usize),
        t: f64,
        flip: bool,
        filter: EdgeFilter,
        cells_per_division: usize,
    ) -> Result<(), TessellationError> {
        let t = validate_fraction(operation, "t", t)?;
        self.begin(operation, direction, count_u, count_v, cells_per_division)?;
        let lat = self.lattice(operation, direction, count_u, count_v * 2)?;
        let p = |i: i64, j: i64| lat.at(i, j);
        let tw = |a: (i64, i64), b: (i64, i64)| -> Result<_, TessellationError> {
            Ok(p(a.0, a.1)?.tween(p(b.0, b.1)?, t))
        };
        let f = i64::from(flip);
        let (nu, nv) = (count_u as i64, count_v as i64);
        let c = nu / 2 + 1;
        let cu = nu + 1;
        let cv = nv * 2 + 1;
        let odd_u = (nu + f + 1) % 2;
        let odd_v = (nv + f + 1) % 2;

        if filter.interior() {
            for i in (0..cu - 2).step_by(2) {
                let mut row = Vec::new();
                for j in (1..cv - 2).step_by(2) {
                    let k = (j / 2 + f) % 2;
                    if i + k < cu - 2 {
                        let (a, b, cc) = (i + k, i + k + 1, i + k + 2);
                        row.push(IsoFace::hex([
                            tw((a, j + 1), (a, j - 1))?,
                            tw((a, j + 1), (a, j + 3))?,
                            tw((b, j + 3), (b, j + 1))?,
                            tw((cc, j + 1), (cc, j + 3))?,
                            tw((cc, j + 1), (cc, j - 1))?,
                            tw((b, j - 1), (b, j + 1))?,
                        ]));
                    }
                }
                self.row(i / 2 + 1).extend(row);
            }
        }

        if filter.edges() {
            let k = (1 - f) * 2;
            let mut first = Vec::new();
            if !flip {
                first.push(IsoFace::quad(p(0, 0)?, tw((0, 2), (0, 0))?, tw((1, 0), (1, 2))?, p(1, 0)?));
            }
            for j in (1..cv - 2 - k).step_by(4) {
                let a0 = tw((1, j + k + 1), (1, j + k + 3))?;
                let a1 = tw((1, j + k + 1), (1, j + k - 1))?;
                let b0 = tw((0, j + k + 3), (0, j + k + 1))?;
                let b1 = tw((0, j + k - 1), (0, j + k + 1))?;
                first.push(IsoFace::quad(a0, a1, b1, b0));
            }
            if odd_v != 0 {
                first.push(IsoFace::quad(
                    tw((0, cv - 3), (0, cv - 1))?,
                    p(0, cv - 1)?,
                    p(1, cv - 1)?,
                    tw((1, cv - 1), (1, cv - 3))?,
                ));
            }
            self.row(0).extend(first);

            let k = ((1 - f + nu) % 2) * 2;
            let mut last = Vec::new();
            for j in (1..cv - 2 - k).step_by(4) {
                let a0 = tw((cu - 2, j + k + 1), (cu - 2, j + k - 1))?;
                let a1 = tw((cu - 2, j + k + 1), (cu - 2, j + k + 3))?;
                let b0 = tw((cu - 1, j + k - 1), (cu - 1, j + k + 1))?;
                let b1 = tw((cu - 1, j + k + 3), (cu - 1, j + k + 1))?;
                last.push(IsoFace::quad(a0, a1, b1, b0));
            }
            if odd_u != 0 {
                last.insert(
                    0,
                    IsoFace::quad(
                        tw((cu - 1, 2), (cu - 1, 0))?,
                        p(cu - 1, 0)?,
                        p(cu - 2, 0)?,
                        tw((cu - 2, 0), (cu - 2, 2))?,
                    ),
                );
            }
            self.row(c).extend(last);

            let k = 1 - f;
            for i in (0..cu - 2 - odd_u).step_by(2) {
                let (a, b, cc) = (i + k, i + k + 1, i + k + 2);
                let face = IsoFace::hex([
                    p(a, 0)?,
                    tw((a, 0), (a, 2))?,
                    tw((b, 2), (b, 0))?,
                    tw((cc, 0), (cc, 2))?,
                    p(cc, 0)?,
                    p(b, 0)?,
                ]);
                self.row(i / 2 + 1).insert(0, face);
            }

            let k = (f + 1 + nv) % 2;
            for i in (0..cu - 2 - k).step_by(2) {
                let (a, b, cc) = (i + k, i + k + 1, i + k + 2);
                let face = IsoFace::hex([
                    tw((a, cv - 1), (a, cv - 3))?,
                    p(a, cv - 1)?,
                    p(b, cv - 1)?,
                    p(cc, cv - 1)?,
                    tw((cc, cv - 1), (cc, cv - 3))?,
                    tw((b, cv - 3), (b, cv - 1))?,
                ]);
                self.row(i / 2 + 2 - k).insert(0, face);
            }

            if (odd_u + odd_v) % 2 == f {
                let face = IsoFace::quad(
                    p(cu - 1, cv - 1)?,
                    tw((cu - 1, cv - 3), (cu - 1, cv - 1))?,
                    tw((cu - 2, cv - 1), (cu - 2, cv - 3))?,
                    p(cu - 2, cv - 1)?,
                );
                self.row(c).push(face);
            }
        }
        Ok(())
    }

    /// Hexagons split into two quads each; boundary quads are kept and any
    /// other boundary cell is dropped.
    #[allow(clippy::too_many_arguments)]
    pub fn set_hex_quads(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        t: f64,
        flip: bool,
        filter: EdgeFilter,
        shift: usize,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_hex_quads";
        self.build_hexagons(OP, direction, (count_u, count_v), t, flip, filter, 4)?;
        self.map_faces(OP, |_, _, _, face| match face {
            IsoFace::Quad(_) => Ok(vec![face.clone()]),
            IsoFace::Hex(_) => face.hex_to_split_quads(shift),
            IsoFace::Tri(_) => Ok(Vec::new()),
        })?;
        self.finish(OP);
        Ok(())
    }

    /// Hexagons fanned into three quads around their middle; boundary quads
    /// are kept.
    #[allow(clippy::too_many_arguments)]
    pub fn set_hex_radial_quads(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        t: f64,
        flip: bool,
        filter: EdgeFilter,
        shift: usize,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_hex_radial_quads";
        self.build_hexagons(OP, direction, (count_u, count_v), t, flip, filter, 6)?;
        self.map_faces(OP, |_, _, _, face| match face {
            IsoFace::Hex(_) => face.hex_to_radial_quads(shift),
            _ => Ok(vec![face.clone()]),
        })?;
        self.finish(OP);
        Ok(())
    }

    /// Hexagons split into triangles; boundary quads are kept as quads.
    #[allow(clippy::too_many_arguments)]
    pub fn set_hex_triangles(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        t: f64,
        flip: bool,
        filter: EdgeFilter,
        strategy: HexTriStrategy,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_hex_triangles";
        self.build_hexagons(OP, direction, (count_u, count_v), t, flip, filter, 6)?;
        self.map_faces(OP, |_, _, _, face| match face {
            IsoFace::Hex(_) => face.hex_to_tris(strategy),
            _ => Ok(vec![face.clone()]),
        })?;
        self.finish(OP);
        Ok(())
    }
}

//! Quad patterns: basic, staggered, sheared, Cairo and random grids.

use super::direction::SurfaceDirection;
use super::error::TessellationError;
use super::evaluator::SurfaceEvaluator;
use super::grid::{Grid, validate_fraction};
use super::iso_face::IsoFace;
use super::options::RandomDomain;
use super::random::{random_list, random_steps, repeat_cyclic, seeded_rng};
use crate::geom::UvPoint;

impl<E: SurfaceEvaluator> Grid<E> {
    /// `count_u * count_v` quads straight off the division lattice, one row
    /// per primary division.
    pub fn set_basic_quads(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_basic_quads";
        self.begin(OP, direction, count_u, count_v, 1)?;
        let lat = self.lattice(OP, direction, count_u, count_v)?;
        let (cu, cv) = (count_u as i64, count_v as i64);
        for i in 0..cu {
            for j in 0..cv {
                let face = IsoFace::quad(
                    lat.at(i, j)?,
                    lat.at(i, j + 1)?,
                    lat.at(i + 1, j + 1)?,
                    lat.at(i + 1, j)?,
                );
                self.row(i).push(face);
            }
        }
        self.finish(OP);
        Ok(())
    }

    /// Quads whose secondary divisions are shifted per row.
    ///
    /// Row `i` uses `shifts[i % shifts.len()]`: a shift strictly inside (0, 1)
    /// moves every interior division that fraction towards the next one, and
    /// keeps both ends, adding one cell to the row.
    pub fn set_staggered_quads(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        shifts: &[f64],
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_staggered_quads";
        if shifts.is_empty() {
            return Err(TessellationError::parameter(OP, "shifts", "list is empty"));
        }
        if let Some(bad) = shifts.iter().find(|t| !t.is_finite()) {
            return Err(TessellationError::parameter(OP, "shifts", format!("{bad} is not finite")));
        }
        self.begin(OP, direction, count_u, count_v, 2)?;
        let u = self.primary_divisions(direction, count_u)?;
        let t = repeat_cyclic(shifts, count_u + 1);

        for i in 1..=count_u {
            let va = shift_divisions(self.secondary_divisions(direction, u[i - 1], count_v)?, t[i - 1]);
            let vb = shift_divisions(self.secondary_divisions(direction, u[i], count_v)?, t[i - 1]);
            let a = |j: usize| direction.compose(u[i - 1], va[j]);
            let b = |j: usize| direction.compose(u[i], vb[j]);
            let row: Vec<IsoFace> = (1..va.len())
                .map(|j| IsoFace::quad(a(j - 1), a(j), b(j), b(j - 1)))
                .collect();
            self.row(i as i64 - 1).extend(row);
        }
        self.finish(OP);
        Ok(())
    }

    /// Staggered quads alternating between no shift and `shift`, starting
    /// with `shift` when `flip` is set.
    pub fn set_alternating_quads(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        shift: f64,
        flip: bool,
    ) -> Result<(), TessellationError> {
        let shifts = if flip { [shift, 0.0] } else { [0.0, shift] };
        self.set_staggered_quads(direction, count_u, count_v, &shifts)
    }

    /// Quads sheared by sliding the far side of each row `t` of a cell along
    /// the secondary axis. The row ends become triangles when `t` reaches 0 or
    /// 1; `flip` shears the other way.
    pub fn set_shear_quads(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        t: f64,
        flip: bool,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_shear_quads";
        let t = validate_fraction(OP, "t", t)?;
        self.begin(OP, direction, count_u, count_v, 2)?;
        let lat = self.lattice(OP, direction, count_u, count_v)?;
        let f = i64::from(flip);
        let s = if flip { 1.0 - t } else { t };
        let (cu, cv) = (count_u as i64, count_v as i64);
        let p = |i: i64, j: i64| lat.at(i, j);

        for i in 0..cu {
            let mut row = Vec::new();
            if t > 0.0 {
                if !flip {
                    row.push(IsoFace::tri(p(i, 0)?, p(i + 1, 0)?.tween(p(i + 1, 1)?, s), p(i + 1, 0)?));
                } else if t < 1.0 {
                    row.push(IsoFace::quad(
                        p(i, 0)?,
                        p(i, 1)?,
                        p(i + 1, 0)?.tween(p(i + 1, 1)?, s),
                        p(i + 1, 0)?,
                    ));
                } else {
                    row.push(IsoFace::tri(p(i, 0)?, p(i, 1)?, p(i + 1, 0)?));
                }
            }
            for j in f..cv - (1 - f) {
                let a = p(i + 1, j - f)?.tween(p(i + 1, j + 1 - f)?, s);
                let b = p(i + 1, j + 1 - f)?.tween(p(i + 1, j + 2 - f)?, s);
                row.push(IsoFace::quad(p(i, j)?, p(i, j + 1)?, b, a));
            }
            let tail = p(i + 1, cv - 1)?.tween(p(i + 1, cv)?, s);
            if flip {
                if t > 0.0 {
                    row.push(IsoFace::tri(p(i, cv)?, p(i + 1, cv)?, tail));
                }
            } else if t < 1.0 {
                row.push(IsoFace::quad(p(i, cv - 1)?, p(i, cv)?, p(i + 1, cv)?, tail));
            } else {
                row.push(IsoFace::tri(p(i, cv - 1)?, p(i, cv)?, p(i + 1, cv)?));
            }
            self.row(i).extend(row);
        }
        self.finish(OP);
        Ok(())
    }

    /// Second shear variant: each row divides both bounding iso-curves on its
    /// own and shifts the divisions of one side by `t` of a cell.
    #[allow(clippy::too_many_lines)]
    pub fn set_shear_quads_alt(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        t: f64,
        flip: bool,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_shear_quads_alt";
        let t = validate_fraction(OP, "t", t)?;
        self.begin(OP, direction, count_u, count_v, 2)?;
        let u = self.primary_divisions(direction, count_u)?;
        let pick = |p0: [UvPoint; 4], p1: [UvPoint; 4]| match direction {
            SurfaceDirection::U => p0,
            SurfaceDirection::V => p1,
        };
        let pt = UvPoint::new;

        for i in 1..=count_u {
            let (u0, u1) = (u[i - 1], u[i]);
            let va = self.secondary_divisions(direction, u0, count_v)?;
            let vb = self.secondary_divisions(direction, u1, count_v)?;
            let c = va.len() - 1;
            let mut row = Vec::with_capacity(c + 2);

            if t > 0.0 {
                let ta = va[0] + (va[1] - va[0]) * t;
                let tb = vb[0] + (vb[1] - vb[0]) * t;
                if flip {
                    let p = pick(
                        [pt(u0, va[1]), pt(u0, 0.0), pt(u1, 0.0), pt(u1, tb)],
                        [pt(0.0, u0), pt(va[1], u0), pt(tb, u1), pt(vb[0], u1)],
                    );
                    row.push(IsoFace::tri(p[2], p[1], p[3]));
                } else {
                    let p = pick(
                        [pt(u0, ta), pt(u0, 0.0), pt(u1, 0.0), pt(u1, vb[1])],
                        [pt(0.0, u0), pt(ta, u0), pt(vb[1], u1), pt(vb[0], u1)],
                    );
                    row.push(IsoFace::tri(p[1], p[0], p[2]));
                }
            }

            for j in 1..c {
                let p = if flip {
                    let t0 = vb[j] + (vb[j + 1] - vb[j]) * t;
                    let t1 = vb[j - 1] + (vb[j] - vb[j - 1]) * t;
                    pick(
                        [pt(u0, va[j]), pt(u0, va[j - 1]), pt(u1, t0), pt(u1, t1)],
                        [pt(va[j - 1], u0), pt(va[j], u0), pt(t1, u1), pt(t0, u1)],
                    )
                } else {
                    let t0 = va[j] + (va[j + 1] - va[j]) * t;
                    let t1 = va[j - 1] + (va[j] - va[j - 1]) * t;
                    pick(
                        [pt(u0, t1), pt(u0, t0), pt(u1, vb[j - 1]), pt(u1, vb[j])],
                        [pt(t1, u0), pt(t0, u0), pt(vb[j - 1], u1), pt(vb[j], u1)],
                    )
                };
                row.push(IsoFace::quad(p[1], p[0], p[2], p[3]));
            }

            if t < 1.0 {
                let p = if flip {
                    let tb = vb[c - 1] + (vb[c] - vb[c - 1]) * t;
                    pick(
                        [pt(u0, 1.0), pt(u0, va[c - 1]), pt(u1, tb), pt(u1, 1.0)],
                        [pt(va[c - 1], u0), pt(1.0, u0), pt(1.0, u1), pt(tb, u1)],
                    )
                } else {
                    let ta = va[c - 1] + (va[c] - va[c - 1]) * t;
                    pick(
                        [pt(u0, 1.0), pt(u0, ta), pt(u1, vb[c - 1]), pt(u1, 1.0)],
                        [pt(ta, u0), pt(1.0, u0), pt(1.0, u1), pt(vb[c - 1], u1)],
                    )
                };
                row.push(IsoFace::quad(p[1], p[0], p[3], p[2]));
            } else {
                let p = pick(
                    [pt(u0, 1.0), pt(u0, vb[c - 1]), pt(u1, vb[c - 1]), pt(u1, 1.0)],
                    [pt(vb[c - 1], u0), pt(1.0, u0), pt(1.0, u1), pt(vb[c - 1], u1)],
                );
                row.push(IsoFace::tri(p[2], p[0], p[3]));
            }
            self.row(i as i64 - 1).extend(row);
        }
        self.finish(OP);
        Ok(())
    }

    /// Cairo pentagon-like tiling: every lattice cell becomes four quads
    /// around its centroid, spread over rows `2i` and `2i + 1`.
    ///
    /// `t` places the edge points between the cell corners; the orientation
    /// alternates with `(i + j + flip) % 2`. The output is exactly
    /// `4 * count_u * count_v` quads, two per cell in each row, so a single
    /// cell yields four quads on rows 0 and 1.
    pub fn set_cairo_quads(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        t: f64,
        flip: bool,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_cairo_quads";
        let t = validate_fraction(OP, "t", t)?;
        self.begin(OP, direction, count_u, count_v, 4)?;
        let lat = self.lattice(OP, direction, count_u, count_v)?;
        let f = i64::from(flip);
        let (cu, cv) = (count_u as i64, count_v as i64);
        let p = |i: i64, j: i64| lat.at(i, j);

        for i in 0..cu {
            let k = i * 2;
            self.row(k);
            self.row(k + 1);
            for j in 0..cv {
                let s = (i + j + f) % 2;
                let a = ((j + f) % 2) as usize;
                let pu0 = p(i, j + s)?.tween(p(i, j + 1 - s)?, t);
                let pu1 = p(i + 1, j + 1 - s)?.tween(p(i + 1, j + s)?, t);
                let pv0 = p(i, j + 1 - s)?.tween(p(i + 1, j + 1 - s)?, t);
                let pv1 = p(i + 1, j + s)?.tween(p(i, j + s)?, t);
                let px = UvPoint::centroid(&[p(i, j)?, p(i, j + 1)?, p(i + 1, j)?, p(i + 1, j + 1)?]);

                let quads = if s == 0 {
                    [
                        IsoFace::quad(pv0, px, pu0, p(i, j + 1 - s)?),
                        IsoFace::quad(p(i, j + s)?, pu0, px, pv1),
                        IsoFace::quad(pv1, px, pu1, p(i + 1, j + s)?),
                        IsoFace::quad(p(i + 1, j + 1 - s)?, pu1, px, pv0),
                    ]
                } else {
                    [
                        IsoFace::quad(px, pv0, p(i, j + 1 - s)?, pu0),
                        IsoFace::quad(pu0, p(i, j + s)?, pv1, px),
                        IsoFace::quad(px, pv1, p(i + 1, j + s)?, pu1),
                        IsoFace::quad(pu1, p(i + 1, j + 1 - s)?, pv0, px),
                    ]
                };
                let first = self.row(k);
                first.push(quads[1 - a].clone());
                first.push(quads[a].clone());
                let second = self.row(k + 1);
                second.push(quads[2 + a].clone());
                second.push(quads[3 - a].clone());
            }
        }
        self.finish(OP);
        Ok(())
    }

    /// Primary divisions as usual; each row gets its own random secondary
    /// divisions with gaps drawn from `domain`.
    pub fn set_random_quads(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        seed: u64,
        domain: RandomDomain,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_random_quads";
        let domain = domain.validate(OP)?;
        self.begin(OP, direction, count_u, count_v, 1)?;
        let mut rng = seeded_rng(seed);
        let u = self.primary_divisions(direction, count_u)?;

        for i in 0..count_u {
            let v = random_list(count_v + 1, domain, &mut rng)?;
            let row: Vec<IsoFace> = (0..count_v)
                .map(|j| {
                    IsoFace::quad(
                        direction.compose(u[i], v[j]),
                        direction.compose(u[i], v[j + 1]),
                        direction.compose(u[i + 1], v[j + 1]),
                        direction.compose(u[i + 1], v[j]),
                    )
                })
                .collect();
            self.row(i as i64).extend(row);
        }
        self.finish(OP);
        Ok(())
    }

    /// Random quads snapped to a lattice `increment` times finer than
    /// `count_v`. Each row holds `count_v - 1` cells spanning the full range.
    pub fn set_random_sub_quads(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        seed: u64,
        domain: RandomDomain,
        increment: usize,
    ) -> Result<(), TessellationError> {
        const OP: &str = "set_random_sub_quads";
        let domain = domain.validate(OP)?;
        if count_v < 2 {
            return Err(TessellationError::InvalidDivisionCount {
                operation: OP,
                count_u,
                count_v,
            });
        }
        if increment == 0 {
            return Err(TessellationError::parameter(OP, "increment", "must be at least 1"));
        }
        self.begin(OP, direction, count_u, count_v, increment)?;
        let mut rng = seeded_rng(seed);
        let lat = self.lattice(OP, direction, count_u, count_v * increment)?;

        for i in 0..count_u as i64 {
            let v: Vec<i64> = random_steps(count_v, domain, &mut rng, increment)?
                .into_iter()
                .map(|step| step as i64)
                .collect();
            let mut row = Vec::with_capacity(count_v - 1);
            for j in 0..count_v - 1 {
                row.push(IsoFace::quad(
                    lat.at(i, v[j])?,
                    lat.at(i, v[j + 1])?,
                    lat.at(i + 1, v[j + 1])?,
                    lat.at(i + 1, v[j])?,
                ));
            }
            self.row(i).extend(row);
        }
        self.finish(OP);
        Ok(())
    }

    /// Basic quads when `increments` is 0, otherwise random sub-quads with
    /// `increments + 1` lattice steps per division.
    pub fn set_random_fixed_quads(
        &mut self,
        direction: SurfaceDirection,
        count_u: usize,
        count_v: usize,
        seed: u64,
        domain: RandomDomain,
        increments: usize,
    ) -> Result<(), TessellationError> {
        if increments == 0 {
            self.set_basic_quads(direction, count_u, count_v)
        } else {
            self.set_random_sub_quads(direction, count_u, count_v, seed, domain, increments + 1)
        }
    }
}

/// Moves each division `t` of the way towards the next one, keeping both
/// ends. Leaves the list alone for a single division or `t` outside (0, 1).
fn shift_divisions(values: Vec<f64>, t: f64) -> Vec<f64> {
    let count = values.len() - 1;
    if count <= 1 || t <= 0.0 || t >= 1.0 {
        return values;
    }
    let mut out = Vec::with_capacity(count + 2);
    out.push(values[0]);
    out.extend((0..count).map(|i| values[i] + (values[i + 1] - values[i]) * t));
    out.push(values[count]);
    out
}

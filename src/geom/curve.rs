use super::core::{Point3, Tolerance, Vec3};

pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn is_closed(&self) -> bool {
        false
    }

    /// Interior parameters where the curve has a kink, such as polyline
    /// vertices. Arc-length sampling always includes them.
    #[must_use]
    fn breakpoints(&self) -> Vec<f64> {
        Vec::new()
    }

    #[must_use]
    fn derivative_at(&self, t: f64) -> Vec3 {
        let (a, b) = self.domain();
        let span = b - a;
        if !span.is_finite() || span == 0.0 {
            return Vec3::ZERO;
        }

        let h = Tolerance::DERIVATIVE.relative_to(span);
        if !h.is_finite() || h == 0.0 {
            return Vec3::ZERO;
        }

        let t0 = (t - h).max(a);
        let t1 = (t + h).min(b);
        if t1 == t0 {
            return Vec3::ZERO;
        }

        let p0 = self.point_at(t0);
        let p1 = self.point_at(t1);
        p1.sub_point(p0).mul_scalar(1.0 / (t1 - t0))
    }
}

impl<C: Curve3 + ?Sized> Curve3 for &C {
    fn point_at(&self, t: f64) -> Point3 {
        (**self).point_at(t)
    }

    fn domain(&self) -> (f64, f64) {
        (**self).domain()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn breakpoints(&self) -> Vec<f64> {
        (**self).breakpoints()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    #[must_use]
    pub const fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn direction(self) -> Vec3 {
        self.end.sub_point(self.start)
    }
}

impl Curve3 for Line3 {
    fn point_at(&self, t: f64) -> Point3 {
        self.start.add_vec(self.direction().mul_scalar(t))
    }

    fn derivative_at(&self, _t: f64) -> Vec3 {
        self.direction()
    }
}

/// Arc-length parametrized polyline over the domain [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline3 {
    points: Vec<Point3>,
    cumulative_lengths: Vec<f64>,
    total_length: f64,
    closed: bool,
}

impl Polyline3 {
    /// Builds a polyline. A closed polyline whose last point repeats the first
    /// has the duplicate dropped; the closing segment is implicit.
    pub fn new(mut points: Vec<Point3>, closed: bool) -> Result<Self, String> {
        if points.len() < 2 {
            return Err("polyline requires at least 2 points".to_string());
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err("polyline points must be finite".to_string());
        }
        if closed && points.len() > 2 && points.first() == points.last() {
            points.pop();
        }

        let mut cumulative_lengths = Vec::with_capacity(points.len());
        cumulative_lengths.push(0.0);
        let mut total = 0.0;
        for window in points.windows(2) {
            total += window[1].sub_point(window[0]).length();
            cumulative_lengths.push(total);
        }

        if closed {
            total += points
                .first()
                .copied()
                .zip(points.last().copied())
                .map_or(0.0, |(first, last)| first.sub_point(last).length());
        }

        Ok(Self {
            points,
            cumulative_lengths,
            total_length: total,
            closed,
        })
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Vertices in order; a closed polyline repeats its first vertex at the end.
    #[must_use]
    pub fn loop_points(&self) -> Vec<Point3> {
        let mut points = self.points.clone();
        if self.closed {
            points.push(self.points[0]);
        }
        points
    }

    #[must_use]
    pub const fn length(&self) -> f64 {
        self.total_length
    }

    #[must_use]
    pub fn start(&self) -> Point3 {
        self.points[0]
    }

    #[must_use]
    pub fn end(&self) -> Point3 {
        if self.closed {
            self.points[0]
        } else {
            self.points[self.points.len() - 1]
        }
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        if self.closed {
            self.points.len()
        } else {
            self.points.len() - 1
        }
    }
}

impl Curve3 for Polyline3 {
    fn point_at(&self, t: f64) -> Point3 {
        if self.total_length <= 0.0 || !self.total_length.is_finite() {
            return self.points[0];
        }

        let mut target = t.clamp(0.0, 1.0) * self.total_length;

        let last_index = self.points.len() - 1;
        if target >= self.cumulative_lengths[last_index] {
            if !self.closed {
                return self.points[last_index];
            }

            let last = self.points[last_index];
            let first = self.points[0];
            let segment_length = first.sub_point(last).length();
            if segment_length == 0.0 {
                return last;
            }
            let ratio =
                ((target - self.cumulative_lengths[last_index]) / segment_length).clamp(0.0, 1.0);
            return last.lerp(first, ratio);
        }

        let idx = match self
            .cumulative_lengths
            .binary_search_by(|value| value.total_cmp(&target))
        {
            Ok(i) => i.min(last_index - 1),
            Err(i) => i.max(1) - 1,
        };

        let seg_start = self.points[idx];
        let seg_end = self.points[idx + 1];
        let seg_len = seg_end.sub_point(seg_start).length();
        if seg_len == 0.0 {
            return seg_start;
        }
        target -= self.cumulative_lengths[idx];
        seg_start.lerp(seg_end, (target / seg_len).clamp(0.0, 1.0))
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn breakpoints(&self) -> Vec<f64> {
        if self.total_length <= 0.0 || !self.total_length.is_finite() {
            return Vec::new();
        }
        let vertices = if self.closed {
            &self.cumulative_lengths[1..]
        } else {
            &self.cumulative_lengths[1..self.cumulative_lengths.len() - 1]
        };
        vertices.iter().map(|len| len / self.total_length).collect()
    }
}

#[must_use]
pub fn tessellate_curve_uniform(curve: &impl Curve3, steps: usize) -> Vec<Point3> {
    let steps = steps.max(1);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;
    let end = if curve.is_closed() { steps - 1 } else { steps };
    (0..=end)
        .map(|i| curve.point_at(t0 + span * (i as f64 / steps as f64)))
        .collect()
}

// ============================================================================
// Division and sub-curves
// ============================================================================

/// A subcurve extracted from a parent curve.
#[derive(Debug, Clone)]
pub struct SubCurve {
    /// Points defining the subcurve (tessellated).
    pub points: Vec<Point3>,
    /// Start parameter on the parent curve.
    pub start_param: f64,
    /// End parameter on the parent curve.
    pub end_param: f64,
}

/// Computes the approximate arc length of a curve by sampling.
#[must_use]
pub fn curve_arc_length<C: Curve3>(curve: &C, samples: usize) -> f64 {
    let samples = samples.max(1);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;
    if !span.is_finite() || span == 0.0 {
        return 0.0;
    }

    let mut length = 0.0;
    let mut prev = curve.point_at(t0);
    for i in 1..=samples {
        let t = t0 + span * (i as f64 / samples as f64);
        let curr = curve.point_at(t);
        length += curr.sub_point(prev).length();
        prev = curr;
    }
    length
}

/// Parameters splitting a curve into `count` pieces of equal arc length.
///
/// The result holds `count + 1` values; the first and last are exactly the
/// domain bounds. Curves with zero length fall back to uniform parameters.
#[must_use]
pub fn curve_parameters_by_count<C: Curve3>(curve: &C, count: usize) -> Vec<f64> {
    let count = count.max(1);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;
    if !span.is_finite() || span == 0.0 {
        return vec![t0; count + 1];
    }

    let uniform = |i: usize| {
        if i == count {
            t1
        } else {
            t0 + span * (i as f64 / count as f64)
        }
    };

    let sample_count = count.saturating_mul(16).clamp(64, 4096);
    let table = build_arc_length_table(curve, sample_count);
    let total = table.last().map_or(0.0, |e| e.arc_length);
    if !total.is_finite() || Tolerance::ZERO_LENGTH.is_zero_length(total) {
        return (0..=count).map(uniform).collect();
    }

    (0..=count)
        .map(|i| {
            if i == 0 {
                t0
            } else if i == count {
                t1
            } else {
                let target = total * (i as f64 / count as f64);
                parameter_at_arc_length(&table, t0, t1, target)
            }
        })
        .collect()
}

/// Extracts the sub-range `[start, end]` of a curve as a sampled polyline.
///
/// Reversed ranges are normalized; the parameters are clamped to the domain.
#[must_use]
pub fn extract_subcurve<C: Curve3>(curve: &C, start: f64, end: f64, samples: usize) -> SubCurve {
    let (t0, t1) = curve.domain();
    let start_clamped = start.clamp(t0, t1);
    let end_clamped = end.clamp(t0, t1);

    let (start_param, end_param) = if start_clamped <= end_clamped {
        (start_clamped, end_clamped)
    } else {
        (end_clamped, start_clamped)
    };

    let samples = samples.max(1);
    let span = end_param - start_param;

    let mut points = Vec::with_capacity(samples + 1);
    if span.abs() < 1e-12 {
        points.push(curve.point_at(start_param));
    } else {
        for i in 0..=samples {
            let u = i as f64 / samples as f64;
            points.push(curve.point_at(start_param + span * u));
        }
    }

    SubCurve {
        points,
        start_param,
        end_param,
    }
}

// ============================================================================
// Arc-Length Table Helpers
// ============================================================================

struct ArcLengthEntry {
    parameter: f64,
    arc_length: f64,
}

fn build_arc_length_table<C: Curve3>(curve: &C, samples: usize) -> Vec<ArcLengthEntry> {
    let samples = samples.max(2);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;

    let mut parameters: Vec<f64> = (1..samples)
        .map(|i| t0 + span * (i as f64 / (samples - 1) as f64))
        .collect();
    parameters.extend(
        curve
            .breakpoints()
            .into_iter()
            .filter(|t| t.is_finite() && *t > t0 && *t < t1),
    );
    parameters.sort_by(f64::total_cmp);
    parameters.dedup_by(|a, b| (*a - *b).abs() <= 1e-14);

    let mut table = Vec::with_capacity(parameters.len() + 1);
    let mut prev = curve.point_at(t0);
    let mut cumulative = 0.0;

    table.push(ArcLengthEntry {
        parameter: t0,
        arc_length: 0.0,
    });

    for t in parameters {
        let curr = curve.point_at(t);
        cumulative += curr.sub_point(prev).length();
        table.push(ArcLengthEntry {
            parameter: t,
            arc_length: cumulative,
        });
        prev = curr;
    }

    table
}

fn parameter_at_arc_length(table: &[ArcLengthEntry], t0: f64, t1: f64, target_length: f64) -> f64 {
    if table.len() < 2 {
        return table.first().map_or(t0, |e| e.parameter);
    }

    let total = table.last().map_or(0.0, |e| e.arc_length);
    if target_length <= 0.0 {
        return t0;
    }
    if target_length >= total {
        return t1;
    }

    let idx = table
        .binary_search_by(|entry| entry.arc_length.total_cmp(&target_length))
        .unwrap_or_else(|i| i.saturating_sub(1));

    let idx = idx.min(table.len() - 2);
    let e0 = &table[idx];
    let e1 = &table[idx + 1];

    let segment_length = e1.arc_length - e0.arc_length;
    if segment_length.abs() < 1e-14 {
        return e0.parameter;
    }

    let ratio = (target_length - e0.arc_length) / segment_length;
    e0.parameter + (e1.parameter - e0.parameter) * ratio.clamp(0.0, 1.0)
}

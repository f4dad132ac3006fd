//! Approximate shortest paths between two parameter points on a surface.
//!
//! A lattice spanning the parameter rectangle of the two endpoints is searched
//! with Dijkstra's algorithm using chord lengths as edge weights. The lattice
//! path is then relaxed vertex by vertex, shrinking the step each sweep, to
//! pull it off the lattice directions.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::core::{Point3, Tolerance, UvPoint};
use super::surface::Surface;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeodesicError {
    #[error("geodesic endpoints must be finite")]
    NonFiniteEndpoint,
    #[error("geodesic endpoints coincide")]
    CoincidentEndpoints,
    #[error("geodesic lattice resolution must be at least 2, got {0}")]
    InvalidResolution(usize),
    #[error("no path found between geodesic endpoints")]
    Unreachable,
}

/// Options for [`shortest_path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicOptions {
    /// Lattice nodes along the longer side of the endpoint rectangle.
    pub resolution: usize,
    /// Relaxation sweeps over the interior path vertices.
    pub relax_iterations: usize,
}

impl GeodesicOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            resolution: 24,
            relax_iterations: 12,
        }
    }

    #[must_use]
    pub const fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    #[must_use]
    pub const fn with_relax_iterations(mut self, iterations: usize) -> Self {
        self.relax_iterations = iterations;
        self
    }
}

impl Default for GeodesicOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A path on a surface, kept in both parameter and model space.
#[derive(Debug, Clone, PartialEq)]
pub struct GeodesicPath {
    pub uv: Vec<UvPoint>,
    pub points: Vec<Point3>,
    pub length: f64,
}

#[derive(Debug, Clone)]
struct DijkstraEntry {
    node: usize,
    distance: f64,
}

impl PartialEq for DijkstraEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for DijkstraEntry {}

impl PartialOrd for DijkstraEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DijkstraEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap
        other.distance.total_cmp(&self.distance)
    }
}

const NEIGHBOURS: [(isize, isize); 16] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

struct Lattice {
    us: Vec<f64>,
    vs: Vec<f64>,
    points: Vec<Point3>,
}

impl Lattice {
    fn build<S: Surface + ?Sized>(surface: &S, a: UvPoint, b: UvPoint, resolution: usize) -> Self {
        // Node counts follow the model-space extent along each axis so the
        // lattice cells stay roughly square on the surface.
        let extent_u = iso_extent(surface, a.u, b.u, 0.5 * (a.v + b.v), true);
        let extent_v = iso_extent(surface, a.v, b.v, 0.5 * (a.u + b.u), false);
        let longest = extent_u.max(extent_v);
        let steps = |span: f64, extent: f64| -> usize {
            if Tolerance::ZERO_LENGTH.is_zero_length(span) {
                1
            } else if Tolerance::ZERO_LENGTH.is_zero_length(longest) {
                2
            } else {
                ((resolution as f64 * extent / longest).ceil() as usize).max(2)
            }
        };
        let du = (b.u - a.u).abs();
        let dv = (b.v - a.v).abs();

        let us = axis_values(a.u, b.u, steps(du, extent_u));
        let vs = axis_values(a.v, b.v, steps(dv, extent_v));
        let mut points = Vec::with_capacity(us.len() * vs.len());
        for &v in &vs {
            for &u in &us {
                points.push(surface.point_at(u, v));
            }
        }
        Self { us, vs, points }
    }

    fn index(&self, i: usize, j: usize) -> usize {
        j * self.us.len() + i
    }

    fn uv(&self, node: usize) -> UvPoint {
        let n = self.us.len();
        UvPoint::new(self.us[node % n], self.vs[node / n])
    }
}

/// Node values from `from` to `to` inclusive; both ends are reproduced exactly.
fn axis_values(from: f64, to: f64, count: usize) -> Vec<f64> {
    if count <= 1 {
        return vec![from];
    }
    (0..count)
        .map(|k| {
            if k == count - 1 {
                to
            } else {
                from + (to - from) * (k as f64 / (count - 1) as f64)
            }
        })
        .collect()
}

/// Sampled model-space length of the iso-curve between `from` and `to`.
fn iso_extent<S: Surface + ?Sized>(surface: &S, from: f64, to: f64, constant: f64, varying_u: bool) -> f64 {
    const SAMPLES: usize = 8;
    let eval = |t: f64| {
        if varying_u {
            surface.point_at(t, constant)
        } else {
            surface.point_at(constant, t)
        }
    };
    let mut prev = eval(from);
    let mut length = 0.0;
    for k in 1..=SAMPLES {
        let next = eval(from + (to - from) * (k as f64 / SAMPLES as f64));
        length += prev.distance_to(next);
        prev = next;
    }
    length
}

fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| w[0].distance_to(w[1])).sum()
}

/// Approximates the shortest path on `surface` from `a` to `b`.
///
/// The first and last path vertices are exactly `a` and `b`.
pub fn shortest_path<S: Surface + ?Sized>(
    surface: &S,
    a: UvPoint,
    b: UvPoint,
    options: GeodesicOptions,
) -> Result<GeodesicPath, GeodesicError> {
    if !a.is_finite() || !b.is_finite() {
        return Err(GeodesicError::NonFiniteEndpoint);
    }
    if options.resolution < 2 {
        return Err(GeodesicError::InvalidResolution(options.resolution));
    }
    let pa = surface.point_at(a.u, a.v);
    let pb = surface.point_at(b.u, b.v);
    if Tolerance::ZERO_LENGTH.approx_eq_uv(a, b) || Tolerance::ZERO_LENGTH.approx_eq_point3(pa, pb)
    {
        return Err(GeodesicError::CoincidentEndpoints);
    }

    let lattice = Lattice::build(surface, a, b, options.resolution);
    let nu = lattice.us.len();
    let nv = lattice.vs.len();
    let source = lattice.index(0, 0);
    let target = lattice.index(nu - 1, nv - 1);

    let node_count = lattice.points.len();
    let mut distances = vec![f64::INFINITY; node_count];
    let mut predecessors: Vec<Option<usize>> = vec![None; node_count];
    let mut heap = BinaryHeap::new();
    distances[source] = 0.0;
    heap.push(DijkstraEntry {
        node: source,
        distance: 0.0,
    });

    while let Some(DijkstraEntry { node, distance }) = heap.pop() {
        if node == target {
            break;
        }
        if distance > distances[node] {
            continue;
        }
        let i = (node % nu) as isize;
        let j = (node / nu) as isize;
        for (di, dj) in NEIGHBOURS {
            let (ni, nj) = (i + di, j + dj);
            if ni < 0 || nj < 0 || ni >= nu as isize || nj >= nv as isize {
                continue;
            }
            let next = lattice.index(ni as usize, nj as usize);
            let candidate = distance + lattice.points[node].distance_to(lattice.points[next]);
            if candidate < distances[next] {
                distances[next] = candidate;
                predecessors[next] = Some(node);
                heap.push(DijkstraEntry {
                    node: next,
                    distance: candidate,
                });
            }
        }
    }

    if !distances[target].is_finite() {
        return Err(GeodesicError::Unreachable);
    }

    let mut nodes = vec![target];
    let mut current = target;
    while let Some(prev) = predecessors[current] {
        nodes.push(prev);
        current = prev;
    }
    nodes.reverse();

    let mut uv: Vec<UvPoint> = nodes.iter().map(|&n| lattice.uv(n)).collect();
    let last = uv.len() - 1;
    uv[0] = a;
    uv[last] = b;

    let step = lattice_step(&lattice);
    relax_path(surface, &mut uv, step, options.relax_iterations);

    let points: Vec<Point3> = uv.iter().map(|p| surface.point_at(p.u, p.v)).collect();
    let length = polyline_length(&points);
    log::debug!(
        "geodesic: {} lattice nodes, {} path vertices, length {length:.6}",
        node_count,
        points.len()
    );

    Ok(GeodesicPath { uv, points, length })
}

fn lattice_step(lattice: &Lattice) -> f64 {
    let du = lattice
        .us
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0, f64::max);
    let dv = lattice
        .vs
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0, f64::max);
    du.max(dv) * 0.5
}

/// Moves each interior vertex to the neighbouring candidate that shortens its two
/// adjacent chords, halving the candidate distance after every sweep.
fn relax_path<S: Surface + ?Sized>(
    surface: &S,
    uv: &mut [UvPoint],
    initial_step: f64,
    iterations: usize,
) {
    if uv.len() < 3 || initial_step <= 0.0 {
        return;
    }
    let eval = |p: UvPoint| surface.point_at(p.u, p.v);
    let mut step = initial_step;
    for _ in 0..iterations {
        for k in 1..uv.len() - 1 {
            let prev = eval(uv[k - 1]);
            let next = eval(uv[k + 1]);
            let cost = |p: UvPoint| {
                let q = eval(p);
                prev.distance_to(q) + q.distance_to(next)
            };
            let mut best = uv[k];
            let mut best_cost = cost(best);
            for (du, dv) in [(step, 0.0), (-step, 0.0), (0.0, step), (0.0, -step)] {
                let candidate = UvPoint::new(
                    (uv[k].u + du).clamp(0.0, 1.0),
                    (uv[k].v + dv).clamp(0.0, 1.0),
                );
                let candidate_cost = cost(candidate);
                if candidate_cost < best_cost {
                    best = candidate;
                    best_cost = candidate_cost;
                }
            }
            uv[k] = best;
        }
        step *= 0.5;
    }
}

use super::core::Point3;
use super::curve::Polyline3;

// ============================================================================
// Join Polylines
// ============================================================================

/// Options for joining polylines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinPolylinesOptions {
    /// Whether to preserve the direction of input polylines (no reversal).
    pub preserve_direction: bool,
    /// Tolerance for endpoint matching.
    pub tolerance: f64,
}

impl JoinPolylinesOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            preserve_direction: false,
            tolerance: 1e-6,
        }
    }

    #[must_use]
    pub const fn preserve_direction(mut self, preserve: bool) -> Self {
        self.preserve_direction = preserve;
        self
    }

    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Default for JoinPolylinesOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Diagnostics for join operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinPolylinesDiagnostics {
    pub input_polyline_count: usize,
    pub output_polyline_count: usize,
    pub join_count: usize,
    /// Chains whose two ends met within tolerance and were closed.
    pub closed_count: usize,
}

/// Joins polylines into connected chains where endpoints match.
///
/// Chains are grown starting from the first remaining input so the output
/// keeps the orientation of the leading piece. A chain whose ends meet is
/// returned as a closed polyline.
pub fn join_polylines(
    polylines: Vec<Polyline3>,
    options: JoinPolylinesOptions,
) -> Result<(Vec<Polyline3>, JoinPolylinesDiagnostics), String> {
    let mut diagnostics = JoinPolylinesDiagnostics {
        input_polyline_count: polylines.len(),
        ..Default::default()
    };

    let tolerance = options.tolerance.max(1e-12);
    let mut remaining: Vec<Vec<Point3>> = polylines
        .into_iter()
        .map(|polyline| polyline.loop_points())
        .collect();
    let mut result = Vec::new();

    while !remaining.is_empty() {
        let mut current = remaining.remove(0);

        let mut changed = true;
        while changed {
            changed = false;
            let mut index = 0;
            while index < remaining.len() {
                if let Some(merged) = try_merge_polylines(
                    &current,
                    &remaining[index],
                    options.preserve_direction,
                    tolerance,
                ) {
                    current = merged;
                    remaining.remove(index);
                    diagnostics.join_count += 1;
                    changed = true;
                } else {
                    index += 1;
                }
            }
        }

        let closed = current.len() > 2 && distance(current[0], current[current.len() - 1]) < tolerance;
        if closed {
            current.pop();
            diagnostics.closed_count += 1;
        }
        result.push(Polyline3::new(current, closed)?);
    }

    diagnostics.output_polyline_count = result.len();
    Ok((result, diagnostics))
}

fn distance(a: Point3, b: Point3) -> f64 {
    a.distance_to(b)
}

fn try_merge_polylines(
    target: &[Point3],
    candidate: &[Point3],
    preserve_direction: bool,
    tolerance: f64,
) -> Option<Vec<Point3>> {
    if target.is_empty() || candidate.len() < 2 {
        return None;
    }

    let start = target[0];
    let end = *target.last()?;
    let candidate_start = candidate[0];
    let candidate_end = *candidate.last()?;

    // end of target meets start of candidate
    if distance(end, candidate_start) < tolerance {
        let mut merged = target.to_vec();
        merged.extend_from_slice(&candidate[1..]);
        return Some(merged);
    }

    // end of target meets end of candidate
    if !preserve_direction && distance(end, candidate_end) < tolerance {
        let mut merged = target.to_vec();
        merged.extend(candidate.iter().rev().skip(1).copied());
        return Some(merged);
    }

    // start of target meets end of candidate
    if distance(start, candidate_end) < tolerance {
        let mut merged = candidate.to_vec();
        merged.pop();
        merged.extend_from_slice(target);
        return Some(merged);
    }

    // start of target meets start of candidate
    if !preserve_direction && distance(start, candidate_start) < tolerance {
        let mut reversed: Vec<_> = candidate.iter().rev().copied().collect();
        reversed.pop();
        reversed.extend_from_slice(target);
        return Some(reversed);
    }

    None
}

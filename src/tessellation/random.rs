//! Seeded random divisions.
//!
//! Every helper takes the generator explicitly; callers build one
//! `StdRng::seed_from_u64(seed)` per pattern call.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::error::TessellationError;
use super::options::RandomDomain;

#[must_use]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Cumulative walk of `count` increments, each a uniform draw clamped into
/// `domain`.
fn random_walk<R: Rng + ?Sized>(
    operation: &'static str,
    count: usize,
    domain: RandomDomain,
    rng: &mut R,
) -> Result<(Vec<f64>, f64, f64), TessellationError> {
    if count < 2 {
        return Err(TessellationError::parameter(
            operation,
            "count",
            format!("need at least 2 values, got {count}"),
        ));
    }
    let domain = domain.validate(operation)?;
    let mut total = 0.0;
    let walk: Vec<f64> = (0..count)
        .map(|_| {
            total += domain.clamp(rng.random::<f64>());
            total
        })
        .collect();
    let first = walk[0];
    let span = walk[count - 1] - first;
    if !span.is_finite() || span == 0.0 {
        return Err(TessellationError::degenerate(operation, "random walk has no extent"));
    }
    Ok((walk, first, span))
}

/// `count` increasing parameters from exactly 0 to exactly 1 with random gaps.
pub fn random_list<R: Rng + ?Sized>(
    count: usize,
    domain: RandomDomain,
    rng: &mut R,
) -> Result<Vec<f64>, TessellationError> {
    let (walk, first, span) = random_walk("random_list", count, domain, rng)?;
    Ok(walk.into_iter().map(|value| (value - first) / span).collect())
}

/// The walk of [`random_list`] snapped up to a lattice of `count * steps`
/// divisions, as indices in `0..=count * steps`.
pub fn random_steps<R: Rng + ?Sized>(
    count: usize,
    domain: RandomDomain,
    rng: &mut R,
    steps: usize,
) -> Result<Vec<usize>, TessellationError> {
    if steps == 0 {
        return Err(TessellationError::parameter(
            "random_steps",
            "steps",
            "need at least one step per division",
        ));
    }
    let (walk, first, span) = random_walk("random_steps", count, domain, rng)?;
    let divisions = count * steps;
    let scale = divisions as f64;
    Ok(walk
        .into_iter()
        .map(|value| {
            let t = (value - first) / span;
            // 1e-9 keeps exact lattice hits from rounding up a whole step
            let index = (t * scale - 1e-9).ceil().max(0.0) as usize;
            index.min(divisions)
        })
        .collect())
}

/// `values` repeated cyclically up to `count` entries.
#[must_use]
pub fn repeat_cyclic<T: Copy>(values: &[T], count: usize) -> Vec<T> {
    if values.is_empty() {
        return Vec::new();
    }
    values.iter().copied().cycle().take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_list_spans_zero_to_one_for_any_seed() {
        for seed in 0..32 {
            let mut rng = seeded_rng(seed);
            let values = random_list(6, RandomDomain::new(0.25, 0.75), &mut rng).unwrap();
            assert_eq!(values.len(), 6);
            assert_eq!(values[0], 0.0);
            assert_eq!(values[5], 1.0);
            assert!(values.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn random_list_is_deterministic_per_seed() {
        let a = random_list(8, RandomDomain::default(), &mut seeded_rng(7)).unwrap();
        let b = random_list(8, RandomDomain::default(), &mut seeded_rng(7)).unwrap();
        let c = random_list(8, RandomDomain::default(), &mut seeded_rng(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn random_steps_stay_on_the_lattice() {
        let mut rng = seeded_rng(3);
        let steps = random_steps(4, RandomDomain::new(0.1, 0.9), &mut rng, 3).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], 0);
        assert_eq!(steps[3], 12);
        assert!(steps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn random_helpers_reject_bad_input() {
        let mut rng = seeded_rng(1);
        assert!(random_list(1, RandomDomain::default(), &mut rng).is_err());
        assert!(random_list(3, RandomDomain::new(0.6, 0.2), &mut rng).is_err());
        assert!(random_steps(3, RandomDomain::default(), &mut rng, 0).is_err());
    }

    #[test]
    fn repeat_cyclic_wraps() {
        assert_eq!(repeat_cyclic(&[0.0, 0.5], 5), vec![0.0, 0.5, 0.0, 0.5, 0.0]);
        assert!(repeat_cyclic::<f64>(&[], 3).is_empty());
    }
}

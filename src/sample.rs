//! Sample generation, for self-testing the recovery pipeline.
//!
//! Two modes, matching spec.md §4.6: emit a fresh sequence starting from a
//! seed at a pseudo-random depth (so a self-test observation doesn't
//! trivially start at offset zero), or continue from a generator a prior
//! [`crate::infer`] run already primed.

use std::ops::Range;

use rand::RngCore;

use crate::error::RecoverError;
use crate::prng::{self, Prng};

/// The default depth range sample generation discards into before
/// emitting observations, when the caller doesn't supply one.
pub const DEFAULT_DEPTH_RANGE: Range<usize> = 0..1000;

/// Seeds a fresh `algorithm` generator with `seed`, discards a
/// pseudo-random number of outputs drawn from `depth_range` via
/// `depth_rng`, then emits `len` outputs.
///
/// The depth is injected through `depth_rng` rather than drawn from a
/// hidden global, so tests (and any caller wanting reproducible samples)
/// can supply a seeded `rand::rngs::StdRng` and get identical output
/// across runs; the CLI instead seeds this from OS entropy, so
/// interactive samples still vary run to run.
pub fn from_seed(
    algorithm: &str,
    seed: u32,
    len: usize,
    depth_range: Range<usize>,
    depth_rng: &mut dyn RngCore,
) -> Result<Vec<u32>, RecoverError> {
    let mut generator = prng::make(algorithm)?;
    generator.seed(seed);

    let span = depth_range.end.saturating_sub(depth_range.start);
    let discard = if span == 0 {
        depth_range.start
    } else {
        depth_range.start + (depth_rng.next_u32() as usize % span)
    };
    for _ in 0..discard {
        generator.next_u32();
    }

    Ok((0..len).map(|_| generator.next_u32()).collect())
}

/// Emits the next `len` outputs from a generator already primed with a
/// recovered state, e.g. from [`crate::infer::infer`].
pub fn from_state(generator: &mut dyn Prng, len: usize) -> Vec<u32> {
    (0..len).map(|_| generator.next_u32()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn same_depth_rng_seed_yields_identical_samples() {
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let a = from_seed("mt19937", 42, 10, DEFAULT_DEPTH_RANGE, &mut rng_a).unwrap();
        let b = from_seed("mt19937", 42, 10, DEFAULT_DEPTH_RANGE, &mut rng_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_depth_rng_state_can_yield_different_samples() {
        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(2);
        let a = from_seed("mt19937", 42, 10, DEFAULT_DEPTH_RANGE, &mut rng_a).unwrap();
        let b = from_seed("mt19937", 42, 10, DEFAULT_DEPTH_RANGE, &mut rng_b).unwrap();
        // Not a hard guarantee in general, but true for these two fixed
        // seeds and this generator; documents the intended behavior.
        assert_ne!(a, b);
    }

    #[test]
    fn from_state_continues_from_current_position() {
        let mut generator = prng::make("glibc_lcg").unwrap();
        generator.seed(5);
        let _ = generator.next_u32();
        let first = from_state(generator.as_mut(), 3);

        let mut reference = prng::make("glibc_lcg").unwrap();
        reference.seed(5);
        reference.next_u32();
        let expected: Vec<u32> = (0..3).map(|_| reference.next_u32()).collect();
        assert_eq!(first, expected);
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            from_seed("nope", 1, 5, DEFAULT_DEPTH_RANGE, &mut rng),
            Err(RecoverError::UnknownAlgorithm(_))
        ));
    }
}

//! Scores how well a primed generator's output matches an observation
//! sequence.

use crate::prng::Prng;

/// Produces `depth` successive outputs from `prng` and finds the offset at
/// which the longest contiguous prefix of `observations` occurs.
///
/// Returns `(best_p, best_k)`: `best_p` is the length of the longest
/// matching prefix found, `best_k` is the lowest offset at which it
/// occurs. Confidence is `best_p as f64 / observations.len() as f64 *
/// 100.0`.
///
/// `depth` must be `>= observations.len()`; callers are responsible for
/// enforcing that (see [`crate::controller::Controller::brute_force`]).
pub fn score(prng: &mut dyn Prng, observations: &[u32], depth: usize) -> (usize, usize) {
    debug_assert!(depth >= observations.len());
    let values: Vec<u32> = (0..depth).map(|_| prng.next_u32()).collect();
    let l = observations.len();

    let mut best_p = 0usize;
    let mut best_k = 0usize;
    for k in 0..=(values.len() - l) {
        let p = values[k..]
            .iter()
            .zip(observations.iter())
            .take_while(|(v, o)| v == o)
            .count();
        if p > best_p {
            best_p = p;
            best_k = k;
        }
    }
    (best_p, best_k)
}

/// Converts a match length into a confidence percentage.
pub fn confidence(best_p: usize, observation_len: usize) -> f64 {
    if observation_len == 0 {
        return 0.0;
    }
    (best_p as f64 / observation_len as f64) * 100.0
}

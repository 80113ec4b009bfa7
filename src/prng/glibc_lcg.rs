//! A 31-bit linear-congruential generator in the "minimal standard"
//! family, often labelled "glibc-style" by seed-recovery tooling.
//!
//! This is *not* glibc's actual `random()` (which uses an additive
//! feedback generator of degree 31, not a pure LCG); it reproduces the
//! simpler textbook LCG that tools in this space commonly ship under that
//! name. Constants: multiplier `1103515245`, increment `12345`, modulus
//! `2^31`. See Numerical Recipes, 3rd ed., §7.1, table of LCG parameters
//! "in common use".

use super::{Descriptor, Prng};
use crate::error::RecoverError;

const MULTIPLIER: u32 = 1_103_515_245;
const INCREMENT: u32 = 12_345;
const MODULUS_MASK: u32 = 0x7FFF_FFFF;

static DESCRIPTOR: Descriptor = Descriptor {
    name: "glibc_lcg",
    label: "glibc-style LCG (31-bit)",
    seed_bits: 32,
    state_words: 1,
    max_output: MODULUS_MASK,
    supports_inference: false,
};

/// A 31-bit "glibc-style" linear-congruential generator.
#[derive(Debug, Clone, Default)]
pub struct GlibcLcg {
    state: u32,
}

impl Prng for GlibcLcg {
    fn seed(&mut self, seed: u32) {
        self.state = seed & MODULUS_MASK;
    }

    fn set_state(&mut self, state: &[u32]) -> Result<(), RecoverError> {
        if state.len() != 1 {
            return Err(RecoverError::InferenceUnavailable(format!(
                "glibc_lcg state must have 1 word, got {}",
                state.len()
            )));
        }
        self.state = state[0] & MODULUS_MASK;
        Ok(())
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & MODULUS_MASK;
        self.state
    }

    fn max_output(&self) -> u32 {
        DESCRIPTOR.max_output
    }

    fn descriptor(&self) -> &'static Descriptor {
        &DESCRIPTOR
    }

    fn clone_box(&self) -> Box<dyn Prng> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_zero_advances() {
        let mut gen = GlibcLcg::default();
        gen.seed(0);
        assert_eq!(gen.next_u32(), INCREMENT);
    }

    #[test]
    fn output_stays_within_31_bits() {
        let mut gen = GlibcLcg::default();
        gen.seed(0xFFFF_FFFF);
        for _ in 0..1000 {
            assert!(gen.next_u32() <= MODULUS_MASK);
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let mut a = GlibcLcg::default();
        let mut b = GlibcLcg::default();
        a.seed(42);
        b.seed(42);
        let seq_a: Vec<u32> = (0..20).map(|_| a.next_u32()).collect();
        let seq_b: Vec<u32> = (0..20).map(|_| b.next_u32()).collect();
        assert_eq!(seq_a, seq_b);
    }
}

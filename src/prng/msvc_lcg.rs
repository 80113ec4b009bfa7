//! Microsoft Visual C++ CRT `rand()`.
//!
//! Constants and output transform match the documented Visual C++ runtime
//! implementation: `state = state * 214013 + 2531011` (mod 2^32), output
//! `= (state >> 16) & 0x7FFF`. See e.g. the public-domain writeups
//! collected under "Microsoft rand() algorithm" in PRNG seed-recovery
//! literature; the constants themselves are the ones shipped in the MSVC
//! CRT sources.

use super::{Descriptor, Prng};
use crate::error::RecoverError;

const MULTIPLIER: u32 = 214_013;
const INCREMENT: u32 = 2_531_011;
const OUTPUT_MASK: u32 = 0x7FFF;

static DESCRIPTOR: Descriptor = Descriptor {
    name: "msvc_lcg",
    label: "Microsoft Visual C++ CRT rand()",
    seed_bits: 32,
    state_words: 1,
    max_output: OUTPUT_MASK,
    supports_inference: false,
};

/// Microsoft Visual C++ CRT `rand()`.
///
/// The output transform discards the low 16 bits of state, so a single
/// observation under-determines the state: there is no clean algebraic
/// inverse, unlike the MT19937 family.
#[derive(Debug, Clone, Default)]
pub struct MsvcLcg {
    state: u32,
}

impl Prng for MsvcLcg {
    fn seed(&mut self, seed: u32) {
        self.state = seed;
    }

    fn set_state(&mut self, state: &[u32]) -> Result<(), RecoverError> {
        if state.len() != 1 {
            return Err(RecoverError::InferenceUnavailable(format!(
                "msvc_lcg state must have 1 word, got {}",
                state.len()
            )));
        }
        self.state = state[0];
        Ok(())
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        (self.state >> 16) & OUTPUT_MASK
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
    fn output_stays_within_15_bits() {
        let mut gen = MsvcLcg::default();
        gen.seed(1);
        for _ in 0..1000 {
            assert!(gen.next_u32() <= OUTPUT_MASK);
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let mut a = MsvcLcg::default();
        let mut b = MsvcLcg::default();
        a.seed(7);
        b.seed(7);
        let seq_a: Vec<u32> = (0..20).map(|_| a.next_u32()).collect();
        let seq_b: Vec<u32> = (0..20).map(|_| b.next_u32()).collect();
        assert_eq!(seq_a, seq_b);
    }
}

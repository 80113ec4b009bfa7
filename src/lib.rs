#![deny(missing_docs)]

//! Recovers the seed and internal state of a non-cryptographic PRNG from a
//! short sequence of its observed outputs.
//!
//! Given a handful of 32-bit integers believed to be consecutive outputs
//! of a known PRNG algorithm, this crate either:
//!
//! * searches the 32-bit seed space in parallel, scoring each candidate
//!   seed by how well its produced sequence matches the observation
//!   ([`search`], driven through [`Controller::brute_force`]); or
//! * for algorithms with a defined inverse, recovers the internal state
//!   directly from enough observations, with no search at all
//!   ([`infer`], driven through [`Controller::infer_state`]).
//!
//! A [`sample`] module produces fresh output sequences from a seed or a
//! recovered state, for self-testing.
//!
//! ## Usage
//!
//! ```rust
//! use rand::SeedableRng;
//! use seedrecover::Controller;
//!
//! // Generate a self-test observation from a known seed.
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let observations = seedrecover::sample::from_seed(
//!     "glibc_lcg", 1234, 8, seedrecover::sample::DEFAULT_DEPTH_RANGE, &mut rng,
//! ).unwrap();
//!
//! let mut controller = Controller::new();
//! controller.set_algorithm("glibc_lcg").unwrap();
//! controller.set_depth(2000).unwrap();
//! for v in observations {
//!     controller.add_observation(v);
//! }
//! let results = controller.brute_force(0, 100_000).unwrap();
//! assert_eq!(results.first().map(|r| r.seed), Some(1234));
//! ```

mod controller;
/// Shared error type for every fallible operation in this crate.
pub mod error;
/// State-inference engine: algebraic recovery of internal state.
pub mod infer;
/// Observation-file reading and line parsing.
pub mod io;
/// Pluggable PRNG abstraction, algorithm implementations and registry.
pub mod prng;
/// Sample generation, for self-testing the recovery pipeline.
pub mod sample;
/// Contiguous-match scoring of a candidate generator against observations.
pub mod scorer;
/// Parallel brute-force seed search.
pub mod search;

pub use controller::Controller;
pub use error::RecoverError;
pub use infer::InferenceReport;
pub use prng::{Descriptor, Prng};
pub use search::{CandidateResult, RunHandles};

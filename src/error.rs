//! Error type shared by every fallible operation in this crate.
//!
//! Configuration mistakes, malformed input and unavailable inference paths
//! are all represented here so callers can match on a single enum rather
//! than threading bespoke error types through the controller, the search
//! engine and the inference engine.

use thiserror::Error;

/// Everything that can go wrong while configuring or running a recovery.
#[derive(Debug, Error)]
pub enum RecoverError {
    /// The requested algorithm name is not in the registry.
    #[error("unknown algorithm: {0:?}")]
    UnknownAlgorithm(String),

    /// The depth budget is zero, or smaller than the observation length.
    #[error("depth {depth} must be >= 1 and >= the observation length ({observation_len})")]
    InvalidDepth {
        /// The rejected depth value.
        depth: usize,
        /// The observation sequence length it was compared against.
        observation_len: usize,
    },

    /// The requested worker count is zero.
    #[error("thread count must be >= 1")]
    InvalidThreadCount,

    /// The minimum confidence threshold is outside `(0, 100]`.
    #[error("minimum confidence {0} must be in (0, 100]")]
    InvalidConfidence(f64),

    /// A search or inference was requested with no loaded observations.
    #[error("no observations loaded")]
    NoObservations,

    /// Brute force was requested over an empty or inverted seed range.
    #[error("seed range [{lower}, {upper}) is empty")]
    EmptyRange {
        /// Inclusive lower bound supplied by the caller.
        lower: u32,
        /// Exclusive upper bound supplied by the caller.
        upper: u32,
    },

    /// State inference cannot proceed for the given algorithm/observations.
    #[error("state inference unavailable: {0}")]
    InferenceUnavailable(String),

    /// An I/O error occurred while reading the observation file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line in the observation file could not be parsed as an integer.
    #[error("malformed input on line {line}: {text:?}")]
    MalformedInput {
        /// 1-indexed line number in the source file.
        line: usize,
        /// The raw (trimmed) text that failed to parse.
        text: String,
    },
}

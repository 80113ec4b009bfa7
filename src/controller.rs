//! Facade over the PRNG registry, brute-force search and state-inference
//! engines.
//!
//! Holds the run configuration (algorithm, depth, thread count, minimum
//! confidence) and the accumulated observation sequence, validates every
//! setter at the call site, and dispatches to [`crate::search`] or
//! [`crate::infer`] on request. This is the only type the CLI shell talks
//! to; neither the search engine nor the inference engine are otherwise
//! reachable from outside the crate.

use crate::error::RecoverError;
use crate::infer::{self, InferenceReport};
use crate::prng;
use crate::search::{self, CandidateResult, RunHandles, SearchParams};
use std::sync::Arc;

/// Default depth budget applied by [`Controller::new`].
pub const DEFAULT_DEPTH: usize = 1000;
/// Default minimum confidence applied by [`Controller::new`].
pub const DEFAULT_MIN_CONFIDENCE: f64 = 100.0;

/// Configuration and accumulated observations for one recovery session.
///
/// State machine (spec.md §4.7): `idle` while being configured and loaded
/// with observations, `searching`/`inferring` while [`Self::brute_force`]
/// or [`Self::infer_state`] is in flight, `reporting` once either returns.
/// There is no explicit state field; the machine is implicit in which
/// method the caller is currently blocked inside.
pub struct Controller {
    algorithm: String,
    depth: usize,
    threads: usize,
    min_confidence: f64,
    observations: Vec<u32>,
    handles: Option<RunHandles>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// Builds a controller with every documented default: the registry's
    /// default algorithm, depth 1000, the platform's suggested
    /// parallelism (falling back to 1), minimum confidence 100.0, and no
    /// observations loaded.
    pub fn new() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Controller {
            algorithm: prng::names()[0].to_string(),
            depth: DEFAULT_DEPTH,
            threads,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            observations: Vec::new(),
            handles: None,
        }
    }

    /// Selects the algorithm by its registered name.
    pub fn set_algorithm(&mut self, name: &str) -> Result<(), RecoverError> {
        if !prng::supports(name) {
            return Err(RecoverError::UnknownAlgorithm(name.to_string()));
        }
        self.algorithm = name.to_string();
        Ok(())
    }

    /// Returns the currently configured algorithm name.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Sets the depth budget. Must be `>= 1`; validated fully against the
    /// observation length at run time, since that length can still change
    /// via [`Self::add_observation`] after this call.
    pub fn set_depth(&mut self, depth: usize) -> Result<(), RecoverError> {
        if depth < 1 {
            return Err(RecoverError::InvalidDepth {
                depth,
                observation_len: self.observations.len(),
            });
        }
        self.depth = depth;
        Ok(())
    }

    /// Returns the currently configured depth budget.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Sets the worker count used by [`Self::brute_force`]. Must be `>= 1`.
    pub fn set_threads(&mut self, threads: usize) -> Result<(), RecoverError> {
        if threads < 1 {
            return Err(RecoverError::InvalidThreadCount);
        }
        self.threads = threads;
        Ok(())
    }

    /// Returns the currently configured worker count.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Sets the minimum confidence a candidate must reach to be reported.
    /// Must be in `(0, 100]`.
    pub fn set_min_confidence(&mut self, confidence: f64) -> Result<(), RecoverError> {
        if !(confidence > 0.0 && confidence <= 100.0) {
            return Err(RecoverError::InvalidConfidence(confidence));
        }
        self.min_confidence = confidence;
        Ok(())
    }

    /// Returns the currently configured minimum confidence.
    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Appends one observed output to the accumulated sequence.
    /// Infallible: there is no upper bound on observation count beyond
    /// available memory.
    pub fn add_observation(&mut self, value: u32) {
        self.observations.push(value);
    }

    /// Returns the accumulated observation sequence.
    pub fn observations(&self) -> &[u32] {
        &self.observations
    }

    /// Obtains a clone of the shared progress atomics, sized to the
    /// current thread count. Must be called before [`Self::brute_force`]
    /// if the caller wants to observe a run from another thread; calling
    /// it again after a run completes resets the atomics for the next
    /// run.
    pub fn progress_handle(&mut self) -> RunHandles {
        let handles = RunHandles::new(self.threads);
        self.handles = Some(handles.clone());
        handles
    }

    /// Requests cancellation of any in-flight [`Self::brute_force`] run.
    /// A no-op if [`Self::progress_handle`] was never called.
    pub fn cancel(&self) {
        if let Some(handles) = &self.handles {
            handles.cancel();
        }
    }

    /// Checks the preconditions [`Self::brute_force`] would otherwise only
    /// discover after already spawning a search: observations are
    /// non-empty, `depth >= observations.len()`, and `lower < upper`.
    ///
    /// Exposed so a caller that wants to run a concurrent progress
    /// reporter (anything watching [`Self::progress_handle`] from another
    /// thread) can check for an early rejection *before* spawning that
    /// reporter, rather than spawning a thread that would otherwise wait
    /// on a `completed` flag that a rejected run never sets.
    pub fn check_brute_force_preconditions(&self, lower: u32, upper: u32) -> Result<(), RecoverError> {
        if self.observations.is_empty() {
            return Err(RecoverError::NoObservations);
        }
        if self.depth < self.observations.len() {
            return Err(RecoverError::InvalidDepth {
                depth: self.depth,
                observation_len: self.observations.len(),
            });
        }
        if lower >= upper {
            return Err(RecoverError::EmptyRange { lower, upper });
        }
        Ok(())
    }

    /// Runs a brute-force search over `[lower, upper)` with the currently
    /// configured algorithm, depth, thread count and minimum confidence.
    ///
    /// Validates via [`Self::check_brute_force_preconditions`] before
    /// touching the search engine. Blocks until every worker has joined.
    pub fn brute_force(&mut self, lower: u32, upper: u32) -> Result<Vec<CandidateResult>, RecoverError> {
        self.check_brute_force_preconditions(lower, upper)?;

        let handles = self.handles.clone().unwrap_or_else(|| self.progress_handle());
        let params = SearchParams {
            algorithm: self.algorithm.clone(),
            observations: Arc::new(self.observations.clone()),
            lower,
            upper,
            depth: self.depth,
            min_confidence: self.min_confidence,
            threads: self.threads,
        };
        Ok(search::run(&params, &handles))
    }

    /// Attempts direct state inference for the configured algorithm using
    /// the accumulated observations. Delegates to [`infer::infer`].
    pub fn infer_state(&self) -> Result<InferenceReport, RecoverError> {
        if self.observations.is_empty() {
            return Err(RecoverError::NoObservations);
        }
        infer::infer(&self.algorithm, &self.observations)
    }
}

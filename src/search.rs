//! Parallel brute-force seed search.
//!
//! Partitions a seed range across worker threads, each of which owns a
//! single generator instance it re-seeds per candidate. Workers never
//! touch each other's state; progress and cancellation are communicated
//! purely through relaxed atomics, per the concurrency model in the
//! project notes this crate follows.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

use crate::prng;
use crate::scorer;

/// A single accepted candidate: a seed whose produced sequence matched the
/// observations with at least the configured minimum confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateResult {
    /// The candidate seed.
    pub seed: u32,
    /// Confidence percentage in `(0, 100]`.
    pub confidence: f64,
}

/// How often (in candidates) each worker checks the shared cancellation
/// flag. A few thousand keeps the check overhead negligible while still
/// giving sub-second cancellation latency on any reasonable range size.
const CANCEL_CHECK_INTERVAL: u32 = 4096;

/// Shared atomics a caller can snapshot *before* starting a run, so a
/// progress-reporting thread can observe a search that is executing on
/// another thread.
#[derive(Clone)]
pub struct RunHandles {
    pub(crate) started: Arc<AtomicBool>,
    pub(crate) completed: Arc<AtomicBool>,
    pub(crate) cancelled: Arc<AtomicBool>,
    pub(crate) status: Arc<Vec<AtomicU32>>,
}

impl RunHandles {
    /// Allocates a fresh, zeroed set of handles sized for `threads`
    /// workers.
    pub fn new(threads: usize) -> Self {
        RunHandles {
            started: Arc::new(AtomicBool::new(false)),
            completed: Arc::new(AtomicBool::new(false)),
            cancelled: Arc::new(AtomicBool::new(false)),
            status: Arc::new((0..threads).map(|_| AtomicU32::new(0)).collect()),
        }
    }

    /// Whether any worker has begun evaluating candidates.
    pub fn started(&self) -> bool {
        self.started.load(Ordering::Relaxed)
    }

    /// Whether all workers have joined (normally or via cancellation).
    pub fn completed(&self) -> bool {
        self.completed.load(Ordering::Relaxed)
    }

    /// Per-worker count of candidates evaluated so far.
    pub fn status(&self) -> Vec<u32> {
        self.status.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }

    /// Sum of all per-worker counts.
    pub fn total_evaluated(&self) -> u64 {
        self.status().iter().map(|&n| n as u64).sum()
    }

    /// Requests cancellation; observed by workers at their next check.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Parameters for one brute-force run. Immutable for the run's duration.
pub struct SearchParams {
    /// Registered name of the algorithm every candidate is evaluated as.
    pub algorithm: String,
    /// The observed output sequence every candidate is scored against.
    pub observations: Arc<Vec<u32>>,
    /// Inclusive lower bound of the seed range to search.
    pub lower: u32,
    /// Exclusive upper bound of the seed range to search.
    pub upper: u32,
    /// Number of outputs the scorer produces per candidate.
    pub depth: usize,
    /// Minimum confidence, in `(0, 100]`, a candidate must reach to be
    /// reported.
    pub min_confidence: f64,
    /// Number of worker threads to partition the range across.
    pub threads: usize,
}

/// Splits `[lower, upper)` into `threads` near-equal, disjoint,
/// jointly-covering sub-ranges (I3 in the data model).
fn partition(lower: u32, upper: u32, threads: usize) -> Vec<(u32, u32)> {
    let total = u64::from(upper) - u64::from(lower);
    let threads = threads as u64;
    let base = total / threads;
    let remainder = total % threads;

    let mut ranges = Vec::with_capacity(threads as usize);
    let mut start = u64::from(lower);
    for i in 0..threads {
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start as u32, end as u32));
        start = end;
    }
    ranges
}

/// Runs the brute-force search described by `params`, reporting progress
/// and accepting cancellation through `handles`. Blocks until every
/// worker has joined, then returns the merged, deduplicated, sorted
/// results (P4: descending confidence, then ascending seed).
pub fn run(params: &SearchParams, handles: &RunHandles) -> Vec<CandidateResult> {
    let ranges = partition(params.lower, params.upper, params.threads);
    tracing::info!(
        algorithm = %params.algorithm,
        lower = params.lower,
        upper = params.upper,
        threads = params.threads,
        "starting brute-force search"
    );
    handles.started.store(true, Ordering::Relaxed);

    let results: Vec<Vec<CandidateResult>> = thread::scope(|scope| {
        let mut join_handles = Vec::with_capacity(ranges.len());
        for (worker_id, &(lo, hi)) in ranges.iter().enumerate() {
            let handles = handles.clone();
            let algorithm = params.algorithm.clone();
            let observations = Arc::clone(&params.observations);
            let depth = params.depth;
            let min_confidence = params.min_confidence;

            join_handles.push(scope.spawn(move || {
                worker_loop(worker_id, lo, hi, &algorithm, &observations, depth, min_confidence, &handles)
            }));
        }
        join_handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    handles.completed.store(true, Ordering::Relaxed);
    tracing::info!(total = handles.total_evaluated(), "search finished");

    merge_results(results)
}

fn worker_loop(
    worker_id: usize,
    lower: u32,
    upper: u32,
    algorithm: &str,
    observations: &[u32],
    depth: usize,
    min_confidence: f64,
    handles: &RunHandles,
) -> Vec<CandidateResult> {
    let mut found = Vec::new();
    // `make` only fails for unknown algorithm names, which the controller
    // has already validated before spawning any worker.
    let mut generator = prng::make(algorithm).expect("algorithm validated by controller");

    let mut since_check: u32 = 0;
    let mut seed = lower;
    while seed < upper {
        generator.seed(seed);
        let (best_p, _best_k) = scorer::score(generator.as_mut(), observations, depth);
        let conf = scorer::confidence(best_p, observations.len());
        if conf >= min_confidence {
            found.push(CandidateResult { seed, confidence: conf });
        }

        handles.status.get(worker_id).map(|c| c.fetch_add(1, Ordering::Relaxed));

        since_check += 1;
        if since_check >= CANCEL_CHECK_INTERVAL {
            since_check = 0;
            if handles.cancelled.load(Ordering::Relaxed) {
                tracing::debug!(worker_id, seed, "worker observed cancellation");
                return found;
            }
        }

        // Avoid overflow when `upper == u32::MAX`.
        seed = match seed.checked_add(1) {
            Some(next) if next < upper => next,
            _ => break,
        };
    }
    found
}

/// Merges per-worker result lists, deduplicates by seed, and sorts by
/// descending confidence then ascending seed (P4).
fn merge_results(per_worker: Vec<Vec<CandidateResult>>) -> Vec<CandidateResult> {
    use std::collections::BTreeMap;
    let mut by_seed: BTreeMap<u32, f64> = BTreeMap::new();
    for result in per_worker.into_iter().flatten() {
        by_seed.insert(result.seed, result.confidence);
    }
    let mut merged: Vec<CandidateResult> = by_seed
        .into_iter()
        .map(|(seed, confidence)| CandidateResult { seed, confidence })
        .collect();
    merged.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap()
            .then(a.seed.cmp(&b.seed))
    });
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_covers_range_disjointly() {
        for threads in [1usize, 2, 3, 7, 16] {
            let ranges = partition(0, 1000, threads);
            assert_eq!(ranges.len(), threads);
            let mut covered = 0u32;
            let mut prev_end = 0u32;
            for (lo, hi) in ranges {
                assert_eq!(lo, prev_end);
                assert!(hi >= lo);
                covered += hi - lo;
                prev_end = hi;
            }
            assert_eq!(covered, 1000);
            assert_eq!(prev_end, 1000);
        }
    }

    #[test]
    fn finds_mt19937_seed_31337_over_a_wide_range() {
        // Literal scenario S1: algorithm mt19937, seed 31337, L = 10,
        // range [0, 100000), depth 100. Expected top result: (31337, 100.0).
        let mut reference = prng::make("mt19937").unwrap();
        reference.seed(31337);
        let observations: Arc<Vec<u32>> = Arc::new((0..10).map(|_| reference.next_u32()).collect());

        let params = SearchParams {
            algorithm: "mt19937".to_string(),
            observations,
            lower: 0,
            upper: 100_000,
            depth: 100,
            min_confidence: 100.0,
            threads: 4,
        };
        let handles = RunHandles::new(params.threads);
        let results = run(&params, &handles);
        assert_eq!(results.first().map(|r| r.seed), Some(31337));
        assert_eq!(results.first().map(|r| r.confidence), Some(100.0));
    }

    #[test]
    fn finds_known_seed_with_single_thread() {
        let mut reference = prng::make("glibc_lcg").unwrap();
        reference.seed(1);
        let observations: Arc<Vec<u32>> = Arc::new((0..8).map(|_| reference.next_u32()).collect());

        let params = SearchParams {
            algorithm: "glibc_lcg".to_string(),
            observations,
            lower: 0,
            upper: 256,
            depth: 20,
            min_confidence: 100.0,
            threads: 1,
        };
        let handles = RunHandles::new(params.threads);
        let results = run(&params, &handles);
        assert_eq!(results.first().map(|r| r.seed), Some(1));
        assert_eq!(results.first().map(|r| r.confidence), Some(100.0));
        assert_eq!(handles.total_evaluated(), 256);
    }

    #[test]
    fn result_set_is_independent_of_thread_count() {
        let mut reference = prng::make("glibc_lcg").unwrap();
        reference.seed(1);
        let observations: Arc<Vec<u32>> = Arc::new((0..8).map(|_| reference.next_u32()).collect());

        let mut last: Option<Vec<CandidateResult>> = None;
        for threads in [1usize, 2, 4, 8] {
            let params = SearchParams {
                algorithm: "glibc_lcg".to_string(),
                observations: Arc::clone(&observations),
                lower: 0,
                upper: 256,
                depth: 20,
                min_confidence: 100.0,
                threads,
            };
            let handles = RunHandles::new(params.threads);
            let results = run(&params, &handles);
            if let Some(prev) = &last {
                assert_eq!(&results, prev);
            }
            last = Some(results);
        }
    }

    #[test]
    fn cancellation_returns_partial_results_without_hanging() {
        let observations: Arc<Vec<u32>> = Arc::new(vec![0, 0, 0, 0]);
        let params = SearchParams {
            algorithm: "mt19937".to_string(),
            observations,
            lower: 0,
            upper: u32::MAX,
            depth: 100,
            min_confidence: 100.0,
            threads: 4,
        };
        let handles = RunHandles::new(params.threads);
        handles.cancel();
        let results = run(&params, &handles);
        assert!(handles.completed());
        // With `cancelled` already set, every worker should stop at its
        // very first check interval.
        for count in handles.status() {
            assert!(count <= CANCEL_CHECK_INTERVAL);
        }
        let _ = results;
    }
}

//! Entry points for callers that just want primes
//!
//! Degenerate bounds (`lower >= upper`) produce an empty result rather than an
//! error, so a caller can pass user input straight through.

use crate::chain::RangeChainer;
use crate::parallel::{ParallelCoordinator, ParallelRun, WorkerCount};
use crate::persist::DirectorySink;
use crate::sieve::{FactorBase, FactorSource, Range, sieve_range_with};
use anyhow::Result;
use std::path::Path;
use std::time::Duration;

/// Cores left to the operating system when the worker count is derived from the machine
pub const DEFAULT_RESERVED_CORES: usize = 1;

/// Primes in `[0, upper)`
pub fn sieve(upper: u64) -> Result<Vec<u64>> {
    sieve_range(0, upper, None)
}

/// Primes in `[lower, upper)`, loading the factor base from `factor_file` when given
pub fn sieve_range(lower: u64, upper: u64, factor_file: Option<&Path>) -> Result<Vec<u64>> {
    if lower >= upper {
        return Ok(Vec::new());
    }
    sieve_range_with(Range::new(lower, upper)?, FactorSource::from_file(factor_file))
}

/// Primes in `[lower, upper)` computed by `workers` threads
pub fn parallel_sieve(
    lower: u64,
    upper: u64,
    factor_file: Option<&Path>,
    workers: WorkerCount,
) -> Result<ParallelRun> {
    if lower >= upper {
        return Ok(ParallelRun {
            primes: Vec::new(),
            elapsed: Duration::ZERO,
            workers: 0,
        });
    }
    let range = Range::new(lower, upper)?;
    let base = FactorBase::build(range.factor_limit(), FactorSource::from_file(factor_file));
    ParallelCoordinator::new(workers).run(range, base)
}

/// Sieve `iterations` consecutive ranges of width `delta` starting at `lower`,
/// writing each to `output_folder` when one is given
pub fn chain(
    lower: u64,
    delta: u64,
    iterations: u64,
    output_folder: Option<&Path>,
) -> Result<Vec<Vec<u64>>> {
    let coordinator =
        ParallelCoordinator::new(WorkerCount::available(DEFAULT_RESERVED_CORES, 0));
    let sink = output_folder.map(DirectorySink::create).transpose()?;

    let mut chainer = RangeChainer::new(coordinator);
    if let Some(sink) = &sink {
        chainer = chainer.with_sink(sink);
    }

    let sessions = chainer.run(lower, delta, iterations)?;
    Ok(sessions.into_iter().map(|session| session.primes).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_sieve_thirty() {
        assert_eq!(sieve(30).unwrap(), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_sieve_range_ten_to_thirty() {
        assert_eq!(sieve_range(10, 30, None).unwrap(), vec![11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_degenerate_bounds_are_empty() {
        assert!(sieve(0).unwrap().is_empty());
        assert!(sieve(2).unwrap().is_empty());
        assert!(sieve_range(30, 10, None).unwrap().is_empty());
        assert!(
            parallel_sieve(7, 7, None, WorkerCount::fixed(2))
                .unwrap()
                .primes
                .is_empty()
        );
    }

    #[test]
    fn test_parallel_hundred() {
        let run = parallel_sieve(0, 100, None, WorkerCount::fixed(4)).unwrap();
        assert_eq!(run.primes, sieve(100).unwrap());
        assert_eq!(run.primes.len(), 25);
    }

    #[test]
    fn test_factor_file_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let factors = temp_dir.path().join("factors.txt");
        fs::write(&factors, "2\n3\n5\n").unwrap();

        assert_eq!(
            sieve_range(30, 50, Some(&factors)).unwrap(),
            vec![31, 37, 41, 43, 47]
        );
        let run = parallel_sieve(30, 50, Some(&factors), WorkerCount::fixed(3)).unwrap();
        assert_eq!(run.primes, vec![31, 37, 41, 43, 47]);
    }

    #[test]
    fn test_chain_writes_files() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out");

        let results = chain(0, 10, 3, Some(&out)).unwrap();

        assert_eq!(results, vec![vec![2, 3, 5, 7], vec![11, 13, 17, 19], vec![23, 29]]);
        assert_eq!(
            fs::read_to_string(out.join("Primes [20,30).txt")).unwrap(),
            "23\n29\n"
        );
    }
}

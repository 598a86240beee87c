//! Chained sieving of successive equal-width ranges
//!
//! Iteration `i` sieves `[start + i*delta, start + (i+1)*delta)` with the parallel
//! coordinator. Iterations run strictly one after another; a failure stops the
//! chain but leaves files already written by earlier iterations in place.

use crate::parallel::ParallelCoordinator;
use crate::persist::ResultSink;
use crate::session::SieveSession;
use crate::sieve::{FactorBase, FactorSource, Range};
use anyhow::{Context, Result, bail};
use tracing::{debug, info};

/// Drives a [`ParallelCoordinator`] across consecutive ranges
pub struct RangeChainer<'a> {
    coordinator: ParallelCoordinator,
    reuse_factor_base: bool,
    sink: Option<&'a dyn ResultSink>,
}

impl<'a> RangeChainer<'a> {
    pub fn new(coordinator: ParallelCoordinator) -> Self {
        Self {
            coordinator,
            reuse_factor_base: false,
            sink: None,
        }
    }

    /// Persist every completed range through `sink` before moving on
    pub fn with_sink(mut self, sink: &'a dyn ResultSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Grow the previous iteration's factor base instead of building each one from scratch
    pub fn reuse_factor_base(mut self, reuse: bool) -> Self {
        self.reuse_factor_base = reuse;
        self
    }

    pub fn run(&self, start: u64, delta: u64, iterations: u64) -> Result<Vec<SieveSession>> {
        self.run_with(start, delta, iterations, |_| {})
    }

    /// Run the chain, calling `on_iteration` as each range completes
    pub fn run_with<F>(
        &self,
        start: u64,
        delta: u64,
        iterations: u64,
        mut on_iteration: F,
    ) -> Result<Vec<SieveSession>>
    where
        F: FnMut(&SieveSession),
    {
        if delta == 0 {
            bail!("Chain delta must be greater than zero");
        }

        let mut sessions = Vec::new();
        let mut previous_base: Option<FactorBase> = None;

        for iteration in 0..iterations {
            let range = iteration_range(start, delta, iteration)?;
            debug!("Chain iteration {}/{}: {}", iteration + 1, iterations, range);

            let source = match previous_base.take() {
                Some(base) => FactorSource::Supplied(base),
                None => FactorSource::Compute,
            };
            let base = FactorBase::build(range.factor_limit(), source);
            if self.reuse_factor_base {
                previous_base = Some(base.clone());
            }

            let run = self
                .coordinator
                .run(range, base)
                .with_context(|| format!("Chain iteration {} ({}) failed", iteration + 1, range))?;
            let mut session = SieveSession::parallel(range, run);

            if let Some(sink) = self.sink {
                let path = sink.persist(&session).with_context(|| {
                    format!("Chain iteration {} ({}) could not be saved", iteration + 1, range)
                })?;
                session.output_file = Some(path);
            }

            on_iteration(&session);
            sessions.push(session);
        }

        info!(
            "Chain of {} ranges from {} finished with {} primes",
            sessions.len(),
            start,
            sessions.iter().map(SieveSession::prime_count).sum::<usize>()
        );
        Ok(sessions)
    }
}

/// `[start + i*delta, start + (i+1)*delta)`, failing instead of overflowing
pub fn iteration_range(start: u64, delta: u64, iteration: u64) -> Result<Range> {
    let bound = |i: u64| {
        i.checked_mul(delta)
            .and_then(|offset| start.checked_add(offset))
            .with_context(|| format!("Chain range {} overflows u64", iteration + 1))
    };
    Range::new(bound(iteration)?, bound(iteration + 1)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::WorkerCount;
    use crate::persist::DirectorySink;
    use crate::sieve::sieve_range_with;
    use std::fs;
    use tempfile::TempDir;

    fn chainer<'a>() -> RangeChainer<'a> {
        RangeChainer::new(ParallelCoordinator::new(WorkerCount::fixed(3)))
    }

    #[test]
    fn test_chain_of_three_tens() {
        let sessions = chainer().run(0, 10, 3).unwrap();
        let primes: Vec<Vec<u64>> = sessions.iter().map(|s| s.primes.clone()).collect();
        assert_eq!(primes, vec![vec![2, 3, 5, 7], vec![11, 13, 17, 19], vec![23, 29]]);
    }

    #[test]
    fn test_ranges_tile_without_gaps() {
        for reuse in [false, true] {
            let sessions = chainer().reuse_factor_base(reuse).run(95, 37, 12).unwrap();
            assert_eq!(sessions.len(), 12);
            assert_eq!(sessions[0].range.lower(), 95);
            assert_eq!(sessions[11].range.upper(), 95 + 12 * 37);
            for pair in sessions.windows(2) {
                assert_eq!(pair[0].range.upper(), pair[1].range.lower());
            }
            for session in &sessions {
                let expected = sieve_range_with(session.range, FactorSource::Compute).unwrap();
                assert_eq!(session.primes, expected, "range {}", session.range);
            }
        }
    }

    #[test]
    fn test_zero_iterations_and_zero_delta() {
        assert!(chainer().run(0, 10, 0).unwrap().is_empty());
        assert!(chainer().run(0, 0, 3).is_err());
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(iteration_range(u64::MAX - 5, 10, 0).is_err());
        assert!(iteration_range(0, u64::MAX / 2, 2).is_err());
        assert_eq!(
            iteration_range(u64::MAX - 20, 10, 1).unwrap(),
            Range::new(u64::MAX - 10, u64::MAX).unwrap()
        );
    }

    #[test]
    fn test_sink_receives_every_range() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DirectorySink::create(temp_dir.path()).unwrap();
        let mut seen = Vec::new();

        let sessions = chainer()
            .with_sink(&sink)
            .run_with(100, 50, 2, |session| seen.push(session.range))
            .unwrap();

        assert_eq!(seen.len(), 2);
        let first = fs::read_to_string(temp_dir.path().join("Primes [100,150).txt")).unwrap();
        assert!(first.starts_with("101\n103\n"));
        assert!(temp_dir.path().join("Primes [150,200).txt").exists());
        assert_eq!(
            sessions[1].output_file.as_deref(),
            Some(temp_dir.path().join("Primes [150,200).txt").as_path())
        );
    }
}

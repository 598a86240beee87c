use super::workers::WorkerCount;
use crate::sieve::{FactorBase, Range, Segment, partition};
use anyhow::{Context, Result, anyhow};
use crossbeam::channel::{Receiver, Sender, bounded};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of one parallel dispatch
#[derive(Debug, Clone, Serialize)]
pub struct ParallelRun {
    /// Primes in ascending order
    pub primes: Vec<u64>,
    /// Dispatch-to-completion wall time, factor base construction excluded
    pub elapsed: Duration,
    /// Worker threads actually spawned
    pub workers: usize,
}

/// Result reported by a worker for the segment with the given index
type SegmentResult = (usize, Result<Vec<u64>>);

/// Context for worker threads to avoid too many function parameters
struct WorkerContext {
    worker_id: usize,
    work_rx: Receiver<Segment>,
    result_tx: Sender<SegmentResult>,
    progress_counter: Arc<AtomicUsize>,
    total_segments: usize,
}

/// Fans segments of a range out to a scoped worker pool and reassembles them in range order
#[derive(Debug, Clone, Copy)]
pub struct ParallelCoordinator {
    workers: WorkerCount,
}

impl ParallelCoordinator {
    pub fn new(workers: WorkerCount) -> Self {
        Self { workers }
    }

    pub fn workers(&self) -> WorkerCount {
        self.workers
    }

    /// Sieve `range` across the worker pool.
    ///
    /// Blocks until every segment has finished. If any segment fails or a worker
    /// panics the whole run fails and no partial result is returned.
    pub fn run(&self, range: Range, factor_base: FactorBase) -> Result<ParallelRun> {
        self.run_with(range, factor_base, Segment::sieve)
    }

    /// Like [`ParallelCoordinator::run`], with `sieve` applied to each segment
    pub fn run_with<F>(
        &self,
        range: Range,
        factor_base: FactorBase,
        sieve: F,
    ) -> Result<ParallelRun>
    where
        F: Fn(&Segment) -> Result<Vec<u64>> + Sync,
    {
        let segments = partition(range, self.workers.get(), Arc::new(factor_base));
        let total_segments = segments.len();
        let actual_workers = self.workers.get().min(total_segments);
        debug!(
            "Dispatching {} segments of {} to {} workers",
            total_segments, range, actual_workers
        );

        let (work_tx, work_rx): (Sender<Segment>, Receiver<Segment>) = bounded(actual_workers * 2);
        let (result_tx, result_rx): (Sender<SegmentResult>, Receiver<SegmentResult>) =
            bounded(actual_workers * 2);
        let progress_counter = Arc::new(AtomicUsize::new(0));

        let start = Instant::now();

        // The pool lives only inside this scope; every worker is joined before it returns
        let sieve = &sieve;
        let results = crossbeam::thread::scope(|s| {
            for worker_id in 0..actual_workers {
                let ctx = WorkerContext {
                    worker_id,
                    work_rx: work_rx.clone(),
                    result_tx: result_tx.clone(),
                    progress_counter: progress_counter.clone(),
                    total_segments,
                };
                s.spawn(move |_| worker_thread(ctx, sieve));
            }

            // Producer thread: send segments in range order
            s.spawn(move |_| {
                for segment in segments {
                    if work_tx.send(segment).is_err() {
                        break; // Workers dropped
                    }
                }
            });

            // Drop the originals so the producer and collector see disconnects
            drop(work_rx);
            drop(result_tx);

            collect_results(result_rx, total_segments)
        })
        .map_err(|_| anyhow!("Thread panic occurred during parallel sieve of {}", range))?;

        let elapsed = start.elapsed();
        let primes = assemble(range, results)?;

        info!(
            "Parallel sieve of {} found {} primes in {:.3}s ({} workers)",
            range,
            primes.len(),
            elapsed.as_secs_f64(),
            actual_workers
        );

        Ok(ParallelRun {
            primes,
            elapsed,
            workers: actual_workers,
        })
    }
}

fn worker_thread<F>(ctx: WorkerContext, sieve: &F)
where
    F: Fn(&Segment) -> Result<Vec<u64>>,
{
    while let Ok(segment) = ctx.work_rx.recv() {
        let result = sieve(&segment);

        if ctx.result_tx.send((segment.index, result)).is_err() {
            break; // Collector dropped
        }

        let current = ctx.progress_counter.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            "Segment {} {} done: {}/{} [worker-{}]",
            segment.index, segment.range, current, ctx.total_segments, ctx.worker_id
        );
    }
}

/// Gather one result per segment, slotted by segment index
fn collect_results(
    result_rx: Receiver<SegmentResult>,
    total_segments: usize,
) -> Vec<Option<Result<Vec<u64>>>> {
    let mut slots: Vec<Option<Result<Vec<u64>>>> = (0..total_segments).map(|_| None).collect();
    let mut received = 0;

    while let Ok((index, result)) = result_rx.recv() {
        slots[index] = Some(result);
        received += 1;

        if received >= total_segments {
            break;
        }
    }

    slots
}

/// Concatenate segment results in segment order; disjoint ascending segments need no sort
fn assemble(range: Range, slots: Vec<Option<Result<Vec<u64>>>>) -> Result<Vec<u64>> {
    let mut primes = Vec::new();
    for (index, slot) in slots.into_iter().enumerate() {
        let segment_primes = slot
            .ok_or_else(|| anyhow!("Segment {} of {} produced no result", index, range))?
            .with_context(|| format!("Segment {} of {} failed", index, range))?;
        primes.extend(segment_primes);
    }
    Ok(primes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sieve::{FactorSource, sieve_range_with};

    fn parallel(lower: u64, upper: u64, workers: usize) -> ParallelRun {
        let range = Range::new(lower, upper).unwrap();
        let base = FactorBase::build(range.factor_limit(), FactorSource::Compute);
        ParallelCoordinator::new(WorkerCount::fixed(workers))
            .run(range, base)
            .unwrap()
    }

    #[test]
    fn test_parallel_matches_serial() {
        for (lower, upper) in [(0, 100), (0, 1000), (10, 30), (999, 5000)] {
            let range = Range::new(lower, upper).unwrap();
            let serial = sieve_range_with(range, FactorSource::Compute).unwrap();
            for workers in [1, 2, 3, 4, 7, 16] {
                assert_eq!(
                    parallel(lower, upper, workers).primes,
                    serial,
                    "range {range} with {workers} workers"
                );
            }
        }
    }

    #[test]
    fn test_result_is_strictly_ascending() {
        let run = parallel(0, 20_000, 6);
        assert!(run.primes.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(run.primes.len(), 2262);
    }

    #[test]
    fn test_workers_limited_by_segments() {
        let run = parallel(10, 13, 8);
        assert_eq!(run.workers, 3);
        assert_eq!(run.primes, vec![11]);
    }

    #[test]
    fn test_worker_panic_fails_whole_run() {
        let range = Range::new(0, 1000).unwrap();
        let base = FactorBase::build(range.factor_limit(), FactorSource::Compute);

        let coordinator = ParallelCoordinator::new(WorkerCount::fixed(4));
        let result = coordinator.run_with(range, base, |segment| {
            if segment.index == 2 {
                panic!("segment {} blew up", segment.range);
            }
            segment.sieve()
        });

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Thread panic"));
    }

    #[test]
    fn test_run_with_applies_segment_function() {
        let range = Range::new(0, 100).unwrap();
        let run = ParallelCoordinator::new(WorkerCount::fixed(4))
            .run_with(range, FactorBase::default(), |segment| Ok(vec![segment.range.lower()]))
            .unwrap();
        assert_eq!(run.primes, vec![0, 25, 50, 75]);
    }

    #[test]
    fn test_incomplete_base_fails_whole_run() {
        let range = Range::new(1000, 2000).unwrap();
        let err = ParallelCoordinator::new(WorkerCount::fixed(4))
            .run(range, FactorBase::compute(5))
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed"));
    }
}

//! Parallel execution of range sieves
//!
//! This module owns the worker pool and nothing else: it does not know how a
//! factor base is obtained or where results end up.
//!
//! ## What This Module Does:
//! - **Resource Calculation**: [`WorkerCount`] turns the machine's core count,
//!   a reservation for the OS and an optional cap into a worker count
//! - **Fan-out / fan-in**: [`ParallelCoordinator`] partitions a range, feeds the
//!   segments to scoped worker threads over crossbeam channels and reassembles the
//!   results in range order
//!
//! ```text
//! ┌──────────────┐   segments   ┌──────────────┐   (index, primes)   ┌──────────────┐
//! │  Producer    │─────────────▶│  Worker × N  │────────────────────▶│  Collector   │
//! │ (partition)  │   bounded    │ sieve_segment│       bounded       │ slot by index│
//! └──────────────┘              └──────────────┘                     └──────────────┘
//! ```
//!
//! The worker count is an explicit input so runs are reproducible in tests:
//!
//! ```rust
//! use segsieve::parallel::{ParallelCoordinator, WorkerCount};
//! use segsieve::sieve::{FactorBase, FactorSource, Range};
//!
//! let range = Range::new(0, 100)?;
//! let base = FactorBase::build(range.factor_limit(), FactorSource::Compute);
//! let run = ParallelCoordinator::new(WorkerCount::fixed(4)).run(range, base)?;
//! assert_eq!(run.primes.len(), 25);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod coordinator;
pub mod workers;

pub use coordinator::{ParallelCoordinator, ParallelRun};
pub use workers::WorkerCount;

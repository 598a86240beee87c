//! # segsieve - segmented Sieve of Eratosthenes
//!
//! Finds the primes in a half-open range `[lower, upper)` by trial division
//! against a factor base: every prime up to `ceil(sqrt(upper))`. The factor base
//! is itself produced by the sieve (on a much smaller range) or loaded from a
//! file of known primes.
//!
//! ## Features
//!
//! - **Serial sieve** of any `u64` range
//! - **Parallel sieve**: the range is split into one contiguous segment per
//!   worker thread and the results are concatenated in range order
//! - **Chained sieve**: consecutive ranges of equal width, each sieved in
//!   parallel and optionally written to `Primes [lower,upper).txt`
//! - **Factor files**: reuse a previous run's output as the factor base; an
//!   unreadable or short file is repaired or replaced by recomputation
//!
//! ## Quick Start
//!
//! ```bash
//! # Primes below 1000
//! segsieve sieve 1000
//!
//! # Primes in [1e9, 1e9 + 1e6) on 8 threads, written to a file
//! segsieve parallel 1000000000 1001000000 --workers 8 --write
//!
//! # Ten ranges of one million each into ./primes
//! segsieve chain 1000000 10 --output primes
//! ```
//!
//! ## Library Usage
//!
//! ```rust
//! use segsieve::engine;
//! use segsieve::parallel::WorkerCount;
//!
//! assert_eq!(engine::sieve(30)?, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
//! assert_eq!(engine::sieve_range(10, 30, None)?, vec![11, 13, 17, 19, 23, 29]);
//!
//! let run = engine::parallel_sieve(0, 100, None, WorkerCount::fixed(4))?;
//! assert_eq!(run.primes.len(), 25);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod chain;
pub mod cli;
pub mod config;
pub mod engine;
pub mod parallel;
pub mod persist;
pub mod session;
pub mod sieve;

pub use cli::{Cli, Output};
pub use config::SieveConfig;
pub use session::SieveSession;

/// Result type alias for segsieve operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

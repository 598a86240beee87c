//! Sieve of Eratosthenes over half-open ranges
//!
//! The building blocks used by the serial, parallel and chained runs:
//!
//! - [`Range`]: the `[lower, upper)` interval being searched
//! - [`FactorBase`]: every prime up to `ceil(sqrt(upper))`, loaded or computed
//! - [`sieve_segment`]: trial division of one range against a factor base
//! - [`partition`]: contiguous split of a range into per-worker [`Segment`]s
//!
//! ```text
//! Range ──▶ FactorBase::build ──▶ partition ──▶ Segment::sieve (per worker)
//!              │    ▲
//!              └────┘  recursive on ceil(sqrt(limit))
//! ```

pub mod factor_base;
pub mod partition;
pub mod range;
pub mod segment;

pub use factor_base::{FactorBase, FactorSource};
pub use partition::{Segment, partition};
pub use range::{Range, factor_limit};
pub use segment::{sieve_from_origin, sieve_segment, sieve_with_base};

use anyhow::Result;

/// Serially sieve `range`, building a factor base from `source` only when needed
pub fn sieve_range_with(range: Range, source: FactorSource) -> Result<Vec<u64>> {
    if range.starts_at_origin() {
        return Ok(sieve_from_origin(range));
    }
    let base = FactorBase::build(range.factor_limit(), source);
    sieve_with_base(range, &base)
}

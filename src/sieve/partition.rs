use super::factor_base::FactorBase;
use super::range::Range;
use super::segment::sieve_segment;
use anyhow::Result;
use std::sync::Arc;

/// One worker's share of a partitioned range
#[derive(Debug, Clone)]
pub struct Segment {
    /// Submission order, equal to ordering by lower bound
    pub index: usize,
    pub range: Range,
    factor_base: Arc<FactorBase>,
}

impl Segment {
    pub fn factor_base(&self) -> &FactorBase {
        &self.factor_base
    }

    /// Sieve this segment's range
    pub fn sieve(&self) -> Result<Vec<u64>> {
        sieve_segment(self.range, &self.factor_base)
    }
}

/// Split `range` into `workers` contiguous segments; the last absorbs the remainder.
///
/// The count is clamped to the range width so every segment is non-empty. All
/// segments share the same immutable factor base.
pub fn partition(range: Range, workers: usize, factor_base: Arc<FactorBase>) -> Vec<Segment> {
    let count = (workers.max(1) as u64).min(range.width());
    let sieve_size = range.width() / count;

    (0..count)
        .map(|i| {
            let lower = range.lower() + i * sieve_size;
            let upper = if i == count - 1 {
                range.upper()
            } else {
                lower + sieve_size
            };
            Segment {
                index: i as usize,
                // sieve_size >= 1 after clamping
                range: Range::new_unchecked(lower, upper),
                factor_base: Arc::clone(&factor_base),
            }
        })
        .collect()
}

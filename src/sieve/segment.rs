//! Trial-division sieve over a single contiguous range
//!
//! Two passes exist. A range starting at or below 2 is sieved from the origin and
//! discovers its own factors as it goes. Any other range needs a complete
//! [`FactorBase`] covering its factor limit, and only odd candidates are tested.

use super::factor_base::FactorBase;
use super::range::Range;
use anyhow::{Result, bail};

/// Sieve a range, choosing the origin pass when the range starts at or below 2
pub fn sieve_segment(range: Range, base: &FactorBase) -> Result<Vec<u64>> {
    if range.starts_at_origin() {
        Ok(sieve_from_origin(range))
    } else {
        sieve_with_base(range, base)
    }
}

/// Sieve `[lower, upper)` with `lower <= 2`, growing the factor list in the same pass
pub fn sieve_from_origin(range: Range) -> Vec<u64> {
    let upper = range.upper();
    if upper <= 2 {
        return Vec::new();
    }

    let factor_limit = range.factor_limit();
    let mut primes = vec![2];
    let mut factors = vec![2];

    for candidate in (3..upper).step_by(2) {
        if has_proper_factor(candidate, &factors) {
            continue;
        }
        primes.push(candidate);
        if candidate <= factor_limit {
            factors.push(candidate);
        }
    }

    primes
}

/// Sieve a range above 2 using a precomputed factor base
pub fn sieve_with_base(range: Range, base: &FactorBase) -> Result<Vec<u64>> {
    let required = range.factor_limit();
    if !base.covers(required) {
        bail!(
            "Factor base covers primes up to {} but range {} needs primes up to {}",
            base.limit(),
            range,
            required
        );
    }

    // 2 is never a candidate away from the origin
    let start = if range.lower() % 2 == 0 {
        range.lower() + 1
    } else {
        range.lower()
    };

    let primes = (start..range.upper())
        .step_by(2)
        .filter(|&candidate| !has_proper_factor(candidate, base.primes()))
        .collect();

    Ok(primes)
}

/// True when some factor other than the candidate itself divides it.
/// `factors` must be ascending; testing stops once `f * f` exceeds the candidate.
fn has_proper_factor(candidate: u64, factors: &[u64]) -> bool {
    factors
        .iter()
        .take_while(|&&f| f.checked_mul(f).is_some_and(|square| square <= candidate))
        .any(|&f| candidate % f == 0 && candidate != f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sieve::factor_base::FactorSource;

    fn range(lower: u64, upper: u64) -> Range {
        Range::new(lower, upper).unwrap()
    }

    #[test]
    fn test_origin_pass_small_bounds() {
        assert!(sieve_from_origin(range(0, 1)).is_empty());
        assert!(sieve_from_origin(range(0, 2)).is_empty());
        assert_eq!(sieve_from_origin(range(0, 3)), vec![2]);
        assert_eq!(sieve_from_origin(range(2, 4)), vec![2, 3]);
    }

    #[test]
    fn test_origin_pass_thirty() {
        assert_eq!(
            sieve_from_origin(range(0, 30)),
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]
        );
    }

    #[test]
    fn test_base_pass_skips_even_lower_bound() {
        let base = FactorBase::build(range(10, 30).factor_limit(), FactorSource::Compute);
        assert_eq!(
            sieve_with_base(range(10, 30), &base).unwrap(),
            vec![11, 13, 17, 19, 23, 29]
        );
    }

    #[test]
    fn test_candidate_equal_to_factor_is_prime() {
        let base = FactorBase::build(10, FactorSource::Compute);
        assert_eq!(sieve_with_base(range(3, 10), &base).unwrap(), vec![3, 5, 7]);
    }

    #[test]
    fn test_base_pass_rejects_incomplete_base() {
        let base = FactorBase::build(3, FactorSource::Compute);
        let err = sieve_with_base(range(100, 200), &base).unwrap_err();
        assert!(err.to_string().contains("needs primes up to 15"));
    }

    #[test]
    fn test_dispatch_uses_origin_pass_without_base() {
        let empty = FactorBase::build(0, FactorSource::Compute);
        assert_eq!(sieve_segment(range(1, 12), &empty).unwrap(), vec![2, 3, 5, 7, 11]);
    }
}

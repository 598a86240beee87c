use anyhow::{Result, bail};
use serde::Serialize;
use std::fmt;

/// Half-open interval `[lower, upper)` of candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    lower: u64,
    upper: u64,
}

impl Range {
    /// Create a range, rejecting empty or inverted bounds
    pub fn new(lower: u64, upper: u64) -> Result<Self> {
        if lower >= upper {
            bail!("Invalid range [{lower},{upper}): lower bound must be below upper bound");
        }
        Ok(Self { lower, upper })
    }

    /// Sub-range construction where the caller has already checked `lower < upper`
    pub(crate) fn new_unchecked(lower: u64, upper: u64) -> Self {
        debug_assert!(lower < upper, "empty range [{lower},{upper})");
        Self { lower, upper }
    }

    /// Range starting at zero
    pub fn up_to(upper: u64) -> Result<Self> {
        Self::new(0, upper)
    }

    pub fn lower(&self) -> u64 {
        self.lower
    }

    pub fn upper(&self) -> u64 {
        self.upper
    }

    /// Number of integers covered
    pub fn width(&self) -> u64 {
        self.upper - self.lower
    }

    /// Largest prime factor that can matter for candidates in this range
    pub fn factor_limit(&self) -> u64 {
        factor_limit(self.upper)
    }

    /// Whether sieving this range starts from 2 and can discover its own factors
    pub fn starts_at_origin(&self) -> bool {
        self.lower <= 2
    }

    /// File name used when the primes of this range are persisted
    pub fn file_name(&self) -> String {
        format!("Primes {self}.txt")
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.lower, self.upper)
    }
}

/// `ceil(sqrt(upper))` in exact integer arithmetic
pub fn factor_limit(upper: u64) -> u64 {
    let root = upper.isqrt();
    if root * root < upper { root + 1 } else { root }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_inverted_ranges() {
        assert!(Range::new(5, 5).is_err());
        assert!(Range::new(6, 5).is_err());
        assert!(Range::new(0, 1).is_ok());
    }

    #[test]
    fn test_factor_limit_rounds_up() {
        assert_eq!(factor_limit(0), 0);
        assert_eq!(factor_limit(1), 1);
        assert_eq!(factor_limit(30), 6);
        assert_eq!(factor_limit(49), 7);
        assert_eq!(factor_limit(50), 8);
        assert_eq!(factor_limit(u64::MAX), 1 << 32);
    }

    #[test]
    fn test_file_name_format() {
        let range = Range::new(10, 20).unwrap();
        assert_eq!(range.file_name(), "Primes [10,20).txt");
        assert_eq!(range.width(), 10);
    }
}

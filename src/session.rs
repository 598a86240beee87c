use crate::parallel::ParallelRun;
use crate::sieve::Range;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything reported about one sieve invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SieveSession {
    pub range: Range,
    pub primes: Vec<u64>,
    pub elapsed: Duration,
    /// Worker threads used, `None` for a serial run
    pub workers: Option<usize>,
    /// File the primes were written to, if they were persisted
    pub output_file: Option<PathBuf>,
}

impl SieveSession {
    pub fn serial(range: Range, primes: Vec<u64>, elapsed: Duration) -> Self {
        Self {
            range,
            primes,
            elapsed,
            workers: None,
            output_file: None,
        }
    }

    pub fn parallel(range: Range, run: ParallelRun) -> Self {
        Self {
            range,
            primes: run.primes,
            elapsed: run.elapsed,
            workers: Some(run.workers),
            output_file: None,
        }
    }

    pub fn factor_limit(&self) -> u64 {
        self.range.factor_limit()
    }

    pub fn prime_count(&self) -> usize {
        self.primes.len()
    }

    /// Serializable view, with the primes themselves only when `include_primes` is set
    pub fn summary(&self, include_primes: bool) -> SessionSummary<'_> {
        SessionSummary {
            lower: self.range.lower(),
            upper: self.range.upper(),
            factor_limit: self.factor_limit(),
            prime_count: self.prime_count(),
            elapsed_ms: self.elapsed.as_secs_f64() * 1000.0,
            workers: self.workers,
            output_file: self.output_file.as_deref(),
            primes: include_primes.then_some(self.primes.as_slice()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionSummary<'a> {
    pub lower: u64,
    pub upper: u64,
    pub factor_limit: u64,
    pub prime_count: usize,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primes: Option<&'a [u64]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_json_omits_absent_fields() {
        let range = Range::new(0, 10).unwrap();
        let session = SieveSession::serial(range, vec![2, 3, 5, 7], Duration::from_millis(3));

        let json = serde_json::to_value(session.summary(false)).unwrap();
        assert_eq!(json["prime_count"], 4);
        assert_eq!(json["factor_limit"], 4);
        assert!(json.get("primes").is_none());
        assert!(json.get("workers").is_none());

        let json = serde_json::to_value(session.summary(true)).unwrap();
        assert_eq!(json["primes"], serde_json::json!([2, 3, 5, 7]));
    }
}

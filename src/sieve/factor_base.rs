//! Factor base construction
//!
//! A factor base is the complete, ascending list of primes up to a factor limit.
//! It can be loaded from a file of known primes, grown from a previously built
//! base, or recomputed by sieving from the origin. Loading never aborts a run:
//! any problem with the supplied primes degrades to recomputation.

use super::range::Range;
use super::segment::{sieve_from_origin, sieve_segment};
use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where known primes come from when building a factor base
#[derive(Debug, Clone, Default)]
pub enum FactorSource {
    /// File with one prime per line, ascending
    File(PathBuf),
    /// A previously built base, grown or trimmed to the new limit
    Supplied(FactorBase),
    /// Sieve from the origin
    #[default]
    Compute,
}

impl FactorSource {
    /// Use the file if one was given, otherwise compute
    pub fn from_file(path: Option<&Path>) -> Self {
        match path {
            Some(path) => FactorSource::File(path.to_path_buf()),
            None => FactorSource::Compute,
        }
    }
}

/// Ascending primes covering every prime up to `limit`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FactorBase {
    limit: u64,
    primes: Vec<u64>,
}

/// Primes read from an external source before the missing tail is filled
struct KnownPrimes {
    primes: Vec<u64>,
    /// Largest value the known primes are complete up to
    complete_to: u64,
}

impl FactorBase {
    /// Build the base for `limit`, falling back to recomputation on any source failure
    pub fn build(limit: u64, source: FactorSource) -> Self {
        let known = match source {
            FactorSource::Compute => return Self::compute(limit),
            FactorSource::File(path) => read_factor_file(&path, limit)
                .with_context(|| format!("Could not load factor file {}", path.display())),
            FactorSource::Supplied(base) => Ok(KnownPrimes {
                complete_to: base.limit,
                primes: base.primes,
            }),
        };

        match known.and_then(|known| Self::complete(known, limit)) {
            Ok(base) => base,
            Err(e) => {
                warn!("{e:#}; generating primes up to {limit}");
                Self::compute(limit)
            }
        }
    }

    /// Sieve every prime up to and including `limit`
    pub fn compute(limit: u64) -> Self {
        debug!("Computing factor base up to {}", limit);
        let primes = match limit.checked_add(1).map(Range::up_to) {
            Some(Ok(range)) => sieve_from_origin(range),
            _ => Vec::new(),
        };
        Self { limit, primes }
    }

    /// Trim known primes to `limit` and sieve whatever lies between them and `limit`
    fn complete(known: KnownPrimes, limit: u64) -> Result<Self> {
        let KnownPrimes {
            mut primes,
            complete_to,
        } = known;
        primes.retain(|&p| p <= limit);

        if complete_to < limit {
            let end = limit.checked_add(1).context("factor limit overflows u64")?;
            let tail = Range::new(complete_to + 1, end)?;
            debug!("Filling factor base tail {}", tail);
            let tail_base = FactorBase::build(tail.factor_limit(), FactorSource::Compute);
            primes.extend(sieve_segment(tail, &tail_base)?);
        }

        Ok(Self { limit, primes })
    }

    /// Largest value this base is complete up to
    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    /// Whether every prime up to `factor_limit` is present
    pub fn covers(&self, factor_limit: u64) -> bool {
        self.limit >= factor_limit
    }

    pub fn into_primes(self) -> Vec<u64> {
        self.primes
    }
}

/// Read ascending primes until one exceeds `limit` or the file ends
fn read_factor_file(path: &Path, limit: u64) -> Result<KnownPrimes> {
    let file = File::open(path)?;
    let mut primes: Vec<u64> = Vec::new();
    let mut complete_to = None;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let value = line.trim();
        if value.is_empty() {
            continue;
        }
        let value: u64 = value
            .parse()
            .with_context(|| format!("line {} is not an integer: '{}'", index + 1, value))?;

        if value < 2 {
            bail!("line {}: {} is not a prime", index + 1, value);
        }
        // Only the tail above the last value is ever filled in
        if primes.is_empty() && value != 2 {
            bail!("line {}: primes must start at 2, found {}", index + 1, value);
        }
        if primes.last().is_some_and(|&last| value <= last) {
            bail!("line {}: primes are not in ascending order", index + 1);
        }

        primes.push(value);
        if value > limit {
            complete_to = Some(value);
            break;
        }
    }

    let Some(&last) = primes.last() else {
        bail!("file contains no primes");
    };
    debug!("Loaded {} primes from {}", primes.len(), path.display());

    Ok(KnownPrimes {
        primes,
        complete_to: complete_to.unwrap_or(last),
    })
}

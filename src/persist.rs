//! Flat-file persistence of sieve results
//!
//! Each completed range is written to `Primes [<lower>,<upper>).txt`, one prime
//! per line in ascending order, newline-terminated, with no header or footer.

use crate::session::SieveSession;
use crate::sieve::Range;
use anyhow::{Context, Result, bail};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Destination for completed sessions
pub trait ResultSink {
    /// Persist the session's primes, returning where they went
    fn persist(&self, session: &SieveSession) -> Result<PathBuf>;
}

/// Writes one file per range into a folder (or the working directory)
#[derive(Debug, Clone, Default)]
pub struct DirectorySink {
    dir: Option<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Verify or create the folder, then return a sink writing into it
    pub fn create(dir: &Path) -> Result<Self> {
        ensure_output_dir(dir)?;
        Ok(Self::new(Some(dir.to_path_buf())))
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

impl ResultSink for DirectorySink {
    fn persist(&self, session: &SieveSession) -> Result<PathBuf> {
        write_primes(session.range, &session.primes, self.dir.as_deref())
    }
}

/// Where the primes of `range` are written
pub fn output_path(range: Range, dir: Option<&Path>) -> PathBuf {
    match dir {
        Some(dir) => dir.join(range.file_name()),
        None => PathBuf::from(range.file_name()),
    }
}

/// Write `primes` for `range`, one per line
pub fn write_primes(range: Range, primes: &[u64], dir: Option<&Path>) -> Result<PathBuf> {
    let path = output_path(range, dir);
    let file = File::create(&path)
        .with_context(|| format!("Could not write primes to {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    for prime in primes {
        writeln!(writer, "{prime}")?;
    }
    writer
        .flush()
        .with_context(|| format!("Could not write primes to {}", path.display()))?;

    debug!("Wrote {} primes to {}", primes.len(), path.display());
    Ok(path)
}

/// Ensure a directory exists, creating it if needed
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        bail!("Output path {} exists but is not a folder", dir.display());
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Could not create output folder {}", dir.display()))?;
    Ok(())
}

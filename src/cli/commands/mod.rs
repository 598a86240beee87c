//! Command implementations for the segsieve CLI
//!
//! Each command lives in its own module; the argument handling and reporting
//! shared by the single-range commands is kept here.

pub mod chain;
pub mod config;
pub mod parallel;
pub mod sieve;
pub mod version;

use crate::cli::{Output, OutputFormat};
use crate::config::{SieveConfig, WriteMode};
use crate::persist::{DirectorySink, ResultSink};
use crate::session::SieveSession;
use crate::sieve::Range;
use anyhow::{Result, bail};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Arguments shared by `sieve` and `parallel`
#[derive(Args, Debug)]
pub struct RangeArgs {
    /// UPPER, or LOWER UPPER. Searches [LOWER, UPPER) with LOWER defaulting to 0
    #[arg(value_name = "BOUNDS", num_args = 1..=2, required = true)]
    pub bounds: Vec<u64>,

    /// File of known primes, one per line ascending, used to build the factor base
    #[arg(short, long, value_name = "FILE")]
    pub factors: Option<PathBuf>,

    /// Write the primes to "Primes [LOWER,UPPER).txt" without asking
    #[arg(short, long, conflicts_with = "no_write")]
    pub write: bool,

    /// Never write the primes
    #[arg(long)]
    pub no_write: bool,

    /// Print every prime found
    #[arg(short, long)]
    pub list: bool,
}

impl RangeArgs {
    pub fn range(&self) -> Result<Range> {
        let (lower, upper) = match self.bounds.as_slice() {
            [upper] => (0, *upper),
            [lower, upper] => (*lower, *upper),
            _ => bail!("Expected UPPER or LOWER UPPER"),
        };
        Range::new(lower, upper)
    }

    /// Resolve the flags and configured write mode into a yes/no
    fn wants_write(
        &self,
        range: Range,
        config: &SieveConfig,
        format: OutputFormat,
        output: &Output,
    ) -> bool {
        if self.write {
            return true;
        }
        if self.no_write {
            return false;
        }
        match config.output.write {
            WriteMode::Always => true,
            WriteMode::Never => false,
            // A prompt would corrupt JSON output
            WriteMode::Ask => format == OutputFormat::Text && output.confirm(&format!(
                "Write the primes to a file named \"{}\"?",
                range.file_name()
            )),
        }
    }
}

/// Persist a single-run session if requested. Failures are reported, not propagated:
/// the primes are still valid and still get reported.
pub(crate) fn persist_session(
    session: &mut SieveSession,
    args: &RangeArgs,
    config: &SieveConfig,
    format: OutputFormat,
    output: &Output,
) {
    if !args.wants_write(session.range, config, format, output) {
        return;
    }

    let sink = match config.output_dir() {
        Some(dir) => DirectorySink::create(&dir),
        None => Ok(DirectorySink::default()),
    };
    match sink.and_then(|sink| sink.persist(session)) {
        Ok(path) => session.output_file = Some(path),
        Err(e) => output.error(&format!("{e:#}")),
    }
}

/// Print the report for one completed range
pub(crate) fn report_session(
    session: &SieveSession,
    format: OutputFormat,
    list: bool,
    output: &Output,
) -> Result<()> {
    if format == OutputFormat::Json {
        output.data(&serde_json::to_string_pretty(&session.summary(list))?);
        return Ok(());
    }

    output.header(&format!("Primes in {}", session.range));
    output.key_value(
        "Range:",
        &format!(
            "{} (inclusive) to {} (exclusive)",
            session.range.lower(),
            session.range.upper()
        ),
        false,
    );
    output.key_value(
        "Factor limit:",
        &format!("primes up to {} used as factors", session.factor_limit()),
        false,
    );
    output.key_value("Primes found:", &session.prime_count().to_string(), true);
    output.key_value("Elapsed:", &format_elapsed(session.elapsed), false);
    if let Some(workers) = session.workers {
        output.key_value("Workers:", &workers.to_string(), false);
    }
    if let Some(path) = &session.output_file {
        output.key_value("Written to:", &path.display().to_string(), false);
    }

    if list {
        output.blank_line();
        for prime in &session.primes {
            output.data(&prime.to_string());
        }
    }
    Ok(())
}

pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.3} ms", elapsed.as_secs_f64() * 1000.0)
}

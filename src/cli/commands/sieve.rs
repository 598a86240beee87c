//! Serial sieve command

use super::{RangeArgs, persist_session, report_session};
use crate::cli::{Output, OutputFormat};
use crate::config::SieveConfig;
use crate::engine;
use crate::session::SieveSession;
use anyhow::Result;
use clap::Args;
use std::time::Instant;

#[derive(Args, Debug)]
pub struct SieveArgs {
    #[command(flatten)]
    pub range: RangeArgs,
}

/// Execute the sieve command
pub fn execute(
    args: SieveArgs,
    config: &SieveConfig,
    format: OutputFormat,
    output: &Output,
) -> Result<()> {
    let range = args.range.range()?;
    if format == OutputFormat::Text {
        output.verbose(&format!("Sieving {} on one thread", range));
    }

    // Timed end to end, factor base included
    let start = Instant::now();
    let primes = engine::sieve_range(range.lower(), range.upper(), args.range.factors.as_deref())?;
    let mut session = SieveSession::serial(range, primes, start.elapsed());

    persist_session(&mut session, &args.range, config, format, output);
    report_session(&session, format, args.range.list, output)
}

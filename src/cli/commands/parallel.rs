//! Parallel sieve command

use super::{RangeArgs, persist_session, report_session};
use crate::cli::{Output, OutputFormat};
use crate::config::SieveConfig;
use crate::engine;
use crate::parallel::WorkerCount;
use crate::session::SieveSession;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct ParallelArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Worker threads (defaults to available cores minus the configured reservation)
    #[arg(short = 'j', long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub workers: Option<u64>,
}

/// Execute the parallel command
pub fn execute(
    args: ParallelArgs,
    config: &SieveConfig,
    format: OutputFormat,
    output: &Output,
) -> Result<()> {
    let range = args.range.range()?;
    let workers = args
        .workers
        .map(|n| WorkerCount::fixed(n as usize))
        .unwrap_or_else(|| config.worker_count());
    if format == OutputFormat::Text {
        output.verbose(&format!("Sieving {} with up to {} workers", range, workers));
    }

    let run = engine::parallel_sieve(
        range.lower(),
        range.upper(),
        args.range.factors.as_deref(),
        workers,
    )?;
    let mut session = SieveSession::parallel(range, run);

    persist_session(&mut session, &args.range, config, format, output);
    report_session(&session, format, args.range.list, output)
}

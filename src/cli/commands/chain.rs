//! Chained sieve command

use super::format_elapsed;
use crate::chain::RangeChainer;
use crate::cli::{Output, OutputFormat};
use crate::config::SieveConfig;
use crate::parallel::{ParallelCoordinator, WorkerCount};
use crate::persist::DirectorySink;
use crate::session::SieveSession;
use anyhow::{Result, bail};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ChainArgs {
    /// DELTA ITERATIONS, or LOWER DELTA ITERATIONS. Sieves ITERATIONS ranges of width DELTA
    #[arg(value_name = "BOUNDS", num_args = 2..=3, required = true)]
    pub bounds: Vec<u64>,

    /// Folder receiving one "Primes [LOWER,UPPER).txt" file per range (created if missing)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Worker threads (defaults to available cores minus the configured reservation)
    #[arg(short = 'j', long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub workers: Option<u64>,

    /// Print every prime found
    #[arg(short, long)]
    pub list: bool,
}

impl ChainArgs {
    /// (lower, delta, iterations)
    pub fn plan(&self) -> Result<(u64, u64, u64)> {
        match self.bounds.as_slice() {
            [delta, iterations] => Ok((0, *delta, *iterations)),
            [lower, delta, iterations] => Ok((*lower, *delta, *iterations)),
            _ => bail!("Expected DELTA ITERATIONS or LOWER DELTA ITERATIONS"),
        }
    }
}

/// Execute the chain command
pub fn execute(
    args: ChainArgs,
    config: &SieveConfig,
    format: OutputFormat,
    output: &Output,
) -> Result<()> {
    let (lower, delta, iterations) = args.plan()?;
    let workers = args
        .workers
        .map(|n| WorkerCount::fixed(n as usize))
        .unwrap_or_else(|| config.worker_count());

    let output_dir = args.output.clone().or_else(|| config.output_dir());
    let sink = output_dir
        .as_deref()
        .map(DirectorySink::create)
        .transpose()?;

    let mut chainer = RangeChainer::new(ParallelCoordinator::new(workers))
        .reuse_factor_base(config.chain.reuse_factor_base);
    if let Some(sink) = &sink {
        chainer = chainer.with_sink(sink);
    }

    if format == OutputFormat::Text {
        output.header(&format!(
            "Chain of {} ranges of width {} from {}",
            iterations, delta, lower
        ));
    }

    let sessions = chainer.run_with(lower, delta, iterations, |session| {
        if format == OutputFormat::Text {
            report_iteration(session, args.list, output);
        }
    })?;

    if format == OutputFormat::Json {
        let summaries: Vec<_> = sessions.iter().map(|s| s.summary(args.list)).collect();
        output.data(&serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let total: usize = sessions.iter().map(SieveSession::prime_count).sum();
    output.blank_line();
    output.success(&format!("{} primes across {} ranges", total, sessions.len()));
    if let Some(dir) = sink.as_ref().and_then(DirectorySink::dir) {
        output.info(&format!("Results written to {}", dir.display()));
    }
    Ok(())
}

fn report_iteration(session: &SieveSession, list: bool, output: &Output) {
    let mut detail = format!(
        "{} primes in {} ({} workers)",
        session.prime_count(),
        format_elapsed(session.elapsed),
        session.workers.unwrap_or(1)
    );
    if let Some(path) = &session.output_file {
        detail.push_str(&format!(" -> {}", path.display()));
    }
    output.action_result(&session.range.to_string(), &detail, true);

    if list {
        for prime in &session.primes {
            output.data(&prime.to_string());
        }
    }
}

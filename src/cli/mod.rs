//! Command-line interface for segsieve
//!
//! A thin shell over the sieve engine: it parses bounds, loads configuration,
//! decides whether results are persisted and prints run reports.

use crate::config::SieveConfig;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

pub mod commands;
mod output;

pub use output::Output;

/// segsieve - segmented, parallel and chained Sieve of Eratosthenes
#[derive(Parser)]
#[command(
    name = "segsieve",
    version = env!("CARGO_PKG_VERSION"),
    about = "Segmented, parallel and chained Sieve of Eratosthenes",
    long_about = "segsieve finds the primes in [lower, upper) by trial division against a \
                  factor base of the primes up to ceil(sqrt(upper)), serially, across worker \
                  threads, or over a chain of consecutive ranges."
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sieve a range on the current thread
    Sieve(commands::sieve::SieveArgs),
    /// Sieve a range across worker threads
    Parallel(commands::parallel::ParallelArgs),
    /// Sieve consecutive equal-width ranges one after another
    Chain(commands::chain::ChainArgs),
    /// Configuration management
    #[command(subcommand)]
    Config(commands::config::ConfigCommands),
    /// Show version information
    Version,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);

        match self.command {
            Some(Commands::Sieve(args)) => {
                let config = SieveConfig::load_with_custom_config(self.config.as_deref())?;
                commands::sieve::execute(args, &config, self.format, &output)
            }
            Some(Commands::Parallel(args)) => {
                let config = SieveConfig::load_with_custom_config(self.config.as_deref())?;
                commands::parallel::execute(args, &config, self.format, &output)
            }
            Some(Commands::Chain(args)) => {
                let config = SieveConfig::load_with_custom_config(self.config.as_deref())?;
                commands::chain::execute(args, &config, self.format, &output)
            }
            Some(Commands::Config(cmd)) => {
                commands::config::execute(cmd, self.config.as_deref(), self.format, &output)
            }
            Some(Commands::Version) => commands::version::execute(&output),
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Logs go to stderr so primes and JSON on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

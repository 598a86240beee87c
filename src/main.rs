use anyhow::Result;
use clap::Parser;
use segsieve::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}

//! Configuration command implementations

use crate::cli::{Output, OutputFormat};
use crate::config::SieveConfig;
use anyhow::Result;
use clap::Subcommand;

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the merged configuration
    Show,
    /// Check that the configuration loads and summarize it
    Validate,
}

/// Execute config commands
pub fn execute(
    cmd: ConfigCommands,
    custom_config: Option<&str>,
    format: OutputFormat,
    output: &Output,
) -> Result<()> {
    let config = SieveConfig::load_with_custom_config(custom_config)?;

    match cmd {
        ConfigCommands::Show => show(&config, format, output),
        ConfigCommands::Validate => validate(&config, output),
    }
}

fn show(config: &SieveConfig, format: OutputFormat, output: &Output) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => toml::to_string_pretty(config)?,
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
    };
    output.data(rendered.trim_end());
    Ok(())
}

fn validate(config: &SieveConfig, output: &Output) -> Result<()> {
    output.success("Configuration is valid");

    output.category("Summary");
    output.key_value("Workers:", &config.worker_count().to_string(), true);
    output.key_value(
        "Output folder:",
        &config
            .output_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "working directory".to_string()),
        false,
    );
    output.key_value("Write mode:", &format!("{:?}", config.output.write).to_lowercase(), false);
    output.key_value(
        "Reuse factor base:",
        &config.chain.reuse_factor_base.to_string(),
        false,
    );
    Ok(())
}

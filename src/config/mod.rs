//! Configuration management for segsieve
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. defaults embedded from `default-config.toml`
//! 2. `~/.config/segsieve/config.{toml,json,yaml}`
//! 3. `segsieve.{toml,json,yaml}` in the working directory
//! 4. `SEGSIEVE_` environment variables (`SEGSIEVE_PARALLEL__MAX_WORKERS=4`)
//!
//! A file passed with `--config` replaces layers 2 and 3.

use crate::parallel::WorkerCount;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Main configuration structure for segsieve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SieveConfig {
    pub parallel: ParallelConfig,
    pub output: OutputConfig,
    pub chain: ChainConfig,
}

/// Worker pool sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Cores left to the operating system
    pub reserved_cores: usize,
    /// Maximum number of worker threads (0 = no limit)
    pub max_workers: usize,
}

/// Persistence of single-run results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Folder for result files, empty for the working directory
    #[serde(default)]
    pub directory: String,
    pub write: WriteMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    Ask,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub reuse_factor_base: bool,
}

impl SieveConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");
        let mut figment = Self::figment(custom_config);

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("SEGSIEVE_").split("__"));

        figment
            .extract()
            .context("Failed to load segsieve configuration")
    }

    fn figment(custom_config: Option<&str>) -> Figment {
        let figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            tracing::trace!("CONFIG LOAD: Using custom config {}", custom_path);
            return match Path::new(custom_path).extension().and_then(|ext| ext.to_str()) {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        }

        let user_config = Self::user_config_path();
        figment
            // User config - support multiple formats
            .merge(Toml::file(user_config.with_extension("toml")))
            .merge(Json::file(user_config.with_extension("json")))
            .merge(Yaml::file(user_config.with_extension("yaml")))
            // Project config
            .merge(Toml::file("segsieve.toml"))
            .merge(Json::file("segsieve.json"))
            .merge(Yaml::file("segsieve.yaml"))
    }

    /// Worker count for this machine under the configured reservation and cap
    pub fn worker_count(&self) -> WorkerCount {
        WorkerCount::available(self.parallel.reserved_cores, self.parallel.max_workers)
    }

    /// Configured output folder, `None` for the working directory
    pub fn output_dir(&self) -> Option<PathBuf> {
        let dir = self.output.directory.trim();
        (!dir.is_empty()).then(|| PathBuf::from(dir))
    }

    fn user_config_path() -> PathBuf {
        match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(".config/segsieve/config.toml"),
            Err(_) => PathBuf::from("~/.config/segsieve/config.toml"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_config_loads_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("HOME", jail.directory().display().to_string());
            let config = SieveConfig::load().expect("Should load default config");

            assert_eq!(config.parallel.reserved_cores, 1);
            assert_eq!(config.parallel.max_workers, 0);
            assert_eq!(config.output.write, WriteMode::Ask);
            assert_eq!(config.output_dir(), None);
            assert!(config.chain.reuse_factor_base);
            Ok(())
        });
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("HOME", jail.directory().display().to_string());
            jail.create_file(
                "segsieve.toml",
                r#"
                [parallel]
                max_workers = 3

                [output]
                directory = "primes-out"
                write = "always"
                "#,
            )?;

            let config = SieveConfig::load().expect("Should merge project config");
            assert_eq!(config.parallel.max_workers, 3);
            assert_eq!(config.parallel.reserved_cores, 1);
            assert_eq!(config.output.write, WriteMode::Always);
            assert_eq!(config.output_dir(), Some(PathBuf::from("primes-out")));
            assert!(config.worker_count().get() <= 3);
            Ok(())
        });
    }

    #[test]
    fn test_env_has_highest_priority() {
        Jail::expect_with(|jail| {
            jail.set_env("HOME", jail.directory().display().to_string());
            jail.create_file("segsieve.toml", "[chain]\nreuse_factor_base = true\n")?;
            jail.set_env("SEGSIEVE_CHAIN__REUSE_FACTOR_BASE", "false");
            jail.set_env("SEGSIEVE_OUTPUT__WRITE", "never");

            let config = SieveConfig::load().expect("Should apply env overrides");
            assert!(!config.chain.reuse_factor_base);
            assert_eq!(config.output.write, WriteMode::Never);
            Ok(())
        });
    }

    #[test]
    fn test_custom_config_loading() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.yaml", "parallel:\n  reserved_cores: 2\n")?;

            let config = SieveConfig::load_with_custom_config(Some("custom.yaml"))
                .expect("Should load custom config");
            assert_eq!(config.parallel.reserved_cores, 2);

            // Missing custom config falls back to defaults
            let config = SieveConfig::load_with_custom_config(Some("non_existent.toml"));
            assert!(config.is_ok(), "Should handle missing custom config gracefully");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_write_mode_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.toml", "[output]\nwrite = \"sometimes\"\n")?;
            assert!(SieveConfig::load_with_custom_config(Some("bad.toml")).is_err());
            Ok(())
        });
    }
}

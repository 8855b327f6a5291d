//! Arguments and conventions shared by both binaries.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::debug;

use crate::config::{load_config, ToolsConfig, CONFIG_ENV_VAR};
use crate::logging::init_logging;

/// Process exit code for a clean run.
pub const EXIT_SUCCESS: u8 = 0;
/// Process exit code for any failure after argument parsing.  Usage errors
/// exit through clap with its own code.
pub const EXIT_FAILURE: u8 = 1;

/// Levels accepted by `--log-level`.
pub const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// The line printed at startup, e.g. `scas v1.10`.
pub fn banner(tool: &str) -> String {
    format!("{tool} v{}", sc_core::TOOL_VERSION)
}

/// Options accepted by every tool.  Flattened into each binary's parser.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// TOML configuration file.  Must exist when given.
    #[arg(long, value_name = "FILE", env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Log level.  `RUST_LOG` takes precedence when set.
    #[arg(long, value_name = "LEVEL", value_parser = LOG_LEVELS)]
    pub log_level: Option<String>,
}

impl CommonArgs {
    /// Loads the configuration and installs logging.  Call once per process.
    ///
    /// # Errors
    ///
    /// Fails when the config file cannot be read or parsed, or when the log
    /// filter is invalid.
    pub fn setup(&self) -> anyhow::Result<ToolsConfig> {
        let config = load_config(self.config.as_deref()).context("configuration error")?;
        init_logging(self.log_level.as_deref(), &config.log_level)?;
        debug!(config = ?self.config, "configuration loaded");
        Ok(config)
    }
}

//! `tracing-subscriber` setup for the command-line tools.
//!
//! The filter is chosen in this order:
//!
//! 1. `RUST_LOG`, when set and valid.
//! 2. The `--log-level` flag.
//! 3. `log_level` from the config file (which defaults to `warn`).
//!
//! Output always goes to stderr: `scdis` writes the disassembly to stdout
//! and a log line there would end up in the generated text.

use anyhow::{anyhow, Context};
use tracing_subscriber::EnvFilter;

/// Picks the filter directive from the flag and the configured level.
/// `RUST_LOG` is handled separately by [`build_filter`].
pub fn select_directive<'a>(flag: Option<&'a str>, configured: &'a str) -> &'a str {
    match flag {
        Some(level) => level,
        None if configured.trim().is_empty() => "warn",
        None => configured,
    }
}

/// Builds the filter, preferring `RUST_LOG` from the environment.
///
/// # Errors
///
/// Returns an error when `RUST_LOG` is absent and the chosen directive does
/// not parse.
pub fn build_filter(flag: Option<&str>, configured: &str) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = select_directive(flag, configured);
    EnvFilter::try_new(directive).with_context(|| format!("invalid log level '{directive}'"))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if the filter is invalid or a subscriber is already installed.
pub fn init_logging(flag: Option<&str>, configured: &str) -> anyhow::Result<()> {
    let filter = build_filter(flag, configured)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}

//! # sc-tools
//!
//! Shared plumbing for the two command-line tools built on [`sc_core`]:
//!
//! - **`scas`** – assembles one or more text configurations into a binary.
//! - **`scdis`** – disassembles a binary back into text.
//!
//! Both binaries are thin: they parse arguments with `clap`, load the
//! optional TOML configuration ([`config`]), start logging ([`logging`]),
//! and then call a single `sc_core` entry point.  The pieces they share live
//! here so they can be tested without spawning processes.

pub mod cli;
pub mod config;
pub mod logging;

pub use cli::{banner, CommonArgs, EXIT_FAILURE, EXIT_SUCCESS};
pub use config::{load_config, ConfigError, ToolsConfig};
pub use logging::init_logging;

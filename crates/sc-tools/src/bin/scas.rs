//! `scas`: assembles text configurations into a binary configuration.
//!
//! # Usage
//!
//! ```text
//! scas [OPTIONS] <TEXT_CONFIG>... <BINARY_CONFIG>
//!
//! Options:
//!   -I, --include-dir <DIR>  Extra directory searched by `include` (repeatable)
//!       --config <FILE>      TOML configuration [env: SCTOOLS_CONFIG]
//!       --log-level <LEVEL>  off, error, warn, info, debug, trace
//! ```
//!
//! The sources are read in order as if they were one file, so conditions set
//! at the end of one carry into the next.  The output is written only when
//! every source assembled cleanly.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use sc_core::{assemble_with, AssemblySummary};
use sc_tools::{banner, CommonArgs, ToolsConfig, EXIT_FAILURE, EXIT_SUCCESS};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Assembler for Soarer's Converter configuration files.
#[derive(Debug, Parser)]
#[command(
    name = "scas",
    version,
    override_usage = "scas [OPTIONS] <TEXT_CONFIG>... <BINARY_CONFIG>"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Extra directory searched by `include`, before those from the config
    /// file.
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    include_dirs: Vec<PathBuf>,

    /// One or more text configurations followed by the binary to write.
    #[arg(value_name = "FILES", num_args = 2.., required = true)]
    files: Vec<PathBuf>,
}

impl Cli {
    /// Splits the positional list into (sources, output).
    fn sources_and_output(&self) -> anyhow::Result<(&[PathBuf], &PathBuf)> {
        let (output, sources) = self
            .files
            .split_last()
            .context("missing output path")?;
        if sources.is_empty() {
            anyhow::bail!("at least one text configuration is required");
        }
        Ok((sources, output))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();
    eprintln!("{}", banner("scas"));

    let result = cli.common.setup().and_then(|config| run(&cli, &config));
    match result {
        Ok(summary) => {
            eprintln!("No errors. Wrote: {}", summary.output.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: &Cli, config: &ToolsConfig) -> anyhow::Result<AssemblySummary> {
    let (sources, output) = cli.sources_and_output()?;
    let options = config.assembler_options(&cli.include_dirs);
    info!(
        sources = sources.len(),
        output = %output.display(),
        include_dirs = options.include_dirs.len(),
        "assembling"
    );
    Ok(assemble_with(sources, output, &options)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

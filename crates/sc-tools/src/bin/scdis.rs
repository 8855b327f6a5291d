//! `scdis`: disassembles a binary configuration back into text.
//!
//! # Usage
//!
//! ```text
//! scdis [OPTIONS] <BINARY_CONFIG> [TEXT_CONFIG]
//!
//! Options:
//!       --no-annotate        Omit the byte-count comments
//!       --config <FILE>      TOML configuration [env: SCTOOLS_CONFIG]
//!       --log-level <LEVEL>  off, error, warn, info, debug, trace
//! ```
//!
//! Without `TEXT_CONFIG` the text goes to stdout.  A damaged binary is still
//! decoded as far as possible; problems appear as `# ERROR:` comments in the
//! output and the exit code is 1.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::info;

use sc_core::{disassemble_with, DecodeError, DisassemblerOptions};
use sc_tools::{banner, CommonArgs, ToolsConfig, EXIT_FAILURE, EXIT_SUCCESS};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Disassembler for Soarer's Converter binary configurations.
#[derive(Debug, Parser)]
#[command(name = "scdis", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Omit the informational byte-count comments.
    #[arg(long)]
    no_annotate: bool,

    /// Binary configuration to read.
    #[arg(value_name = "BINARY_CONFIG")]
    input: PathBuf,

    /// Text file to write.  Standard output when omitted.
    #[arg(value_name = "TEXT_CONFIG")]
    output: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();
    eprintln!("{}", banner("scdis"));

    let result = cli.common.setup().and_then(|config| run(&cli, &config));
    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: &Cli, config: &ToolsConfig) -> anyhow::Result<()> {
    let options = config.disassembler_options(cli.no_annotate);
    let bytes = fs::read(&cli.input)
        .with_context(|| format!("could not open input file {}", cli.input.display()))?;
    info!(input = %cli.input.display(), bytes = bytes.len(), "disassembling");

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not open output file {}", path.display()))?;
            disassemble_into(&bytes, &mut BufWriter::new(file), &options)
        }
        None => {
            let stdout = io::stdout();
            disassemble_into(&bytes, &mut BufWriter::new(stdout.lock()), &options)
        }
    }
}

/// Writes the disassembly of `bytes` to `out` and turns the outcome into a
/// tool-level error.  The text is flushed even when decoding failed, so the
/// `# ERROR:` annotations reach the user.
fn disassemble_into(
    bytes: &[u8],
    out: &mut impl Write,
    options: &DisassemblerOptions,
) -> anyhow::Result<()> {
    let result = disassemble_with(bytes, out, options);
    out.flush().context("failed to write output")?;
    match result {
        Ok(()) => Ok(()),
        Err(DecodeError::Io(e)) => Err(anyhow::Error::new(e).context("failed to write output")),
        Err(e) => Err(anyhow!("errors encountered, see output: {e}")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::assemble_str;

    #[test]
    fn test_cli_output_is_optional() {
        // Arrange / Act
        let cli = Cli::try_parse_from(["scdis", "in.bin"]).expect("parse");

        // Assert
        assert_eq!(cli.input, PathBuf::from("in.bin"));
        assert_eq!(cli.output, None);
        assert!(!cli.no_annotate);
    }

    #[test]
    fn test_cli_accepts_output_and_no_annotate() {
        let cli = Cli::try_parse_from(["scdis", "--no-annotate", "in.bin", "out.sc"]).expect("parse");
        assert_eq!(cli.output, Some(PathBuf::from("out.sc")));
        assert!(cli.no_annotate);
    }

    #[test]
    fn test_cli_rejects_missing_or_extra_positionals() {
        assert!(Cli::try_parse_from(["scdis"]).is_err());
        assert!(Cli::try_parse_from(["scdis", "a", "b", "c"]).is_err());
    }

    #[test]
    fn test_disassemble_into_writes_text_that_reassembles() {
        // Arrange
        let bytes = assemble_str("ifset set2\nremapblock\nCAPSLOCK LCTRL\nendblock\n").unwrap();
        let mut out = Vec::new();

        // Act
        disassemble_into(&bytes, &mut out, &DisassemblerOptions::default()).expect("decode");

        // Assert
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("CAPS_LOCK LCTRL"), "{text}");
        assert_eq!(assemble_str(&text).unwrap(), bytes);
    }

    #[test]
    fn test_disassemble_into_without_annotations_has_no_count_comments() {
        let bytes = assemble_str("layerblock\nFN1 1\nendblock\n").unwrap();
        let mut out = Vec::new();

        disassemble_into(&bytes, &mut out, &DisassemblerOptions { annotate: false }).expect("decode");

        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("# length"), "{text}");
        assert!(!text.contains("# count"), "{text}");
    }

    #[test]
    fn test_damaged_binary_keeps_partial_text_and_fails() {
        // Arrange: valid header, then a zero-length block.
        let bytes = [b'S', b'C', 1, 1, 0, 0, 0];
        let mut out = Vec::new();

        // Act
        let err = disassemble_into(&bytes, &mut out, &DisassemblerOptions::default()).unwrap_err();

        // Assert
        assert!(err.to_string().starts_with("errors encountered"), "{err}");
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("# ERROR: block length is zero"), "{text}");
    }

    #[test]
    fn test_run_reports_missing_input() {
        let cli = Cli::try_parse_from(["scdis", "/nonexistent/dir/in.bin"]).expect("parse");
        let err = run(&cli, &ToolsConfig::default()).unwrap_err();
        assert!(err.to_string().contains("could not open input file"), "{err}");
    }
}

//! TOML configuration shared by `scas` and `scdis`.
//!
//! The file is optional.  It is looked up in this order:
//!
//! 1. `--config <FILE>` on the command line, or `$SCTOOLS_CONFIG` when the
//!    flag is absent.  A file named this way must exist.
//! 2. The platform config directory:
//!    - Windows:  `%APPDATA%\sctools\config.toml`
//!    - Linux:    `$XDG_CONFIG_HOME/sctools/config.toml` or `~/.config/sctools/config.toml`
//!    - macOS:    `~/Library/Application Support/sctools/config.toml`
//!
//!    A missing file here simply means "use the defaults".
//!
//! # File format (for beginners)
//!
//! ```toml
//! log_level = "warn"
//!
//! [assembler]
//! include_dirs = ["./layouts"]
//!
//! [disassembler]
//! annotate = true
//! ```
//!
//! Every field has a serde default, so an empty file is valid and a file
//! written for an older version keeps working.  Unknown fields are rejected
//! so a misspelt key does not pass silently.  Relative `include_dirs` are
//! resolved against the directory holding the config file, not the current
//! directory.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sc_core::{AssemblerOptions, DisassemblerOptions};

/// Environment variable consulted when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "SCTOOLS_CONFIG";

/// File name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

const APP_DIR_NAME: &str = "sctools";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("could not read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// `tracing` filter used when neither `RUST_LOG` nor `--log-level` is set.
    /// Accepts a plain level (`"debug"`) or a full directive
    /// (`"sc_core::assembler=trace"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub assembler: AssemblerConfig,
    #[serde(default)]
    pub disassembler: DisassemblerConfig,
}

/// `[assembler]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AssemblerConfig {
    /// Directories searched by `include` after the including file's own
    /// directory.
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,
}

/// `[disassembler]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DisassemblerConfig {
    /// Write `# length:`-style byte count comments.
    #[serde(default = "default_true")]
    pub annotate: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "warn".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            assembler: AssemblerConfig::default(),
            disassembler: DisassemblerConfig::default(),
        }
    }
}

impl Default for DisassemblerConfig {
    fn default() -> Self {
        Self {
            annotate: default_true(),
        }
    }
}

// ── Mapping onto the codec options ────────────────────────────────────────────

impl ToolsConfig {
    /// Assembler options: directories given on the command line are searched
    /// before the configured ones.
    pub fn assembler_options(&self, cli_include_dirs: &[PathBuf]) -> AssemblerOptions {
        let include_dirs = cli_include_dirs
            .iter()
            .chain(&self.assembler.include_dirs)
            .cloned()
            .collect();
        AssemblerOptions { include_dirs }
    }

    /// Disassembler options: `--no-annotate` wins over the file.
    pub fn disassembler_options(&self, no_annotate: bool) -> DisassemblerOptions {
        DisassemblerOptions {
            annotate: self.disassembler.annotate && !no_annotate,
        }
    }

    /// Makes relative include directories relative to `base`.
    fn resolve_relative_to(&mut self, base: &Path) {
        for dir in &mut self.assembler.include_dirs {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses config text.  Relative paths are resolved against `base_dir` when
/// one is given.
pub fn parse_config(text: &str, base_dir: Option<&Path>) -> Result<ToolsConfig, toml::de::Error> {
    let mut config: ToolsConfig = toml::from_str(text)?;
    if let Some(base) = base_dir {
        config.resolve_relative_to(base);
    }
    Ok(config)
}

/// Loads the file at `path`, which must exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_from_path(path: &Path) -> Result<ToolsConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_file(path, &text)
}

/// Loads the file at `path`, returning the defaults if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_optional(path: &Path) -> Result<ToolsConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_file(path, &text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ToolsConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads the configuration for a tool run.
///
/// `explicit` is the `--config` value (clap fills it from
/// [`CONFIG_ENV_VAR`] when the flag is absent).  Without it the platform
/// default file is tried, and failing that the built-in defaults are used.
///
/// # Errors
///
/// See [`load_from_path`] and [`load_optional`].
pub fn load_config(explicit: Option<&Path>) -> Result<ToolsConfig, ConfigError> {
    match explicit {
        Some(path) => load_from_path(path),
        None => match default_config_path() {
            Some(path) => load_optional(&path),
            None => Ok(ToolsConfig::default()),
        },
    }
}

/// Full path of the platform default config file, if the platform config
/// directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    platform_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

fn parse_file(path: &Path, text: &str) -> Result<ToolsConfig, ConfigError> {
    parse_config(text, path.parent()).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory including the `sctools` component.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join(APP_DIR_NAME))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join(APP_DIR_NAME))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR_NAME)
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Arrange / Act
        let cfg = ToolsConfig::default();

        // Assert
        assert_eq!(cfg.log_level, "warn");
        assert!(cfg.assembler.include_dirs.is_empty());
        assert!(cfg.disassembler.annotate);
    }

    #[test]
    fn test_empty_text_yields_defaults() {
        let cfg = parse_config("", None).expect("parse empty");
        assert_eq!(cfg, ToolsConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        // Arrange
        let text = "[disassembler]\nannotate = false\n";

        // Act
        let cfg = parse_config(text, None).expect("parse");

        // Assert
        assert!(!cfg.disassembler.annotate);
        assert_eq!(cfg.log_level, "warn");
        assert!(cfg.assembler.include_dirs.is_empty());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(parse_config("[assembler]\ninclude_dir = [\"x\"]\n", None).is_err());
        assert!(parse_config("verbose = true\n", None).is_err());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(parse_config("[[[ not valid toml", None).is_err());
    }

    #[test]
    fn test_relative_include_dirs_resolve_against_base() {
        // Arrange
        let text = "[assembler]\ninclude_dirs = [\"layouts\", \"/abs/dir\"]\n";
        let base = Path::new("/home/user/.config/sctools");

        // Act
        let cfg = parse_config(text, Some(base)).expect("parse");

        // Assert
        assert_eq!(cfg.assembler.include_dirs[0], base.join("layouts"));
        assert_eq!(cfg.assembler.include_dirs[1], PathBuf::from("/abs/dir"));
    }

    #[test]
    fn test_serialize_round_trip() {
        // Arrange
        let mut cfg = ToolsConfig::default();
        cfg.log_level = "debug".to_string();
        cfg.assembler.include_dirs.push(PathBuf::from("/opt/layouts"));

        // Act
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let restored = parse_config(&text, None).expect("deserialize");

        // Assert
        assert_eq!(restored, cfg);
    }

    #[test]
    fn test_cli_include_dirs_come_first() {
        // Arrange
        let mut cfg = ToolsConfig::default();
        cfg.assembler.include_dirs.push(PathBuf::from("from-config"));

        // Act
        let options = cfg.assembler_options(&[PathBuf::from("from-cli")]);

        // Assert
        assert_eq!(
            options.include_dirs,
            vec![PathBuf::from("from-cli"), PathBuf::from("from-config")]
        );
    }

    #[test]
    fn test_no_annotate_flag_overrides_config() {
        let cfg = ToolsConfig::default();
        assert!(cfg.disassembler_options(false).annotate);
        assert!(!cfg.disassembler_options(true).annotate);

        let mut quiet = ToolsConfig::default();
        quiet.disassembler.annotate = false;
        assert!(!quiet.disassembler_options(false).annotate);
    }

    #[test]
    fn test_default_config_path_ends_with_config_toml() {
        // May be None in a stripped environment with no HOME.
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(Path::new(APP_DIR_NAME).join(CONFIG_FILE_NAME)));
        }
    }
}

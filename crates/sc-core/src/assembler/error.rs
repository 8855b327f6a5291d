//! Assembler errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::EncodeError;

/// What went wrong on a particular source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown directive with no block open, or a directive used out of order.
    InvalidCommand,
    /// Unknown key, modifier or step name, malformed or out-of-range argument.
    InvalidArguments,
    /// A block (or its entry count) does not fit the one-byte length.
    BlockTooLarge,
    /// A macro phase has more than 63 steps.
    MacroTooLong,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::InvalidCommand => "invalid command",
            ErrorKind::InvalidArguments => "invalid arguments",
            ErrorKind::BlockTooLarge => "block too large",
            ErrorKind::MacroTooLong => "macro too long",
        })
    }
}

impl From<&EncodeError> for ErrorKind {
    fn from(err: &EncodeError) -> Self {
        match err {
            EncodeError::BlockTooLarge { .. } | EncodeError::TooManyEntries { .. } => {
                ErrorKind::BlockTooLarge
            }
            EncodeError::MacroTooLong { .. } => ErrorKind::MacroTooLong,
        }
    }
}

/// Coarse classification of a [`CompileError`], one per user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    FileNotFound,
    InvalidCommand,
    InvalidArguments,
    BlockTooLarge,
    MacroTooLong,
    Write,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorCategory::FileNotFound => "file not found",
            ErrorCategory::InvalidCommand => "invalid command",
            ErrorCategory::InvalidArguments => "invalid arguments",
            ErrorCategory::BlockTooLarge => "block too large",
            ErrorCategory::MacroTooLong => "macro too long",
            ErrorCategory::Write => "unable to open file for writing",
        })
    }
}

/// Errors that abort an assembler run.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A source or included file could not be opened or read.
    #[error("file not found: {}{}", path.display(), include_site(included_from))]
    FileNotFound {
        path: PathBuf,
        /// File and 1-indexed line of the `include` that named `path`.
        included_from: Option<(PathBuf, usize)>,
        #[source]
        source: io::Error,
    },

    /// A source line was rejected.
    #[error("{}:{line}: {kind}: {detail}", path.display())]
    Line {
        path: PathBuf,
        /// 1-indexed line number.
        line: usize,
        kind: ErrorKind,
        detail: String,
    },

    /// The output file could not be written.
    #[error("unable to open file for writing: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CompileError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompileError::FileNotFound { .. } => ErrorCategory::FileNotFound,
            CompileError::Write { .. } => ErrorCategory::Write,
            CompileError::Line { kind, .. } => match kind {
                ErrorKind::InvalidCommand => ErrorCategory::InvalidCommand,
                ErrorKind::InvalidArguments => ErrorCategory::InvalidArguments,
                ErrorKind::BlockTooLarge => ErrorCategory::BlockTooLarge,
                ErrorKind::MacroTooLong => ErrorCategory::MacroTooLong,
            },
        }
    }

    /// Line number for line errors and for failed includes.
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::Line { line, .. } => Some(*line),
            CompileError::FileNotFound {
                included_from: Some((_, line)),
                ..
            } => Some(*line),
            _ => None,
        }
    }
}

fn include_site(included_from: &Option<(PathBuf, usize)>) -> String {
    match included_from {
        Some((path, line)) => format!(" (included from {}:{line})", path.display()),
        None => String::new(),
    }
}

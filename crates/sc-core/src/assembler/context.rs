//! Compilation state for one assembler run.
//!
//! # Why an explicit context? (for beginners)
//!
//! Every directive in a configuration file changes some piece of state: `ifset`
//! changes the condition applied to the next block, `macro` starts collecting
//! steps, `endblock` turns the collected entries into bytes.  All of that state
//! lives in one [`CompilerContext`] value that is passed by `&mut` to each
//! directive handler.  Nothing is global, so two assembler runs never interfere
//! and tests can build a context, feed it lines and inspect the result.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::assembler::commands;
use crate::assembler::error::{CompileError, ErrorKind};
use crate::domain::{Block, BlockKind, Conditions, Document, WorkingLists};
use crate::format::ForceFlags;
use crate::text::Tokenizer;
use crate::tokens::{KeyCode, ModifierMask};

/// Deepest allowed `include` nesting.
pub const MAX_INCLUDE_DEPTH: usize = 16;

/// Reads a source file as text.
///
/// Bytes that are not UTF-8 become U+FFFD.  Inside a comment they are
/// stripped with it; anywhere else they fail later as an unknown name.
fn read_source(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Where the line being processed came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLocation {
    pub path: PathBuf,
    /// 1-indexed; 0 before the first line is read.
    pub line: usize,
}

/// Which step list a macro step line appends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroPhase {
    Press,
    Release,
}

/// A macro between `macro` and `endmacro`.  Its steps live in the working lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroInProgress {
    pub key: KeyCode,
    pub desired: ModifierMask,
    pub matched: ModifierMask,
    pub phase: MacroPhase,
    pub restore_meta: bool,
}

/// All state of one assembler run.
#[derive(Debug, Default)]
pub struct CompilerContext {
    pub force: ForceFlags,
    /// Persist across blocks until changed.
    pub conditions: Conditions,
    pub layer: u8,
    pub open_block: Option<BlockKind>,
    pub open_macro: Option<MacroInProgress>,
    pub lists: WorkingLists,
    pub blocks: Vec<Block>,
    pub location: SourceLocation,
    pub include_depth: usize,
    pub include_dirs: Vec<PathBuf>,
}

impl CompilerContext {
    pub fn new(include_dirs: Vec<PathBuf>) -> Self {
        CompilerContext {
            include_dirs,
            ..Self::default()
        }
    }

    /// Builds a line error at the current location.
    pub fn error(&self, kind: ErrorKind, detail: impl Into<String>) -> CompileError {
        CompileError::Line {
            path: self.location.path.clone(),
            line: self.location.line,
            kind,
            detail: detail.into(),
        }
    }

    /// Reads and processes a whole file.
    pub fn process_file(&mut self, path: &Path) -> Result<(), CompileError> {
        let text = read_source(path).map_err(|source| CompileError::FileNotFound {
            path: path.to_path_buf(),
            included_from: None,
            source,
        })?;
        self.process_source(path, &text)
    }

    /// Processes `text` line by line, reporting locations against `path`.
    pub fn process_source(&mut self, path: &Path, text: &str) -> Result<(), CompileError> {
        let outer = std::mem::replace(
            &mut self.location,
            SourceLocation {
                path: path.to_path_buf(),
                line: 0,
            },
        );

        for (index, line) in text.lines().enumerate() {
            self.location.line = index + 1;
            self.process_line(line)?;
        }

        // The innermost location is kept on error so the caller can report it;
        // on success the including file's position is restored.
        if self.include_depth > 0 {
            self.location = outer;
        }
        Ok(())
    }

    fn process_line(&mut self, line: &str) -> Result<(), CompileError> {
        let mut tokens = Tokenizer::new(line);
        let Some(first) = tokens.peek() else {
            return Ok(());
        };

        trace!(
            path = %self.location.path.display(),
            line = self.location.line,
            token = first,
            "dispatch"
        );

        match commands::find_directive(first) {
            Some(handler) => {
                tokens.advance();
                handler(self, &mut tokens)
            }
            None => commands::block_line(self, &mut tokens),
        }
    }

    /// Assembles another file in place of an `include` line.
    pub fn include(&mut self, raw: &str) -> Result<(), CompileError> {
        if self.include_depth >= MAX_INCLUDE_DEPTH {
            return Err(self.error(
                ErrorKind::InvalidArguments,
                format!("include nested deeper than {MAX_INCLUDE_DEPTH} levels"),
            ));
        }

        let path = self.resolve_include(raw);
        debug!(path = %path.display(), depth = self.include_depth + 1, "entering include");

        let text = read_source(&path).map_err(|source| CompileError::FileNotFound {
            path: path.clone(),
            included_from: Some((self.location.path.clone(), self.location.line)),
            source,
        })?;

        self.include_depth += 1;
        let result = self.process_source(&path, &text);
        self.include_depth -= 1;

        debug!(path = %path.display(), ok = result.is_ok(), "leaving include");
        result
    }

    /// Tries the path as given, then next to the including file, then each
    /// include directory.  Falls back to the path as given so the error names it.
    fn resolve_include(&self, raw: &str) -> PathBuf {
        let given = PathBuf::from(raw);
        if given.is_absolute() || given.is_file() {
            return given;
        }

        let beside = self
            .location
            .path
            .parent()
            .map(|dir| dir.join(&given));
        let from_dirs = self.include_dirs.iter().map(|dir| dir.join(&given));

        beside
            .into_iter()
            .chain(from_dirs)
            .find(|candidate| candidate.is_file())
            .unwrap_or(given)
    }

    /// Appends a finished block and resets the block state.
    pub fn push_block(&mut self, block: Block) {
        debug!(
            kind = ?block.kind,
            len = block.len(),
            line = self.location.line,
            "block finalized"
        );
        self.blocks.push(block);
        self.lists.clear_block();
        self.open_block = None;
    }

    /// Checks that nothing is left open and returns the document.
    pub fn finish(self) -> Result<Document, CompileError> {
        if self.open_macro.is_some() {
            return Err(self.error(ErrorKind::InvalidCommand, "missing endmacro at end of input"));
        }
        if let Some(kind) = self.open_block {
            return Err(self.error(
                ErrorKind::InvalidCommand,
                format!("{} not closed with endblock at end of input", kind.directive()),
            ));
        }
        Ok(Document {
            force: self.force,
            blocks: self.blocks,
        })
    }
}

//! Text → binary: the assembler.
//!
//! # How assembly works (for beginners)
//!
//! A configuration is read one line at a time.  The first word of a line is
//! either a *directive* (`ifset`, `remapblock`, `macro`, `endblock`, ...) or,
//! inside a block, the start of a *body line*:
//!
//! ```text
//! ifset set1 set2        ← directive: condition for the next block
//! remapblock             ← directive: opens a remap block
//!   layer 2              ← directive: layer for this remap block
//!   CAPSLOCK ESC         ← body line: remap pair
//! endblock               ← directive: serializes the block
//! ```
//!
//! Directives update a [`CompilerContext`]; body lines append to its working
//! lists; `endblock` turns the lists into bytes.  When every source is
//! consumed the header and the blocks are concatenated.
//!
//! The first error stops the run.  Nothing is written to the output file
//! unless the whole input assembled cleanly.

pub mod commands;
pub mod context;
pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use context::{CompilerContext, MacroInProgress, MacroPhase, SourceLocation, MAX_INCLUDE_DEPTH};
pub use error::{CompileError, ErrorCategory, ErrorKind};

use crate::domain::Document;

/// Name used in error locations for text passed to [`assemble_str`].
pub const INLINE_SOURCE_NAME: &str = "<input>";

/// Tunables for an assembler run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblerOptions {
    /// Extra directories searched by `include`.
    pub include_dirs: Vec<PathBuf>,
}

/// Result of a successful [`assemble`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblySummary {
    pub output: PathBuf,
    /// Bytes written, header included.
    pub bytes: usize,
    pub blocks: usize,
}

/// Drives a [`CompilerContext`] over one or more sources.
#[derive(Debug, Default)]
pub struct Assembler {
    ctx: CompilerContext,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: &AssemblerOptions) -> Self {
        Assembler {
            ctx: CompilerContext::new(options.include_dirs.clone()),
        }
    }

    /// Assembles the file at `path` into the document being built.
    pub fn process_file(&mut self, path: &Path) -> Result<(), CompileError> {
        debug!(path = %path.display(), "assembling");
        self.ctx.process_file(path)
    }

    /// Assembles in-memory text, reporting errors against `name`.
    pub fn process_source(&mut self, name: &Path, text: &str) -> Result<(), CompileError> {
        self.ctx.process_source(name, text)
    }

    /// Read-only view of the compilation state.
    pub fn context(&self) -> &CompilerContext {
        &self.ctx
    }

    /// Ends the run.  Fails if a block or macro is still open.
    pub fn finish(self) -> Result<Document, CompileError> {
        self.ctx.finish()
    }
}

/// Assembles `sources` in order and writes the binary to `output`.
pub fn assemble<P: AsRef<Path>>(sources: &[P], output: &Path) -> Result<AssemblySummary, CompileError> {
    assemble_with(sources, output, &AssemblerOptions::default())
}

/// [`assemble`] with explicit options.
pub fn assemble_with<P: AsRef<Path>>(
    sources: &[P],
    output: &Path,
    options: &AssemblerOptions,
) -> Result<AssemblySummary, CompileError> {
    let mut assembler = Assembler::with_options(options);
    for source in sources {
        assembler.process_file(source.as_ref())?;
    }
    let document = assembler.finish()?;
    let bytes = document.to_bytes();

    fs::write(output, &bytes).map_err(|source| CompileError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    info!(
        output = %output.display(),
        bytes = bytes.len(),
        blocks = document.blocks.len(),
        "wrote binary configuration"
    );
    Ok(AssemblySummary {
        output: output.to_path_buf(),
        bytes: bytes.len(),
        blocks: document.blocks.len(),
    })
}

/// Assembles a single in-memory source and returns the binary.
pub fn assemble_str(text: &str) -> Result<Vec<u8>, CompileError> {
    let mut assembler = Assembler::new();
    assembler.process_source(Path::new(INLINE_SOURCE_NAME), text)?;
    Ok(assembler.finish()?.to_bytes())
}

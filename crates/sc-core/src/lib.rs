//! # sc-core
//!
//! Codec between the text configuration language of Soarer's Keyboard
//! Converter and the compact binary configuration the converter firmware
//! loads.
//!
//! # Architecture overview (for beginners)
//!
//! The converter sits between an old keyboard (XT, AT, terminal) and a USB
//! port.  Its behaviour is programmed with a small binary file: remapped
//! keys, layers switched by `FN` keys, and macros that play back keystrokes.
//! People write that configuration as text; this crate translates in both
//! directions:
//!
//! ```text
//!   layout.sc ──assemble──▶ layout.bin ──disassemble──▶ layout.sc
//! ```
//!
//! It is organised leaf first:
//!
//! - **`tokens`** – Static name tables: key names (USB HID usage IDs),
//!   modifier names, macro step commands, scan sets and protocols.
//!
//! - **`text`** – Splits one line of the configuration language into tokens.
//!
//! - **`domain`** – The document model: conditions, layer definitions, remap
//!   pairs, macros, finished blocks.
//!
//! - **`format`** – The binary layout: header, bit-packed flag bytes, and the
//!   length-guarded block writer.
//!
//! - **`assembler`** – Text → binary.
//!
//! - **`disassembler`** – Binary → text, in a form that assembles back to the
//!   same bytes.
//!
//! There is no I/O beyond reading source files and writing the output, and
//! no global state: every assembler run owns its own context.

pub mod assembler;
pub mod disassembler;
pub mod domain;
pub mod format;
pub mod text;
pub mod tokens;

pub use assembler::{
    assemble, assemble_str, assemble_with, Assembler, AssemblerOptions, AssemblySummary,
    CompileError, ErrorCategory,
};
pub use disassembler::{
    disassemble, disassemble_to_string, disassemble_with, DecodeError, DisassemblerOptions,
};
pub use domain::{Block, BlockKind, Document};
pub use tokens::KeyCode;

/// Version shown in the tool banners.
pub const TOOL_VERSION: &str = "1.10";

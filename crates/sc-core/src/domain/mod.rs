//! Document model for converter configurations.
//!
//! Pure data with no I/O: the assembler builds these values from text and the
//! binary layout in [`crate::format`] turns them into bytes.

pub mod document;

pub use document::{
    Block, BlockKind, Conditions, Document, LayerDef, Macro, MacroStep, Remap, WorkingLists,
};

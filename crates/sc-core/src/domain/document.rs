//! Document model: the pieces a configuration is built from.
//!
//! Everything here is plain data.  The assembler fills the [`WorkingLists`]
//! while a block is open, turns them into a finished [`Block`] on `endblock`,
//! and collects the blocks in a [`Document`].

use crate::format::encode::encode_header;
use crate::format::layout::ForceFlags;
use crate::tokens::{KeyCode, MacroCommand, ModifierMask, PUSH_META};

/// Block variant tag, stored in bits 0–2 of the block flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockKind {
    LayerDef = 0,
    Remap = 1,
    Macro = 2,
}

impl BlockKind {
    /// Directive that opens a block of this kind.
    pub fn directive(self) -> &'static str {
        match self {
            BlockKind::LayerDef => "layerblock",
            BlockKind::Remap => "remapblock",
            BlockKind::Macro => "macroblock",
        }
    }
}

impl TryFrom<u8> for BlockKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0 => Ok(BlockKind::LayerDef),
            1 => Ok(BlockKind::Remap),
            2 => Ok(BlockKind::Macro),
            _ => Err(()),
        }
    }
}

/// Conditions under which the converter applies a block.
///
/// Zero means "any" for every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Conditions {
    /// Select set 1–7, or 0 for any.
    pub select: u8,
    /// Bitmask of scan sets (bit `n-1` for set `n`), or 0 for any.
    pub scanset: u8,
    /// Keyboard id, or 0 for any.
    pub keyboard_id: u16,
}

/// One `layerblock` entry: a combination of `FN` keys activating a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerDef {
    /// Bit `n-1` set for each `FN<n>` key held.
    pub fn_combo: u8,
    pub layer: u8,
}

/// One `remapblock` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remap {
    pub from: KeyCode,
    pub to: KeyCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroStep {
    pub command: MacroCommand,
    pub push_meta: bool,
    pub value: u8,
}

impl MacroStep {
    pub fn new(command: MacroCommand, value: u8) -> Self {
        MacroStep {
            command,
            push_meta: false,
            value,
        }
    }

    /// Command byte as stored: the command code with [`PUSH_META`] OR-ed in.
    pub fn command_byte(&self) -> u8 {
        let code = self.command as u8;
        if self.push_meta {
            code | PUSH_META
        } else {
            code
        }
    }
}

/// A finished macro definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    pub key: KeyCode,
    /// Modifier state the macro requires.
    pub desired: ModifierMask,
    /// Modifier bits that take part in the comparison.
    pub matched: ModifierMask,
    pub press: Vec<MacroStep>,
    pub release: Vec<MacroStep>,
    /// Whether the converter restores the modifier state after the release phase.
    pub restore_meta: bool,
}

impl Macro {
    pub fn new(key: KeyCode, desired: ModifierMask, matched: ModifierMask) -> Self {
        Macro {
            key,
            desired,
            matched,
            press: Vec::new(),
            release: Vec::new(),
            restore_meta: true,
        }
    }
}

/// A finished, serialized block (length byte included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub bytes: Vec<u8>,
}

impl Block {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Per-kind lists filled while a block (or macro) is open.
#[derive(Debug, Default)]
pub struct WorkingLists {
    pub layerdefs: Vec<LayerDef>,
    pub remaps: Vec<Remap>,
    pub press: Vec<MacroStep>,
    pub release: Vec<MacroStep>,
    pub macros: Vec<Macro>,
}

impl WorkingLists {
    /// Clears the block-level lists.  Calling it twice is harmless.
    pub fn clear_block(&mut self) {
        self.layerdefs.clear();
        self.remaps.clear();
        self.macros.clear();
        self.clear_macro();
    }

    /// Clears the step lists of the macro being defined.
    pub fn clear_macro(&mut self) {
        self.press.clear();
        self.release.clear();
    }
}

/// A complete binary configuration: header flags plus finished blocks.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Document {
    pub force: ForceFlags,
    pub blocks: Vec<Block>,
}

impl Document {
    /// Renders the full file: 6-byte header followed by every block in order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let body_len: usize = self.blocks.iter().map(Block::len).sum();
        let mut out = Vec::with_capacity(crate::format::layout::HEADER_SIZE + body_len);
        out.extend_from_slice(&encode_header(self.force));
        for block in &self.blocks {
            out.extend_from_slice(&block.bytes);
        }
        out
    }
}

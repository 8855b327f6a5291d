//! Serialization of finished blocks and the file header.
//!
//! All block bytes go through a [`BlockWriter`], which reserves the length
//! byte up front, refuses to grow past [`MAX_BLOCK_LEN`] and back-patches the
//! real length when the block is finished.

use thiserror::Error;

use crate::domain::{Block, BlockKind, Conditions, LayerDef, Macro, MacroStep, Remap};
use crate::format::layout::{
    BlockFlags, ForceFlags, PhaseCount, HEADER_SIZE, MAX_BLOCK_LEN, MAX_ENTRIES, MAX_PHASE_STEPS,
    SIGNATURE, VERSION_MAJOR, VERSION_MINOR,
};

/// Errors raised while serializing a block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// The block would need more bytes than its length byte can express.
    #[error("block too large: {len} bytes exceeds the {MAX_BLOCK_LEN} byte limit")]
    BlockTooLarge { len: usize },

    /// More entries (or macros) than the one-byte count can hold.
    #[error("too many entries in block: {count} exceeds {MAX_ENTRIES}")]
    TooManyEntries { count: usize },

    /// A macro phase has more steps than its 6-bit count can hold.
    #[error("macro too long: {steps} steps exceeds {MAX_PHASE_STEPS} per phase")]
    MacroTooLong { steps: usize },
}

// ── Header ────────────────────────────────────────────────────────────────────

/// Encodes the 6-byte file header.
pub fn encode_header(force: ForceFlags) -> [u8; HEADER_SIZE] {
    [
        SIGNATURE[0],
        SIGNATURE[1],
        VERSION_MAJOR,
        VERSION_MINOR,
        force.0,
        0x00, // reserved
    ]
}

// ── Block writer ──────────────────────────────────────────────────────────────

/// Length-guarded byte buffer for one block.
#[derive(Debug)]
pub struct BlockWriter {
    buf: Vec<u8>,
}

impl Default for BlockWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockWriter {
    /// Starts a block with a placeholder length byte.
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(MAX_BLOCK_LEN);
        buf.push(0);
        BlockWriter { buf }
    }

    /// Starts a block and writes the flags byte and condition fields.
    pub fn with_conditions(kind: BlockKind, conditions: &Conditions) -> Result<Self, EncodeError> {
        let flags = BlockFlags::for_block(kind, conditions);
        let mut writer = Self::new();
        writer.push(flags.0)?;
        if flags.has_scanset() {
            writer.push(conditions.scanset)?;
        }
        if flags.has_keyboard() {
            writer.extend(&conditions.keyboard_id.to_le_bytes())?;
        }
        Ok(writer)
    }

    pub fn push(&mut self, byte: u8) -> Result<(), EncodeError> {
        self.ensure_room(1)?;
        self.buf.push(byte);
        Ok(())
    }

    pub fn extend(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.ensure_room(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Bytes written so far, length byte included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.len() <= 1
    }

    /// Back-patches the length byte and returns the block bytes.
    pub fn finish(mut self) -> Vec<u8> {
        // ensure_room keeps len <= MAX_BLOCK_LEN, so the cast is lossless.
        self.buf[0] = self.buf.len() as u8;
        self.buf
    }

    fn ensure_room(&self, extra: usize) -> Result<(), EncodeError> {
        let len = self.buf.len() + extra;
        if len > MAX_BLOCK_LEN {
            return Err(EncodeError::BlockTooLarge { len });
        }
        Ok(())
    }
}

// ── Block bodies ──────────────────────────────────────────────────────────────

/// `[count][count × (fn_combo, layer)]`
pub fn encode_layerdef_block(
    conditions: &Conditions,
    entries: &[LayerDef],
) -> Result<Block, EncodeError> {
    let mut w = BlockWriter::with_conditions(BlockKind::LayerDef, conditions)?;
    w.push(entry_count(entries.len())?)?;
    for entry in entries {
        w.extend(&[entry.fn_combo, entry.layer])?;
    }
    Ok(Block {
        kind: BlockKind::LayerDef,
        bytes: w.finish(),
    })
}

/// `[layer][count][count × (from, to)]`
pub fn encode_remap_block(
    conditions: &Conditions,
    layer: u8,
    entries: &[Remap],
) -> Result<Block, EncodeError> {
    let mut w = BlockWriter::with_conditions(BlockKind::Remap, conditions)?;
    w.push(layer)?;
    w.push(entry_count(entries.len())?)?;
    for entry in entries {
        w.extend(&[entry.from.0, entry.to.0])?;
    }
    Ok(Block {
        kind: BlockKind::Remap,
        bytes: w.finish(),
    })
}

/// `[macro_count][records]`
pub fn encode_macro_block(conditions: &Conditions, macros: &[Macro]) -> Result<Block, EncodeError> {
    let mut w = BlockWriter::with_conditions(BlockKind::Macro, conditions)?;
    w.push(entry_count(macros.len())?)?;
    for m in macros {
        encode_macro_record(&mut w, m)?;
    }
    Ok(Block {
        kind: BlockKind::Macro,
        bytes: w.finish(),
    })
}

/// `[key][desired][matched][press count][release count][steps...]`
pub fn encode_macro_record(w: &mut BlockWriter, m: &Macro) -> Result<(), EncodeError> {
    let press = phase_count(m.press.len(), false)?;
    let release = phase_count(m.release.len(), m.restore_meta)?;
    w.extend(&[m.key.0, m.desired.0, m.matched.0, press.0, release.0])?;
    for step in m.press.iter().chain(m.release.iter()) {
        encode_step(w, step)?;
    }
    Ok(())
}

fn encode_step(w: &mut BlockWriter, step: &MacroStep) -> Result<(), EncodeError> {
    w.extend(&[step.command_byte(), step.value])
}

fn entry_count(count: usize) -> Result<u8, EncodeError> {
    u8::try_from(count).map_err(|_| EncodeError::TooManyEntries { count })
}

fn phase_count(steps: usize, restore_meta: bool) -> Result<PhaseCount, EncodeError> {
    PhaseCount::new(steps, restore_meta).ok_or(EncodeError::MacroTooLong { steps })
}

//! Binary → text: the disassembler.
//!
//! Walks the header and the length-prefixed blocks and writes text in the
//! assembler's grammar, so that assembling the output reproduces the input
//! bytes exactly.
//!
//! Informational comments (`# length:`, `# count:`, the raw modifier bytes of
//! each macro) are written when [`DisassemblerOptions::annotate`] is set.
//! Problems are always written as `# ERROR:` comments where they occur.  A
//! problem inside a block is recoverable: the block's length byte still says
//! where the next block starts, so decoding carries on and the pass ends with
//! [`DecodeError::Malformed`].  A bad header, a zero length byte or a block
//! running past the end of the buffer stops the walk immediately.

pub mod error;
pub mod render;

use std::fmt::Display;
use std::io::Write;

use tracing::{debug, trace};

pub use error::DecodeError;

use crate::domain::BlockKind;
use crate::format::layout::{BlockFlags, ForceFlags, PhaseCount, MACRO_RECORD_HEADER, STEP_SIZE};
use crate::format::{HEADER_SIZE, SIGNATURE};
use crate::format::layout::{VERSION_MAJOR, VERSION_MINOR};
use crate::tokens::{key_name_for, KeyCode, ModifierMask, ScanSet};
use render::{render_fn_combo, render_key, render_meta_match, render_scanset, render_step};

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassemblerOptions {
    /// Write informational byte-count comments.
    pub annotate: bool,
}

impl Default for DisassemblerOptions {
    fn default() -> Self {
        DisassemblerOptions { annotate: true }
    }
}

/// Disassembles `buf` into `out` with default options.
pub fn disassemble(buf: &[u8], out: &mut impl Write) -> Result<(), DecodeError> {
    disassemble_with(buf, out, &DisassemblerOptions::default())
}

/// Disassembles `buf` into `out`.  Text is written as it is decoded, so on
/// error `out` holds everything up to and including the error annotation.
pub fn disassemble_with(
    buf: &[u8],
    out: &mut impl Write,
    options: &DisassemblerOptions,
) -> Result<(), DecodeError> {
    let mut decoder = Decoder {
        out,
        annotate: options.annotate,
        errors: 0,
    };

    decoder.header(buf)?;

    let mut offset = HEADER_SIZE;
    let mut blocks = 0usize;
    while offset < buf.len() {
        let declared = usize::from(buf[offset]);
        if declared == 0 {
            decoder.error("block length is zero")?;
            return Err(DecodeError::ZeroLengthBlock { offset });
        }
        let available = buf.len() - offset;
        if declared > available {
            decoder.error(format_args!(
                "block declares {declared} bytes, only {available} remain"
            ))?;
            return Err(DecodeError::BlockOverrun {
                offset,
                declared,
                available,
            });
        }

        trace!(offset, len = declared, "decoding block");
        decoder.block(&buf[offset..offset + declared])?;
        offset += declared;
        blocks += 1;
    }

    debug!(bytes = buf.len(), blocks, errors = decoder.errors, "disassembly finished");
    match decoder.errors {
        0 => Ok(()),
        count => Err(DecodeError::Malformed { count }),
    }
}

/// Disassembles into a `String`, returning the text even when decoding fails.
pub fn disassemble_to_string(buf: &[u8]) -> (String, Result<(), DecodeError>) {
    let mut out = Vec::new();
    let result = disassemble(buf, &mut out);
    (String::from_utf8_lossy(&out).into_owned(), result)
}

// ── Decoder ───────────────────────────────────────────────────────────────────

struct Decoder<'o, W: Write> {
    out: &'o mut W,
    annotate: bool,
    errors: usize,
}

impl<'o, W: Write> Decoder<'o, W> {
    fn note(&mut self, text: impl Display) -> Result<(), DecodeError> {
        if self.annotate {
            writeln!(self.out, "# {text}")?;
        }
        Ok(())
    }

    fn error(&mut self, text: impl Display) -> Result<(), DecodeError> {
        self.errors += 1;
        writeln!(self.out, "# ERROR: {text}")?;
        Ok(())
    }

    fn header(&mut self, buf: &[u8]) -> Result<(), DecodeError> {
        self.note(format_args!("length: {}", buf.len()))?;
        if buf.len() < HEADER_SIZE {
            self.error("header truncated")?;
            return Err(DecodeError::TruncatedHeader(buf.len()));
        }

        self.note(format_args!(
            "signature: {} {}",
            buf[0].escape_ascii(),
            buf[1].escape_ascii()
        ))?;
        if buf[..2] != SIGNATURE {
            self.error("bad signature")?;
            return Err(DecodeError::BadSignature(buf[0], buf[1]));
        }

        self.note(format_args!("version: {} {}", buf[2], buf[3]))?;
        if (buf[2], buf[3]) != (VERSION_MAJOR, VERSION_MINOR) {
            self.error(format_args!("unsupported version {}.{}", buf[2], buf[3]))?;
        }

        let force = ForceFlags(buf[4]);
        if force.scan_set_bits() != 0 {
            match force.scan_set() {
                Some(set) => writeln!(self.out, "force {}", set.name())?,
                None => self.error(format_args!("invalid forced scan set {}", force.scan_set_bits()))?,
            }
        }
        if force.protocol_bits() != 0 {
            match force.protocol() {
                Some(protocol) => writeln!(self.out, "force {}", protocol.name())?,
                None => self.error(format_args!("invalid forced protocol {}", force.protocol_bits()))?,
            }
        }

        if buf[5] != 0 {
            self.error(format_args!("reserved header byte is 0x{:02X}", buf[5]))?;
        }
        Ok(())
    }

    /// Decodes one block; `bytes` starts with the length byte.
    fn block(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        self.note(format_args!("block length: {}", bytes.len()))?;
        if bytes.len() < 2 {
            return self.error("block truncated");
        }

        let flags = BlockFlags(bytes[1]);
        let body_start = 2 + flags.condition_len();
        if bytes.len() < body_start {
            return self.error("block truncated");
        }

        let mut pos = 2;
        if flags.has_scanset() {
            let mask = bytes[pos];
            pos += 1;
            let known = ScanSet::ALL.iter().fold(0u8, |acc, s| acc | s.condition_bit());
            if mask == 0 || mask & !known != 0 {
                self.error(format_args!("invalid scan set condition 0x{mask:02X}"))?;
            }
            writeln!(self.out, "ifset {}", render_scanset(mask))?;
        } else {
            writeln!(self.out, "ifset any")?;
        }

        if flags.has_keyboard() {
            let id = u16::from_le_bytes([bytes[pos], bytes[pos + 1]]);
            if id == 0 {
                self.error("keyboard id condition is zero")?;
            }
            writeln!(self.out, "ifkeyboard {id:04X}")?;
        } else {
            writeln!(self.out, "ifkeyboard any")?;
        }

        match flags.select() {
            0 => writeln!(self.out, "ifselect any")?,
            select => writeln!(self.out, "ifselect {select}")?,
        }

        let Some(kind) = flags.kind() else {
            return self.error(format_args!("invalid block type {}", flags.kind_bits()));
        };

        writeln!(self.out, "{}", kind.directive())?;
        let body = &bytes[body_start..];
        match kind {
            BlockKind::LayerDef => self.layerdef_body(body)?,
            BlockKind::Remap => self.remap_body(body)?,
            BlockKind::Macro => self.macro_body(body)?,
        }
        writeln!(self.out, "endblock")?;
        Ok(())
    }

    /// `[count][count × (fn_combo, layer)]`
    fn layerdef_body(&mut self, body: &[u8]) -> Result<(), DecodeError> {
        let Some(&count) = body.first() else {
            return self.error("block size mismatch");
        };
        self.note(format_args!("count: {count}"))?;
        if body.len() != 1 + 2 * usize::from(count) {
            return self.error("block size mismatch");
        }

        for entry in body[1..].chunks_exact(2) {
            let (combo, layer) = (entry[0], entry[1]);
            if combo == 0 {
                self.error(format_args!("layer {layer} defined without FN keys"))?;
                continue;
            }
            if layer == 0 {
                self.error("layer definition for layer 0")?;
                continue;
            }
            writeln!(self.out, "\t{} {layer}", render_fn_combo(combo).join(" "))?;
        }
        Ok(())
    }

    /// `[layer][count][count × (from, to)]`
    fn remap_body(&mut self, body: &[u8]) -> Result<(), DecodeError> {
        if body.len() < 2 || body.len() != 2 + 2 * usize::from(body[1]) {
            return self.error("block size mismatch");
        }

        writeln!(self.out, "layer {}", body[0])?;
        self.note(format_args!("count: {}", body[1]))?;
        for entry in body[2..].chunks_exact(2) {
            match (render_key(entry[0]), render_key(entry[1])) {
                (Ok(from), Ok(to)) => writeln!(self.out, "\t{from} {to}")?,
                (Err(e), _) | (_, Err(e)) => self.error(e)?,
            }
        }
        Ok(())
    }

    /// `[macro_count][records]`
    fn macro_body(&mut self, body: &[u8]) -> Result<(), DecodeError> {
        let Some(&count) = body.first() else {
            return self.error("block size mismatch");
        };
        self.note(format_args!("macro count: {count}"))?;

        let mut pos = 1;
        for _ in 0..count {
            match self.macro_record(&body[pos..])? {
                Some(used) => pos += used,
                None => return Ok(()),
            }
        }
        if pos != body.len() {
            self.error("block size mismatch")?;
        }
        Ok(())
    }

    /// Decodes one macro record.  Returns its size, or `None` when the record
    /// does not fit in the block (the error is already written).
    fn macro_record(&mut self, rec: &[u8]) -> Result<Option<usize>, DecodeError> {
        if rec.len() < MACRO_RECORD_HEADER {
            self.error("macro truncated")?;
            return Ok(None);
        }

        let press = PhaseCount(rec[3]);
        let release = PhaseCount(rec[4]);
        let steps = press.count() + release.count();
        let len = MACRO_RECORD_HEADER + STEP_SIZE * steps;
        if rec.len() < len {
            self.error("macro size mismatch")?;
            return Ok(None);
        }

        if rec[3] & !0x3F != 0 {
            self.error(format_args!("press count byte 0x{:02X} has unused bits set", rec[3]))?;
        }
        if rec[4] & 0x40 != 0 {
            self.error(format_args!("release count byte 0x{:02X} has unused bits set", rec[4]))?;
        }

        let key = match render_key(rec[0]) {
            Ok(name) => name,
            Err(e) => {
                self.error(e)?;
                key_name_for(KeyCode(rec[0]))
            }
        };
        let (desired, matched) = (ModifierMask(rec[1]), ModifierMask(rec[2]));
        let metas = match render_meta_match(desired, matched) {
            Ok(tokens) => tokens,
            Err(e) => {
                self.error(e)?;
                Vec::new()
            }
        };

        let mut line = format!("macro {key}");
        for token in &metas {
            line.push(' ');
            line.push_str(token);
        }
        if self.annotate {
            line.push_str(&format!(" # {:02X} {:02X}", desired.0, matched.0));
        }
        writeln!(self.out, "{line}")?;

        let step_bytes = &rec[MACRO_RECORD_HEADER..len];
        let (press_steps, release_steps) = step_bytes.split_at(STEP_SIZE * press.count());
        self.steps(press_steps)?;

        if release.count() > 0 || !release.restore_meta() {
            if release.restore_meta() {
                writeln!(self.out, "onbreak")?;
            } else {
                writeln!(self.out, "onbreak norestoremeta")?;
            }
        }
        self.steps(release_steps)?;

        writeln!(self.out, "endmacro")?;
        Ok(Some(len))
    }

    fn steps(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        for step in bytes.chunks_exact(STEP_SIZE) {
            match render_step(step[0], step[1]) {
                Ok(text) => writeln!(self.out, "\t{text}")?,
                Err(e) => self.error(e)?,
            }
        }
        Ok(())
    }
}

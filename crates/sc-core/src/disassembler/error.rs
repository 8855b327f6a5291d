//! Disassembler errors.

use std::io;

use thiserror::Error;

use crate::format::HEADER_SIZE;

/// Errors that end a disassembly pass.
///
/// Everything except [`DecodeError::Io`] is also written into the output as a
/// `# ERROR:` comment at the point where it was found.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Fewer bytes than the fixed header.
    #[error("truncated header: need {HEADER_SIZE} bytes, got {0}")]
    TruncatedHeader(usize),

    /// The first two bytes are not `SC`.
    #[error("bad signature: 0x{0:02X} 0x{1:02X}")]
    BadSignature(u8, u8),

    /// A block declares length 0, so the walk cannot advance.
    #[error("zero-length block at offset {offset}")]
    ZeroLengthBlock { offset: usize },

    /// A block declares more bytes than remain in the buffer.
    #[error("block at offset {offset} declares {declared} bytes, only {available} remain")]
    BlockOverrun {
        offset: usize,
        declared: usize,
        available: usize,
    },

    /// Decoding finished but some blocks could not be rendered faithfully.
    #[error("{count} error(s) found while decoding, see the annotated output")]
    Malformed { count: usize },

    /// Writing the text output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

//! Binary configuration format: layout constants, bit-field types and
//! block serialization.

pub mod encode;
pub mod layout;

pub use encode::{encode_header, BlockWriter, EncodeError};
pub use layout::{BlockFlags, ForceFlags, PhaseCount, HEADER_SIZE, MAX_BLOCK_LEN, SIGNATURE};

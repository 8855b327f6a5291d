//! Static token tables shared by the assembler and the disassembler.
//!
//! Every lookup is a case-sensitive linear scan over a small static table, and
//! "not found" is always `None`.

pub mod hid;
pub mod macro_cmd;
pub mod meta;
pub mod sets;

pub use hid::{key_code_for, key_name_for, KeyCode, UNKNOWN_KEY_NAME};
pub use macro_cmd::{
    argument_class, macro_command_for, macro_command_name, ArgClass, MacroCommand, PUSH_META,
    PUSH_META_TOKEN,
};
pub use meta::{is_side_specific, modifier_for, modifier_name_for, ModifierMask};
pub use sets::{protocol_for, scan_set_for, Protocol, ScanSet};

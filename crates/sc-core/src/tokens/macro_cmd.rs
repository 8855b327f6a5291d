//! Macro step command mnemonics.
//!
//! Each macro step is two bytes on disk: a command byte and a value byte.  The
//! low seven bits of the command byte select a [`MacroCommand`]; bit 7 is the
//! [`PUSH_META`] flag, which saves the current modifier state before the step
//! runs so a later `POP_META` can restore it.
//!
//! How the value byte is read depends on the command's [`ArgClass`]:
//!
//! | class      | commands                                          | value    |
//! |------------|---------------------------------------------------|----------|
//! | `None`     | `NOP`, `POP_META`, `POP_ALL_META`, `CLEAR_ALL`, `BOOT` | ignored (0) |
//! | `Key`      | `PRESS`, `MAKE`, `BREAK`                          | key code |
//! | `Modifier` | `ASSIGN_META`, `SET_META`, `CLEAR_META`, `TOGGLE_META` | modifier mask |
//! | `Delay`    | `DELAY`                                           | milliseconds 0–255 |

/// Flag OR-ed into the command byte.
pub const PUSH_META: u8 = 0x80;

/// Token that sets [`PUSH_META`] when it prefixes a step.
pub const PUSH_META_TOKEN: &str = "PUSH_META";

/// Mask selecting the command code from a command byte.
pub const COMMAND_MASK: u8 = 0x7F;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MacroCommand {
    Nop = 0,
    Press = 1,
    Make = 2,
    Break = 3,
    AssignMeta = 4,
    SetMeta = 5,
    ClearMeta = 6,
    ToggleMeta = 7,
    PopMeta = 8,
    PopAllMeta = 9,
    Delay = 10,
    ClearAll = 11,
    Boot = 12,
}

impl TryFrom<u8> for MacroCommand {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0 => Ok(MacroCommand::Nop),
            1 => Ok(MacroCommand::Press),
            2 => Ok(MacroCommand::Make),
            3 => Ok(MacroCommand::Break),
            4 => Ok(MacroCommand::AssignMeta),
            5 => Ok(MacroCommand::SetMeta),
            6 => Ok(MacroCommand::ClearMeta),
            7 => Ok(MacroCommand::ToggleMeta),
            8 => Ok(MacroCommand::PopMeta),
            9 => Ok(MacroCommand::PopAllMeta),
            10 => Ok(MacroCommand::Delay),
            11 => Ok(MacroCommand::ClearAll),
            12 => Ok(MacroCommand::Boot),
            _ => Err(()),
        }
    }
}

impl MacroCommand {
    pub fn name(self) -> &'static str {
        macro_command_name(self)
    }

    pub fn argument_class(self) -> ArgClass {
        argument_class(self)
    }
}

impl std::fmt::Display for MacroCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a step's value byte is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgClass {
    None,
    Key,
    Modifier,
    Delay,
}

static COMMAND_TABLE: &[(&str, MacroCommand)] = &[
    ("NOP", MacroCommand::Nop),
    ("PRESS", MacroCommand::Press),
    ("MAKE", MacroCommand::Make),
    ("BREAK", MacroCommand::Break),
    ("ASSIGN_META", MacroCommand::AssignMeta),
    ("SET_META", MacroCommand::SetMeta),
    ("CLEAR_META", MacroCommand::ClearMeta),
    ("TOGGLE_META", MacroCommand::ToggleMeta),
    ("POP_META", MacroCommand::PopMeta),
    ("POP_ALL_META", MacroCommand::PopAllMeta),
    ("DELAY", MacroCommand::Delay),
    ("CLEAR_ALL", MacroCommand::ClearAll),
    ("BOOT", MacroCommand::Boot),
];

/// Looks up a step mnemonic.  `PUSH_META` is not a command and returns `None`.
pub fn macro_command_for(name: &str) -> Option<MacroCommand> {
    COMMAND_TABLE
        .iter()
        .find(|(token, _)| *token == name)
        .map(|&(_, command)| command)
}

pub fn macro_command_name(command: MacroCommand) -> &'static str {
    match command {
        MacroCommand::Nop => "NOP",
        MacroCommand::Press => "PRESS",
        MacroCommand::Make => "MAKE",
        MacroCommand::Break => "BREAK",
        MacroCommand::AssignMeta => "ASSIGN_META",
        MacroCommand::SetMeta => "SET_META",
        MacroCommand::ClearMeta => "CLEAR_META",
        MacroCommand::ToggleMeta => "TOGGLE_META",
        MacroCommand::PopMeta => "POP_META",
        MacroCommand::PopAllMeta => "POP_ALL_META",
        MacroCommand::Delay => "DELAY",
        MacroCommand::ClearAll => "CLEAR_ALL",
        MacroCommand::Boot => "BOOT",
    }
}

pub fn argument_class(command: MacroCommand) -> ArgClass {
    match command {
        MacroCommand::Press | MacroCommand::Make | MacroCommand::Break => ArgClass::Key,
        MacroCommand::AssignMeta
        | MacroCommand::SetMeta
        | MacroCommand::ClearMeta
        | MacroCommand::ToggleMeta => ArgClass::Modifier,
        MacroCommand::Delay => ArgClass::Delay,
        MacroCommand::Nop
        | MacroCommand::PopMeta
        | MacroCommand::PopAllMeta
        | MacroCommand::ClearAll
        | MacroCommand::Boot => ArgClass::None,
    }
}

//! Key code table: USB HID Usage IDs (page 0x07) in the converter's spelling.
//!
//! Every key that can appear in a remap pair, as a macro trigger, or as the
//! argument of a `PRESS`/`MAKE`/`BREAK` macro step is written in the text
//! configuration by name and stored in the binary configuration as a single
//! byte.
//!
//! # What is a HID Usage ID? (for beginners)
//!
//! The **USB Human Interface Device (HID)** standard assigns a number to every
//! key on a keyboard, grouped by *Usage Page*.  All ordinary keys live on page
//! 0x07 ("Keyboard/Keypad"):
//!
//! | Key          | HID Usage ID | Name in the config |
//! |--------------|-------------|---------------------|
//! | Letter A     | 0x04        | `A`                 |
//! | Enter        | 0x28        | `ENTER`             |
//! | Caps Lock    | 0x39        | `CAPS_LOCK`         |
//! | Left Ctrl    | 0xE0        | `LCTRL`             |
//!
//! The converter firmware only keeps the low byte, so the codes above 0xA4
//! that the USB tables leave to keypad extras are reused for converter
//! specific keys: system/media keys, the layer function keys `FN1`..`FN8`
//! and the `SELECT_0`..`SELECT_7` keys that switch the active select set.
//!
//! # Canonical names and aliases
//!
//! A code may be listed more than once.  The first entry is the canonical
//! name used by the disassembler; later entries are accepted aliases on input
//! (`CAPSLOCK` for `CAPS_LOCK`, `ESCAPE` for `ESC`, ...).
//!
//! # Code 0 is a real key
//!
//! `UNASSIGNED` (0x00) is a legitimate value that disables a key when used as
//! a remap target.  "Not found" is therefore expressed with `Option::None`,
//! never with a magic number.

/// Name returned by [`key_name_for`] for a code that has no table entry.
pub const UNKNOWN_KEY_NAME: &str = "UNKNOWN";

/// A single-byte key code as stored in the binary configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct KeyCode(pub u8);

impl KeyCode {
    /// Returns the canonical name, or [`UNKNOWN_KEY_NAME`] if the code is unnamed.
    pub fn name(self) -> &'static str {
        key_name_for(self)
    }
}

impl From<u8> for KeyCode {
    fn from(value: u8) -> Self {
        KeyCode(value)
    }
}

impl std::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the key code for `name`, or `None` if the name is not in the table.
pub fn key_code_for(name: &str) -> Option<KeyCode> {
    KEY_TABLE
        .iter()
        .find(|(token, _)| *token == name)
        .map(|&(_, code)| KeyCode(code))
}

/// Returns the canonical name for `code`.
///
/// Never fails: unnamed codes yield [`UNKNOWN_KEY_NAME`].
pub fn key_name_for(code: KeyCode) -> &'static str {
    KEY_TABLE
        .iter()
        .find(|&&(_, value)| value == code.0)
        .map(|&(token, _)| token)
        .unwrap_or(UNKNOWN_KEY_NAME)
}

/// Static name/value table.  Canonical entries first, aliases at the end.
static KEY_TABLE: &[(&str, u8)] = &[
    // Reserved / error codes (HID 0x00–0x03)
    ("UNASSIGNED", 0x00),
    ("OVERRUN_ERROR", 0x01),
    ("POST_FAIL", 0x02),
    ("ERROR_UNDEFINED", 0x03),
    // Letters (HID 0x04–0x1D)
    ("A", 0x04),
    ("B", 0x05),
    ("C", 0x06),
    ("D", 0x07),
    ("E", 0x08),
    ("F", 0x09),
    ("G", 0x0A),
    ("H", 0x0B),
    ("I", 0x0C),
    ("J", 0x0D),
    ("K", 0x0E),
    ("L", 0x0F),
    ("M", 0x10),
    ("N", 0x11),
    ("O", 0x12),
    ("P", 0x13),
    ("Q", 0x14),
    ("R", 0x15),
    ("S", 0x16),
    ("T", 0x17),
    ("U", 0x18),
    ("V", 0x19),
    ("W", 0x1A),
    ("X", 0x1B),
    ("Y", 0x1C),
    ("Z", 0x1D),
    // Digits (HID 0x1E–0x27)
    ("1", 0x1E),
    ("2", 0x1F),
    ("3", 0x20),
    ("4", 0x21),
    ("5", 0x22),
    ("6", 0x23),
    ("7", 0x24),
    ("8", 0x25),
    ("9", 0x26),
    ("0", 0x27),
    // Control and punctuation (HID 0x28–0x39)
    ("ENTER", 0x28),
    ("ESC", 0x29),
    ("BACKSPACE", 0x2A),
    ("TAB", 0x2B),
    ("SPACE", 0x2C),
    ("MINUS", 0x2D),
    ("EQUAL", 0x2E),
    ("LEFT_BRACE", 0x2F),
    ("RIGHT_BRACE", 0x30),
    ("BACKSLASH", 0x31),
    ("NON_US_NUM", 0x32),
    ("SEMICOLON", 0x33),
    ("QUOTE", 0x34),
    ("BACK_QUOTE", 0x35),
    ("COMMA", 0x36),
    ("PERIOD", 0x37),
    ("SLASH", 0x38),
    ("CAPS_LOCK", 0x39),
    // Function keys (HID 0x3A–0x45)
    ("F1", 0x3A),
    ("F2", 0x3B),
    ("F3", 0x3C),
    ("F4", 0x3D),
    ("F5", 0x3E),
    ("F6", 0x3F),
    ("F7", 0x40),
    ("F8", 0x41),
    ("F9", 0x42),
    ("F10", 0x43),
    ("F11", 0x44),
    ("F12", 0x45),
    // Navigation cluster (HID 0x46–0x52)
    ("PRINTSCREEN", 0x46),
    ("SCROLL_LOCK", 0x47),
    ("PAUSE", 0x48),
    ("INSERT", 0x49),
    ("HOME", 0x4A),
    ("PAGE_UP", 0x4B),
    ("DELETE", 0x4C),
    ("END", 0x4D),
    ("PAGE_DOWN", 0x4E),
    ("RIGHT", 0x4F),
    ("LEFT", 0x50),
    ("DOWN", 0x51),
    ("UP", 0x52),
    // Keypad (HID 0x53–0x63)
    ("NUM_LOCK", 0x53),
    ("PAD_SLASH", 0x54),
    ("PAD_ASTERIX", 0x55),
    ("PAD_MINUS", 0x56),
    ("PAD_PLUS", 0x57),
    ("PAD_ENTER", 0x58),
    ("PAD_1", 0x59),
    ("PAD_2", 0x5A),
    ("PAD_3", 0x5B),
    ("PAD_4", 0x5C),
    ("PAD_5", 0x5D),
    ("PAD_6", 0x5E),
    ("PAD_7", 0x5F),
    ("PAD_8", 0x60),
    ("PAD_9", 0x61),
    ("PAD_0", 0x62),
    ("PAD_PERIOD", 0x63),
    // Extended keyboard page (HID 0x64–0xA4)
    ("EUROPE_2", 0x64),
    ("APP", 0x65),
    ("POWER", 0x66),
    ("PAD_EQUALS", 0x67),
    ("F13", 0x68),
    ("F14", 0x69),
    ("F15", 0x6A),
    ("F16", 0x6B),
    ("F17", 0x6C),
    ("F18", 0x6D),
    ("F19", 0x6E),
    ("F20", 0x6F),
    ("F21", 0x70),
    ("F22", 0x71),
    ("F23", 0x72),
    ("F24", 0x73),
    ("EXECUTE", 0x74),
    ("HELP", 0x75),
    ("MENU", 0x76),
    ("SELECT", 0x77),
    ("STOP", 0x78),
    ("AGAIN", 0x79),
    ("UNDO", 0x7A),
    ("CUT", 0x7B),
    ("COPY", 0x7C),
    ("PASTE", 0x7D),
    ("FIND", 0x7E),
    ("MUTE", 0x7F),
    ("VOLUME_UP", 0x80),
    ("VOLUME_DOWN", 0x81),
    ("LOCKING_CAPS_LOCK", 0x82),
    ("LOCKING_NUM_LOCK", 0x83),
    ("LOCKING_SCROLL_LOCK", 0x84),
    ("PAD_COMMA", 0x85),
    ("PAD_EQUALS_AS400", 0x86),
    ("INTERNATIONAL_1", 0x87),
    ("INTERNATIONAL_2", 0x88),
    ("INTERNATIONAL_3", 0x89),
    ("INTERNATIONAL_4", 0x8A),
    ("INTERNATIONAL_5", 0x8B),
    ("INTERNATIONAL_6", 0x8C),
    ("INTERNATIONAL_7", 0x8D),
    ("INTERNATIONAL_8", 0x8E),
    ("INTERNATIONAL_9", 0x8F),
    ("LANG_1", 0x90),
    ("LANG_2", 0x91),
    ("LANG_3", 0x92),
    ("LANG_4", 0x93),
    ("LANG_5", 0x94),
    ("LANG_6", 0x95),
    ("LANG_7", 0x96),
    ("LANG_8", 0x97),
    ("LANG_9", 0x98),
    ("ALT_ERASE", 0x99),
    ("SYSRQ", 0x9A),
    ("CANCEL", 0x9B),
    ("CLEAR", 0x9C),
    ("PRIOR", 0x9D),
    ("RETURN", 0x9E),
    ("SEPARATOR", 0x9F),
    ("OUT", 0xA0),
    ("OPER", 0xA1),
    ("CLEAR_AGAIN", 0xA2),
    ("CRSEL_PROPS", 0xA3),
    ("EXSEL", 0xA4),
    // Converter-specific system and media keys (0xA5–0xBA)
    ("SYSTEM_POWER", 0xA5),
    ("SYSTEM_SLEEP", 0xA6),
    ("SYSTEM_WAKE", 0xA7),
    ("AUDIO_MUTE", 0xA8),
    ("AUDIO_VOL_UP", 0xA9),
    ("AUDIO_VOL_DOWN", 0xAA),
    ("MEDIA_NEXT_TRACK", 0xAB),
    ("MEDIA_PREV_TRACK", 0xAC),
    ("MEDIA_STOP", 0xAD),
    ("MEDIA_PLAY_PAUSE", 0xAE),
    ("MEDIA_SELECT", 0xAF),
    ("MEDIA_EJECT", 0xB0),
    ("MAIL", 0xB1),
    ("CALC", 0xB2),
    ("MY_COMPUTER", 0xB3),
    ("WWW_SEARCH", 0xB4),
    ("WWW_HOME", 0xB5),
    ("WWW_BACK", 0xB6),
    ("WWW_FORWARD", 0xB7),
    ("WWW_STOP", 0xB8),
    ("WWW_REFRESH", 0xB9),
    ("WWW_FAVORITES", 0xBA),
    // Modifier keys (HID 0xE0–0xE7)
    ("LCTRL", 0xE0),
    ("LSHIFT", 0xE1),
    ("LALT", 0xE2),
    ("LGUI", 0xE3),
    ("RCTRL", 0xE4),
    ("RSHIFT", 0xE5),
    ("RALT", 0xE6),
    ("RGUI", 0xE7),
    // Converter select keys (0xE8–0xEF)
    ("SELECT_0", 0xE8),
    ("SELECT_1", 0xE9),
    ("SELECT_2", 0xEA),
    ("SELECT_3", 0xEB),
    ("SELECT_4", 0xEC),
    ("SELECT_5", 0xED),
    ("SELECT_6", 0xEE),
    ("SELECT_7", 0xEF),
    // Layer function keys (0xF1–0xF8)
    ("FN1", 0xF1),
    ("FN2", 0xF2),
    ("FN3", 0xF3),
    ("FN4", 0xF4),
    ("FN5", 0xF5),
    ("FN6", 0xF6),
    ("FN7", 0xF7),
    ("FN8", 0xF8),
    // Input aliases
    ("CAPSLOCK", 0x39),
    ("ESCAPE", 0x29),
    ("NUMLOCK", 0x53),
    ("SCROLLLOCK", 0x47),
    ("PRINT_SCREEN", 0x46),
    ("BACKTICK", 0x35),
    ("LEFT_BRACKET", 0x2F),
    ("RIGHT_BRACKET", 0x30),
    ("PGUP", 0x4B),
    ("PGDN", 0x4E),
    ("INS", 0x49),
    ("DEL", 0x4C),
];

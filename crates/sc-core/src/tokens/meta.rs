//! Modifier ("meta") key names and masks.
//!
//! A modifier mask is one byte: bits 0–3 are the left-hand CTRL, SHIFT, ALT
//! and GUI keys, bits 4–7 the same keys on the right-hand side.  The
//! side-agnostic names (`CTRL`, `SHIFT`, ...) set both bits of a pair.

/// One-byte modifier mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierMask(pub u8);

impl ModifierMask {
    pub const LCTRL: u8 = 1 << 0;
    pub const LSHIFT: u8 = 1 << 1;
    pub const LALT: u8 = 1 << 2;
    pub const LGUI: u8 = 1 << 3;
    pub const RCTRL: u8 = 1 << 4;
    pub const RSHIFT: u8 = 1 << 5;
    pub const RALT: u8 = 1 << 6;
    pub const RGUI: u8 = 1 << 7;

    /// Bits belonging to the left-hand keys.
    pub const LEFT: u8 = 0x0F;

    pub fn empty() -> Self {
        ModifierMask(0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the left-hand half of the mask.
    pub fn left(self) -> Self {
        ModifierMask(self.0 & Self::LEFT)
    }

    /// Returns `true` when no left/right pair has both bits set.
    pub fn is_side_specific(self) -> bool {
        is_side_specific(self)
    }
}

impl std::ops::BitOr for ModifierMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        ModifierMask(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ModifierMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Left/right pair names in bit order: `(generic, left, right)`.
pub(crate) const MODIFIER_PAIRS: [(&str, &str, &str); 4] = [
    ("CTRL", "LCTRL", "RCTRL"),
    ("SHIFT", "LSHIFT", "RSHIFT"),
    ("ALT", "LALT", "RALT"),
    ("GUI", "LGUI", "RGUI"),
];

static MODIFIER_TABLE: &[(&str, u8)] = &[
    ("CTRL", 0x11),
    ("SHIFT", 0x22),
    ("ALT", 0x44),
    ("GUI", 0x88),
    ("LCTRL", 0x01),
    ("LSHIFT", 0x02),
    ("LALT", 0x04),
    ("LGUI", 0x08),
    ("RCTRL", 0x10),
    ("RSHIFT", 0x20),
    ("RALT", 0x40),
    ("RGUI", 0x80),
];

/// Looks up a modifier name (`CTRL`, `LSHIFT`, `RGUI`, ...).
pub fn modifier_for(name: &str) -> Option<ModifierMask> {
    MODIFIER_TABLE
        .iter()
        .find(|(token, _)| *token == name)
        .map(|&(_, mask)| ModifierMask(mask))
}

/// Returns the table name whose mask equals `mask` exactly, if any.
pub fn modifier_name_for(mask: ModifierMask) -> Option<&'static str> {
    MODIFIER_TABLE
        .iter()
        .find(|&&(_, value)| value == mask.0)
        .map(|&(token, _)| token)
}

/// `true` when the mask names keys on one side only for every pair.
///
/// `LCTRL` and `RSHIFT | LALT` are side-specific; `CTRL` (both control keys)
/// is not.
pub fn is_side_specific(mask: ModifierMask) -> bool {
    mask.0 & (mask.0 >> 4) & ModifierMask::LEFT == 0
}

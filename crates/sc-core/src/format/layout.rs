//! Binary configuration layout: constants and bit-packed byte types.
//!
//! ```text
//! offset 0: 'S' 'C'            signature
//! offset 2: major, minor       version (1, 1)
//! offset 4: force flags        see ForceFlags
//! offset 5: reserved (0)
//! offset 6..: blocks
//!   [len][flags][scanset?][kbd lo, kbd hi?][body]
//!   layerdef: [count][count × (fn_combo, layer)]
//!   remap:    [layer][count][count × (from, to)]
//!   macro:    [macro_count][records]
//!     record: [key][desired][matched][press count][release count]
//!             [press × (cmd, value)][release × (cmd, value)]
//! ```
//!
//! Three bytes in this layout pack several fields into one `u8`.  Each gets a
//! newtype with named accessors so the rest of the crate never shifts or masks
//! by hand:
//!
//! | byte                | type          | fields |
//! |---------------------|---------------|--------|
//! | header offset 4     | [`ForceFlags`] | bits 0–3 scan set, bits 4–7 protocol |
//! | block offset 1      | [`BlockFlags`] | bits 0–2 kind, bits 3–5 select, bit 6 has scanset, bit 7 has keyboard id |
//! | macro phase counts  | [`PhaseCount`] | bits 0–5 step count, bit 7 restore meta (release only) |

use crate::domain::{BlockKind, Conditions};
use crate::tokens::{Protocol, ScanSet};

// ── Constants ─────────────────────────────────────────────────────────────────

pub const SIGNATURE: [u8; 2] = *b"SC";
pub const VERSION_MAJOR: u8 = 1;
pub const VERSION_MINOR: u8 = 1;

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 6;

/// Largest block, length byte included.
pub const MAX_BLOCK_LEN: usize = 255;

/// Largest entry or macro count in one block.
pub const MAX_ENTRIES: usize = 255;

/// Most steps in one macro phase.
pub const MAX_PHASE_STEPS: usize = 63;

/// Bytes in a macro record before its steps.
pub const MACRO_RECORD_HEADER: usize = 5;

/// Bytes per macro step.
pub const STEP_SIZE: usize = 2;

// ── Force flags ───────────────────────────────────────────────────────────────

/// Header byte 4: scan-set override (low nibble) and protocol override (high nibble).
///
/// Zero in either nibble means "no override".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForceFlags(pub u8);

impl ForceFlags {
    const SCAN_SET_MASK: u8 = 0x0F;
    const PROTOCOL_SHIFT: u8 = 4;

    pub fn from_parts(scan_set: u8, protocol: u8) -> Self {
        ForceFlags((scan_set & Self::SCAN_SET_MASK) | (protocol << Self::PROTOCOL_SHIFT))
    }

    /// Raw scan-set nibble (0 = none, 1–4 = [`ScanSet`]).
    pub fn scan_set_bits(self) -> u8 {
        self.0 & Self::SCAN_SET_MASK
    }

    /// Raw protocol nibble (0 = none, 1 = xt, 2 = at).
    pub fn protocol_bits(self) -> u8 {
        self.0 >> Self::PROTOCOL_SHIFT
    }

    pub fn scan_set(self) -> Option<ScanSet> {
        ScanSet::try_from(self.scan_set_bits()).ok()
    }

    pub fn protocol(self) -> Option<Protocol> {
        Protocol::try_from(self.protocol_bits()).ok()
    }

    pub fn with_scan_set(self, set: ScanSet) -> Self {
        Self::from_parts(set as u8, self.protocol_bits())
    }

    pub fn with_protocol(self, protocol: Protocol) -> Self {
        Self::from_parts(self.scan_set_bits(), protocol as u8)
    }
}

// ── Block flags ───────────────────────────────────────────────────────────────

/// Block byte 1: variant tag, select condition and presence of the optional
/// condition fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockFlags(pub u8);

impl BlockFlags {
    const KIND_MASK: u8 = 0x07;
    const SELECT_SHIFT: u8 = 3;
    const SELECT_MASK: u8 = 0x07;
    const HAS_SCANSET: u8 = 1 << 6;
    const HAS_KEYBOARD: u8 = 1 << 7;

    pub fn from_parts(kind_bits: u8, select: u8, has_scanset: bool, has_keyboard: bool) -> Self {
        let mut raw = (kind_bits & Self::KIND_MASK) | ((select & Self::SELECT_MASK) << Self::SELECT_SHIFT);
        if has_scanset {
            raw |= Self::HAS_SCANSET;
        }
        if has_keyboard {
            raw |= Self::HAS_KEYBOARD;
        }
        BlockFlags(raw)
    }

    /// Flags for a block of `kind` written under `conditions`.
    pub fn for_block(kind: BlockKind, conditions: &Conditions) -> Self {
        Self::from_parts(
            kind as u8,
            conditions.select,
            conditions.scanset != 0,
            conditions.keyboard_id != 0,
        )
    }

    pub fn kind_bits(self) -> u8 {
        self.0 & Self::KIND_MASK
    }

    /// Variant tag, or `None` for the five unassigned values.
    pub fn kind(self) -> Option<BlockKind> {
        BlockKind::try_from(self.kind_bits()).ok()
    }

    /// Select condition 0–7 (0 = any).
    pub fn select(self) -> u8 {
        (self.0 >> Self::SELECT_SHIFT) & Self::SELECT_MASK
    }

    pub fn has_scanset(self) -> bool {
        self.0 & Self::HAS_SCANSET != 0
    }

    pub fn has_keyboard(self) -> bool {
        self.0 & Self::HAS_KEYBOARD != 0
    }

    /// Number of optional condition bytes following the flags byte.
    pub fn condition_len(self) -> usize {
        usize::from(self.has_scanset()) + 2 * usize::from(self.has_keyboard())
    }
}

// ── Macro phase counts ────────────────────────────────────────────────────────

/// Macro record bytes 3 and 4: number of steps in a phase.  On the release
/// phase bit 7 also carries the restore-meta flag.  Bit 6 is unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseCount(pub u8);

impl PhaseCount {
    const COUNT_MASK: u8 = 0x3F;
    const RESTORE_META: u8 = 1 << 7;

    /// Packs a step count and the restore flag.  `None` if `count` exceeds
    /// [`MAX_PHASE_STEPS`].
    pub fn new(count: usize, restore_meta: bool) -> Option<Self> {
        if count > MAX_PHASE_STEPS {
            return None;
        }
        let mut raw = count as u8;
        if restore_meta {
            raw |= Self::RESTORE_META;
        }
        Some(PhaseCount(raw))
    }

    pub fn count(self) -> usize {
        usize::from(self.0 & Self::COUNT_MASK)
    }

    pub fn restore_meta(self) -> bool {
        self.0 & Self::RESTORE_META != 0
    }
}

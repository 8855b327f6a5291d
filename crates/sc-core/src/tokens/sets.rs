//! Scan-set and protocol names used by `force` and `ifset`.

/// Keyboard scan code set, numbered as the converter numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScanSet {
    Set1 = 1,
    Set2 = 2,
    Set3 = 3,
    /// Set 2 with the extended (122-key terminal) layout.
    Set2Ext = 4,
}

impl ScanSet {
    pub const ALL: [ScanSet; 4] = [ScanSet::Set1, ScanSet::Set2, ScanSet::Set3, ScanSet::Set2Ext];

    /// Bit used for this set in an `ifset` condition mask.
    pub fn condition_bit(self) -> u8 {
        1 << (self as u8 - 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            ScanSet::Set1 => "set1",
            ScanSet::Set2 => "set2",
            ScanSet::Set3 => "set3",
            ScanSet::Set2Ext => "set2ext",
        }
    }
}

impl TryFrom<u8> for ScanSet {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            1 => Ok(ScanSet::Set1),
            2 => Ok(ScanSet::Set2),
            3 => Ok(ScanSet::Set3),
            4 => Ok(ScanSet::Set2Ext),
            _ => Err(()),
        }
    }
}

/// Keyboard protocol override for `force`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Protocol {
    Xt = 1,
    At = 2,
}

impl Protocol {
    pub fn name(self) -> &'static str {
        match self {
            Protocol::Xt => "xt",
            Protocol::At => "at",
        }
    }
}

impl TryFrom<u8> for Protocol {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            1 => Ok(Protocol::Xt),
            2 => Ok(Protocol::At),
            _ => Err(()),
        }
    }
}

pub fn scan_set_for(name: &str) -> Option<ScanSet> {
    ScanSet::ALL.into_iter().find(|set| set.name() == name)
}

pub fn protocol_for(name: &str) -> Option<Protocol> {
    [Protocol::Xt, Protocol::At]
        .into_iter()
        .find(|protocol| protocol.name() == name)
}

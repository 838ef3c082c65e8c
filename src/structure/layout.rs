// Mon Oct 19 2026 - Alex

use crate::schema::DefId;
use crate::structure::ClassAlignment;
use std::fmt;

pub const VTABLE_SLOT_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEntry {
    VTable {
        offset: usize,
    },
    Padding {
        offset: usize,
        size: usize,
    },
    Member {
        index: usize,
        offset: usize,
        size: usize,
        alignment: Option<usize>,
    },
    /// One field of a bitfield run. Every field of a run shares the run's
    /// `byte_offset` and `storage` width.
    Bitfield {
        index: usize,
        byte_offset: usize,
        bit_offset: usize,
        bits: u32,
        storage: usize,
    },
}

impl LayoutEntry {
    pub fn member_index(&self) -> Option<usize> {
        match self {
            Self::Member { index, .. } | Self::Bitfield { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Non-fatal contradiction found while walking a class. The walk continues
/// with the declared offset taken as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutDiagnostic {
    InvalidOffset {
        member: String,
        declared: usize,
        reached: usize,
        previous_alignment: Option<usize>,
        alignment: Option<usize>,
    },
}

impl fmt::Display for LayoutDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOffset { member, declared, reached, previous_alignment, alignment } => write!(
                f,
                "INVALID OFFSET: {} at {}, already reached {} (previous alignment: {}, alignment: {})",
                member,
                declared,
                reached,
                previous_alignment.unwrap_or(0),
                alignment.unwrap_or(0)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLayout {
    pub def: DefId,
    pub name: String,
    pub size: usize,
    pub alignment: ClassAlignment,
    pub entries: Vec<LayoutEntry>,
    pub diagnostics: Vec<LayoutDiagnostic>,
}

impl ClassLayout {
    pub fn new(def: DefId, name: &str, size: usize, alignment: ClassAlignment) -> Self {
        Self {
            def,
            name: name.to_string(),
            size,
            alignment,
            entries: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_packed(&self) -> bool {
        self.alignment.is_packed()
    }

    pub fn has_vtable(&self) -> bool {
        self.entries.iter().any(|e| matches!(e, LayoutEntry::VTable { .. }))
    }

    /// `(member index, byte offset)` in declaration order.
    pub fn member_offsets(&self) -> Vec<(usize, usize)> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                LayoutEntry::Member { index, offset, .. } => Some((*index, *offset)),
                LayoutEntry::Bitfield { index, byte_offset, .. } => Some((*index, *byte_offset)),
                _ => None,
            })
            .collect()
    }

    /// `(offset, size)` of every padding span.
    pub fn padding(&self) -> Vec<(usize, usize)> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                LayoutEntry::Padding { offset, size } => Some((*offset, *size)),
                _ => None,
            })
            .collect()
    }

    pub fn total_padding(&self) -> usize {
        self.padding().iter().map(|(_, size)| size).sum()
    }

    pub fn is_consistent(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl fmt::Display for ClassLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "class {} {{", self.name)?;
        writeln!(f, "  // Size: 0x{:X} ({} bytes)", self.size, self.size)?;
        writeln!(f, "  // Alignment: {}", self.alignment)?;
        for entry in &self.entries {
            match entry {
                LayoutEntry::VTable { offset } => writeln!(f, "  vtable @ 0x{:X}", offset)?,
                LayoutEntry::Padding { offset, size } => writeln!(f, "  pad @ 0x{:X} ({} bytes)", offset, size)?,
                LayoutEntry::Member { index, offset, size, .. } => {
                    writeln!(f, "  member #{} @ 0x{:X} ({} bytes)", index, offset, size)?
                }
                LayoutEntry::Bitfield { index, byte_offset, bit_offset, bits, .. } => {
                    writeln!(f, "  bitfield #{} @ 0x{:X}:{} ({} bits)", index, byte_offset, bit_offset, bits)?
                }
            }
        }
        for diagnostic in &self.diagnostics {
            writeln!(f, "  // {}", diagnostic)?;
        }
        writeln!(f, "}}")
    }
}

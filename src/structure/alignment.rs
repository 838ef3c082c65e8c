// Mon Oct 19 2026 - Alex

use std::fmt;

/// Rounds `value` up to `alignment`. Zero alignment leaves it untouched.
pub fn align_value(value: usize, alignment: usize) -> usize {
    if alignment == 0 {
        return value;
    }
    (value + alignment - 1) & !(alignment - 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassAlignment {
    /// Regular alignment, either declared by the dump or computed.
    Natural(usize),
    /// The natural alignment would misstate the declared size, so the class
    /// is byte-packed at this smaller power of two.
    Packed(usize),
    /// Synthetic scopes and definitions without any alignment information.
    Unknown,
}

impl ClassAlignment {
    /// Alignment this class imposes on whatever embeds it. Packed classes
    /// impose none.
    pub fn natural(self) -> Option<usize> {
        match self {
            Self::Natural(value) => Some(value),
            _ => None,
        }
    }

    pub fn value(self) -> Option<usize> {
        match self {
            Self::Natural(value) | Self::Packed(value) => Some(value),
            Self::Unknown => None,
        }
    }

    pub fn is_packed(self) -> bool {
        matches!(self, Self::Packed(_))
    }
}

impl fmt::Display for ClassAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural(value) => write!(f, "{}", value),
            Self::Packed(value) => write!(f, "packed({})", value),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Largest power of two below `alignment` that divides `size`, searched
/// downward by halving. Ends at 1.
pub fn packed_alignment_for(size: usize, alignment: usize) -> usize {
    let mut packed = alignment.max(1);
    while packed > 1 {
        packed /= 2;
        if align_value(size, packed) == size {
            break;
        }
    }
    packed
}

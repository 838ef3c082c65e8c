// Mon Oct 19 2026 - Alex

use indexmap::IndexMap;
use std::fmt;

/// Per-name resolution state. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ResolutionStatus {
    #[default]
    Unprocessed,
    Declared,
    Defined,
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unprocessed => write!(f, "unprocessed"),
            Self::Declared => write!(f, "declared"),
            Self::Defined => write!(f, "defined"),
        }
    }
}

/// Status of every name a session touched, in first-touch order.
#[derive(Debug, Clone, Default)]
pub struct StatusMap {
    entries: IndexMap<String, ResolutionStatus>,
}

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> ResolutionStatus {
        self.entries.get(name).copied().unwrap_or_default()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.get(name) >= ResolutionStatus::Declared
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.get(name) == ResolutionStatus::Defined
    }

    /// Moves `name` to `status` if that is a step forward. Returns whether
    /// anything changed.
    pub fn advance(&mut self, name: &str, status: ResolutionStatus) -> bool {
        let entry = self.entries.entry(name.to_string()).or_default();
        if status > *entry {
            *entry = status;
            true
        } else {
            false
        }
    }

    pub fn declare(&mut self, name: &str) -> bool {
        self.advance(name, ResolutionStatus::Declared)
    }

    pub fn define(&mut self, name: &str) -> bool {
        self.advance(name, ResolutionStatus::Defined)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ResolutionStatus)> {
        self.entries.iter().map(|(name, status)| (name.as_str(), *status))
    }

    pub fn count(&self, status: ResolutionStatus) -> usize {
        self.entries.values().filter(|s| **s == status).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Mon Oct 19 2026 - Alex

use crate::schema::{DefId, Subtype};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub name: String,
    pub value: Option<String>,
}

impl MetaTag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Display for MetaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} = {}", self.name, value),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A data member of a class. Bitfield members carry offset 0 and are
/// positioned relative to the members around them.
#[derive(Debug, Clone)]
pub struct ClassMember {
    pub name: String,
    pub offset: usize,
    pub subtype: Subtype,
    pub metatags: Vec<MetaTag>,
    pub flags: Vec<String>,
}

impl ClassMember {
    pub fn new(name: &str, offset: usize, subtype: Subtype) -> Self {
        Self {
            name: name.to_string(),
            offset,
            subtype,
            metatags: Vec::new(),
            flags: Vec::new(),
        }
    }

    pub fn with_metatag(mut self, tag: MetaTag) -> Self {
        self.metatags.push(tag);
        self
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Part of a relatively positioned bitfield run.
    pub fn is_relative_bitfield(&self) -> bool {
        self.subtype.is_bitfield() && self.offset == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumField {
    pub name: String,
    pub value: i64,
    pub metatags: Vec<MetaTag>,
}

impl EnumField {
    pub fn new(name: &str, value: i64) -> Self {
        Self {
            name: name.to_string(),
            value,
            metatags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseClass {
    pub def: DefId,
    pub offset: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metatag_display() {
        assert_eq!(MetaTag::new("MNetworkEnable").to_string(), "MNetworkEnable");
        assert_eq!(
            MetaTag::new("MPropertyFriendlyName").with_value("Health").to_string(),
            "MPropertyFriendlyName = Health"
        );
    }

    #[test]
    fn test_relative_bitfield() {
        let member = ClassMember::new("m_bFlag", 0, Subtype::Bitfield { bits: 1 });
        assert!(member.is_relative_bitfield());

        let placed = ClassMember::new("m_bFlag", 4, Subtype::Bitfield { bits: 1 });
        assert!(!placed.is_relative_bitfield());
    }
}

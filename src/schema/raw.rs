// Mon Oct 19 2026 - Alex

//! Serde mirror of the JSON dump. Kept separate from the graph so that the
//! two-pass index resolution in [`crate::schema::graph`] works on plain data.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSchema {
    #[serde(default)]
    pub defs: Vec<RawDefinition>,
    #[serde(default)]
    pub dump_flags: Vec<String>,
    #[serde(default)]
    pub pulse_bindings: Vec<RawDomain>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDefinition {
    pub name: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub project: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: i64,
    pub alignment: i64,
    #[serde(default)]
    pub traits: RawTraits,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTraits {
    pub flags: Option<Vec<String>>,
    pub metatags: Option<Vec<RawMetaTag>>,
    pub fields: Option<Vec<RawEnumField>>,
    pub members: Option<Vec<RawMember>>,
    pub subtype: Option<serde_json::Value>,
    pub child_class_idx: Option<Vec<i64>>,
    pub parent_class_idx: Option<i64>,
    pub multi_depth: Option<i64>,
    pub single_depth: Option<i64>,
    pub baseclasses: Option<Vec<RawBaseClass>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMetaTag {
    pub name: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEnumField {
    pub name: String,
    pub value: i64,
    #[serde(default)]
    pub traits: RawTraits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMember {
    pub name: String,
    pub offset: i64,
    #[serde(default)]
    pub traits: RawTraits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBaseClass {
    pub ref_idx: i64,
    pub offset: i64,
}

/// Subtype payloads are decoded lazily from [`serde_json::Value`] so that an
/// unknown `type` discriminator can be reported by name.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawSubtype {
    Ref {
        ref_idx: i64,
    },
    FixedArray {
        subtype: Box<serde_json::Value>,
        count: i64,
        element_size: i64,
    },
    Atomic {
        name: String,
        size: i64,
        alignment: i64,
        #[serde(default)]
        template: Option<Vec<serde_json::Value>>,
    },
    Ptr {
        subtype: Box<serde_json::Value>,
    },
    Bitfield {
        count: i64,
    },
    Literal {
        value: i64,
    },
}

pub const SUBTYPE_TAGS: &[&str] = &["ref", "fixed_array", "atomic", "ptr", "bitfield", "literal"];

#[derive(Debug, Clone, Deserialize)]
pub struct RawDomain {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub friendly_name: String,
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub cpp_scopes: Vec<RawDomainScope>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDomainScope {
    pub name: String,
    #[serde(default)]
    pub functions: Vec<RawDomainFunction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDomainFunction {
    pub name: String,
    pub library_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: Vec<RawDomainParam>,
    #[serde(default)]
    pub rets: Vec<RawDomainParam>,
    #[serde(default)]
    pub traits: RawPulseTraits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDomainParam {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub traits: RawPulseTraits,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPulseTraits {
    pub metatags: Option<Vec<RawMetaTag>>,
}

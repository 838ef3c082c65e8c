// Mon Oct 19 2026 - Alex

use crate::schema::{BaseClass, ClassMember, EnumField, MetaTag, SchemaError, SchemaResult};
use std::fmt;
use std::str::FromStr;

pub const SCOPE_SEPARATOR: &str = "::";

/// Alignment value the dumper writes when it could not determine one.
pub const UNKNOWN_ALIGNMENT: i64 = 255;

pub const FLAG_HAS_VIRTUAL_MEMBERS: &str = "has_virtual_members";

/// Index of a definition inside the [`crate::schema::TypeGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub(crate) usize);

impl DefId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Enum,
    Builtin,
}

impl FromStr for TypeKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(Self::Class),
            "enum" => Ok(Self::Enum),
            "builtin" => Ok(Self::Builtin),
            other => Err(SchemaError::UnknownObjectType(other.to_string())),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => f.write_str("class"),
            Self::Enum => f.write_str("enum"),
            Self::Builtin => f.write_str("builtin"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassTraits {
    pub members: Vec<ClassMember>,
    pub base_classes: Vec<BaseClass>,
    pub children: Vec<DefId>,
    pub parent: Option<DefId>,
    pub multi_depth: Option<i64>,
    pub single_depth: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct EnumTraits {
    pub fields: Vec<EnumField>,
    pub children: Vec<DefId>,
    pub parent: Option<DefId>,
}

#[derive(Debug, Clone)]
pub enum DefinitionTraits {
    Class(ClassTraits),
    Enum(EnumTraits),
    Builtin,
}

#[derive(Debug, Clone)]
pub struct ObjectDefinition {
    pub name: String,
    pub scope: String,
    pub project: String,
    pub size: usize,
    /// `None` when the dump carried the unknown sentinel.
    pub alignment: Option<usize>,
    pub flags: Vec<String>,
    pub metatags: Vec<MetaTag>,
    pub traits: DefinitionTraits,
    synthetic: bool,
}

impl ObjectDefinition {
    pub fn new(name: &str, kind: TypeKind, size: usize, alignment: Option<usize>) -> Self {
        let traits = match kind {
            TypeKind::Class => DefinitionTraits::Class(ClassTraits::default()),
            TypeKind::Enum => DefinitionTraits::Enum(EnumTraits::default()),
            TypeKind::Builtin => DefinitionTraits::Builtin,
        };
        Self {
            name: name.to_string(),
            scope: String::new(),
            project: String::new(),
            size,
            alignment,
            flags: Vec::new(),
            metatags: Vec::new(),
            traits,
            synthetic: false,
        }
    }

    /// Placeholder for a parent scope the dump omitted. It has no size or
    /// alignment and only carries nested children.
    pub fn synthetic(name: &str) -> Self {
        let mut def = Self::new(name, TypeKind::Class, 0, None);
        def.synthetic = true;
        def
    }

    pub fn kind(&self) -> TypeKind {
        match self.traits {
            DefinitionTraits::Class(_) => TypeKind::Class,
            DefinitionTraits::Enum(_) => TypeKind::Enum,
            DefinitionTraits::Builtin => TypeKind::Builtin,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Root definitions have no scope separator in their name and are the
    /// only ones that can be declared or defined on their own.
    pub fn is_root(&self) -> bool {
        !self.name.contains(SCOPE_SEPARATOR)
    }

    /// Last segment of the scoped name.
    pub fn scoped_name(&self) -> &str {
        self.name.rsplit(SCOPE_SEPARATOR).next().unwrap_or(&self.name)
    }

    /// Second-to-last segment of the scoped name, if any.
    pub fn parent_scope_name(&self) -> Option<&str> {
        let segments: Vec<&str> = self.name.split(SCOPE_SEPARATOR).collect();
        if segments.len() < 2 {
            return None;
        }
        Some(segments[segments.len() - 2])
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    pub fn has_virtual_members(&self) -> bool {
        self.has_flag(FLAG_HAS_VIRTUAL_MEMBERS)
    }

    pub fn parent(&self) -> Option<DefId> {
        match &self.traits {
            DefinitionTraits::Class(c) => c.parent,
            DefinitionTraits::Enum(e) => e.parent,
            DefinitionTraits::Builtin => None,
        }
    }

    pub fn children(&self) -> &[DefId] {
        match &self.traits {
            DefinitionTraits::Class(c) => &c.children,
            DefinitionTraits::Enum(e) => &e.children,
            DefinitionTraits::Builtin => &[],
        }
    }

    pub fn class_traits(&self) -> SchemaResult<&ClassTraits> {
        match &self.traits {
            DefinitionTraits::Class(c) => Ok(c),
            _ => Err(SchemaError::NotAClass(self.name.clone())),
        }
    }

    pub fn members(&self) -> SchemaResult<&[ClassMember]> {
        Ok(&self.class_traits()?.members)
    }

    pub fn base_classes(&self) -> SchemaResult<&[BaseClass]> {
        Ok(&self.class_traits()?.base_classes)
    }

    pub fn fields(&self) -> SchemaResult<&[EnumField]> {
        match &self.traits {
            DefinitionTraits::Enum(e) => Ok(&e.fields),
            _ => Err(SchemaError::NotAnEnum(self.name.clone())),
        }
    }

    pub(crate) fn set_parent(&mut self, parent: DefId) {
        match &mut self.traits {
            DefinitionTraits::Class(c) => c.parent = Some(parent),
            DefinitionTraits::Enum(e) => e.parent = Some(parent),
            DefinitionTraits::Builtin => {}
        }
    }

    pub(crate) fn push_child(&mut self, child: DefId) {
        match &mut self.traits {
            DefinitionTraits::Class(c) => c.children.push(child),
            DefinitionTraits::Enum(e) => e.children.push(child),
            DefinitionTraits::Builtin => {}
        }
    }
}

impl fmt::Display for ObjectDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.name)?;
        if self.synthetic {
            write!(f, " [synthetic]")
        } else {
            write!(f, " [size: {}]", self.size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_names() {
        let def = ObjectDefinition::new("CBodyComponent::NetworkVar_m_sceneNode", TypeKind::Class, 8, Some(8));
        assert!(!def.is_root());
        assert_eq!(def.scoped_name(), "NetworkVar_m_sceneNode");
        assert_eq!(def.parent_scope_name(), Some("CBodyComponent"));

        let root = ObjectDefinition::new("CBodyComponent", TypeKind::Class, 64, Some(8));
        assert!(root.is_root());
        assert_eq!(root.scoped_name(), "CBodyComponent");
        assert_eq!(root.parent_scope_name(), None);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("enum".parse::<TypeKind>().unwrap(), TypeKind::Enum);
        assert!(matches!("union".parse::<TypeKind>(), Err(SchemaError::UnknownObjectType(_))));
    }

    #[test]
    fn test_kind_accessors() {
        let def = ObjectDefinition::new("EState", TypeKind::Enum, 4, Some(4));
        assert!(def.fields().is_ok());
        assert!(matches!(def.members(), Err(SchemaError::NotAClass(_))));

        let synth = ObjectDefinition::synthetic("Outer");
        assert!(synth.is_synthetic());
        assert_eq!(synth.kind(), TypeKind::Class);
        assert!(synth.members().unwrap().is_empty());
    }
}

// Mon Oct 19 2026 - Alex

use crate::schema::{AtomicId, DefId, EnumField, SchemaError, TypeGraph};
use crate::structure::{ClassAlignment, ClassLayout, ConsistencyCheck, LayoutDiagnostic};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Unsupported enum size {size} for {name}")]
    UnsupportedEnumSize { name: String, size: usize },
    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Writer(String),
}

pub type EmitResult<T> = Result<T, EmitError>;

/// A fully laid out class handed to [`EmissionPlan::define_class`].
/// Synthetic scopes carry no layout, only their children.
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    pub id: DefId,
    pub name: String,
    pub alignment: ClassAlignment,
    pub layout: Option<ClassLayout>,
    pub bases: Vec<DefId>,
    pub children: Vec<NestedDefinition>,
    pub checks: Vec<ConsistencyCheck>,
}

impl ClassDefinition {
    pub fn is_synthetic(&self) -> bool {
        self.layout.is_none()
    }

    pub fn diagnostics(&self) -> &[LayoutDiagnostic] {
        self.layout.as_ref().map(|l| l.diagnostics.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Clone)]
pub enum NestedDefinition {
    Class(ClassDefinition),
    Enum(EnumDefinition),
}

impl NestedDefinition {
    pub fn name(&self) -> &str {
        match self {
            Self::Class(class) => &class.name,
            Self::Enum(enumeration) => &enumeration.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnumDefinition {
    pub id: DefId,
    pub name: String,
    pub size: usize,
    pub fields: Vec<EnumField>,
    pub signed: bool,
    pub checks: Vec<ConsistencyCheck>,
}

impl EnumDefinition {
    pub fn new(id: DefId, name: &str, size: usize, fields: Vec<EnumField>) -> Self {
        let signed = fields.iter().any(|f| f.value < 0);
        Self {
            id,
            name: name.to_string(),
            size,
            fields,
            signed,
            checks: Vec::new(),
        }
    }

    pub fn with_checks(mut self, checks: Vec<ConsistencyCheck>) -> Self {
        self.checks = checks;
        self
    }

    /// Heuristic for flag enums: the first value above 2 must be a single
    /// bit, and the enum must reach past 2 at all.
    pub fn is_bitflags(&self) -> bool {
        let mut max_reached = 0;
        for field in &self.fields {
            max_reached = field.value;
            if field.value <= 2 {
                continue;
            }
            if field.value.count_ones() >= 2 {
                return false;
            }
            break;
        }
        max_reached > 2
    }

    pub fn underlying_type(&self) -> EmitResult<&'static str> {
        underlying_int(self.size, self.signed).ok_or_else(|| EmitError::UnsupportedEnumSize {
            name: self.name.clone(),
            size: self.size,
        })
    }
}

pub fn underlying_int(size: usize, signed: bool) -> Option<&'static str> {
    let name = match (size, signed) {
        (1, true) => "int8",
        (1, false) => "uint8",
        (2, true) => "int16",
        (2, false) => "uint16",
        (4, true) => "int32",
        (4, false) => "uint32",
        (8, true) => "int64",
        (8, false) => "uint64",
        _ => return None,
    };
    Some(name)
}

/// Non-fatal findings collected during a resolution session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    AtomicCollision {
        original: String,
        renamed: String,
        size: usize,
        defined_size: usize,
    },
    Layout {
        class: String,
        diagnostic: LayoutDiagnostic,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtomicCollision { original, renamed, size, defined_size } => write!(
                f,
                "Found invalid sized atomic: {} (new: {}, defined: {}), redefining as: {}",
                original, size, defined_size, renamed
            ),
            Self::Layout { class, diagnostic } => write!(f, "{}: {}", class, diagnostic),
        }
    }
}

/// The six operations a resolution session drives, in dependency order.
/// Every declare/define for a given name is invoked at most once.
pub trait EmissionPlan {
    fn declare_class(&mut self, graph: &TypeGraph, id: DefId, alignment: ClassAlignment) -> EmitResult<()>;

    fn define_class(&mut self, graph: &TypeGraph, class: &ClassDefinition) -> EmitResult<()>;

    fn declare_enum(&mut self, graph: &TypeGraph, enumeration: &EnumDefinition) -> EmitResult<()>;

    fn define_enum(&mut self, graph: &TypeGraph, enumeration: &EnumDefinition) -> EmitResult<()>;

    fn declare_atomic(&mut self, graph: &TypeGraph, id: AtomicId) -> EmitResult<()>;

    fn define_atomic(&mut self, graph: &TypeGraph, id: AtomicId) -> EmitResult<()>;

    /// Checks for a type supplied externally. Nothing else is emitted for it.
    fn override_checks(&mut self, _graph: &TypeGraph, _id: DefId, _checks: &[ConsistencyCheck]) -> EmitResult<()> {
        Ok(())
    }

    /// SDK hashtable support for a key type the SDK cannot hash itself.
    fn hash_specialization(&mut self, _key: &str) -> EmitResult<()> {
        Ok(())
    }

    fn diagnostic(&mut self, _diagnostic: &Diagnostic) -> EmitResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enum_of(values: &[i64]) -> EnumDefinition {
        let fields = values
            .iter()
            .enumerate()
            .map(|(i, v)| EnumField::new(&format!("F{}", i), *v))
            .collect();
        EnumDefinition::new(DefId(0), "ETest", 4, fields)
    }

    #[test]
    fn test_bitflags_heuristic() {
        assert!(enum_of(&[0, 1, 2, 4, 8]).is_bitflags());
        assert!(!enum_of(&[0, 1, 2, 3, 4]).is_bitflags());
        assert!(!enum_of(&[0, 1, 2]).is_bitflags());
        assert!(enum_of(&[1, 16, 3]).is_bitflags());
    }

    #[test]
    fn test_underlying_type() {
        assert_eq!(enum_of(&[0, 1]).underlying_type().unwrap(), "uint32");
        assert_eq!(enum_of(&[-1, 1]).underlying_type().unwrap(), "int32");

        let mut odd = enum_of(&[0]);
        odd.size = 3;
        assert!(matches!(odd.underlying_type(), Err(EmitError::UnsupportedEnumSize { size: 3, .. })));
    }
}

// Mon Oct 19 2026 - Alex

use crate::schema::{DefId, SchemaResult, TypeGraph};
use crate::structure::{align_value, LayoutResolver};
use std::fmt;

/// A compile-time assertion an emitter may render to catch drift between
/// the dump and the generated (or externally supplied) definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyCheck {
    /// The declared alignment cannot produce the declared size.
    AlignmentMismatch { alignment: usize, size: usize, aligned_size: usize },
    Size(usize),
    Alignment(usize),
    MemberOffset { member: String, offset: usize },
    EnumValue { field: String, value: i64 },
    EnumSize { size: usize, signed: bool },
}

impl fmt::Display for ConsistencyCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlignmentMismatch { alignment, size, aligned_size } => {
                write!(f, "alignment {} does not match size ({} vs {})", alignment, size, aligned_size)
            }
            Self::Size(size) => write!(f, "sizeof == {}", size),
            Self::Alignment(alignment) => write!(f, "alignof == {}", alignment),
            Self::MemberOffset { member, offset } => write!(f, "offsetof({}) == {}", member, offset),
            Self::EnumValue { field, value } => write!(f, "{} == {}", field, value),
            Self::EnumSize { size, signed } => {
                write!(f, "sizeof == {} ({})", size, if *signed { "signed" } else { "unsigned" })
            }
        }
    }
}

pub fn class_checks(resolver: &mut LayoutResolver, graph: &TypeGraph, id: DefId) -> SchemaResult<Vec<ConsistencyCheck>> {
    let def = graph.def(id);
    let mut checks = Vec::new();
    if def.is_synthetic() {
        return Ok(checks);
    }

    let alignment = resolver.alignment_of(graph, id)?;
    if let Some(natural) = alignment.natural() {
        let aligned_size = align_value(def.size, natural);
        if aligned_size != def.size {
            checks.push(ConsistencyCheck::AlignmentMismatch {
                alignment: natural,
                size: def.size,
                aligned_size,
            });
        }
    }

    if def.size > 0 {
        checks.push(ConsistencyCheck::Size(def.size));
    }

    if let Some(declared) = def.alignment {
        checks.push(ConsistencyCheck::Alignment(declared));
    }

    for member in def.members()? {
        if !member.subtype.is_bitfield() {
            checks.push(ConsistencyCheck::MemberOffset {
                member: member.name.clone(),
                offset: member.offset,
            });
        }
    }

    Ok(checks)
}

pub fn enum_checks(graph: &TypeGraph, id: DefId) -> SchemaResult<Vec<ConsistencyCheck>> {
    let def = graph.def(id);
    let fields = def.fields()?;

    let mut checks: Vec<ConsistencyCheck> = fields
        .iter()
        .map(|f| ConsistencyCheck::EnumValue {
            field: f.name.clone(),
            value: f.value,
        })
        .collect();
    checks.push(ConsistencyCheck::EnumSize {
        size: def.size,
        signed: fields.iter().any(|f| f.value < 0),
    });

    Ok(checks)
}

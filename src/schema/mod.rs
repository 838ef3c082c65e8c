// Mon Oct 19 2026 - Alex

pub mod definition;
pub mod error;
pub mod file;
pub mod graph;
pub mod member;
pub mod pulse;
pub mod raw;
pub mod subtype;

pub use definition::{
    ClassTraits, DefId, DefinitionTraits, EnumTraits, ObjectDefinition, TypeKind, FLAG_HAS_VIRTUAL_MEMBERS,
    SCOPE_SEPARATOR, UNKNOWN_ALIGNMENT,
};
pub use error::{SchemaError, SchemaResult};
pub use file::{locate_input, SchemaFile};
pub use graph::TypeGraph;
pub use member::{BaseClass, ClassMember, EnumField, MetaTag};
pub use pulse::{Domain, DomainFunction, DomainParam, DomainScope};
pub use subtype::{
    Atomic, AtomicId, DepTarget, Dependency, Subtype, TemplateArg, TemplateParamKind, POINTER_ALIGNMENT,
    POINTER_SIZE,
};

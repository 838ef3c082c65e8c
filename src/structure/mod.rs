// Mon Oct 19 2026 - Alex

pub mod alignment;
pub mod cache;
pub mod checks;
pub mod layout;
pub mod resolver;

pub use alignment::{align_value, packed_alignment_for, ClassAlignment};
pub use cache::LayoutCache;
pub use checks::{class_checks, enum_checks, ConsistencyCheck};
pub use layout::{ClassLayout, LayoutDiagnostic, LayoutEntry, VTABLE_SLOT_SIZE};
pub use resolver::LayoutResolver;

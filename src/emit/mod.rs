// Mon Oct 19 2026 - Alex

pub mod cpp;
pub mod defs;
pub mod plan;
pub mod pulse;
pub mod recorder;
pub mod writer;

pub use cpp::CppWriter;
pub use defs::CppDefsWriter;
pub use plan::{
    underlying_int, ClassDefinition, Diagnostic, EmissionPlan, EmitError, EmitResult, EnumDefinition, NestedDefinition,
};
pub use pulse::PulseBindingWriter;
pub use recorder::{EmitEvent, PlanRecorder};
pub use writer::SourceWriter;

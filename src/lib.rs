// Mon Oct 19 2026 - Alex

pub mod config;
pub mod emit;
pub mod resolve;
pub mod schema;
pub mod structure;
pub mod ui;
pub mod utils;

pub use config::{GenerateFlags, GeneratorConfig};
pub use emit::{CppDefsWriter, CppWriter, EmissionPlan, PlanRecorder, PulseBindingWriter};
pub use resolve::ResolutionSession;
pub use schema::{SchemaFile, TypeGraph};
pub use structure::LayoutResolver;

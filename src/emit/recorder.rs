// Mon Oct 19 2026 - Alex

use crate::emit::plan::{ClassDefinition, Diagnostic, EmissionPlan, EmitResult, EnumDefinition, NestedDefinition};
use crate::schema::{AtomicId, DefId, TypeGraph};
use crate::structure::{ClassAlignment, ConsistencyCheck};
use serde::Serialize;

/// One recorded call into an [`EmissionPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EmitEvent {
    DeclareClass {
        name: String,
        alignment: Option<usize>,
    },
    DefineClass {
        name: String,
        synthetic: bool,
        size: usize,
        alignment: String,
        bases: Vec<String>,
        children: Vec<String>,
        padding: Vec<(usize, usize)>,
        diagnostics: Vec<String>,
        checks: usize,
    },
    DeclareEnum {
        name: String,
    },
    DefineEnum {
        name: String,
        signed: bool,
        fields: usize,
    },
    DeclareAtomic {
        name: String,
    },
    DefineAtomic {
        name: String,
        size: usize,
    },
    OverrideChecks {
        name: String,
        checks: Vec<String>,
    },
    HashSpecialization {
        key: String,
    },
    Diagnostic {
        message: String,
    },
}

impl EmitEvent {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::DeclareClass { name, .. }
            | Self::DefineClass { name, .. }
            | Self::DeclareEnum { name }
            | Self::DefineEnum { name, .. }
            | Self::DeclareAtomic { name }
            | Self::DefineAtomic { name, .. }
            | Self::OverrideChecks { name, .. } => Some(name),
            Self::HashSpecialization { .. } | Self::Diagnostic { .. } => None,
        }
    }

    pub fn is_declare(&self) -> bool {
        matches!(self, Self::DeclareClass { .. } | Self::DeclareEnum { .. } | Self::DeclareAtomic { .. })
    }

    pub fn is_define(&self) -> bool {
        matches!(self, Self::DefineClass { .. } | Self::DefineEnum { .. } | Self::DefineAtomic { .. })
    }
}

/// Emission plan that keeps every call in order instead of writing text.
#[derive(Debug, Default)]
pub struct PlanRecorder {
    events: Vec<EmitEvent>,
}

impl PlanRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[EmitEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<EmitEvent> {
        self.events
    }

    /// Index of the first define event for `name`.
    pub fn define_position(&self, name: &str) -> Option<usize> {
        self.events.iter().position(|e| e.is_define() && e.name() == Some(name))
    }

    pub fn declare_position(&self, name: &str) -> Option<usize> {
        self.events.iter().position(|e| e.is_declare() && e.name() == Some(name))
    }

    pub fn defined_names(&self) -> Vec<&str> {
        self.events.iter().filter(|e| e.is_define()).filter_map(|e| e.name()).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EmissionPlan for PlanRecorder {
    fn declare_class(&mut self, graph: &TypeGraph, id: DefId, alignment: ClassAlignment) -> EmitResult<()> {
        self.events.push(EmitEvent::DeclareClass {
            name: graph.def(id).name.clone(),
            alignment: alignment.natural(),
        });
        Ok(())
    }

    fn define_class(&mut self, graph: &TypeGraph, class: &ClassDefinition) -> EmitResult<()> {
        let def = graph.def(class.id);
        self.events.push(EmitEvent::DefineClass {
            name: class.name.clone(),
            synthetic: class.is_synthetic(),
            size: def.size,
            alignment: class.alignment.to_string(),
            bases: class.bases.iter().map(|b| graph.def(*b).name.clone()).collect(),
            children: class.children.iter().map(|c| c.name().to_string()).collect(),
            padding: class.layout.as_ref().map(|l| l.padding()).unwrap_or_default(),
            diagnostics: class.diagnostics().iter().map(|d| d.to_string()).collect(),
            checks: count_checks(class),
        });
        Ok(())
    }

    fn declare_enum(&mut self, _graph: &TypeGraph, enumeration: &EnumDefinition) -> EmitResult<()> {
        self.events.push(EmitEvent::DeclareEnum {
            name: enumeration.name.clone(),
        });
        Ok(())
    }

    fn define_enum(&mut self, _graph: &TypeGraph, enumeration: &EnumDefinition) -> EmitResult<()> {
        self.events.push(EmitEvent::DefineEnum {
            name: enumeration.name.clone(),
            signed: enumeration.signed,
            fields: enumeration.fields.len(),
        });
        Ok(())
    }

    fn declare_atomic(&mut self, graph: &TypeGraph, id: AtomicId) -> EmitResult<()> {
        self.events.push(EmitEvent::DeclareAtomic {
            name: graph.atomic(id).render(graph, None),
        });
        Ok(())
    }

    fn define_atomic(&mut self, graph: &TypeGraph, id: AtomicId) -> EmitResult<()> {
        let atomic = graph.atomic(id);
        self.events.push(EmitEvent::DefineAtomic {
            name: atomic.render(graph, None),
            size: atomic.size,
        });
        Ok(())
    }

    fn override_checks(&mut self, graph: &TypeGraph, id: DefId, checks: &[ConsistencyCheck]) -> EmitResult<()> {
        self.events.push(EmitEvent::OverrideChecks {
            name: graph.def(id).name.clone(),
            checks: checks.iter().map(|c| c.to_string()).collect(),
        });
        Ok(())
    }

    fn hash_specialization(&mut self, key: &str) -> EmitResult<()> {
        self.events.push(EmitEvent::HashSpecialization { key: key.to_string() });
        Ok(())
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) -> EmitResult<()> {
        self.events.push(EmitEvent::Diagnostic {
            message: diagnostic.to_string(),
        });
        Ok(())
    }
}

fn count_checks(class: &ClassDefinition) -> usize {
    class.checks.len()
        + class
            .children
            .iter()
            .map(|child| match child {
                NestedDefinition::Class(nested) => count_checks(nested),
                NestedDefinition::Enum(nested) => nested.checks.len(),
            })
            .sum::<usize>()
}

// Mon Oct 19 2026 - Alex

use crate::config::{GenerateFlags, GeneratorConfig};
use crate::emit::{ClassDefinition, Diagnostic, EmissionPlan, EmitResult, EnumDefinition, NestedDefinition};
use crate::resolve::atomic::{disambiguated_name, AtomicRegistry};
use crate::resolve::child_order::order_children;
use crate::resolve::{OverrideSet, StatusMap};
use crate::schema::{AtomicId, DefId, DepTarget, Dependency, SchemaError, SchemaResult, Subtype, TypeGraph, TypeKind};
use crate::structure::{class_checks, enum_checks, LayoutResolver};
use std::collections::HashSet;

// SDK containers whose template arguments must be complete types
const SDK_COMPLETE_ARGUMENT_CONTAINERS: &[&str] = &["CUtlLeanVector", "CUtlVectorFixedGrowable"];
const SDK_HASHTABLE: &str = "CUtlHashtable";
// Typedef'd to int by the SDK preamble
const SDK_UNCHECKED_ENUMS: &[&str] = &["ENetworkDisconnectionReason"];

/// Drives an [`EmissionPlan`] so every type is declared or defined once,
/// after everything it depends on.
pub struct ResolutionSession<'g, P: EmissionPlan> {
    graph: &'g mut TypeGraph,
    plan: P,
    layouts: LayoutResolver,
    status: StatusMap,
    overrides: OverrideSet,
    atomics: AtomicRegistry,
    processed: HashSet<DefId>,
    declared_templates: HashSet<String>,
    hash_keys: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
    with_checks: bool,
    supply_sdk: bool,
}

impl<'g, P: EmissionPlan> ResolutionSession<'g, P> {
    pub fn new(graph: &'g mut TypeGraph, config: &GeneratorConfig, plan: P) -> Self {
        Self {
            graph,
            plan,
            layouts: LayoutResolver::new(config),
            status: StatusMap::new(),
            overrides: OverrideSet::from_config(config),
            atomics: AtomicRegistry::new(),
            processed: HashSet::new(),
            declared_templates: HashSet::new(),
            hash_keys: HashSet::new(),
            diagnostics: Vec::new(),
            with_checks: config.has_flag(GenerateFlags::STATIC_ASSERTS),
            supply_sdk: config.has_flag(GenerateFlags::SUPPLY_SDK),
        }
    }

    pub fn graph(&self) -> &TypeGraph {
        &*self.graph
    }

    pub fn plan(&self) -> &P {
        &self.plan
    }

    pub fn status(&self) -> &StatusMap {
        &self.status
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn finish(self) -> P {
        self.plan
    }

    pub fn process_all(&mut self) -> EmitResult<usize> {
        let ids: Vec<DefId> = self.graph.ids().collect();
        for id in &ids {
            self.process(*id)?;
        }
        Ok(ids.len())
    }

    pub fn process_named(&mut self, name: &str) -> EmitResult<bool> {
        match self.graph.find(name) {
            Some(id) => {
                self.process(id)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn process(&mut self, id: DefId) -> EmitResult<()> {
        if !self.processed.insert(id) {
            return Ok(());
        }

        match self.graph.def(id).kind() {
            TypeKind::Class => self.process_class(id),
            TypeKind::Enum => self.define_object(id),
            TypeKind::Builtin => Ok(()),
        }
    }

    fn process_class(&mut self, id: DefId) -> EmitResult<()> {
        let bases: Vec<DefId> = self.graph.def(id).base_classes()?.iter().map(|b| b.def).collect();
        for base in bases {
            self.process(base)?;
        }

        for child in order_children(self.graph, id)? {
            self.process(child)?;
        }

        for dependency in member_dependencies(self.graph, id)? {
            if self.supply_sdk {
                for forced in sdk_forced_definitions(self.graph, dependency.target) {
                    self.process_dependency(forced)?;
                }
            }
            self.process_dependency(dependency)?;
        }

        self.define_object(id)
    }

    fn process_dependency(&mut self, dependency: Dependency) -> EmitResult<()> {
        match (dependency.target, dependency.needs_definition) {
            (DepTarget::Def(id), true) => self.process(id),
            (DepTarget::Def(id), false) => self.declare_object(id),
            (DepTarget::Atomic(id), true) => self.define_atomic(id),
            (DepTarget::Atomic(id), false) => self.declare_atomic(id),
        }
    }

    // Nested definitions are written by the scope that owns them
    fn process_owner(&mut self, id: DefId) -> EmitResult<()> {
        let def = self.graph.def(id);
        if def.is_synthetic() {
            return self.process(id);
        }
        match def.parent() {
            Some(parent) => self.process(parent),
            None => Err(SchemaError::MissingParentScope(def.name.clone()).into()),
        }
    }

    fn declare_object(&mut self, id: DefId) -> EmitResult<()> {
        let def = self.graph.def(id);
        if self.status.is_declared(&def.name) || self.overrides.contains(&def.name) {
            return Ok(());
        }
        if !def.is_root() || def.is_synthetic() {
            return self.process_owner(id);
        }

        let name = def.name.clone();
        match def.kind() {
            TypeKind::Class => {
                let alignment = self.layouts.alignment_of(self.graph, id)?;
                self.plan.declare_class(self.graph, id, alignment)?;
            }
            TypeKind::Enum => {
                let enumeration = build_enum(self.graph, id, false)?;
                self.plan.declare_enum(self.graph, &enumeration)?;
            }
            TypeKind::Builtin => {}
        }

        log::debug!("Declared {}", name);
        self.status.declare(&name);
        Ok(())
    }

    fn define_object(&mut self, id: DefId) -> EmitResult<()> {
        let def = self.graph.def(id);
        let name = def.name.clone();
        let kind = def.kind();

        // Externally supplied: only verify it against the dump
        if self.overrides.contains(&name) {
            if self.with_checks && !def.is_synthetic() {
                let checks = match kind {
                    TypeKind::Class => class_checks(&mut self.layouts, self.graph, id)?,
                    TypeKind::Enum if SDK_UNCHECKED_ENUMS.contains(&name.as_str()) => Vec::new(),
                    TypeKind::Enum => enum_checks(self.graph, id)?,
                    TypeKind::Builtin => Vec::new(),
                };
                self.plan.override_checks(self.graph, id, &checks)?;
            }
            return Ok(());
        }

        if self.status.is_defined(&name) {
            return Ok(());
        }
        if !def.is_root() {
            return self.process_owner(id);
        }

        match kind {
            TypeKind::Class => {
                let class = build_class(&mut self.layouts, self.graph, id, self.with_checks)?;
                self.report_layout(&class)?;
                self.plan.define_class(self.graph, &class)?;
                self.mark_nested_defined(&class.children);
            }
            TypeKind::Enum => {
                let enumeration = build_enum(self.graph, id, self.with_checks)?;
                self.plan.define_enum(self.graph, &enumeration)?;
            }
            TypeKind::Builtin => {}
        }

        log::debug!("Defined {}", name);
        self.status.define(&name);
        Ok(())
    }

    fn declare_atomic(&mut self, id: AtomicId) -> EmitResult<()> {
        let atomic = self.graph.atomic(id);
        let rendered = atomic.render(self.graph, None);
        if self.status.is_declared(&rendered) || self.overrides.contains(&atomic.name) {
            return Ok(());
        }

        let base = atomic.name.clone();
        if !atomic.is_templated() || self.declared_templates.insert(base) {
            self.plan.declare_atomic(self.graph, id)?;
        }
        self.status.declare(&rendered);
        Ok(())
    }

    fn define_atomic(&mut self, id: AtomicId) -> EmitResult<()> {
        if self.supply_sdk {
            self.hash_specialization(id)?;
        }

        let atomic = self.graph.atomic(id);
        let rendered = atomic.render(self.graph, None);
        let size = atomic.size;

        if self.status.is_defined(&rendered) {
            if let Some(defined_size) = self.atomics.conflict(&rendered, size) {
                return self.rename_atomic(id, rendered, size, defined_size);
            }
            return Ok(());
        }
        if self.overrides.contains(&atomic.name) {
            return Ok(());
        }

        // A specialization needs the primary template in scope first
        if atomic.is_templated() && self.declared_templates.insert(atomic.name.clone()) {
            self.plan.declare_atomic(self.graph, id)?;
            self.status.declare(&rendered);
        }

        self.plan.define_atomic(self.graph, id)?;
        self.atomics.record(&rendered, size);
        self.status.define(&rendered);
        Ok(())
    }

    fn hash_specialization(&mut self, id: AtomicId) -> EmitResult<()> {
        let atomic = self.graph.atomic(id);
        if atomic.name != SDK_HASHTABLE {
            return Ok(());
        }
        let Some(key) = atomic.template_args().first() else {
            return Ok(());
        };

        let rendered = key.subtype.render(self.graph, None);
        let is_enum = matches!(key.subtype, Subtype::Ref(def) if self.graph.def(def).kind() == TypeKind::Enum);
        if (self.overrides.contains(&rendered) && !is_enum) || !self.hash_keys.insert(rendered.clone()) {
            return Ok(());
        }
        self.plan.hash_specialization(&rendered)
    }

    // Same rendered name, different size: the newer one gets a new name
    fn rename_atomic(&mut self, id: AtomicId, original: String, size: usize, defined_size: usize) -> EmitResult<()> {
        let renamed_base = disambiguated_name(&self.graph.atomic(id).name);
        self.graph.rename_atomic(id, renamed_base);
        let renamed = self.graph.atomic(id).render(self.graph, None);

        log::warn!(
            "Found invalid sized atomic: {} (new: {}, defined: {}), redefining as: {}",
            original,
            size,
            defined_size,
            renamed
        );
        self.record(Diagnostic::AtomicCollision {
            original,
            renamed,
            size,
            defined_size,
        })?;

        self.define_atomic(id)
    }

    fn record(&mut self, diagnostic: Diagnostic) -> EmitResult<()> {
        self.plan.diagnostic(&diagnostic)?;
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    fn report_layout(&mut self, class: &ClassDefinition) -> EmitResult<()> {
        for diagnostic in class.diagnostics() {
            self.record(Diagnostic::Layout {
                class: class.name.clone(),
                diagnostic: diagnostic.clone(),
            })?;
        }
        for child in &class.children {
            if let NestedDefinition::Class(nested) = child {
                self.report_layout(nested)?;
            }
        }
        Ok(())
    }

    fn mark_nested_defined(&mut self, children: &[NestedDefinition]) {
        for child in children {
            self.status.define(child.name());
            if let NestedDefinition::Class(nested) = child {
                self.mark_nested_defined(&nested.children);
            }
        }
    }
}

fn member_dependencies(graph: &TypeGraph, id: DefId) -> SchemaResult<Vec<Dependency>> {
    Ok(graph
        .def(id)
        .members()?
        .iter()
        .flat_map(|m| m.subtype.dependencies(graph, true))
        .collect())
}

fn sdk_forced_definitions(graph: &TypeGraph, target: DepTarget) -> Vec<Dependency> {
    let DepTarget::Atomic(id) = target else {
        return Vec::new();
    };
    let atomic = graph.atomic(id);
    let args = atomic.template_args();

    if SDK_COMPLETE_ARGUMENT_CONTAINERS.iter().any(|c| atomic.name.starts_with(c)) {
        args.iter().flat_map(|a| a.subtype.dependencies(graph, true)).collect()
    } else if atomic.name.starts_with(SDK_HASHTABLE) {
        args.get(1).map(|a| a.subtype.dependencies(graph, true)).unwrap_or_default()
    } else {
        Vec::new()
    }
}

fn build_class(layouts: &mut LayoutResolver, graph: &TypeGraph, id: DefId, with_checks: bool) -> SchemaResult<ClassDefinition> {
    let def = graph.def(id);
    let layout = if def.is_synthetic() {
        None
    } else {
        Some(layouts.compute_layout(graph, id)?)
    };

    let mut children = Vec::new();
    for child in order_children(graph, id)? {
        match graph.def(child).kind() {
            TypeKind::Class => children.push(NestedDefinition::Class(build_class(layouts, graph, child, with_checks)?)),
            TypeKind::Enum => children.push(NestedDefinition::Enum(build_enum(graph, child, with_checks)?)),
            TypeKind::Builtin => {}
        }
    }

    let checks = if with_checks { class_checks(layouts, graph, id)? } else { Vec::new() };

    Ok(ClassDefinition {
        id,
        name: def.name.clone(),
        alignment: layouts.alignment_of(graph, id)?,
        layout,
        bases: def.base_classes()?.iter().map(|b| b.def).collect(),
        children,
        checks,
    })
}

fn build_enum(graph: &TypeGraph, id: DefId, with_checks: bool) -> SchemaResult<EnumDefinition> {
    let def = graph.def(id);
    let enumeration = EnumDefinition::new(id, &def.name, def.size, def.fields()?.to_vec());
    if with_checks {
        Ok(enumeration.with_checks(enum_checks(graph, id)?))
    } else {
        Ok(enumeration)
    }
}

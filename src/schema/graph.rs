// Mon Oct 19 2026 - Alex

use crate::schema::raw::{RawDefinition, RawMetaTag, RawSchema, RawSubtype, RawTraits, SUBTYPE_TAGS};
use crate::schema::{
    Atomic, AtomicId, BaseClass, ClassMember, DefId, DefinitionTraits, EnumField, MetaTag, ObjectDefinition,
    SchemaError, SchemaResult, Subtype, TypeKind, UNKNOWN_ALIGNMENT,
};
use std::collections::HashMap;

/// Arena of dumped and synthetic definitions plus atomic instantiations.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    defs: Vec<ObjectDefinition>,
    dumped: usize,
    atomics: Vec<Atomic>,
    names: HashMap<String, DefId>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph in two passes so trait indices may point forward.
    pub fn from_raw(raw: &RawSchema) -> SchemaResult<Self> {
        let mut graph = Self::new();

        for raw_def in &raw.defs {
            let kind: TypeKind = raw_def.kind.parse()?;
            let mut def = ObjectDefinition::new(&raw_def.name, kind, to_size(raw_def.size), to_alignment(raw_def.alignment));
            def.scope = raw_def.scope.clone();
            def.project = raw_def.project.clone();
            graph.add_definition(def);
        }

        for (idx, raw_def) in raw.defs.iter().enumerate() {
            graph.parse_traits(DefId(idx), raw_def)?;
        }

        log::debug!(
            "Built type graph: {} definitions, {} synthetic, {} atomics",
            graph.dumped,
            graph.defs.len() - graph.dumped,
            graph.atomics.len()
        );

        Ok(graph)
    }

    pub fn add_definition(&mut self, def: ObjectDefinition) -> DefId {
        debug_assert_eq!(self.dumped, self.defs.len());
        let id = DefId(self.defs.len());
        self.names.entry(def.name.clone()).or_insert(id);
        self.defs.push(def);
        self.dumped += 1;
        id
    }

    pub fn add_atomic(&mut self, atomic: Atomic) -> AtomicId {
        self.atomics.push(atomic);
        AtomicId(self.atomics.len() - 1)
    }

    pub fn def(&self, id: DefId) -> &ObjectDefinition {
        &self.defs[id.0]
    }

    pub(crate) fn def_mut(&mut self, id: DefId) -> &mut ObjectDefinition {
        &mut self.defs[id.0]
    }

    pub fn atomic(&self, id: AtomicId) -> &Atomic {
        &self.atomics[id.0]
    }

    pub fn rename_atomic(&mut self, id: AtomicId, name: String) {
        self.atomics[id.0].name = name;
    }

    pub fn def_at(&self, idx: i64) -> SchemaResult<DefId> {
        if idx < 0 || idx as usize >= self.dumped {
            return Err(SchemaError::IndexOutOfRange(idx));
        }
        Ok(DefId(idx as usize))
    }

    pub fn find(&self, name: &str) -> Option<DefId> {
        self.names.get(name).copied().filter(|id| id.0 < self.dumped)
    }

    pub fn find_or_synthesize(&mut self, name: &str) -> DefId {
        if let Some(id) = self.names.get(name) {
            return *id;
        }

        log::debug!("Materializing synthetic parent scope {}", name);
        let id = DefId(self.defs.len());
        self.defs.push(ObjectDefinition::synthetic(name));
        self.names.insert(name.to_string(), id);
        id
    }

    /// Ids of dumped definitions in input order.
    pub fn ids(&self) -> impl Iterator<Item = DefId> {
        (0..self.dumped).map(DefId)
    }

    pub fn synthetic_ids(&self) -> impl Iterator<Item = DefId> {
        (self.dumped..self.defs.len()).map(DefId)
    }

    pub fn len(&self) -> usize {
        self.dumped
    }

    pub fn is_empty(&self) -> bool {
        self.dumped == 0
    }

    pub fn atomic_count(&self) -> usize {
        self.atomics.len()
    }

    pub fn attach_child(&mut self, parent: DefId, child: DefId) {
        self.defs[parent.0].push_child(child);
        self.defs[child.0].set_parent(parent);
    }

    fn parse_traits(&mut self, id: DefId, raw_def: &RawDefinition) -> SchemaResult<()> {
        let raw = &raw_def.traits;
        let flags = raw.flags.clone().unwrap_or_default();
        let metatags = parse_metatags(raw.metatags.as_deref());

        let kind = self.def(id).kind();
        let mut traits = match kind {
            TypeKind::Class => {
                let mut members = Vec::new();
                for raw_member in raw.members.as_deref().unwrap_or(&[]) {
                    let subtype = match &raw_member.traits.subtype {
                        Some(value) => self.parse_subtype(value)?,
                        None => return Err(SchemaError::MissingSubtype(raw_member.name.clone())),
                    };
                    let mut member = ClassMember::new(&raw_member.name, to_size(raw_member.offset), subtype);
                    member.metatags = parse_metatags(raw_member.traits.metatags.as_deref());
                    member.flags = raw_member.traits.flags.clone().unwrap_or_default();
                    members.push(member);
                }

                let mut base_classes = Vec::new();
                for base in raw.baseclasses.as_deref().unwrap_or(&[]) {
                    base_classes.push(BaseClass {
                        def: self.def_at(base.ref_idx)?,
                        offset: to_size(base.offset),
                    });
                }

                let mut class = match &self.def(id).traits {
                    DefinitionTraits::Class(existing) => existing.clone(),
                    _ => Default::default(),
                };
                class.members = members;
                class.base_classes = base_classes;
                class.multi_depth = raw.multi_depth;
                class.single_depth = raw.single_depth;
                DefinitionTraits::Class(class)
            }
            TypeKind::Enum => {
                let mut enumeration = match &self.def(id).traits {
                    DefinitionTraits::Enum(existing) => existing.clone(),
                    _ => Default::default(),
                };
                enumeration.fields = raw
                    .fields
                    .as_deref()
                    .unwrap_or(&[])
                    .iter()
                    .map(|f| EnumField {
                        name: f.name.clone(),
                        value: f.value,
                        metatags: parse_metatags(f.traits.metatags.as_deref()),
                    })
                    .collect();
                DefinitionTraits::Enum(enumeration)
            }
            TypeKind::Builtin => DefinitionTraits::Builtin,
        };

        if let Some(child_indices) = &raw.child_class_idx {
            for &child_idx in child_indices {
                let child = self.def_at(child_idx)?;
                match &mut traits {
                    DefinitionTraits::Class(c) => c.children.push(child),
                    DefinitionTraits::Enum(e) => e.children.push(child),
                    DefinitionTraits::Builtin => {}
                }
            }
        }

        {
            let def = self.def_mut(id);
            def.flags = flags;
            def.metatags = metatags;
            def.traits = traits;
        }

        self.link_parent(id, raw)
    }

    fn link_parent(&mut self, id: DefId, raw: &RawTraits) -> SchemaResult<()> {
        let parent_idx = match raw.parent_class_idx {
            Some(idx) => idx,
            None => return Ok(()),
        };

        if parent_idx != -1 {
            let parent = self.def_at(parent_idx)?;
            self.def_mut(id).set_parent(parent);
            return Ok(());
        }

        // The parent scope was not dumped, look it up by name or synthesize it
        let parent_name = match self.def(id).parent_scope_name() {
            Some(name) => name.to_string(),
            None => return Err(SchemaError::MissingParentScope(self.def(id).name.clone())),
        };

        let parent = self.find_or_synthesize(&parent_name);
        if self.def(parent).is_synthetic() {
            self.attach_child(parent, id);
        } else {
            self.def_mut(id).set_parent(parent);
        }
        Ok(())
    }

    fn parse_subtype(&mut self, value: &serde_json::Value) -> SchemaResult<Subtype> {
        let tag = value.get("type").and_then(|t| t.as_str()).unwrap_or("none");
        if !SUBTYPE_TAGS.contains(&tag) {
            return Err(SchemaError::UnknownSubtype(tag.to_string()));
        }

        let raw: RawSubtype = serde_json::from_value(value.clone())?;
        let subtype = match raw {
            RawSubtype::Ref { ref_idx } => Subtype::Ref(self.def_at(ref_idx)?),
            RawSubtype::FixedArray { subtype, count, element_size } => Subtype::FixedArray {
                inner: Box::new(self.parse_subtype(&subtype)?),
                count: to_size(count),
                element_size: to_size(element_size),
            },
            RawSubtype::Atomic { name, size, alignment, template } => {
                let mut atomic = Atomic::new(&name, to_size(size), to_alignment(alignment));
                if let Some(args) = template {
                    let mut parsed = Vec::with_capacity(args.len());
                    for arg in &args {
                        parsed.push(self.parse_subtype(arg)?);
                    }
                    atomic = atomic.with_template(parsed);
                }
                Subtype::Atomic(self.add_atomic(atomic))
            }
            RawSubtype::Ptr { subtype } => Subtype::Pointer(Box::new(self.parse_subtype(&subtype)?)),
            RawSubtype::Bitfield { count } => Subtype::Bitfield { bits: count.max(0) as u32 },
            RawSubtype::Literal { value } => Subtype::Literal(value),
        };
        Ok(subtype)
    }
}

fn to_size(value: i64) -> usize {
    value.max(0) as usize
}

fn to_alignment(value: i64) -> Option<usize> {
    if value == UNKNOWN_ALIGNMENT || value <= 0 {
        None
    } else {
        Some(value as usize)
    }
}

pub(crate) fn parse_metatags(raw: Option<&[RawMetaTag]>) -> Vec<MetaTag> {
    raw.unwrap_or(&[])
        .iter()
        .map(|tag| MetaTag {
            name: tag.name.clone(),
            value: tag.value.as_ref().map(value_text),
        })
        .collect()
}

/// Dump scalars as text, strings without their quotes.
pub(crate) fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn graph_from(value: serde_json::Value) -> TypeGraph {
        let raw: RawSchema = serde_json::from_value(value).unwrap();
        TypeGraph::from_raw(&raw).unwrap()
    }

    #[test]
    fn test_two_pass_forward_refs() {
        let graph = graph_from(json!({
            "defs": [
                { "name": "CHolder", "type": "class", "size": 8, "alignment": 255, "traits": {
                    "members": [
                        { "name": "m_pTarget", "offset": 0, "traits": { "subtype": { "type": "ptr", "subtype": { "type": "ref", "ref_idx": 1 } } } }
                    ]
                }},
                { "name": "CTarget", "type": "class", "size": 4, "alignment": 4 }
            ]
        }));

        let holder = graph.find("CHolder").unwrap();
        let members = graph.def(holder).members().unwrap();
        let target = graph.find("CTarget").unwrap();
        assert_eq!(members[0].subtype, Subtype::Pointer(Box::new(Subtype::Ref(target))));
        assert_eq!(graph.def(holder).alignment, None);
        assert_eq!(graph.def(target).alignment, Some(4));
    }

    #[test]
    fn test_unknown_kind_is_fatal() {
        let raw: RawSchema = serde_json::from_value(json!({
            "defs": [{ "name": "X", "type": "union", "size": 4, "alignment": 4 }]
        }))
        .unwrap();
        assert!(matches!(TypeGraph::from_raw(&raw), Err(SchemaError::UnknownObjectType(k)) if k == "union"));
    }

    #[test]
    fn test_unknown_subtype_is_fatal() {
        let raw: RawSchema = serde_json::from_value(json!({
            "defs": [{ "name": "X", "type": "class", "size": 4, "alignment": 4, "traits": {
                "members": [{ "name": "m_x", "offset": 0, "traits": { "subtype": { "type": "function" } } }]
            }}]
        }))
        .unwrap();
        assert!(matches!(TypeGraph::from_raw(&raw), Err(SchemaError::UnknownSubtype(k)) if k == "function"));
    }

    #[test]
    fn test_member_without_subtype_is_fatal() {
        let raw: RawSchema = serde_json::from_value(json!({
            "defs": [{ "name": "X", "type": "class", "size": 4, "alignment": 4, "traits": {
                "members": [{ "name": "m_x", "offset": 0 }]
            }}]
        }))
        .unwrap();
        assert!(matches!(TypeGraph::from_raw(&raw), Err(SchemaError::MissingSubtype(m)) if m == "m_x"));
    }

    #[test]
    fn test_out_of_range_index_is_fatal() {
        let raw: RawSchema = serde_json::from_value(json!({
            "defs": [{ "name": "X", "type": "class", "size": 4, "alignment": 4, "traits": {
                "baseclasses": [{ "ref_idx": 7, "offset": 0 }]
            }}]
        }))
        .unwrap();
        assert!(matches!(TypeGraph::from_raw(&raw), Err(SchemaError::IndexOutOfRange(7))));
    }

    #[test]
    fn test_synthetic_parent_materialized() {
        let graph = graph_from(json!({
            "defs": [
                { "name": "Outer::Inner", "type": "class", "size": 4, "alignment": 4, "traits": { "parent_class_idx": -1 } },
                { "name": "Outer::Other", "type": "enum", "size": 4, "alignment": 4, "traits": { "parent_class_idx": -1, "fields": [] } }
            ]
        }));

        assert_eq!(graph.len(), 2);
        assert!(graph.find("Outer").is_none());

        let outer = graph.synthetic_ids().next().unwrap();
        let outer_def = graph.def(outer);
        assert!(outer_def.is_synthetic());
        assert_eq!(outer_def.name, "Outer");
        assert_eq!(outer_def.children().len(), 2);

        let inner = graph.find("Outer::Inner").unwrap();
        assert_eq!(graph.def(inner).parent(), Some(outer));
    }

    #[test]
    fn test_atomic_template_and_metatags() {
        let graph = graph_from(json!({
            "defs": [
                { "name": "C", "type": "class", "size": 24, "alignment": 8, "traits": {
                    "metatags": [{ "name": "MNetworkVarNames", "value": "CUtlVector< int32 > m_v" }],
                    "members": [{ "name": "m_v", "offset": 0, "traits": {
                        "metatags": [{ "name": "MNetworkEnable" }],
                        "subtype": { "type": "atomic", "name": "CUtlVector< int32 >", "size": 24, "alignment": 8,
                            "template": [{ "type": "atomic", "name": "int32", "size": 4, "alignment": 4 }] }
                    }}]
                }}
            ]
        }));

        let c = graph.def(graph.find("C").unwrap());
        assert_eq!(c.metatags[0].value.as_deref(), Some("CUtlVector< int32 > m_v"));
        let member = &c.members().unwrap()[0];
        assert!(!member.metatags[0].has_value());
        assert_eq!(member.subtype.render(&graph, None), "CUtlVector<int32>");
        assert_eq!(graph.atomic_count(), 2);
    }
}

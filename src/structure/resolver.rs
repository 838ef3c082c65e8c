// Mon Oct 19 2026 - Alex

use crate::config::GeneratorConfig;
use crate::schema::subtype::bits_to_bytes;
use crate::schema::{ClassMember, DefId, SchemaError, SchemaResult, Subtype, TypeGraph, TypeKind, POINTER_ALIGNMENT};
use crate::structure::layout::VTABLE_SLOT_SIZE;
use crate::structure::{align_value, packed_alignment_for, ClassAlignment, ClassLayout, LayoutCache, LayoutDiagnostic, LayoutEntry};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Computes class alignments and byte-exact layouts from dumped metadata.
pub struct LayoutResolver {
    cache: LayoutCache,
    alignment_overrides: IndexMap<String, usize>,
    in_progress: HashSet<DefId>,
}

struct BitfieldRun {
    start: usize,
    bits: usize,
    storage: usize,
}

impl LayoutResolver {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            cache: LayoutCache::new(),
            alignment_overrides: config.alignment_overrides.clone(),
            in_progress: HashSet::new(),
        }
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub fn alignment_of(&mut self, graph: &TypeGraph, id: DefId) -> SchemaResult<ClassAlignment> {
        if let Some(alignment) = self.cache.alignment(id) {
            return Ok(alignment);
        }

        let def = graph.def(id);
        if def.is_synthetic() {
            return Ok(ClassAlignment::Unknown);
        }
        if let Some(declared) = def.alignment {
            return Ok(ClassAlignment::Natural(declared));
        }
        if let Some(forced) = self.alignment_overrides.get(&def.name) {
            return Ok(ClassAlignment::Natural(*forced));
        }
        if def.kind() != TypeKind::Class {
            return Ok(ClassAlignment::Unknown);
        }

        if !self.in_progress.insert(id) {
            return Err(SchemaError::CyclicLayout(def.name.clone()));
        }
        let computed = self.compute_alignment(graph, id);
        self.in_progress.remove(&id);

        let alignment = computed?;
        if alignment.is_packed() {
            log::debug!("{} does not fit its natural alignment, byte-packing at {}", def.name, alignment);
        }
        self.cache.insert_alignment(id, alignment);
        Ok(alignment)
    }

    fn compute_alignment(&mut self, graph: &TypeGraph, id: DefId) -> SchemaResult<ClassAlignment> {
        let def = graph.def(id);

        let mut parent_alignment = 1;
        for base in def.base_classes()? {
            if let Some(base_alignment) = self.alignment_of(graph, base.def)?.natural() {
                parent_alignment = parent_alignment.max(base_alignment);
            }
        }

        let mut class_alignment = if def.has_virtual_members() && parent_alignment < POINTER_ALIGNMENT {
            POINTER_ALIGNMENT
        } else {
            parent_alignment
        };

        for member in def.members()? {
            if let Some(member_alignment) = self.subtype_alignment(graph, &member.subtype)? {
                class_alignment = class_alignment.max(member_alignment);
            }
        }

        if align_value(def.size, class_alignment) != def.size {
            return Ok(ClassAlignment::Packed(packed_alignment_for(def.size, class_alignment)));
        }
        Ok(ClassAlignment::Natural(class_alignment))
    }

    pub fn subtype_alignment(&mut self, graph: &TypeGraph, subtype: &Subtype) -> SchemaResult<Option<usize>> {
        let alignment = match subtype {
            Subtype::Ref(id) => self.alignment_of(graph, *id)?.natural(),
            Subtype::FixedArray { inner, .. } => self.subtype_alignment(graph, inner)?,
            Subtype::Atomic(id) => graph.atomic(*id).alignment,
            Subtype::Pointer(_) => Some(POINTER_ALIGNMENT),
            Subtype::Bitfield { .. } | Subtype::Literal(_) => None,
        };
        Ok(alignment)
    }

    pub fn compute_layout(&mut self, graph: &TypeGraph, id: DefId) -> SchemaResult<ClassLayout> {
        if let Some(layout) = self.cache.layout(id) {
            return Ok(layout.clone());
        }

        let layout = self.walk_members(graph, id)?;
        for diagnostic in &layout.diagnostics {
            log::warn!("{}: {}", layout.name, diagnostic);
        }
        self.cache.insert_layout(layout.clone());
        Ok(layout)
    }

    fn walk_members(&mut self, graph: &TypeGraph, id: DefId) -> SchemaResult<ClassLayout> {
        let def = graph.def(id);
        let alignment = self.alignment_of(graph, id)?;
        let mut layout = ClassLayout::new(id, &def.name, def.size, alignment);

        if def.is_synthetic() {
            return Ok(layout);
        }

        let mut current_offset = 0;
        for base in def.base_classes()? {
            let base_alignment = self.alignment_of(graph, base.def)?.value().unwrap_or(0);
            current_offset += align_value(graph.def(base.def).size, base_alignment);
        }

        if def.has_virtual_members() && current_offset == 0 {
            layout.entries.push(LayoutEntry::VTable { offset: 0 });
            current_offset += VTABLE_SLOT_SIZE;
        }

        let members = def.members()?;
        let mut run: Option<BitfieldRun> = None;
        let mut previous_alignment: Option<usize> = None;

        for (index, member) in members.iter().enumerate() {
            let member_size = member.subtype.size(graph);
            let member_alignment = self.subtype_alignment(graph, &member.subtype)?;

            if member.is_relative_bitfield() {
                let bits = member.subtype.bits().unwrap_or(0);
                let active = run.get_or_insert_with(|| BitfieldRun {
                    start: current_offset,
                    bits: 0,
                    storage: run_storage_width(&members[index..]),
                });
                layout.entries.push(LayoutEntry::Bitfield {
                    index,
                    byte_offset: active.start,
                    bit_offset: active.bits,
                    bits,
                    storage: active.storage,
                });
                active.bits += bits as usize;
            } else {
                if let Some(finished) = run.take() {
                    current_offset += bits_to_bytes(finished.bits);
                }

                // Compiler-inserted padding, never for packed classes
                if !alignment.is_packed() {
                    if let (Some(member_align), Some(previous)) = (member_alignment, previous_alignment) {
                        if previous != 0 && member_align > previous {
                            current_offset = align_value(current_offset, member_align);
                        }
                    }
                }

                if member.offset < current_offset {
                    layout.diagnostics.push(LayoutDiagnostic::InvalidOffset {
                        member: member.name.clone(),
                        declared: member.offset,
                        reached: current_offset,
                        previous_alignment,
                        alignment: member_alignment,
                    });
                } else if member.offset > current_offset {
                    layout.entries.push(LayoutEntry::Padding {
                        offset: current_offset,
                        size: member.offset - current_offset,
                    });
                }

                layout.entries.push(LayoutEntry::Member {
                    index,
                    offset: member.offset,
                    size: member_size,
                    alignment: member_alignment,
                });
                current_offset = member.offset + member_size;
            }

            previous_alignment = member_alignment;
        }

        if let Some(finished) = run.take() {
            current_offset += bits_to_bytes(finished.bits);
        }

        let aligned_end = align_value(current_offset, alignment.natural().unwrap_or(0));
        if aligned_end < def.size {
            layout.entries.push(LayoutEntry::Padding {
                offset: current_offset,
                size: def.size - aligned_end,
            });
        }

        Ok(layout)
    }
}

/// Storage bytes of the bitfield run starting at `members[0]`.
fn run_storage_width(members: &[ClassMember]) -> usize {
    members
        .iter()
        .take_while(|m| m.is_relative_bitfield())
        .map(|m| bits_to_bytes(m.subtype.bits().unwrap_or(0) as usize))
        .max()
        .unwrap_or(1)
        .max(1)
        .next_power_of_two()
}

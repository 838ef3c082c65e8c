// Mon Oct 19 2026 - Alex

use crate::config::GenerateFlags;
use crate::emit::cpp::CppWriter;
use crate::emit::plan::{ClassDefinition, EmissionPlan, EmitResult, EnumDefinition};
use crate::schema::{AtomicId, DefId, Subtype, TypeGraph};
use crate::structure::ClassAlignment;
use itertools::Itertools;
use std::io::Write;

/// Emits schema accessor macros instead of raw layouts. Fields are looked
/// up at runtime, so no padding, nested scopes or atomics are written.
pub struct CppDefsWriter {
    cpp: CppWriter,
}

impl CppDefsWriter {
    pub fn new(flags: GenerateFlags) -> Self {
        Self {
            cpp: CppWriter::new(flags - GenerateFlags::STATIC_ASSERTS),
        }
    }

    pub fn source(&self) -> String {
        self.cpp.source()
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> EmitResult<()> {
        self.cpp.write_to(out)
    }

    fn member_line(graph: &TypeGraph, name: &str, subtype: &Subtype) -> Option<String> {
        match subtype {
            Subtype::FixedArray { .. } => Some(format!(
                "SCHEMA_FIELD_POINTER({}, {})",
                subtype.element_type().render(graph, None),
                name
            )),
            Subtype::Bitfield { .. } => None,
            _ => Some(format!("SCHEMA_FIELD({}, {})", subtype.render(graph, None), name)),
        }
    }
}

impl EmissionPlan for CppDefsWriter {
    fn declare_class(&mut self, _graph: &TypeGraph, _id: DefId, _alignment: ClassAlignment) -> EmitResult<()> {
        Ok(())
    }

    fn define_class(&mut self, graph: &TypeGraph, class: &ClassDefinition) -> EmitResult<()> {
        let def = graph.def(class.id);
        let comments = self.cpp.has_flag(GenerateFlags::ADD_COMMENTS);
        let out = self.cpp.writer_mut();

        let mut head = format!("class {}", def.scoped_name());
        if !class.bases.is_empty() {
            head.push_str(" : public ");
            head.push_str(&class.bases.iter().map(|b| graph.def(*b).name.as_str()).join(", public "));
        }
        out.add_line(head).add_line("{").indent();
        out.add_line(format!("DECLARE_SCHEMA_CLASS({})", def.name)).new_line();

        for member in def.members()? {
            let Some(line) = Self::member_line(graph, &member.name, &member.subtype) else {
                log::warn!("Found bitfield member ({}), which is unsupported, skipping...", member.name);
                continue;
            };
            out.add_line(line);
            if comments {
                out.append(format!(" // 0x{:X} ({})", member.offset, member.offset));
            }
        }

        out.dedent()?.add_line("};").new_line();
        Ok(())
    }

    fn declare_enum(&mut self, graph: &TypeGraph, enumeration: &EnumDefinition) -> EmitResult<()> {
        self.cpp.declare_enum(graph, enumeration)
    }

    fn define_enum(&mut self, graph: &TypeGraph, enumeration: &EnumDefinition) -> EmitResult<()> {
        if enumeration.checks.is_empty() {
            return self.cpp.define_enum(graph, enumeration);
        }
        let unchecked = enumeration.clone().with_checks(Vec::new());
        self.cpp.define_enum(graph, &unchecked)
    }

    fn declare_atomic(&mut self, _graph: &TypeGraph, _id: AtomicId) -> EmitResult<()> {
        Ok(())
    }

    fn define_atomic(&mut self, _graph: &TypeGraph, _id: AtomicId) -> EmitResult<()> {
        Ok(())
    }
}

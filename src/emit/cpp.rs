// Mon Oct 19 2026 - Alex

use crate::config::GenerateFlags;
use crate::emit::plan::{
    underlying_int, ClassDefinition, EmissionPlan, EmitError, EmitResult, EnumDefinition, NestedDefinition,
};
use crate::emit::writer::SourceWriter;
use crate::schema::{AtomicId, DefId, ObjectDefinition, TypeGraph, TypeKind, SCOPE_SEPARATOR};
use crate::structure::{ClassAlignment, ConsistencyCheck, LayoutDiagnostic, LayoutEntry};
use itertools::Itertools;
use std::io::Write;

const FIXED_WIDTH_TYPEDEFS: &[(&str, &str)] = &[
    ("int8_t", "int8"),
    ("uint8_t", "uint8"),
    ("int16_t", "int16"),
    ("uint16_t", "uint16"),
    ("int32_t", "int32"),
    ("uint32_t", "uint32"),
    ("int64_t", "int64"),
    ("uint64_t", "uint64"),
    ("float", "float32"),
    ("double", "float64"),
];

const SDK_INCLUDES: &[&str] = &[
    "platform.h",
    "eiface.h",
    "const.h",
    "vector.h",
    "vector2d.h",
    "vector4d.h",
    "color.h",
    "variant.h",
    "bufferstring.h",
    "keyvalues3.h",
    "transform.h",
    "ehandle.h",
    "entity2/entityidentity.h",
    "entity2/entityinstance.h",
    "schemasystem/schematypes.h",
    "utlsymbollarge.h",
    "utlleanvector.h",
    "utlhashtable.h",
    "utlmap.h",
    "utlstring.h",
    "utllinkedlist.h",
    "utlvector.h",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Private,
}

impl Access {
    fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// Emits plain C++ struct definitions that reproduce every dumped layout
/// byte for byte.
pub struct CppWriter {
    out: SourceWriter,
    class_depth: usize,
    access: Option<Access>,
    usages: Vec<String>,
}

impl CppWriter {
    pub fn new(flags: GenerateFlags) -> Self {
        Self {
            out: SourceWriter::new(flags),
            class_depth: 0,
            access: None,
            usages: Vec::new(),
        }
    }

    pub fn has_flag(&self, flag: GenerateFlags) -> bool {
        self.out.has_flag(flag)
    }

    /// Includes and fixed-width typedefs every generated header starts with.
    pub fn write_preamble(&mut self) -> &mut Self {
        self.out.add_line("#include \"stdint.h\"");
        self.out.add_line("#include <utility>");
        if self.has_flag(GenerateFlags::STATIC_ASSERTS) {
            self.out.add_line("#include \"stddef.h\"");
        }
        self.out.new_line();

        if self.has_flag(GenerateFlags::SUPPLY_SDK) {
            self.out.add_line("typedef int ENetworkDisconnectionReason;").new_line();
            for include in SDK_INCLUDES {
                self.out.add_line(format!("#include \"{}\"", include));
            }
        } else {
            for (std_name, short_name) in FIXED_WIDTH_TYPEDEFS {
                self.out.add_line(format!("typedef {} {};", std_name, short_name));
            }
        }
        self.out.new_line();
        self
    }

    pub(crate) fn writer_mut(&mut self) -> &mut SourceWriter {
        &mut self.out
    }

    pub fn source(&self) -> String {
        self.out.build()
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> EmitResult<()> {
        self.out.write_to(out)
    }

    fn class_head(name: &str, alignment: Option<usize>) -> String {
        match alignment {
            Some(alignment) => format!("class alignas({}) {}", alignment, name),
            None => format!("class {}", name),
        }
    }

    fn block_start(&mut self) {
        self.class_depth += 1;
        self.access = Some(Access::Private);
        self.out.add_line("{").indent();
    }

    fn block_end(&mut self) -> EmitResult<()> {
        if self.class_depth == 0 {
            return Err(EmitError::Writer("Cannot write class entry end outside of class".to_string()));
        }
        self.class_depth -= 1;
        self.access = None;
        self.out.dedent()?.add_line("};");
        Ok(())
    }

    fn set_access(&mut self, access: Access) -> EmitResult<()> {
        if self.class_depth == 0 {
            return Err(EmitError::Writer("Cannot write member access specifier outside of class".to_string()));
        }
        if self.access != Some(access) {
            self.access = Some(access);
            let indent = self.out.indent_level().saturating_sub(1);
            self.out.add_line_at(format!("{}:", access.as_str()), indent);
        }
        Ok(())
    }

    fn pad(&mut self, offset: usize, size: usize) -> EmitResult<()> {
        self.set_access(Access::Private)?;
        self.out.add_line(format!("uint8 pad_{:04X}[{}];", offset, size));
        Ok(())
    }

    fn write_class(&mut self, graph: &TypeGraph, class: &ClassDefinition) -> EmitResult<()> {
        let def = graph.def(class.id);

        self.out.metatags(&def.metatags);
        if class.is_synthetic() {
            self.out.comment_if_enabled("Synthetically created class, no size/alignment available");
        } else {
            self.out.comment_if_enabled(format!("Size: 0x{:X} ({})", def.size, def.size));
            match def.alignment {
                Some(alignment) => self.out.comment_if_enabled(format!("Alignment: {}", alignment)),
                None => self.out.comment_if_enabled(format!("Calculated alignment: {}", class.alignment)),
            };
        }

        if let ClassAlignment::Packed(packed) = class.alignment {
            self.out.add_line(format!("#pragma pack(push, {})", packed));
        }

        let mut head = Self::class_head(def.scoped_name(), class.alignment.natural());
        if !class.bases.is_empty() {
            head.push_str(" : public ");
            head.push_str(&class.bases.iter().map(|b| graph.def(*b).name.as_str()).join(", public "));
        }
        self.out.add_line(head);
        let outer_access = self.access;
        self.block_start();

        // Children first, members may use them
        if !class.children.is_empty() {
            self.set_access(Access::Public)?;
            for child in &class.children {
                match child {
                    NestedDefinition::Class(nested) => self.write_class(graph, nested)?,
                    NestedDefinition::Enum(nested) => self.write_enum(graph, nested)?,
                }
            }
        }

        if let Some(layout) = &class.layout {
            let members = def.members()?;
            for entry in &layout.entries {
                match entry {
                    LayoutEntry::VTable { .. } => {
                        self.set_access(Access::Private)?;
                        self.out.add_line("void* __vftable;");
                    }
                    LayoutEntry::Padding { offset, size } => self.pad(*offset, *size)?,
                    LayoutEntry::Member { index, offset, alignment, .. } => {
                        let member = &members[*index];
                        for diagnostic in &layout.diagnostics {
                            let LayoutDiagnostic::InvalidOffset { member: name, .. } = diagnostic;
                            if *name == member.name {
                                self.out.comment(diagnostic.to_string());
                            }
                        }
                        self.set_access(Access::Public)?;
                        self.out.metatags(&member.metatags);
                        self.out.add_line(format!("{};", member.subtype.render(graph, Some(&member.name))));
                        if self.has_flag(GenerateFlags::ADD_COMMENTS) {
                            self.out.append(format!(
                                " // 0x{:X} ({}) (alignment: {})",
                                offset,
                                offset,
                                alignment.unwrap_or(0)
                            ));
                        }
                    }
                    LayoutEntry::Bitfield { index, bits, storage, .. } => {
                        let member = &members[*index];
                        self.set_access(Access::Public)?;
                        self.out.metatags(&member.metatags);
                        self.out.add_line(format!("int{} {} : {};", storage * 8, member.name, bits));
                    }
                }
            }
        }

        self.block_end()?;
        self.access = outer_access;
        if class.alignment.is_packed() {
            self.out.add_line("#pragma pack(pop)");
        }

        // Usage declarations keep nested definitions alive for consumers
        // that drop unreferenced types. Inside a class body they would be
        // data members, so they wait for the outermost scope.
        self.usages.extend(class.children.iter().map(|c| c.name().to_string()));
        if self.class_depth == 0 {
            for name in std::mem::take(&mut self.usages) {
                self.out.new_line();
                self.out.add_line(format!("{} {};", name, name.replace(SCOPE_SEPARATOR, "__")));
            }
        }

        self.out.new_line();
        self.write_checks(def, &class.checks)
    }

    fn write_enum(&mut self, graph: &TypeGraph, enumeration: &EnumDefinition) -> EmitResult<()> {
        let def = graph.def(enumeration.id);
        let bitflags = enumeration.is_bitflags();

        self.out.metatags(&def.metatags);
        self.out.add_line(format!("enum class {} : {}", def.scoped_name(), enumeration.underlying_type()?));
        self.out.add_line("{").indent();
        for field in &enumeration.fields {
            self.out.metatags(&field.metatags);
            if bitflags && field.value > 0 {
                let bit = 63 - field.value.leading_zeros();
                self.out.add_line(format!("{} = {}, // (1 << {})", field.name, field.value, bit));
            } else {
                self.out.add_line(format!("{} = {},", field.name, field.value));
            }
        }
        self.out.dedent()?.add_line("};");

        self.out.new_line();
        self.write_checks(def, &enumeration.checks)
    }

    fn write_checks(&mut self, def: &ObjectDefinition, checks: &[ConsistencyCheck]) -> EmitResult<()> {
        if checks.is_empty() {
            return Ok(());
        }

        let name = def.scoped_name();
        for check in checks {
            let line = match check {
                ConsistencyCheck::AlignmentMismatch { alignment, size, aligned_size } => format!(
                    "static_assert(false, \"Invalid alignment calculated ({}) doesn't match the size ({} vs {})\");",
                    alignment, size, aligned_size
                ),
                ConsistencyCheck::Size(size) => format!("static_assert(sizeof({}) == {});", name, size),
                ConsistencyCheck::Alignment(alignment) => format!(
                    "static_assert({} == alignof({}), \"Inconsistent alignment calculated!\");",
                    alignment, name
                ),
                ConsistencyCheck::MemberOffset { member, offset } => {
                    format!("static_assert(offsetof({}, {}) == {});", name, member, offset)
                }
                ConsistencyCheck::EnumValue { field, value } => {
                    format!("static_assert({}::{} == ({}){});", name, field, name, value)
                }
                ConsistencyCheck::EnumSize { size, signed } => {
                    let underlying = underlying_int(*size, *signed).ok_or_else(|| EmitError::UnsupportedEnumSize {
                        name: def.name.clone(),
                        size: *size,
                    })?;
                    format!("static_assert(sizeof({}) == sizeof({}));", name, underlying)
                }
            };
            self.out.add_line(line);
        }
        self.out.new_line();
        Ok(())
    }
}

impl EmissionPlan for CppWriter {
    fn declare_class(&mut self, graph: &TypeGraph, id: DefId, alignment: ClassAlignment) -> EmitResult<()> {
        let head = Self::class_head(&graph.def(id).name, alignment.natural());
        self.out.add_line(format!("{};", head)).new_line();
        Ok(())
    }

    fn define_class(&mut self, graph: &TypeGraph, class: &ClassDefinition) -> EmitResult<()> {
        self.write_class(graph, class)
    }

    fn declare_enum(&mut self, _graph: &TypeGraph, enumeration: &EnumDefinition) -> EmitResult<()> {
        self.out
            .add_line(format!("enum class {} : {};", enumeration.name, enumeration.underlying_type()?))
            .new_line();
        Ok(())
    }

    fn define_enum(&mut self, graph: &TypeGraph, enumeration: &EnumDefinition) -> EmitResult<()> {
        self.write_enum(graph, enumeration)
    }

    fn declare_atomic(&mut self, graph: &TypeGraph, id: AtomicId) -> EmitResult<()> {
        let atomic = graph.atomic(id);
        if atomic.is_templated() {
            self.out.add_line(format!("template {}", atomic.template_decl()));
        }
        self.out.add_line(format!("class {};", atomic.name)).new_line();
        Ok(())
    }

    fn define_atomic(&mut self, graph: &TypeGraph, id: AtomicId) -> EmitResult<()> {
        let atomic = graph.atomic(id);
        if atomic.is_templated() {
            self.out.add_line("template<>");
        }
        self.out.add_line(Self::class_head(&atomic.render(graph, None), atomic.alignment));
        self.block_start();
        self.pad(0, atomic.size)?;
        self.block_end()?;
        self.out.new_line();
        Ok(())
    }

    fn hash_specialization(&mut self, key: &str) -> EmitResult<()> {
        self.out
            .add_line(format!("template <> struct DefaultHashFunctor<{}> : Mix32HashFunctor {{}};", key))
            .new_line();
        Ok(())
    }

    fn override_checks(&mut self, graph: &TypeGraph, id: DefId, checks: &[ConsistencyCheck]) -> EmitResult<()> {
        let def = graph.def(id);
        if def.kind() == TypeKind::Builtin {
            return Ok(());
        }
        self.write_checks(def, checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::resolve::ResolutionSession;
    use crate::schema::graph::tests::graph_from;
    use serde_json::{json, Value};

    fn generate(defs: Value, flags: GenerateFlags) -> String {
        let mut graph = graph_from(defs);
        let config = GeneratorConfig::new().with_flags(flags);
        let mut session = ResolutionSession::new(&mut graph, &config, CppWriter::new(flags));
        session.process_all().unwrap();
        session.finish().source()
    }

    fn int32(name: &str, offset: usize) -> Value {
        json!({ "name": name, "offset": offset, "traits": { "subtype": { "type": "atomic", "name": "int32", "size": 4, "alignment": 4 } } })
    }

    #[test]
    fn test_class_with_padding() {
        let source = generate(
            json!({ "defs": [
                { "name": "CGap", "type": "class", "size": 16, "alignment": 255, "traits": { "members": [int32("a", 0), int32("b", 8)] } }
            ]}),
            GenerateFlags::empty(),
        );

        assert_eq!(
            source,
            "class alignas(4) CGap\n{\npublic:\n\tint32 a;\nprivate:\n\tuint8 pad_0004[4];\npublic:\n\tint32 b;\nprivate:\n\tuint8 pad_000C[4];\n};\n\n"
        );
    }

    #[test]
    fn test_bitfields_use_run_width() {
        let source = generate(
            json!({ "defs": [
                { "name": "CBits", "type": "class", "size": 2, "alignment": 255, "traits": { "members": [
                    { "name": "a", "offset": 0, "traits": { "subtype": { "type": "bitfield", "count": 3 } } },
                    { "name": "b", "offset": 0, "traits": { "subtype": { "type": "bitfield", "count": 5 } } },
                    { "name": "c", "offset": 1, "traits": { "subtype": { "type": "atomic", "name": "int8", "size": 1, "alignment": 1 } } }
                ]}}
            ]}),
            GenerateFlags::empty(),
        );

        assert!(source.contains("\tint8 a : 3;\n\tint8 b : 5;\n\tint8 c;\n"));
        assert!(!source.contains("pad_"));
    }

    #[test]
    fn test_vtable_packing_and_asserts() {
        let source = generate(
            json!({ "defs": [
                { "name": "CPacked", "type": "class", "size": 12, "alignment": 255, "traits": {
                    "flags": ["has_virtual_members"],
                    "members": [int32("m_n", 8)]
                }}
            ]}),
            GenerateFlags::STATIC_ASSERTS,
        );

        assert!(source.contains("#pragma pack(push, 4)\nclass CPacked\n{\n\tvoid* __vftable;\npublic:\n\tint32 m_n;\n};\n#pragma pack(pop)\n"));
        assert!(source.contains("static_assert(sizeof(CPacked) == 12);"));
        assert!(source.contains("static_assert(offsetof(CPacked, m_n) == 8);"));
    }

    #[test]
    fn test_invalid_offset_comment() {
        let source = generate(
            json!({ "defs": [
                { "name": "CBroken", "type": "class", "size": 8, "alignment": 4, "traits": { "members": [int32("a", 0), int32("b", 2)] } }
            ]}),
            GenerateFlags::empty(),
        );

        assert!(source.contains("// INVALID OFFSET: b at 2, already reached 4"));
        assert!(source.contains("\tint32 b;"));
    }

    #[test]
    fn test_enum_and_atomic_output() {
        let source = generate(
            json!({ "defs": [
                { "name": "EFlags", "type": "enum", "size": 1, "alignment": 1, "traits": { "fields": [
                    { "name": "NONE", "value": 0 }, { "name": "A", "value": 1 }, { "name": "B", "value": 2 }, { "name": "C", "value": 4 }
                ]}},
                { "name": "CHolder", "type": "class", "size": 24, "alignment": 8, "traits": { "members": [
                    { "name": "m_vec", "offset": 0, "traits": { "subtype": { "type": "atomic", "name": "CUtlVector< int32 >", "size": 24, "alignment": 8,
                        "template": [{ "type": "atomic", "name": "int32", "size": 4, "alignment": 4 }] } } }
                ]}}
            ]}),
            GenerateFlags::empty(),
        );

        assert!(source.contains("enum class EFlags : uint8\n{\n\tNONE = 0,\n\tA = 1, // (1 << 0)\n\tB = 2, // (1 << 1)\n\tC = 4, // (1 << 2)\n};\n"));
        assert!(source.contains("template <typename A>\nclass CUtlVector;\n"));
        assert!(source.contains("template<>\nclass alignas(8) CUtlVector<int32>\n{\n\tuint8 pad_0000[24];\n};\n"));
        assert!(source.contains("\tCUtlVector<int32> m_vec;\n"));
    }

    #[test]
    fn test_synthetic_scope_wraps_children() {
        let source = generate(
            json!({ "defs": [
                { "name": "Outer::Inner", "type": "class", "size": 4, "alignment": 4, "traits": { "parent_class_idx": -1, "members": [int32("m_n", 0)] } }
            ]}),
            GenerateFlags::ADD_COMMENTS,
        );

        assert!(source.starts_with("// Synthetically created class, no size/alignment available\nclass Outer\n{\npublic:\n"));
        assert!(source.contains("\tclass alignas(4) Inner\n"));
        assert!(source.contains("Outer::Inner Outer__Inner;"));
        assert!(!source.contains("Size: 0x0"));
    }

    fn three_level_nesting() -> Value {
        json!({ "defs": [
            { "name": "A", "type": "class", "size": 4, "alignment": 4, "traits": { "child_class_idx": [1], "members": [int32("m_n", 0)] } },
            { "name": "A::B", "type": "class", "size": 4, "alignment": 4, "traits": { "parent_class_idx": 0, "child_class_idx": [2], "members": [int32("m_n", 0)] } },
            { "name": "A::B::C", "type": "class", "size": 4, "alignment": 4, "traits": { "parent_class_idx": 1, "members": [int32("m_n", 0)] } }
        ]})
    }

    #[test]
    fn test_nested_usages_after_outermost_scope() {
        let source = generate(three_level_nesting(), GenerateFlags::empty());

        assert_eq!(
            source,
            "class alignas(4) A\n{\npublic:\n\tclass alignas(4) B\n\t{\n\tpublic:\n\t\tclass alignas(4) C\n\t\t{\n\t\tpublic:\n\t\t\tint32 m_n;\n\t\t};\n\n\t\tint32 m_n;\n\t};\n\n\tint32 m_n;\n};\n\nA::B::C A__B__C;\n\nA::B A__B;\n\n"
        );
    }

    #[test]
    fn test_nested_checks_single_blank_line() {
        let source = generate(three_level_nesting(), GenerateFlags::STATIC_ASSERTS);

        assert!(!source.contains("\n\n\n"));
        assert!(source.contains("\t\tstatic_assert(sizeof(C) == 4);"));
        assert!(source.contains("\t\tstatic_assert(offsetof(C, m_n) == 0);\n\n\t\tint32 m_n;\n\t};"));

        let body_end = source.find("\n};\n").unwrap();
        assert!(!source[..body_end].contains("A__B"));
        assert!(source[body_end..].contains("\nA::B::C A__B__C;\n"));
        assert!(source.contains("static_assert(sizeof(A) == 4);"));
    }

    #[test]
    fn test_hashtable_specialization() {
        let mut writer = CppWriter::new(GenerateFlags::SUPPLY_SDK);
        writer.hash_specialization("EKeyKind").unwrap();
        assert_eq!(writer.source(), "template <> struct DefaultHashFunctor<EKeyKind> : Mix32HashFunctor {};\n\n");
    }

    #[test]
    fn test_preamble() {
        let mut writer = CppWriter::new(GenerateFlags::STATIC_ASSERTS);
        writer.write_preamble();
        let source = writer.source();
        assert!(source.contains("#include \"stddef.h\""));
        assert!(source.contains("typedef int32_t int32;"));
    }
}

// Mon Oct 19 2026 - Alex

use crate::config::GenerateFlags;
use crate::emit::plan::EmitResult;
use crate::emit::writer::SourceWriter;
use crate::schema::pulse::PARAM_DESCRIPTION_TAG;
use crate::schema::{Domain, DomainFunction, MetaTag};
use itertools::Itertools;
use std::io::Write;

/// Writes pulse domain bindings: one `domain` block per domain with a
/// `scope` block per C++ scope and a call signature per function.
/// Documentation lines are written only with comments enabled.
pub struct PulseBindingWriter {
    out: SourceWriter,
}

impl PulseBindingWriter {
    pub fn new(flags: GenerateFlags) -> Self {
        Self {
            out: SourceWriter::new(flags),
        }
    }

    pub fn source(&self) -> String {
        self.out.build()
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> EmitResult<()> {
        self.out.write_to(out)
    }

    fn note<S: AsRef<str>>(&mut self, text: S) {
        if self.out.has_flag(GenerateFlags::ADD_COMMENTS) {
            self.out.add_line(format!("// {}", text.as_ref()).trim_end());
        }
    }

    fn note_metatag(&mut self, label: &str, tag: &MetaTag) {
        self.note(format!("@{} {{{}}} {}", label, tag.name, tag.value.as_deref().unwrap_or("")));
    }

    pub fn write_domain(&mut self, domain: &Domain) -> EmitResult<()> {
        if !domain.description.is_empty() {
            self.note(&domain.description);
        }
        if !domain.friendly_name.is_empty() {
            self.note(format!("@friendly_name {}", domain.friendly_name));
        }
        if !domain.cursor.is_empty() {
            self.note(format!("@cursor {}", domain.cursor));
        }

        self.out.add_line(format!("domain {} {{", domain.name)).indent();
        for scope in &domain.scopes {
            self.out.add_line(format!("scope {} {{", scope.name)).indent();
            for function in &scope.functions {
                self.write_function(function);
            }
            self.out.dedent()?.add_line("}").new_line();
        }
        self.out.dedent()?.add_line("}").new_line();

        log::debug!("Wrote domain {} ({} functions)", domain.name, domain.function_count());
        Ok(())
    }

    fn write_function(&mut self, function: &DomainFunction) {
        if !function.description.is_empty() {
            self.note(&function.description);
            self.note("");
        }
        for tag in &function.metatags {
            self.note_metatag("func_metatag", tag);
        }

        self.note(format!("@type {}", function.kind));
        self.note(format!("@libname \"{}\"", function.library_name));
        self.note(format!("@friendly_name \"{}\"", function.name));

        for param in &function.params {
            for tag in param.metatags.iter().filter(|t| t.name != PARAM_DESCRIPTION_TAG) {
                self.note_metatag("param_metatag", tag);
            }
            self.note(format!("@param {{{}}} {} {}", param.kind, param.name, param.description()));
        }
        for ret in &function.returns {
            self.note(format!("@returns {{{}}} {} {}", ret.kind, ret.name, ret.description()));
        }

        let params = function
            .params
            .iter()
            .map(|p| match p.default_literal() {
                Some(default) => format!("{} = {}", p.name, default),
                None => p.name.clone(),
            })
            .join(", ");
        self.out.add_line(format!("{}({});", function.cpp_name(), params));

        if self.out.has_flag(GenerateFlags::ADD_COMMENTS) {
            self.out.new_line();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaFile;

    fn domains() -> Vec<Domain> {
        let file = SchemaFile::parse(
            r#"{ "dump_flags": ["has_pulse_bindings"], "defs": [], "pulse_bindings": [{
                "name": "ServerEntity",
                "description": "Entity bindings",
                "friendly_name": "Entity",
                "cpp_scopes": [{ "name": "CBaseEntity", "functions": [{
                    "name": "Set Health",
                    "library_name": "server!CBaseEntity::SetHealth",
                    "description": "Changes health",
                    "type": "action",
                    "params": [
                        { "name": "nHealth", "type": "int", "default_value": 100, "traits": { "metatags": [
                            { "name": "MPulseArgDesc", "value": "New health" },
                            { "name": "MPropertyMin", "value": "0" }
                        ]}},
                        { "name": "sReason", "type": "string", "default_value": "damage" }
                    ],
                    "rets": [{ "name": "bChanged", "type": "bool" }],
                    "traits": { "metatags": [{ "name": "MPulseEditorHidden" }] }
                }]}]
            }] }"#,
        )
        .unwrap();
        file.pulse_bindings().to_vec()
    }

    #[test]
    fn test_signatures_without_comments() {
        let mut writer = PulseBindingWriter::new(GenerateFlags::empty());
        for domain in &domains() {
            writer.write_domain(domain).unwrap();
        }

        assert_eq!(
            writer.source(),
            "domain ServerEntity {\n\tscope CBaseEntity {\n\t\tSetHealth(nHealth = 100, sReason = \"damage\");\n\t}\n\n}\n\n"
        );
    }

    #[test]
    fn test_documented_function() {
        let mut writer = PulseBindingWriter::new(GenerateFlags::ADD_COMMENTS);
        for domain in &domains() {
            writer.write_domain(domain).unwrap();
        }
        let source = writer.source();

        assert!(source.starts_with("// Entity bindings\n// @friendly_name Entity\ndomain ServerEntity {\n"));
        assert!(source.contains(
            "\t\t// Changes health\n\t\t//\n\t\t// @func_metatag {MPulseEditorHidden}\n\t\t// @type action\n\t\t// @libname \"server!CBaseEntity::SetHealth\"\n\t\t// @friendly_name \"Set Health\"\n"
        ));
        assert!(source.contains("\t\t// @param_metatag {MPropertyMin} 0\n\t\t// @param {int} nHealth New health\n"));
        assert!(!source.contains("{MPulseArgDesc}"));
        assert!(source.contains("\t\t// @param {string} sReason\n\t\t// @returns {bool} bChanged\n\t\tSetHealth(nHealth = 100, sReason = \"damage\");\n\n\t}\n"));
    }
}

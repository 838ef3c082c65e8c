// Mon Oct 19 2026 - Alex

use crate::schema::graph::{parse_metatags, value_text};
use crate::schema::raw::{RawDomain, RawDomainFunction, RawDomainParam};
use crate::schema::MetaTag;

/// Metatag carrying the human readable description of a parameter.
pub const PARAM_DESCRIPTION_TAG: &str = "MPulseArgDesc";

/// A pulse domain: the script bindings a game system exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub name: String,
    pub description: String,
    pub friendly_name: String,
    pub cursor: String,
    pub scopes: Vec<DomainScope>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    pub name: String,
    pub functions: Vec<DomainFunction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainFunction {
    pub name: String,
    pub library_name: String,
    pub description: String,
    pub kind: String,
    pub params: Vec<DomainParam>,
    pub returns: Vec<DomainParam>,
    pub metatags: Vec<MetaTag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParam {
    pub name: String,
    pub kind: String,
    pub default_value: Option<String>,
    pub metatags: Vec<MetaTag>,
}

impl Domain {
    pub fn from_raw(raw: &RawDomain) -> Self {
        Self {
            name: raw.name.clone(),
            description: raw.description.clone(),
            friendly_name: raw.friendly_name.clone(),
            cursor: raw.cursor.clone(),
            scopes: raw
                .cpp_scopes
                .iter()
                .map(|scope| DomainScope {
                    name: scope.name.clone(),
                    functions: scope.functions.iter().map(DomainFunction::from_raw).collect(),
                })
                .collect(),
        }
    }

    pub fn function_count(&self) -> usize {
        self.scopes.iter().map(|s| s.functions.len()).sum()
    }
}

impl DomainFunction {
    fn from_raw(raw: &RawDomainFunction) -> Self {
        Self {
            name: raw.name.clone(),
            library_name: raw.library_name.clone(),
            description: raw.description.clone(),
            kind: raw.kind.clone(),
            params: raw.params.iter().map(DomainParam::from_raw).collect(),
            returns: raw.rets.iter().map(DomainParam::from_raw).collect(),
            metatags: parse_metatags(raw.traits.metatags.as_deref()),
        }
    }

    /// Bare function name out of `module!Namespace::Function`.
    pub fn cpp_name(&self) -> &str {
        let unqualified = self.library_name.rsplit('!').next().unwrap_or(&self.library_name);
        unqualified.rsplit("::").next().unwrap_or(unqualified)
    }
}

impl DomainParam {
    fn from_raw(raw: &RawDomainParam) -> Self {
        Self {
            name: raw.name.clone(),
            kind: raw.kind.clone(),
            default_value: raw.default_value.as_ref().map(value_text).filter(|v| !v.is_empty()),
            metatags: parse_metatags(raw.traits.metatags.as_deref()),
        }
    }

    pub fn description(&self) -> &str {
        self.metatags
            .iter()
            .find(|t| t.name == PARAM_DESCRIPTION_TAG)
            .and_then(|t| t.value.as_deref())
            .unwrap_or("")
    }

    /// Default value as a source literal, strings quoted.
    pub fn default_literal(&self) -> Option<String> {
        self.default_value.as_ref().map(|value| {
            if self.kind == "string" {
                format!("\"{}\"", value)
            } else {
                value.clone()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn domain() -> Domain {
        let raw: RawDomain = serde_json::from_value(json!({
            "name": "ServerEntity",
            "friendly_name": "Entity",
            "cpp_scopes": [{ "name": "CBaseEntity", "functions": [{
                "name": "Set Health",
                "library_name": "server!CBaseEntity::SetHealth",
                "description": "",
                "type": "action",
                "params": [
                    { "name": "nHealth", "type": "int", "default_value": 100,
                      "traits": { "metatags": [{ "name": "MPulseArgDesc", "value": "New health" }] } },
                    { "name": "sReason", "type": "string", "default_value": "" }
                ],
                "rets": []
            }]}]
        }))
        .unwrap();
        Domain::from_raw(&raw)
    }

    #[test]
    fn test_domain_from_raw() {
        let domain = domain();
        assert_eq!(domain.cursor, "");
        assert_eq!(domain.function_count(), 1);

        let function = &domain.scopes[0].functions[0];
        assert_eq!(function.cpp_name(), "SetHealth");
        assert_eq!(function.params[0].description(), "New health");
        assert_eq!(function.params[0].default_literal().as_deref(), Some("100"));
        assert_eq!(function.params[1].default_literal(), None);
    }

    #[test]
    fn test_string_default_quoted() {
        let param = DomainParam {
            name: "sName".into(),
            kind: "string".into(),
            default_value: Some("none".into()),
            metatags: Vec::new(),
        };
        assert_eq!(param.default_literal().as_deref(), Some("\"none\""));
        assert_eq!(param.description(), "");
    }
}

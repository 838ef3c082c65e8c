// Mon Oct 19 2026 - Alex

use crate::schema::raw::RawSchema;
use crate::schema::{Domain, SchemaError, SchemaResult, TypeGraph};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const FLAG_NO_PARENT_SCOPE: &str = "no_parent_scope";
pub const FLAG_HAS_METATAGS: &str = "has_metatags";
pub const FLAG_HAS_ATOMICS: &str = "has_atomics";
pub const FLAG_HAS_PULSE_BINDINGS: &str = "has_pulse_bindings";

/// A loaded schema dump: its dump flags, the built [`TypeGraph`] and any
/// pulse domains.
pub struct SchemaFile {
    path: Option<PathBuf>,
    dump_flags: Vec<String>,
    graph: TypeGraph,
    pulse_bindings: Vec<Domain>,
}

impl SchemaFile {
    pub fn open(path: &Path) -> SchemaResult<Self> {
        if !path.is_file() {
            return Err(SchemaError::InvalidPath(path.display().to_string()));
        }

        log::info!("Loading schema dump {}", path.display());
        let text = fs::read_to_string(path)?;
        let mut file = Self::parse(&text)?;
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    pub fn parse(text: &str) -> SchemaResult<Self> {
        let raw: RawSchema = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawSchema) -> SchemaResult<Self> {
        let graph = TypeGraph::from_raw(&raw)?;
        Ok(Self {
            path: None,
            pulse_bindings: raw.pulse_bindings.iter().map(Domain::from_raw).collect(),
            dump_flags: raw.dump_flags,
            graph,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn flags(&self) -> &[String] {
        &self.dump_flags
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.dump_flags.iter().any(|f| f == flag)
    }

    pub fn has_metatags(&self) -> bool {
        self.has_flag(FLAG_HAS_METATAGS)
    }

    pub fn has_atomics(&self) -> bool {
        self.has_flag(FLAG_HAS_ATOMICS)
    }

    pub fn has_pulse_bindings(&self) -> bool {
        self.has_flag(FLAG_HAS_PULSE_BINDINGS)
    }

    pub fn pulse_bindings(&self) -> &[Domain] {
        &self.pulse_bindings
    }

    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    pub fn into_graph(self) -> TypeGraph {
        self.graph
    }
}

/// Resolves an input path: a file is taken as is, a directory yields its
/// most recently modified `*.json` file.
pub fn locate_input(path: &Path) -> SchemaResult<PathBuf> {
    if !path.exists() {
        return Err(SchemaError::InvalidPath(path.display().to_string()));
    }

    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(path)? {
        let entry_path = entry?.path();
        if entry_path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let modified = fs::metadata(&entry_path)?.modified()?;
        if newest.as_ref().map_or(true, |(time, _)| modified > *time) {
            newest = Some((modified, entry_path));
        }
    }

    newest
        .map(|(_, p)| p)
        .ok_or_else(|| SchemaError::NoSchemaFiles(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("schema-cpp-generator-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_flags() {
        let file = SchemaFile::parse(r#"{ "dump_flags": ["no_parent_scope", "has_atomics"], "defs": [] }"#).unwrap();
        assert!(file.has_flag(FLAG_NO_PARENT_SCOPE));
        assert!(file.has_atomics());
        assert!(!file.has_metatags());
        assert!(file.graph().is_empty());
    }

    #[test]
    fn test_parse_pulse_bindings() {
        let file = SchemaFile::parse(
            r#"{ "dump_flags": ["has_pulse_bindings"], "defs": [], "pulse_bindings": [
                { "name": "ServerWorld", "cpp_scopes": [{ "name": "CWorld", "functions": [] }] }
            ] }"#,
        )
        .unwrap();
        assert!(file.has_pulse_bindings());
        assert_eq!(file.pulse_bindings().len(), 1);
        assert_eq!(file.pulse_bindings()[0].scopes[0].name, "CWorld");

        let plain = SchemaFile::parse(r#"{ "defs": [] }"#).unwrap();
        assert!(!plain.has_pulse_bindings());
        assert!(plain.pulse_bindings().is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(SchemaFile::parse("{ not json"), Err(SchemaError::Json(_))));
    }

    #[test]
    fn test_locate_input_in_directory() {
        let dir = scratch_dir("locate");
        fs::write(dir.join("notes.txt"), "x").unwrap();
        fs::write(dir.join("server.json"), r#"{ "defs": [] }"#).unwrap();

        let located = locate_input(&dir).unwrap();
        assert_eq!(located.file_name().unwrap(), "server.json");

        let file = SchemaFile::open(&located).unwrap();
        assert_eq!(file.path(), Some(located.as_path()));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_locate_input_empty_directory() {
        let dir = scratch_dir("empty");
        assert!(matches!(locate_input(&dir), Err(SchemaError::NoSchemaFiles(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}

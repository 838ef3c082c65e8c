// Mon Oct 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unknown object type: {0}")]
    UnknownObjectType(String),
    #[error("Unknown subtype type: {0}")]
    UnknownSubtype(String),
    #[error("Index out of range: {0}")]
    IndexOutOfRange(i64),
    #[error("Class member {0} has no subtype")]
    MissingSubtype(String),
    #[error("Object definition is not a class: {0}")]
    NotAClass(String),
    #[error("Object definition is not an enum: {0}")]
    NotAnEnum(String),
    #[error("Nested definition {0} has no parent scope to be emitted with")]
    MissingParentScope(String),
    #[error("Failed to resolve child scope order of {0}, max num of iterations reached")]
    CyclicChildScopes(String),
    #[error("Layout of {0} depends on itself")]
    CyclicLayout(String),
    #[error("Schema file path is invalid or not found: {0}")]
    InvalidPath(String),
    #[error("No schema files found in folder {0}")]
    NoSchemaFiles(String),
    #[error("Failed to parse JSON schema info: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SchemaResult<T> = Result<T, SchemaError>;

//! Error types for the table controller and the JSON loading boundary.

use std::fmt;
use std::path::PathBuf;

use crate::record::RecordId;

/// Role a field must have for an operation to accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Filter,
    Search,
    Sort,
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRole::Filter => f.write_str("filterable"),
            FieldRole::Search => f.write_str("searchable"),
            FieldRole::Sort => f.write_str("sortable"),
        }
    }
}

/// Recoverable controller errors. The controller state is never changed
/// when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Field is not declared in the schema with the required role.
    InvalidFieldReference { field: String, role: FieldRole },
    /// No record with this id exists in the collection.
    SelectionMiss(RecordId),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidFieldReference { field, role } => {
                write!(f, "field '{}' is not {}", field, role)
            }
            GridError::SelectionMiss(id) => write!(f, "record '{}' not found", id),
        }
    }
}

impl std::error::Error for GridError {}

/// Errors reading schemas and record payloads.
#[derive(Debug)]
pub enum LoadError {
    /// File could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Payload is not valid JSON or has the wrong shape.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// In-memory payload has the wrong shape.
    Payload(serde_json::Error),
    /// Record at `index` has no usable id field.
    MissingId { index: usize, field: String },
    /// Field value could not be coerced to its declared kind.
    InvalidValue {
        index: usize,
        field: String,
        message: String,
    },
    /// Schema is inconsistent.
    InvalidSchema(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "cannot read '{}': {}", path.display(), source)
            }
            LoadError::Json { path, source } => {
                write!(f, "invalid JSON in '{}': {}", path.display(), source)
            }
            LoadError::Payload(source) => write!(f, "invalid payload: {}", source),
            LoadError::MissingId { index, field } => {
                write!(f, "record #{} has no '{}' id", index, field)
            }
            LoadError::InvalidValue {
                index,
                field,
                message,
            } => write!(f, "record #{} field '{}': {}", index, field, message),
            LoadError::InvalidSchema(msg) => write!(f, "invalid schema: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Json { source, .. } => Some(source),
            LoadError::Payload(source) => Some(source),
            _ => None,
        }
    }
}

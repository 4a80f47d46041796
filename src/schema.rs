//! Per-screen schema: which fields exist and which roles they play.
//!
//! A schema is either built in code with the chained constructors below or
//! loaded from a JSON document:
//!
//! ```json
//! {
//!   "id_field": "id",
//!   "fields": [
//!     { "name": "status", "kind": "text", "filterable": true },
//!     { "name": "name", "label": "Workflow", "searchable": true, "sortable": true },
//!     { "name": "updated_on", "kind": "date", "sortable": true }
//!   ],
//!   "options": { "default_direction": "descending", "page_size": 20 }
//! }
//! ```

use serde::Deserialize;

use crate::error::{FieldRole, LoadError};
use crate::query::{DEFAULT_ALL_SENTINEL, SortDirection, SortSpec};
use crate::record::FieldValue;
use crate::util::parse_date_value;

/// Declared value kind, used to coerce text input (JSON strings, CLI filter
/// arguments) into comparable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    Date,
    Bool,
}

/// One column of a list screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub sortable: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            filterable: false,
            searchable: false,
            sortable: false,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Column header text.
    pub fn header(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.name.to_uppercase(),
        }
    }

    pub fn has_role(&self, role: FieldRole) -> bool {
        match role {
            FieldRole::Filter => self.filterable,
            FieldRole::Search => self.searchable,
            FieldRole::Sort => self.sortable,
        }
    }

    /// Converts a value to this field's kind. Text fields take any scalar
    /// as its display text; other kinds parse text and pass typed values
    /// through untouched.
    pub fn coerce(&self, value: FieldValue) -> Result<FieldValue, String> {
        let text = match (self.kind, value) {
            (_, FieldValue::Text(text)) => text,
            (_, FieldValue::Null) => return Ok(FieldValue::Null),
            (FieldKind::Text, other) => return Ok(FieldValue::Text(other.to_string())),
            (_, other) => return Ok(other),
        };
        let trimmed = text.trim();
        match self.kind {
            FieldKind::Text => Ok(FieldValue::Text(text)),
            FieldKind::Number => {
                if let Ok(v) = trimmed.parse::<i64>() {
                    Ok(FieldValue::Integer(v))
                } else {
                    trimmed
                        .parse::<f64>()
                        .map(FieldValue::Float)
                        .map_err(|_| format!("'{}' is not a number", text))
                }
            }
            FieldKind::Date => parse_date_value(trimmed).map_err(|e| e.message),
            FieldKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Ok(FieldValue::Bool(true)),
                "false" | "no" | "n" | "0" => Ok(FieldValue::Bool(false)),
                _ => Err(format!("'{}' is not a boolean", text)),
            },
        }
    }
}

/// Screen-level behaviour knobs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Direction used when sorting a new column without an explicit direction.
    pub default_direction: SortDirection,
    /// Filter value meaning "no filter" (matched case-insensitively).
    pub all_sentinel: String,
    /// Rows per page; `None` shows everything.
    pub page_size: Option<usize>,
    pub initial_sort: Option<SortSpec>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            default_direction: SortDirection::Descending,
            all_sentinel: DEFAULT_ALL_SENTINEL.to_string(),
            page_size: None,
            initial_sort: None,
        }
    }
}

/// Field roles for one list screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Schema {
    #[serde(default = "default_id_field")]
    pub id_field: String,
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub options: GridOptions,
}

fn default_id_field() -> String {
    "id".to_string()
}

impl Schema {
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
            fields: Vec::new(),
            options: GridOptions::default(),
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn options(mut self, options: GridOptions) -> Self {
        self.options = options;
        self
    }

    pub fn default_direction(mut self, direction: SortDirection) -> Self {
        self.options.default_direction = direction;
        self
    }

    pub fn page_size(mut self, per_page: usize) -> Self {
        self.options.page_size = Some(per_page);
        self
    }

    pub fn initial_sort(mut self, sort: SortSpec) -> Self {
        self.options.initial_sort = Some(sort);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up a field that must carry `role`.
    pub fn with_role(&self, name: &str, role: FieldRole) -> Option<&FieldSpec> {
        self.get(name).filter(|f| f.has_role(role))
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.searchable)
            .map(|f| f.name.as_str())
    }

    /// Checks field name uniqueness and that the initial sort is sortable.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.id_field.trim().is_empty() {
            return Err(LoadError::InvalidSchema("id_field is empty".to_string()));
        }
        for (i, field) in self.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(LoadError::InvalidSchema(format!(
                    "field #{} has an empty name",
                    i
                )));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(LoadError::InvalidSchema(format!(
                    "field '{}' declared twice",
                    field.name
                )));
            }
        }
        if let Some(sort) = &self.options.initial_sort {
            if self.with_role(&sort.field, FieldRole::Sort).is_none() {
                return Err(LoadError::InvalidSchema(format!(
                    "initial_sort field '{}' is not sortable",
                    sort.field
                )));
            }
        }
        if self.options.page_size == Some(0) {
            return Err(LoadError::InvalidSchema(
                "page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

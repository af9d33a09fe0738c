//! Error types for forms.

use std::collections::HashMap;
use thiserror::Error;

/// Form-specific errors.
///
/// These describe contract violations by the caller (a malformed schema, an
/// event aimed at the wrong field). Missing required values are not errors
/// in this sense; they are collected in [`ValidationErrors`].
#[derive(Debug, Error)]
pub enum FormError {
    /// Two fields in the schema share a name.
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// A field was declared without a name.
    #[error("field name must not be empty (label: {label:?})")]
    EmptyFieldName { label: String },

    /// A table column is duplicated or has a kind that cannot live in a cell.
    #[error("invalid column {column} in table {field}: {message}")]
    InvalidColumn {
        field: String,
        column: String,
        message: String,
    },

    /// The field is not part of the schema.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// An event or value does not fit the field's kind.
    #[error("field {field} expects {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    /// A table operation was aimed at a field that is not a table.
    #[error("field {0} is not a table")]
    NotATable(String),

    /// A table row index is past the end of the table.
    #[error("row {index} out of bounds for table {field} with {len} rows")]
    RowOutOfBounds {
        field: String,
        index: usize,
        len: usize,
    },

    /// A table cell was addressed with a column the table does not define.
    #[error("table {field} has no column {column}")]
    UnknownColumn { field: String, column: String },

    /// Invalid initial value.
    #[error("invalid value for field {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Reading a schema or values file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema or values JSON could not be parsed.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The message recorded for a required field left empty.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Validation errors keyed by field name.
///
/// Holds at most one message per field. A validation pass builds a fresh
/// instance; it is never merged into a previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Errors keyed by field name.
    pub errors: HashMap<String, String>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }

    /// Records an error for a field, replacing any previous message.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the error for a specific field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Returns whether a field has an error.
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Returns all errors sorted by field name.
    pub fn all_errors(&self) -> Vec<(&str, &str)> {
        let mut all: Vec<_> = self
            .errors
            .iter()
            .map(|(field, msg)| (field.as_str(), msg.as_str()))
            .collect();
        all.sort_unstable();
        all
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, message) in self.all_errors() {
            writeln!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

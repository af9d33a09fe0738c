//! Field values and the submitted data mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{FormError, Result};
use crate::schema::{FieldKind, FieldSpec, FormSchema};

/// Reference to a locally chosen file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    /// File name as reported by the picker.
    pub name: String,
    /// MIME type, when known.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
}

impl FileRef {
    /// Creates a file reference with no type information.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            size: 0,
        }
    }

    /// Sets the MIME type.
    #[must_use]
    pub fn mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    /// Sets the size.
    #[must_use]
    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }
}

/// One row of a table field: column name to cell text.
pub type TableRow = BTreeMap<String, String>;

/// The current value of a field.
///
/// Serializes without a tag: text as a string, checkbox as a bool, image as
/// a file object or `null`, multi-select as an array, table as an array of
/// objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text, number, textarea, date, radio and single select.
    Text(String),
    /// Checkbox.
    Bool(bool),
    /// Image.
    File(Option<FileRef>),
    /// Multi-select combobox.
    List(Vec<String>),
    /// Table.
    Rows(Vec<TableRow>),
}

impl FieldValue {
    /// Returns the value a field of this kind starts with.
    pub fn default_for(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Checkbox => Self::Bool(false),
            FieldKind::Image => Self::File(None),
            FieldKind::Table { .. } => Self::Rows(Vec::new()),
            FieldKind::Select { .. } if kind.is_multi_select() => Self::List(Vec::new()),
            FieldKind::Text
            | FieldKind::Number
            | FieldKind::Textarea { .. }
            | FieldKind::Select { .. }
            | FieldKind::Radio { .. }
            | FieldKind::Date => Self::Text(String::new()),
        }
    }

    /// Whether the value counts as missing for a required field.
    ///
    /// Whitespace is a value: only the empty string is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Bool(b) => !b,
            Self::File(f) => f.is_none(),
            Self::List(values) => values.is_empty(),
            Self::Rows(rows) => rows.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileRef> {
        match self {
            Self::File(f) => f.as_ref(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_rows(&self) -> Option<&[TableRow]> {
        match self {
            Self::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// Whether this value has the shape `field` stores.
    pub fn fits(&self, field: &FieldSpec) -> bool {
        matches!(
            (FieldValue::default_for(&field.kind), self),
            (Self::Text(_), Self::Text(_))
                | (Self::Bool(_), Self::Bool(_))
                | (Self::File(_), Self::File(_))
                | (Self::List(_), Self::List(_))
                | (Self::Rows(_), Self::Rows(_))
        )
    }

    /// Converts a JSON value into the value kind `field` stores.
    ///
    /// `null` yields the field's default.
    pub fn from_json(field: &FieldSpec, json: &Value) -> Result<Self> {
        if json.is_null() {
            return Ok(Self::default_for(&field.kind));
        }
        let invalid = |message: &str| FormError::InvalidValue {
            field: field.name.clone(),
            message: message.to_string(),
        };

        match &field.kind {
            FieldKind::Checkbox => match json {
                Value::Bool(b) => Ok(Self::Bool(*b)),
                Value::String(s) => Ok(Self::Bool(matches!(s.as_str(), "true" | "on" | "1"))),
                _ => Err(invalid("expected a boolean")),
            },
            FieldKind::Image => match json {
                Value::String(name) => Ok(Self::File(Some(FileRef::new(name.as_str())))),
                Value::Object(_) => serde_json::from_value(json.clone())
                    .map(|file| Self::File(Some(file)))
                    .map_err(|e| invalid(&e.to_string())),
                _ => Err(invalid("expected a file object")),
            },
            FieldKind::Table { columns } => {
                let Value::Array(items) = json else {
                    return Err(invalid("expected an array of rows"));
                };
                items
                    .iter()
                    .map(|item| row_from_json(field, columns, item))
                    .collect::<Result<Vec<_>>>()
                    .map(Self::Rows)
            }
            kind if kind.is_multi_select() => match json {
                Value::Array(items) => items
                    .iter()
                    .map(|item| scalar_text(item).ok_or_else(|| invalid("expected scalar values")))
                    .collect::<Result<Vec<_>>>()
                    .map(Self::List),
                Value::String(s) if s.is_empty() => Ok(Self::List(Vec::new())),
                other => scalar_text(other)
                    .map(|v| Self::List(vec![v]))
                    .ok_or_else(|| invalid("expected an array of values")),
            },
            _ => scalar_text(json)
                .map(Self::Text)
                .ok_or_else(|| invalid("expected a string")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<FileRef> for FieldValue {
    fn from(value: FileRef) -> Self {
        Self::File(Some(value))
    }
}

fn scalar_text(json: &Value) -> Option<String> {
    match json {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn row_from_json(field: &FieldSpec, columns: &[FieldSpec], json: &Value) -> Result<TableRow> {
    let Value::Object(cells) = json else {
        return Err(FormError::InvalidValue {
            field: field.name.clone(),
            message: "expected each row to be an object".to_string(),
        });
    };
    if let Some(unknown) = cells.keys().find(|k| !columns.iter().any(|c| &c.name == *k)) {
        return Err(FormError::UnknownColumn {
            field: field.name.clone(),
            column: unknown.clone(),
        });
    }
    Ok(columns
        .iter()
        .map(|column| {
            let cell = cells.get(&column.name).and_then(scalar_text).unwrap_or_default();
            (column.name.clone(), cell)
        })
        .collect())
}

/// A flat mapping from field name to value.
///
/// Used both for initial values (any subset of fields) and for the data
/// handed to the submit callback (every field in the schema).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormData {
    values: BTreeMap<String, FieldValue>,
}

impl FormData {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set a value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a value, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.values.get_mut(name)
    }

    /// Returns the text of a text-like field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over values sorted by field name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the mapping as a JSON object.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Builds values for `schema` from a JSON object.
    ///
    /// Keys that name no field are skipped.
    pub fn from_value(schema: &FormSchema, json: &Value) -> Result<Self> {
        let Value::Object(map) = json else {
            return Err(FormError::InvalidValue {
                field: String::new(),
                message: "expected a JSON object of field values".to_string(),
            });
        };
        let mut data = Self::new();
        for (name, value) in map {
            match schema.field(name) {
                Some(field) => {
                    data.insert(name.clone(), FieldValue::from_json(field, value)?);
                }
                None => warn!(field = %name, "Skipping value for unknown field"),
            }
        }
        Ok(data)
    }

    /// Parses values for `schema` from a JSON string.
    pub fn from_json(schema: &FormSchema, json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(schema, &value)
    }
}

impl<'a> IntoIterator for &'a FormData {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

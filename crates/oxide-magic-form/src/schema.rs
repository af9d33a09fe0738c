//! Form schema: fields, groups and their layout.
//!
//! A [`FormSchema`] is an ordered list of [`GroupSpec`]s, each holding an
//! ordered list of [`FieldSpec`]s. Schemas are built either with the builder
//! methods below or deserialized from JSON:
//!
//! ```rust
//! use oxide_magic_form::FormSchema;
//!
//! let schema = FormSchema::from_json(r#"[
//!     {
//!         "group": "User Information",
//!         "fields": [
//!             { "name": "username", "label": "Username", "type": "text", "required": true }
//!         ],
//!         "layout": { "type": "vertical" },
//!         "position": { "row": 1, "column": 1, "width": "full" },
//!         "card": true
//!     }
//! ]"#).unwrap();
//!
//! assert_eq!(schema.field("username").unwrap().label, "Username");
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};

/// A choice for select and radio fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Submitted value.
    pub value: String,
    /// Text shown to the user.
    #[serde(rename = "displayName", alias = "label", alias = "name")]
    pub display_name: String,
}

impl SelectOption {
    /// Creates a new option.
    pub fn new(value: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display_name: display_name.into(),
        }
    }
}

fn default_rows() -> usize {
    4
}

/// The kind of a field, with the data only that kind needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Textarea {
        #[serde(default = "default_rows")]
        rows: usize,
    },
    Checkbox,
    Select {
        #[serde(default)]
        options: Vec<SelectOption>,
        /// Render as a searchable combobox instead of a native dropdown.
        #[serde(default)]
        autocomplete: bool,
        /// Allow several values. Only honoured with `autocomplete`.
        #[serde(default)]
        multiple: bool,
    },
    Radio {
        #[serde(default)]
        options: Vec<SelectOption>,
    },
    Image,
    Date,
    Table {
        /// Schema of one row.
        #[serde(default)]
        columns: Vec<FieldSpec>,
    },
}

impl FieldKind {
    /// Returns the schema type tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Textarea { .. } => "textarea",
            Self::Checkbox => "checkbox",
            Self::Select { .. } => "select",
            Self::Radio { .. } => "radio",
            Self::Image => "image",
            Self::Date => "date",
            Self::Table { .. } => "table",
        }
    }

    /// Returns the options of a select or radio field.
    pub fn options(&self) -> &[SelectOption] {
        match self {
            Self::Select { options, .. } | Self::Radio { options } => options,
            _ => &[],
        }
    }

    /// Whether the field holds a list of selected values.
    pub fn is_multi_select(&self) -> bool {
        matches!(
            self,
            Self::Select {
                autocomplete: true,
                multiple: true,
                ..
            }
        )
    }

    /// Whether values of this kind fit in a single string table cell.
    fn is_cell_kind(&self) -> bool {
        match self {
            Self::Text | Self::Number | Self::Textarea { .. } | Self::Date | Self::Radio { .. } => {
                true
            }
            Self::Select { .. } => !self.is_multi_select(),
            Self::Checkbox | Self::Image | Self::Table { .. } => false,
        }
    }
}

/// Width of a field inside its group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldWidth {
    #[default]
    Full,
    Half,
    Third,
    Auto,
}

/// Definition of a form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Field name, unique across the schema.
    pub name: String,
    /// Field label.
    #[serde(default)]
    pub label: String,
    /// Field kind.
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Whether the field is required.
    #[serde(default)]
    pub required: bool,
    /// Placeholder text.
    #[serde(default, alias = "optionPlaceHolder")]
    pub placeholder: Option<String>,
    /// Width inside the group.
    #[serde(default)]
    pub width: FieldWidth,
    /// Whether the field is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Help text.
    #[serde(default)]
    pub help_text: Option<String>,
}

impl FieldSpec {
    /// Creates a new field definition.
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            placeholder: None,
            width: FieldWidth::default(),
            disabled: false,
            help_text: None,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn textarea(name: impl Into<String>, label: impl Into<String>, rows: usize) -> Self {
        Self::new(name, label, FieldKind::Textarea { rows })
    }

    pub fn checkbox(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn image(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Image)
    }

    /// Creates a native dropdown.
    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Select {
                options,
                autocomplete: false,
                multiple: false,
            },
        )
    }

    /// Creates a select rendered through the combobox.
    pub fn autocomplete(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
        multiple: bool,
    ) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Select {
                options,
                autocomplete: true,
                multiple,
            },
        )
    }

    pub fn radio(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(name, label, FieldKind::Radio { options })
    }

    /// Creates a repeatable table whose rows follow `columns`.
    pub fn table(
        name: impl Into<String>,
        label: impl Into<String>,
        columns: Vec<FieldSpec>,
    ) -> Self {
        Self::new(name, label, FieldKind::Table { columns })
    }

    /// Makes the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    /// Sets the width inside the group.
    #[must_use]
    pub fn width(mut self, width: FieldWidth) -> Self {
        self.width = width;
        self
    }

    /// Disables the field.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Sets help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    /// Returns the row schema of a table field.
    pub fn columns(&self) -> Option<&[FieldSpec]> {
        match &self.kind {
            FieldKind::Table { columns } => Some(columns),
            _ => None,
        }
    }
}

/// How a group arranges its fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Horizontal,
    #[default]
    Vertical,
    Grid,
}

fn default_columns() -> usize {
    1
}

/// Layout of the fields inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLayout {
    #[serde(rename = "type", default)]
    pub kind: LayoutKind,
    /// Column count for grid layouts.
    #[serde(default = "default_columns")]
    pub columns: usize,
}

impl Default for GroupLayout {
    fn default() -> Self {
        Self {
            kind: LayoutKind::Vertical,
            columns: 1,
        }
    }
}

/// Proportional width of a group inside its row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupWidth {
    #[default]
    Full,
    Half,
    Third,
    Quarter,
}

/// Where a group sits in the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPosition {
    #[serde(default)]
    pub row: usize,
    #[serde(default)]
    pub column: usize,
    #[serde(default)]
    pub width: GroupWidth,
}

fn default_card() -> bool {
    true
}

/// A named cluster of fields sharing a layout and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Group key.
    #[serde(rename = "groupKey", alias = "group", alias = "key")]
    pub key: String,
    /// Optional title shown above the fields.
    #[serde(default)]
    pub title: Option<String>,
    /// Fields in display order.
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub layout: GroupLayout,
    #[serde(default)]
    pub position: GroupPosition,
    /// Whether to wrap the group in a card.
    #[serde(default = "default_card")]
    pub card: bool,
}

impl GroupSpec {
    /// Creates a new vertical group in row 0.
    pub fn new(key: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            key: key.into(),
            title: None,
            fields,
            layout: GroupLayout::default(),
            position: GroupPosition::default(),
            card: true,
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Lays the fields out in a grid with `columns` columns.
    #[must_use]
    pub fn grid(mut self, columns: usize) -> Self {
        self.layout = GroupLayout {
            kind: LayoutKind::Grid,
            columns,
        };
        self
    }

    /// Lays the fields out side by side, wrapping.
    #[must_use]
    pub fn horizontal(mut self) -> Self {
        self.layout.kind = LayoutKind::Horizontal;
        self
    }

    /// Places the group at a row and column.
    #[must_use]
    pub fn at(mut self, row: usize, column: usize) -> Self {
        self.position.row = row;
        self.position.column = column;
        self
    }

    /// Sets the group width.
    #[must_use]
    pub fn width(mut self, width: GroupWidth) -> Self {
        self.position.width = width;
        self
    }

    /// Sets whether the group is boxed in a card.
    #[must_use]
    pub fn card(mut self, card: bool) -> Self {
        self.card = card;
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSchema {
    Groups(Vec<GroupSpec>),
    Wrapped { groups: Vec<GroupSpec> },
}

/// An ordered list of groups with names validated to be unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormSchema {
    groups: Vec<GroupSpec>,
}

impl FormSchema {
    /// Creates a schema, rejecting empty or duplicate field names and
    /// table columns that cannot hold a string cell.
    pub fn new(groups: Vec<GroupSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for field in groups.iter().flat_map(|g| &g.fields) {
            if field.name.is_empty() {
                return Err(FormError::EmptyFieldName {
                    label: field.label.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(FormError::DuplicateField(field.name.clone()));
            }
            if let Some(columns) = field.columns() {
                check_columns(&field.name, columns)?;
            }
        }
        Ok(Self { groups })
    }

    /// Creates a schema with all fields in one untitled group.
    pub fn single(fields: Vec<FieldSpec>) -> Result<Self> {
        Self::new(vec![GroupSpec::new("default", fields)])
    }

    /// Parses a schema from JSON.
    ///
    /// Accepts either an array of groups or an object with a `groups` key.
    pub fn from_json(json: &str) -> Result<Self> {
        let groups = match serde_json::from_str(json)? {
            RawSchema::Groups(groups) | RawSchema::Wrapped { groups } => groups,
        };
        Self::new(groups)
    }

    /// Reads and parses a JSON schema file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Returns the groups in schema order.
    pub fn groups(&self) -> &[GroupSpec] {
        &self.groups
    }

    /// Returns every field in schema order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.groups.iter().flat_map(|g| g.fields.iter())
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.name == name)
    }
}

fn check_columns(table: &str, columns: &[FieldSpec]) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        let invalid = |message: &str| FormError::InvalidColumn {
            field: table.to_string(),
            column: column.name.clone(),
            message: message.to_string(),
        };
        if column.name.is_empty() {
            return Err(invalid("column name must not be empty"));
        }
        if !seen.insert(column.name.as_str()) {
            return Err(invalid("duplicate column name"));
        }
        if !column.kind.is_cell_kind() {
            return Err(invalid(&format!(
                "{} columns are not supported",
                column.kind.type_name()
            )));
        }
    }
    Ok(())
}

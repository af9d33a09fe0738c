//! Form widgets for rendering HTML inputs.

mod bootstrap;
mod table;

pub use bootstrap::{
    BootstrapCheckbox, BootstrapImageInput, BootstrapRadioSelect, BootstrapSelect,
    BootstrapTextInput, BootstrapTextarea,
};
pub use table::BootstrapTableEditor;

use std::collections::BTreeMap;

use crate::value::FieldValue;

/// Attributes that can be applied to a widget.
#[derive(Debug, Clone, Default)]
pub struct WidgetAttrs {
    /// HTML attributes, rendered in key order.
    pub attrs: BTreeMap<String, String>,
}

impl WidgetAttrs {
    /// Creates new empty widget attributes.
    pub fn new() -> Self {
        Self {
            attrs: BTreeMap::new(),
        }
    }

    /// Sets an attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Gets an attribute.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.attrs.get(key)
    }

    /// Builder method to set an attribute.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the `id` attribute, or the default id for `name`.
    pub fn id_for(&self, name: &str) -> String {
        self.get("id")
            .cloned()
            .unwrap_or_else(|| format!("id_{name}"))
    }

    /// Joins `base` with any extra `class` attribute.
    pub fn class_with(&self, base: &str) -> String {
        match self.get("class") {
            Some(extra) if !extra.is_empty() => format!("{base} {extra}"),
            _ => base.to_string(),
        }
    }

    /// Renders every attribute except `class` and `id`, each with a
    /// leading space.
    pub fn extra_html(&self) -> String {
        self.attrs
            .iter()
            .filter(|(k, _)| k.as_str() != "class" && k.as_str() != "id")
            .map(|(k, v)| format!(r#" {k}="{}""#, html_escape(v)))
            .collect()
    }
}

/// Trait for form widgets that render HTML inputs.
pub trait Widget {
    /// Renders the widget as HTML.
    ///
    /// # Arguments
    /// * `name` - The field name (used for the name attribute)
    /// * `value` - The current value
    /// * `attrs` - Additional HTML attributes
    fn render(&self, name: &str, value: &FieldValue, attrs: &WidgetAttrs) -> String;

    /// Returns the HTML input type.
    fn input_type(&self) -> &str {
        "text"
    }
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }

    #[test]
    fn test_widget_attrs() {
        let attrs = WidgetAttrs::new()
            .with("class", "is-invalid")
            .with("id", "my-input")
            .with("data-field", "name")
            .with("disabled", "disabled");
        assert_eq!(attrs.id_for("name"), "my-input");
        assert_eq!(attrs.class_with("form-control"), "form-control is-invalid");
        assert_eq!(
            attrs.extra_html(),
            r#" data-field="name" disabled="disabled""#
        );
    }

    #[test]
    fn test_default_id() {
        assert_eq!(WidgetAttrs::new().id_for("email"), "id_email");
    }
}

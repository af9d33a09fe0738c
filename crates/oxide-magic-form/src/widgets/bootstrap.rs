//! Bootstrap 5 form widgets.

use super::{html_escape, Widget, WidgetAttrs};
use crate::schema::SelectOption;
use crate::value::FieldValue;

fn text_of(value: &FieldValue) -> &str {
    value.as_text().unwrap_or_default()
}

fn placeholder_attr(placeholder: Option<&String>) -> String {
    placeholder
        .map(|p| format!(r#" placeholder="{}""#, html_escape(p)))
        .unwrap_or_default()
}

/// Bootstrap 5 text input widget (text, number, date).
#[derive(Debug, Clone)]
pub struct BootstrapTextInput {
    /// The HTML input type.
    pub input_type: String,
    /// Placeholder text.
    pub placeholder: Option<String>,
}

impl Default for BootstrapTextInput {
    fn default() -> Self {
        Self {
            input_type: "text".to_string(),
            placeholder: None,
        }
    }
}

impl BootstrapTextInput {
    /// Creates a new text input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a number input.
    pub fn number() -> Self {
        Self {
            input_type: "number".to_string(),
            ..Default::default()
        }
    }

    /// Creates a date input.
    pub fn date() -> Self {
        Self {
            input_type: "date".to_string(),
            ..Default::default()
        }
    }

    /// Sets the placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: Option<impl Into<String>>) -> Self {
        self.placeholder = text.map(Into::into);
        self
    }
}

impl Widget for BootstrapTextInput {
    fn render(&self, name: &str, value: &FieldValue, attrs: &WidgetAttrs) -> String {
        format!(
            r#"<input type="{}" class="{}" id="{}" name="{}" value="{}"{}{}>"#,
            self.input_type,
            attrs.class_with("form-control"),
            html_escape(&attrs.id_for(name)),
            html_escape(name),
            html_escape(text_of(value)),
            placeholder_attr(self.placeholder.as_ref()),
            attrs.extra_html()
        )
    }

    fn input_type(&self) -> &str {
        &self.input_type
    }
}

/// Bootstrap 5 textarea widget.
#[derive(Debug, Clone)]
pub struct BootstrapTextarea {
    /// Number of rows.
    pub rows: usize,
    /// Placeholder text.
    pub placeholder: Option<String>,
}

impl BootstrapTextarea {
    /// Creates a new textarea with the specified rows.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            placeholder: None,
        }
    }

    /// Sets the placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: Option<impl Into<String>>) -> Self {
        self.placeholder = text.map(Into::into);
        self
    }
}

impl Widget for BootstrapTextarea {
    fn render(&self, name: &str, value: &FieldValue, attrs: &WidgetAttrs) -> String {
        format!(
            r#"<textarea class="{}" id="{}" name="{}" rows="{}"{}{}>{}</textarea>"#,
            attrs.class_with("form-control"),
            html_escape(&attrs.id_for(name)),
            html_escape(name),
            self.rows,
            placeholder_attr(self.placeholder.as_ref()),
            attrs.extra_html(),
            html_escape(text_of(value))
        )
    }

    fn input_type(&self) -> &str {
        "textarea"
    }
}

/// Bootstrap 5 select widget.
#[derive(Debug, Clone)]
pub struct BootstrapSelect {
    /// Available choices.
    pub choices: Vec<SelectOption>,
    /// Label of the leading empty option.
    pub blank_label: String,
}

impl BootstrapSelect {
    /// Creates a new select with the given choices.
    pub fn new(choices: Vec<SelectOption>) -> Self {
        Self {
            choices,
            blank_label: "Select".to_string(),
        }
    }

    /// Sets the blank label.
    #[must_use]
    pub fn blank_label(mut self, label: impl Into<String>) -> Self {
        self.blank_label = label.into();
        self
    }
}

impl Widget for BootstrapSelect {
    fn render(&self, name: &str, value: &FieldValue, attrs: &WidgetAttrs) -> String {
        let current = text_of(value);
        let mut options = format!(
            r#"<option value="">{}</option>"#,
            html_escape(&self.blank_label)
        );

        for choice in &self.choices {
            let selected_attr = if choice.value == current { " selected" } else { "" };
            options.push_str(&format!(
                r#"<option value="{}"{selected_attr}>{}</option>"#,
                html_escape(&choice.value),
                html_escape(&choice.display_name)
            ));
        }

        format!(
            r#"<select class="{}" id="{}" name="{}"{}>{}</select>"#,
            attrs.class_with("form-select"),
            html_escape(&attrs.id_for(name)),
            html_escape(name),
            attrs.extra_html(),
            options
        )
    }

    fn input_type(&self) -> &str {
        "select"
    }
}

/// Bootstrap 5 checkbox widget.
#[derive(Debug, Clone, Default)]
pub struct BootstrapCheckbox {
    /// Label for the checkbox.
    pub label: Option<String>,
    /// Whether to use switch style.
    pub is_switch: bool,
}

impl BootstrapCheckbox {
    /// Creates a new checkbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a switch-style checkbox.
    pub fn switch() -> Self {
        Self {
            is_switch: true,
            ..Default::default()
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl Widget for BootstrapCheckbox {
    fn render(&self, name: &str, value: &FieldValue, attrs: &WidgetAttrs) -> String {
        let id = attrs.id_for(name);
        let checked_attr = if value.as_bool().unwrap_or(false) {
            " checked"
        } else {
            ""
        };

        let wrapper_class = if self.is_switch {
            "form-check form-switch"
        } else {
            "form-check"
        };

        let label_html = self
            .label
            .as_ref()
            .map(|l| {
                format!(
                    r#"<label class="form-check-label" for="{}">{}</label>"#,
                    html_escape(&id),
                    html_escape(l)
                )
            })
            .unwrap_or_default();

        format!(
            r#"<div class="{}">
  <input class="{}" type="checkbox" id="{}" name="{}" value="true"{checked_attr}{}>
  {}
</div>"#,
            wrapper_class,
            attrs.class_with("form-check-input"),
            html_escape(&id),
            html_escape(name),
            attrs.extra_html(),
            label_html
        )
    }

    fn input_type(&self) -> &str {
        "checkbox"
    }
}

/// Bootstrap 5 radio select widget.
#[derive(Debug, Clone, Default)]
pub struct BootstrapRadioSelect {
    /// Available choices.
    pub choices: Vec<SelectOption>,
    /// Whether to display inline.
    pub inline: bool,
}

impl BootstrapRadioSelect {
    /// Creates a new radio select with the given choices.
    pub fn new(choices: Vec<SelectOption>) -> Self {
        Self {
            choices,
            inline: false,
        }
    }

    /// Makes the radios display inline.
    #[must_use]
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }
}

impl Widget for BootstrapRadioSelect {
    fn render(&self, name: &str, value: &FieldValue, attrs: &WidgetAttrs) -> String {
        let wrapper_class = if self.inline {
            "form-check form-check-inline"
        } else {
            "form-check"
        };
        let current = text_of(value);
        let base_id = attrs.id_for(name);

        let mut html = String::new();

        for (i, choice) in self.choices.iter().enumerate() {
            let id = html_escape(&format!("{base_id}_{i}"));
            let checked_attr = if choice.value == current { " checked" } else { "" };

            html.push_str(&format!(
                r#"<div class="{}">
  <input class="{}" type="radio" id="{}" name="{}" value="{}"{checked_attr}{}>
  <label class="form-check-label" for="{}">{}</label>
</div>
"#,
                wrapper_class,
                attrs.class_with("form-check-input"),
                id,
                html_escape(name),
                html_escape(&choice.value),
                attrs.extra_html(),
                id,
                html_escape(&choice.display_name)
            ));
        }

        html
    }

    fn input_type(&self) -> &str {
        "radio"
    }
}

/// Bootstrap 5 image file input with an optional preview.
#[derive(Debug, Clone, Default)]
pub struct BootstrapImageInput {
    /// URL of the preview to show under the input.
    pub preview: Option<String>,
}

impl BootstrapImageInput {
    pub fn new(preview: Option<impl Into<String>>) -> Self {
        Self {
            preview: preview.map(Into::into),
        }
    }
}

impl Widget for BootstrapImageInput {
    fn render(&self, name: &str, value: &FieldValue, attrs: &WidgetAttrs) -> String {
        let file_name = value
            .as_file()
            .map(|f| {
                format!(
                    r#"<div class="form-text">{}</div>"#,
                    html_escape(&f.name)
                )
            })
            .unwrap_or_default();
        let preview = self
            .preview
            .as_ref()
            .map(|url| {
                format!(
                    r#"<img src="{}" alt="Preview" class="mt-2 rounded border" width="128" height="128" style="object-fit: cover">"#,
                    html_escape(url)
                )
            })
            .unwrap_or_default();

        format!(
            r#"<input type="file" accept="image/*" class="{}" id="{}" name="{}"{}>{file_name}{preview}"#,
            attrs.class_with("form-control"),
            html_escape(&attrs.id_for(name)),
            html_escape(name),
            attrs.extra_html()
        )
    }

    fn input_type(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FileRef;

    fn choices() -> Vec<SelectOption> {
        vec![SelectOption::new("1", "Option 1"), SelectOption::new("2", "Option 2")]
    }

    #[test]
    fn test_bootstrap_text_input() {
        let widget = BootstrapTextInput::new().placeholder(Some("Enter name"));
        let html = widget.render("username", &"bob".into(), &WidgetAttrs::new());
        assert!(html.contains(r#"class="form-control""#));
        assert!(html.contains(r#"name="username""#));
        assert!(html.contains(r#"value="bob""#));
        assert!(html.contains(r#"placeholder="Enter name""#));
    }

    #[test]
    fn test_bootstrap_number_and_date() {
        let attrs = WidgetAttrs::new();
        let html = BootstrapTextInput::number().render("qty", &"abc".into(), &attrs);
        assert!(html.contains(r#"type="number""#));
        assert!(html.contains(r#"value="abc""#));
        let html = BootstrapTextInput::date().render("due", &"2024-01-15".into(), &attrs);
        assert!(html.contains(r#"type="date""#));
    }

    #[test]
    fn test_value_is_escaped() {
        let widget = BootstrapTextInput::new();
        let html = widget.render("q", &r#""><script>"#.into(), &WidgetAttrs::new());
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_bootstrap_textarea() {
        let widget = BootstrapTextarea::new(6);
        let html = widget.render("content", &"Hello".into(), &WidgetAttrs::new());
        assert!(html.contains(r#"class="form-control""#));
        assert!(html.contains(r#"rows="6""#));
        assert!(html.contains(">Hello</textarea>"));
    }

    #[test]
    fn test_bootstrap_select() {
        let widget = BootstrapSelect::new(choices()).blank_label("Pick");
        let html = widget.render("choice", &"2".into(), &WidgetAttrs::new());
        assert!(html.contains(r#"class="form-select""#));
        assert!(html.contains(r#"<option value="">Pick</option>"#));
        assert!(html.contains(r#"value="2" selected"#));
    }

    #[test]
    fn test_bootstrap_checkbox() {
        let widget = BootstrapCheckbox::new().label("I agree");
        let html = widget.render("agree", &true.into(), &WidgetAttrs::new());
        assert!(html.contains("form-check"));
        assert!(html.contains("checked"));
        assert!(html.contains("I agree"));
    }

    #[test]
    fn test_bootstrap_switch() {
        let widget = BootstrapCheckbox::switch();
        let html = widget.render("enabled", &false.into(), &WidgetAttrs::new());
        assert!(html.contains("form-switch"));
        assert!(!html.contains("checked"));
    }

    #[test]
    fn test_bootstrap_radio_select() {
        let widget = BootstrapRadioSelect::new(choices());
        let html = widget.render("choice", &"2".into(), &WidgetAttrs::new());
        assert!(html.contains("form-check"));
        assert!(html.contains(r#"value="2" checked"#));
        assert!(html.contains(r#"id="id_choice_1""#));
    }

    #[test]
    fn test_image_input_preview() {
        let widget = BootstrapImageInput::new(Some("blob:app/1"));
        let value = FieldValue::from(FileRef::new("me.png"));
        let html = widget.render("avatar", &value, &WidgetAttrs::new());
        assert!(html.contains(r#"type="file""#));
        assert!(html.contains(r#"accept="image/*""#));
        assert!(html.contains(r#"src="blob:app/1""#));
        assert!(html.contains("me.png"));

        let html = BootstrapImageInput::default().render(
            "avatar",
            &FieldValue::File(None),
            &WidgetAttrs::new(),
        );
        assert!(!html.contains("<img"));
    }
}

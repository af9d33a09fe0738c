//! The form component: owned state, event dispatch, submission and rendering.
//!
//! A [`FormRenderer`] owns the values, errors and image previews of one form
//! instance. Every user interaction is a [`FormMsg`] passed to
//! [`FormRenderer::dispatch`], so state transitions can be driven and tested
//! without a browser.

use std::collections::HashMap;

use ironhtml::html;
use ironhtml::typed::Element;
use ironhtml_elements::{Button, Div, H5};
use tracing::{debug, info, warn};

use crate::combobox::{ComboItem, Combobox};
use crate::error::{FormError, Result, ValidationErrors};
use crate::layout::{
    field_wrapper_class, fields_container_class, group_width_class, layout_rows, ROW_CLASS,
};
use crate::options::{FormOptions, ModalOptions};
use crate::preview::{PreviewProvider, PreviewState, PreviewUrl};
use crate::schema::{FieldKind, FieldSpec, FormSchema, GroupSpec};
use crate::table::TableEditor;
use crate::validation::{validate_form, RequiredValidator, Validator};
use crate::value::{FieldValue, FileRef, FormData};
use crate::widgets::{
    BootstrapCheckbox, BootstrapImageInput, BootstrapRadioSelect, BootstrapSelect,
    BootstrapTableEditor, BootstrapTextInput, BootstrapTextarea, Widget, WidgetAttrs,
};

/// A raw input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Text typed or an option picked.
    Value(String),
    /// Checkbox toggled.
    Checked(bool),
    /// Files chosen in a file input. Only the first is kept.
    Files(Vec<FileRef>),
}

/// Everything a user can do to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMsg {
    Change { field: String, event: ChangeEvent },
    AddRow { field: String },
    RemoveRow { field: String, index: usize },
    UpdateCell {
        field: String,
        row: usize,
        column: String,
        value: String,
    },
    Select { field: String, value: String },
    RemoveSelected { field: String, value: String },
    ClearSelection { field: String },
    OpenModal,
    CloseModal,
    Submit,
}

type SubmitHandler = Box<dyn FnMut(&FormData)>;
type CloseHandler = Box<dyn FnMut()>;

/// A schema-driven form instance.
pub struct FormRenderer {
    schema: FormSchema,
    options: FormOptions,
    values: FormData,
    errors: ValidationErrors,
    previews: PreviewState,
    comboboxes: HashMap<String, Combobox<String>>,
    validators: Vec<Box<dyn Validator>>,
    on_submit: Option<SubmitHandler>,
    on_close: Option<CloseHandler>,
    modal_open: bool,
}

fn lookup<'a>(schema: &'a FormSchema, name: &str) -> Result<&'a FieldSpec> {
    schema
        .field(name)
        .ok_or_else(|| FormError::UnknownField(name.to_string()))
}

fn defaults(schema: &FormSchema) -> FormData {
    let mut values = FormData::new();
    for field in schema.fields() {
        values.insert(field.name.clone(), FieldValue::default_for(&field.kind));
    }
    values
}

fn expected_event(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Checkbox => "a checked event",
        FieldKind::Image => "a file event",
        FieldKind::Table { .. } => "row operations",
        kind if kind.is_multi_select() => "combobox selections",
        _ => "a value event",
    }
}

/// The stored value matching a combobox's selection.
fn combobox_value(combo: &Combobox<String>) -> FieldValue {
    if combo.is_multi_select() {
        FieldValue::List(combo.selected_values().to_vec())
    } else {
        FieldValue::Text(combo.selected_values().first().cloned().unwrap_or_default())
    }
}

fn not_offered(field: &FieldSpec, value: &str) -> FormError {
    FormError::InvalidValue {
        field: field.name.clone(),
        message: format!("{value:?} is not one of the options"),
    }
}

/// Rejects values an autocomplete select does not offer.
fn check_offered(field: &FieldSpec, value: &FieldValue) -> Result<()> {
    let FieldKind::Select {
        options,
        autocomplete: true,
        ..
    } = &field.kind
    else {
        return Ok(());
    };
    let offered = |v: &str| options.iter().any(|o| o.value == v);
    let unknown = match value {
        FieldValue::Text(v) if !v.is_empty() && !offered(v) => Some(v.as_str()),
        FieldValue::List(values) => values.iter().map(String::as_str).find(|v| !offered(v)),
        _ => None,
    };
    match unknown {
        Some(v) => Err(not_offered(field, v)),
        None => Ok(()),
    }
}

fn combobox_for(field: &FieldSpec) -> Option<Combobox<String>> {
    let FieldKind::Select {
        options,
        autocomplete: true,
        multiple,
    } = &field.kind
    else {
        return None;
    };
    let data = options
        .iter()
        .map(|o| ComboItem::new(o.value.clone(), o.display_name.clone()))
        .collect();
    Some(
        Combobox::new(data)
            .multi_select(*multiple)
            .title(field.placeholder.as_deref().unwrap_or("Select"))
            .disabled(field.disabled),
    )
}

impl FormRenderer {
    /// Creates a form with every field at its default value.
    pub fn new(schema: FormSchema, options: FormOptions) -> Self {
        let values = defaults(&schema);
        let comboboxes = schema
            .fields()
            .filter_map(|f| combobox_for(f).map(|c| (f.name.clone(), c)))
            .collect();
        Self {
            schema,
            options,
            values,
            errors: ValidationErrors::new(),
            previews: PreviewState::default(),
            comboboxes,
            validators: vec![Box::new(RequiredValidator::new())],
            on_submit: None,
            on_close: None,
            modal_open: false,
        }
    }

    /// Applies initial values (see [`FormRenderer::set_initial_values`]).
    pub fn with_initial_values(mut self, values: &FormData) -> Result<Self> {
        self.set_initial_values(values)?;
        Ok(self)
    }

    /// Registers the submit callback.
    #[must_use]
    pub fn on_submit(mut self, handler: impl FnMut(&FormData) + 'static) -> Self {
        self.on_submit = Some(Box::new(handler));
        self
    }

    /// Registers the callback fired when the dialog is dismissed.
    #[must_use]
    pub fn on_close(mut self, handler: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(handler));
        self
    }

    /// Replaces the source of image preview URLs.
    #[must_use]
    pub fn with_preview_provider(mut self, provider: impl PreviewProvider + 'static) -> Self {
        self.previews = PreviewState::new(provider);
        self
    }

    /// Replaces the validators run on submit.
    #[must_use]
    pub fn with_validators(mut self, validators: Vec<Box<dyn Validator>>) -> Self {
        self.validators = validators;
        self
    }

    /// Resets the state to defaults overlaid with `values`.
    ///
    /// Ignored while the `loading` option is set; returns whether the reset
    /// happened. Edits made since the last reset are discarded and initial
    /// image files get fresh previews. Values for unknown fields are skipped;
    /// a value of the wrong kind, or an option an autocomplete select does
    /// not offer, fails the whole reset and leaves the state untouched.
    pub fn set_initial_values(&mut self, values: &FormData) -> Result<bool> {
        if self.options.loading {
            debug!("Form is loading, ignoring initial values");
            return Ok(false);
        }

        let mut next = defaults(&self.schema);
        for (name, value) in values {
            let Some(field) = self.schema.field(name) else {
                warn!(field = %name, "Skipping initial value for unknown field");
                continue;
            };
            if !value.fits(field) {
                return Err(FormError::TypeMismatch {
                    field: name.clone(),
                    expected: expected_event(&field.kind),
                });
            }
            check_offered(field, value)?;
            next.insert(name.clone(), value.clone());
        }

        self.previews.release_all();
        for (name, value) in &next {
            if let FieldValue::File(Some(file)) = value {
                self.previews.set(name, file);
            }
        }
        for (name, combo) in &mut self.comboboxes {
            match next.get(name) {
                Some(FieldValue::List(selected)) => combo.sync(selected.iter().cloned()),
                Some(FieldValue::Text(s)) if !s.is_empty() => combo.sync([s.clone()]),
                _ => combo.sync([]),
            }
        }
        self.values = next;
        debug!(fields = self.values.len(), "Form state reset");
        Ok(true)
    }

    /// Sets the loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.options.loading = loading;
    }

    /// Applies one user interaction.
    pub fn dispatch(&mut self, msg: FormMsg) -> Result<()> {
        debug!(msg = ?msg, "Dispatching form event");
        match msg {
            FormMsg::Change { field, event } => self.handle_change(&field, event),
            FormMsg::AddRow { field } => self.add_row(&field).map(|_| ()),
            FormMsg::RemoveRow { field, index } => self.remove_row(&field, index),
            FormMsg::UpdateCell {
                field,
                row,
                column,
                value,
            } => self.update_cell(&field, row, &column, value),
            FormMsg::Select { field, value } => self.select_option(&field, value),
            FormMsg::RemoveSelected { field, value } => self.remove_selected(&field, &value),
            FormMsg::ClearSelection { field } => self.clear_selection(&field),
            FormMsg::OpenModal => {
                self.open_modal();
                Ok(())
            }
            FormMsg::CloseModal => {
                self.close_modal();
                Ok(())
            }
            FormMsg::Submit => {
                self.handle_submit();
                Ok(())
            }
        }
    }

    /// Stores the value carried by an input event. Does not revalidate.
    ///
    /// A file event with no files leaves the field untouched.
    pub fn handle_change(&mut self, field: &str, event: ChangeEvent) -> Result<()> {
        let spec = lookup(&self.schema, field)?;
        let value = match (&spec.kind, event) {
            (FieldKind::Image, ChangeEvent::Files(files)) => {
                let Some(file) = files.into_iter().next() else {
                    return Ok(());
                };
                self.previews.set(field, &file);
                FieldValue::File(Some(file))
            }
            (FieldKind::Checkbox, ChangeEvent::Checked(checked)) => FieldValue::Bool(checked),
            (kind, ChangeEvent::Value(text))
                if matches!(FieldValue::default_for(kind), FieldValue::Text(_)) =>
            {
                check_offered(spec, &FieldValue::Text(text.clone()))?;
                if let Some(combo) = self.comboboxes.get_mut(field) {
                    if text.is_empty() {
                        combo.sync([]);
                    } else {
                        combo.sync([text.clone()]);
                    }
                }
                FieldValue::Text(text)
            }
            (kind, _) => {
                return Err(FormError::TypeMismatch {
                    field: field.to_string(),
                    expected: expected_event(kind),
                })
            }
        };
        self.values.insert(field, value);
        Ok(())
    }

    /// Clears the image of `field` and releases its preview.
    pub fn clear_file(&mut self, field: &str) -> Result<()> {
        let spec = lookup(&self.schema, field)?;
        if !matches!(spec.kind, FieldKind::Image) {
            return Err(FormError::TypeMismatch {
                field: field.to_string(),
                expected: expected_event(&spec.kind),
            });
        }
        self.previews.release(field);
        self.values.insert(field, FieldValue::File(None));
        Ok(())
    }

    /// Recomputes the error state from scratch and returns whether it is empty.
    pub fn validate(&mut self) -> bool {
        self.errors = validate_form(&self.schema, &self.values, &self.validators);
        if !self.errors.is_empty() {
            debug!(errors = self.errors.len(), "Form validation failed");
        }
        self.errors.is_empty()
    }

    /// Validates and, when valid, hands the current values to the submit
    /// callback. Returns whether the callback was invoked.
    pub fn handle_submit(&mut self) -> bool {
        if !self.validate() {
            return false;
        }
        info!(fields = self.values.len(), "Submitting form");
        if let Some(handler) = self.on_submit.as_mut() {
            handler(&self.values);
        }
        true
    }

    fn rows_mut(&mut self, field: &str) -> Result<TableEditor<'_>> {
        let spec = lookup(&self.schema, field)?;
        match self.values.get_mut(field) {
            Some(FieldValue::Rows(rows)) => TableEditor::new(spec, rows),
            _ => Err(FormError::NotATable(field.to_string())),
        }
    }

    /// Appends an empty row to a table field and returns its index.
    pub fn add_row(&mut self, field: &str) -> Result<usize> {
        Ok(self.rows_mut(field)?.add_row())
    }

    /// Removes a table row; later rows shift down.
    pub fn remove_row(&mut self, field: &str, index: usize) -> Result<()> {
        self.rows_mut(field)?.remove_row(index).map(|_| ())
    }

    /// Sets one table cell.
    pub fn update_cell(
        &mut self,
        field: &str,
        row: usize,
        column: &str,
        value: impl Into<String>,
    ) -> Result<()> {
        self.rows_mut(field)?.update_cell(row, column, value)
    }

    fn combobox_mut(&mut self, field: &str) -> Result<&mut Combobox<String>> {
        let spec = lookup(&self.schema, field)?;
        let expected = expected_event(&spec.kind);
        self.comboboxes
            .get_mut(field)
            .ok_or_else(|| FormError::TypeMismatch {
                field: field.to_string(),
                expected,
            })
    }

    /// Picks an option in an autocomplete select.
    ///
    /// Values that are not among the field's options are rejected.
    pub fn select_option(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let combo = self.combobox_mut(field)?;
        if !combo.data().iter().any(|item| item.value == value) {
            let spec = lookup(&self.schema, field)?;
            return Err(not_offered(spec, &value));
        }
        if combo.select(value).is_some() {
            let value = combobox_value(combo);
            self.values.insert(field, value);
        }
        Ok(())
    }

    /// Removes one selected value from an autocomplete select.
    pub fn remove_selected(&mut self, field: &str, value: &str) -> Result<()> {
        let combo = self.combobox_mut(field)?;
        if combo.remove(&value.to_string()).is_some() {
            let value = combobox_value(combo);
            self.values.insert(field, value);
        }
        Ok(())
    }

    /// Empties an autocomplete select.
    pub fn clear_selection(&mut self, field: &str) -> Result<()> {
        let combo = self.combobox_mut(field)?;
        if combo.clear().is_some() {
            let value = combobox_value(combo);
            self.values.insert(field, value);
        }
        Ok(())
    }

    /// Opens the dialog. No-op unless the form is modal.
    pub fn open_modal(&mut self) {
        if self.options.modal.is_some() {
            self.modal_open = true;
        }
    }

    /// Closes the dialog, firing the close callback if it was open.
    pub fn close_modal(&mut self) {
        if !self.modal_open {
            return;
        }
        self.modal_open = false;
        if let Some(handler) = self.on_close.as_mut() {
            handler();
        }
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Returns the current values of every field.
    pub fn values(&self) -> &FormData {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Returns the errors of the last validation pass.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn preview(&self, field: &str) -> Option<&PreviewUrl> {
        self.previews.get(field)
    }

    pub fn combobox(&self, field: &str) -> Option<&Combobox<String>> {
        self.comboboxes.get(field)
    }

    /// Renders the whole form, wrapped in a dialog when modal.
    pub fn render(&self) -> String {
        match &self.options.modal {
            Some(modal) => self.render_modal(modal),
            None => {
                let title = &self.options.title;
                let heading = html! {
                    h2.class("mb-4") { #title }
                };
                Element::<Div>::new()
                    .class("magic-form")
                    .raw(heading.render())
                    .raw(&self.render_body())
                    .render()
            }
        }
    }

    fn render_modal(&self, modal: &ModalOptions) -> String {
        let target = format!("#{}", modal.dialog_id);
        let label_id = format!("{}_label", modal.dialog_id);
        let dialog_class = if self.modal_open {
            "modal fade show d-block"
        } else {
            "modal fade"
        };

        let trigger = Element::<Button>::new()
            .attr("type", "button")
            .class("btn btn-primary")
            .attr("data-action", "open-modal")
            .attr("data-bs-toggle", "modal")
            .attr("data-bs-target", &target)
            .text(&modal.trigger_label)
            .render();

        let dialog = Element::<Div>::new()
            .class(dialog_class)
            .attr("id", &modal.dialog_id)
            .attr("tabindex", "-1")
            .attr("aria-labelledby", &label_id)
            .attr("aria-hidden", if self.modal_open { "false" } else { "true" })
            .child::<Div, _>(|d| {
                d.class("modal-dialog modal-lg").child::<Div, _>(|c| {
                    c.class("modal-content")
                        .child::<Div, _>(|h| {
                            h.class("modal-header")
                                .child::<H5, _>(|t| {
                                    t.class("modal-title")
                                        .attr("id", &label_id)
                                        .text(&self.options.title)
                                })
                                .child::<Button, _>(|b| {
                                    b.attr("type", "button")
                                        .class("btn-close")
                                        .attr("data-action", "close-modal")
                                        .attr("data-bs-dismiss", "modal")
                                        .attr("aria-label", "Close")
                                })
                        })
                        .child::<Div, _>(|b| b.class("modal-body").raw(&self.render_body()))
                })
            })
            .render();

        format!("{trigger}{dialog}")
    }

    fn render_body(&self) -> String {
        let mut body = String::new();
        for row in layout_rows(&self.schema) {
            let mut row_el = Element::<Div>::new()
                .class(ROW_CLASS)
                .attr("data-row", &row.row.to_string());
            for group in row.groups {
                row_el = row_el.raw(&self.render_group(group));
            }
            row_el.render_to(&mut body);
        }

        Element::<Div>::new()
            .class("d-flex justify-content-end mb-3")
            .child::<Button, _>(|b| {
                b.attr("type", "button")
                    .class("btn btn-primary")
                    .attr("data-action", "submit")
                    .text(&self.options.submit_label)
            })
            .render_to(&mut body);
        body
    }

    fn render_group(&self, group: &GroupSpec) -> String {
        let fields_html: String = group
            .fields
            .iter()
            .map(|field| {
                Element::<Div>::new()
                    .class(field_wrapper_class(group.layout, field.width))
                    .raw(&self.render_field(field))
                    .render()
            })
            .collect();
        let container_class = fields_container_class(group.layout);
        let title = group.title.as_deref().filter(|t| !t.is_empty());

        let container = Element::<Div>::new()
            .class(&container_class)
            .raw(&fields_html);
        let mut outer = Element::<Div>::new();
        if group.card {
            outer = outer.class("card h-100");
            if let Some(title) = title {
                outer = outer.child::<Div, _>(|h| h.class("card-header fw-semibold").text(title));
            }
            outer = outer.child::<Div, _>(|b| b.class("card-body").raw(container.render()));
        } else {
            if let Some(title) = title {
                outer = outer.child::<H5, _>(|h| h.class("mb-3").text(title));
            }
            outer = outer.raw(container.render());
        }

        Element::<Div>::new()
            .class(group_width_class(group.position.width))
            .attr("data-group", &group.key)
            .raw(outer.render())
            .render()
    }

    /// Renders one field: label, input, inline error and help text.
    pub fn render_field(&self, field: &FieldSpec) -> String {
        let name = field.name.as_str();
        let id = format!("id_{name}");
        let error = self.errors.get(name);
        let default_value;
        let value = match self.values.get(name) {
            Some(value) => value,
            None => {
                default_value = FieldValue::default_for(&field.kind);
                &default_value
            }
        };

        let mut attrs = WidgetAttrs::new()
            .with("id", id.as_str())
            .with("data-field", name)
            .with("data-action", "change");
        if error.is_some() {
            attrs.set("class", "is-invalid");
        }
        if field.disabled {
            attrs.set("disabled", "disabled");
        }
        if field.required {
            attrs.set("required", "required");
        }

        let placeholder = field.placeholder.as_deref();
        let input_html = match &field.kind {
            FieldKind::Text => BootstrapTextInput::new()
                .placeholder(placeholder)
                .render(name, value, &attrs),
            FieldKind::Number => BootstrapTextInput::number()
                .placeholder(placeholder)
                .render(name, value, &attrs),
            FieldKind::Date => BootstrapTextInput::date()
                .placeholder(placeholder)
                .render(name, value, &attrs),
            FieldKind::Textarea { rows } => BootstrapTextarea::new(*rows)
                .placeholder(placeholder)
                .render(name, value, &attrs),
            FieldKind::Checkbox => BootstrapCheckbox::new()
                .label(field.label.as_str())
                .render(name, value, &attrs),
            FieldKind::Select {
                autocomplete: true, ..
            } => self
                .comboboxes
                .get(name)
                .map(|combo| combo.render(name, error.is_some()))
                .unwrap_or_default(),
            FieldKind::Select { options, .. } => BootstrapSelect::new(options.clone())
                .blank_label(placeholder.unwrap_or("Select"))
                .render(name, value, &attrs),
            FieldKind::Radio { options } => {
                BootstrapRadioSelect::new(options.clone()).render(name, value, &attrs)
            }
            FieldKind::Image => {
                BootstrapImageInput::new(self.previews.get(name).map(PreviewUrl::as_str))
                    .render(name, value, &attrs)
            }
            FieldKind::Table { columns } => {
                BootstrapTableEditor::new(columns).render(name, value, &attrs)
            }
        };

        let required_marker = if field.required { " *" } else { "" };
        let label_text = format!("{}{}", field.label, required_marker);
        let label_el = html! {
            label.for_(#id).class("form-label") { #label_text }
        };
        let show_label = !matches!(field.kind, FieldKind::Checkbox) && !field.label.is_empty();

        let mut wrapper = Element::<Div>::new().class("mb-3");
        if show_label {
            wrapper = wrapper.raw(label_el.render());
        }
        wrapper = wrapper.raw(&input_html);
        if let Some(message) = error {
            wrapper = wrapper.child::<Div, _>(|e| e.class("invalid-feedback d-block").text(message));
        }
        if let Some(help) = &field.help_text {
            wrapper = wrapper.child::<Div, _>(|h| h.class("form-text").text(help));
        }
        wrapper.render()
    }
}

impl std::fmt::Debug for FormRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormRenderer")
            .field("schema", &self.schema)
            .field("options", &self.options)
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("previews", &self.previews)
            .field("modal_open", &self.modal_open)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::REQUIRED_MESSAGE;
    use crate::schema::SelectOption;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn username_form() -> FormRenderer {
        let schema =
            FormSchema::single(vec![FieldSpec::text("username", "Username").required()]).unwrap();
        FormRenderer::new(schema, FormOptions::default())
    }

    fn submissions(form: FormRenderer) -> (FormRenderer, Rc<RefCell<Vec<FormData>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let form = form.on_submit(move |data| sink.borrow_mut().push(data.clone()));
        (form, seen)
    }

    #[test]
    fn test_required_username_scenario() {
        let (mut form, seen) = submissions(username_form());

        assert!(!form.handle_submit());
        assert!(seen.borrow().is_empty());
        assert_eq!(form.error("username"), Some(REQUIRED_MESSAGE));
        assert!(form.render().contains(REQUIRED_MESSAGE));

        form.handle_change("username", ChangeEvent::Value("alice".into()))
            .unwrap();
        assert!(form.handle_submit());
        assert_eq!(*seen.borrow(), vec![FormData::new().with("username", "alice")]);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_change_does_not_revalidate() {
        let mut form = username_form();
        form.validate();
        form.handle_change("username", ChangeEvent::Value("bob".into()))
            .unwrap();
        assert!(form.error("username").is_some());
    }

    #[test]
    fn test_change_dispatch_by_kind() {
        let schema = FormSchema::single(vec![
            FieldSpec::checkbox("agree", "Agree"),
            FieldSpec::image("avatar", "Avatar"),
            FieldSpec::number("age", "Age"),
        ])
        .unwrap();
        let mut form = FormRenderer::new(schema, FormOptions::default());

        form.handle_change("agree", ChangeEvent::Checked(true)).unwrap();
        form.handle_change("age", ChangeEvent::Value("forty".into()))
            .unwrap();
        form.handle_change("avatar", ChangeEvent::Files(vec![FileRef::new("me.png")]))
            .unwrap();

        assert_eq!(form.value("agree"), Some(&FieldValue::Bool(true)));
        assert_eq!(form.value("age"), Some(&FieldValue::Text("forty".into())));
        assert_eq!(form.value("avatar").unwrap().as_file().unwrap().name, "me.png");
        assert!(form.preview("avatar").is_some());

        form.handle_change("avatar", ChangeEvent::Files(vec![])).unwrap();
        assert!(form.value("avatar").unwrap().as_file().is_some());

        form.clear_file("avatar").unwrap();
        assert!(form.preview("avatar").is_none());
        assert_eq!(form.value("avatar"), Some(&FieldValue::File(None)));
    }

    #[test]
    fn test_change_errors() {
        let mut form = username_form();
        assert!(matches!(
            form.handle_change("nope", ChangeEvent::Value("x".into())),
            Err(FormError::UnknownField(_))
        ));
        assert!(matches!(
            form.handle_change("username", ChangeEvent::Checked(true)),
            Err(FormError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_dispatch_table_messages() {
        let schema = FormSchema::single(vec![FieldSpec::table(
            "items",
            "Items",
            vec![FieldSpec::text("sku", "SKU")],
        )])
        .unwrap();
        let mut form = FormRenderer::new(schema, FormOptions::default());

        form.dispatch(FormMsg::AddRow {
            field: "items".into(),
        })
        .unwrap();
        form.dispatch(FormMsg::UpdateCell {
            field: "items".into(),
            row: 0,
            column: "sku".into(),
            value: "x".into(),
        })
        .unwrap();
        let rows = form.value("items").unwrap().as_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["sku"], "x");

        form.dispatch(FormMsg::RemoveRow {
            field: "items".into(),
            index: 0,
        })
        .unwrap();
        assert!(form.value("items").unwrap().as_rows().unwrap().is_empty());
    }

    #[test]
    fn test_table_ops_on_non_table() {
        let mut form = username_form();
        assert!(matches!(form.add_row("username"), Err(FormError::NotATable(_))));
    }

    #[test]
    fn test_combobox_selection_stored() {
        let options = vec![SelectOption::new("1", "A"), SelectOption::new("2", "B")];
        let schema = FormSchema::single(vec![
            FieldSpec::autocomplete("tags", "Tags", options.clone(), true),
            FieldSpec::autocomplete("owner", "Owner", options, false),
        ])
        .unwrap();
        let mut form = FormRenderer::new(schema, FormOptions::default());

        form.select_option("tags", "1").unwrap();
        form.select_option("tags", "2").unwrap();
        assert_eq!(
            form.value("tags"),
            Some(&FieldValue::List(vec!["1".into(), "2".into()]))
        );
        form.remove_selected("tags", "1").unwrap();
        assert_eq!(form.value("tags"), Some(&FieldValue::List(vec!["2".into()])));

        form.select_option("owner", "2").unwrap();
        assert_eq!(form.value("owner"), Some(&FieldValue::Text("2".into())));
        form.clear_selection("owner").unwrap();
        assert_eq!(form.value("owner"), Some(&FieldValue::Text(String::new())));

        assert!(matches!(
            form.handle_change("tags", ChangeEvent::Value("1".into())),
            Err(FormError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_loading_gates_initial_values() {
        let schema = FormSchema::single(vec![FieldSpec::text("name", "Name")]).unwrap();
        let mut form = FormRenderer::new(schema, FormOptions::new().loading(true));
        let initial = FormData::new().with("name", "carol");

        assert!(!form.set_initial_values(&initial).unwrap());
        assert_eq!(form.values().text("name"), Some(""));

        form.set_loading(false);
        assert!(form.set_initial_values(&initial).unwrap());
        assert_eq!(form.values().text("name"), Some("carol"));
    }

    #[test]
    fn test_initial_values_overwrite_edits() {
        let mut form = username_form();
        form.handle_change("username", ChangeEvent::Value("typed".into()))
            .unwrap();
        form.set_initial_values(&FormData::new()).unwrap();
        assert_eq!(form.values().text("username"), Some(""));
    }

    #[test]
    fn test_initial_values_type_mismatch() {
        let mut form = username_form();
        let err = form
            .set_initial_values(&FormData::new().with("username", true))
            .unwrap_err();
        assert!(matches!(err, FormError::TypeMismatch { .. }));
    }

    fn owner_form() -> FormRenderer {
        let schema = FormSchema::single(vec![
            FieldSpec::autocomplete("owner", "Owner", vec![SelectOption::new("1", "A")], false),
            FieldSpec::autocomplete("tags", "Tags", vec![SelectOption::new("1", "A")], true),
        ])
        .unwrap();
        FormRenderer::new(schema, FormOptions::default())
    }

    #[test]
    fn test_select_option_rejects_unknown_value() {
        let mut form = owner_form();
        assert!(matches!(
            form.select_option("owner", "zzz"),
            Err(FormError::InvalidValue { .. })
        ));
        assert!(matches!(
            form.select_option("tags", "zzz"),
            Err(FormError::InvalidValue { .. })
        ));
        assert!(matches!(
            form.handle_change("owner", ChangeEvent::Value("zzz".into())),
            Err(FormError::InvalidValue { .. })
        ));
        assert_eq!(form.value("owner"), Some(&FieldValue::Text(String::new())));
        assert_eq!(form.value("tags"), Some(&FieldValue::List(vec![])));
        assert!(form.combobox("owner").unwrap().selected_values().is_empty());

        form.select_option("owner", "1").unwrap();
        assert_eq!(form.value("owner"), Some(&FieldValue::Text("1".into())));
    }

    #[test]
    fn test_initial_values_reject_unknown_options() {
        let mut form = owner_form();
        form.select_option("owner", "1").unwrap();

        let err = form
            .set_initial_values(&FormData::new().with("owner", "zzz"))
            .unwrap_err();
        assert!(matches!(err, FormError::InvalidValue { .. }));

        let tags = FormData::new().with(
            "tags",
            FieldValue::List(vec!["1".into(), "zzz".into()]),
        );
        assert!(matches!(
            form.set_initial_values(&tags),
            Err(FormError::InvalidValue { .. })
        ));

        assert_eq!(form.value("owner"), Some(&FieldValue::Text("1".into())));
        assert!(form
            .set_initial_values(&FormData::new().with("owner", ""))
            .unwrap());
    }

    #[test]
    fn test_modal_close_fires_once() {
        let closed = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&closed);
        let mut form = FormRenderer::new(
            FormSchema::single(vec![FieldSpec::text("a", "A")]).unwrap(),
            FormOptions::new().modal("Open"),
        )
        .on_close(move || *counter.borrow_mut() += 1);

        form.dispatch(FormMsg::OpenModal).unwrap();
        assert!(form.is_modal_open());
        form.dispatch(FormMsg::CloseModal).unwrap();
        form.dispatch(FormMsg::CloseModal).unwrap();
        assert_eq!(*closed.borrow(), 1);
    }

    #[test]
    fn test_render_field_with_error() {
        let mut form = username_form();
        form.validate();
        let field = form.schema().field("username").unwrap().clone();
        let html = form.render_field(&field);
        assert!(html.contains("is-invalid"));
        assert!(html.contains("Username *"));
        assert!(html.contains("invalid-feedback"));
    }
}

//! Searchable single/multi-select picker.
//!
//! The combobox keeps its selection as an ordered list of option values in
//! both modes. Every change is reported as a [`Selection`], shaped by the
//! `multi_select` and `return_full_object` flags:
//!
//! ```rust
//! use oxide_magic_form::combobox::{ComboItem, Combobox, Selection};
//!
//! let data = vec![ComboItem::new(1, "A"), ComboItem::new(2, "B")];
//! let mut combo = Combobox::new(data).return_full_object(true);
//!
//! assert_eq!(
//!     combo.select(2),
//!     Some(Selection::Item(Some(ComboItem::new(2, "B"))))
//! );
//! ```
//!
//! Filtering by typed query happens in the browser; the rendered list always
//! carries the full data set.

use std::fmt;

use ironhtml::typed::Element;
use ironhtml_elements::{Button, Div, Li, Span, Ul, I};
use serde::Serialize;
use tracing::debug;

use crate::widgets::html_escape;

/// One selectable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComboItem<V> {
    pub value: V,
    pub name: String,
}

impl<V> ComboItem<V> {
    pub fn new(value: V, name: impl Into<String>) -> Self {
        Self {
            value,
            name: name.into(),
        }
    }
}

/// What a combobox reports when its selection changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Selection<V> {
    /// Single-select, raw value. `None` when nothing is selected.
    Value(Option<V>),
    /// Single-select, full item. `None` when nothing is selected.
    Item(Option<ComboItem<V>>),
    /// Multi-select, raw values in selection order.
    Values(Vec<V>),
    /// Multi-select, full items in selection order.
    Items(Vec<ComboItem<V>>),
}

type Listener<V> = Box<dyn FnMut(&Selection<V>)>;

/// Searchable picker over a list of [`ComboItem`]s.
pub struct Combobox<V> {
    data: Vec<ComboItem<V>>,
    selected: Vec<V>,
    open: bool,
    multi_select: bool,
    return_full_object: bool,
    title: String,
    placeholder: String,
    empty_message: String,
    clear_message: String,
    loading: bool,
    disabled: bool,
    listener: Option<Listener<V>>,
}

impl<V: Clone + PartialEq> Combobox<V> {
    /// Creates a closed single-select combobox with nothing selected.
    pub fn new(data: Vec<ComboItem<V>>) -> Self {
        Self {
            data,
            selected: Vec::new(),
            open: false,
            multi_select: false,
            return_full_object: false,
            title: String::new(),
            placeholder: "Search...".to_string(),
            empty_message: "No items found".to_string(),
            clear_message: "Clear selection".to_string(),
            loading: false,
            disabled: false,
            listener: None,
        }
    }

    #[must_use]
    pub fn multi_select(mut self, multi: bool) -> Self {
        self.multi_select = multi;
        self
    }

    #[must_use]
    pub fn return_full_object(mut self, full: bool) -> Self {
        self.return_full_object = full;
        self
    }

    /// Sets the initial selection. Single-select keeps only the first value.
    #[must_use]
    pub fn default_value(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.selected = values.into_iter().collect();
        if !self.multi_select {
            self.selected.truncate(1);
        }
        self
    }

    /// Text shown on the trigger when nothing is selected.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Placeholder of the search input.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    #[must_use]
    pub fn clear_message(mut self, message: impl Into<String>) -> Self {
        self.clear_message = message.into();
        self
    }

    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Registers the callback told about every selection change.
    #[must_use]
    pub fn on_selection_change(mut self, listener: impl FnMut(&Selection<V>) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Reports the initial selection, as happens when the picker first shows.
    pub fn mount(&mut self) -> Selection<V> {
        self.notify()
    }

    /// Handles a click on the item with `value`.
    ///
    /// Single-select replaces the selection and closes the popover;
    /// multi-select toggles membership and leaves it open. Returns `None`
    /// when the combobox is disabled.
    pub fn select(&mut self, value: V) -> Option<Selection<V>> {
        if self.disabled {
            return None;
        }
        if self.multi_select {
            if let Some(pos) = self.selected.iter().position(|v| *v == value) {
                self.selected.remove(pos);
            } else {
                self.selected.push(value);
            }
        } else {
            self.selected = vec![value];
            self.open = false;
        }
        Some(self.notify())
    }

    /// Removes one value, as the badge close button does.
    pub fn remove(&mut self, value: &V) -> Option<Selection<V>> {
        if self.disabled {
            return None;
        }
        let pos = self.selected.iter().position(|v| v == value)?;
        self.selected.remove(pos);
        Some(self.notify())
    }

    /// Empties the selection.
    pub fn clear(&mut self) -> Option<Selection<V>> {
        if self.disabled || self.selected.is_empty() {
            return None;
        }
        self.selected.clear();
        Some(self.notify())
    }

    /// Replaces the selection without notifying, e.g. when the owning form
    /// is reset.
    pub fn sync(&mut self, values: impl IntoIterator<Item = V>) {
        self.selected = values.into_iter().collect();
        if !self.multi_select {
            self.selected.truncate(1);
        }
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open && !self.disabled;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    pub fn selected_values(&self) -> &[V] {
        &self.selected
    }

    pub fn is_selected(&self, value: &V) -> bool {
        self.selected.contains(value)
    }

    pub fn data(&self) -> &[ComboItem<V>] {
        &self.data
    }

    /// Returns the current selection in the configured output shape.
    ///
    /// Values without a matching item are left out of full-object output.
    pub fn selection(&self) -> Selection<V> {
        match (self.multi_select, self.return_full_object) {
            (true, true) => Selection::Items(
                self.selected
                    .iter()
                    .filter_map(|v| self.find(v).cloned())
                    .collect(),
            ),
            (true, false) => Selection::Values(self.selected.clone()),
            (false, true) => {
                Selection::Item(self.selected.first().and_then(|v| self.find(v)).cloned())
            }
            (false, false) => Selection::Value(self.selected.first().cloned()),
        }
    }

    /// Text for the trigger button.
    ///
    /// Multi-select joins the selected names; single-select shows the chosen
    /// name. Falls back to the title when nothing matches.
    pub fn display_text(&self) -> String {
        let text = if self.multi_select {
            self.badges().join(", ")
        } else {
            self.selected
                .first()
                .and_then(|v| self.find(v))
                .map(|item| item.name.clone())
                .unwrap_or_default()
        };
        if text.is_empty() {
            self.title.clone()
        } else {
            text
        }
    }

    /// Names of the selected items, in selection order.
    pub fn badges(&self) -> Vec<&str> {
        self.selected_items()
            .map(|item| item.name.as_str())
            .collect()
    }

    /// Selected values that match an item, in selection order.
    fn selected_items(&self) -> impl Iterator<Item = &ComboItem<V>> {
        self.selected.iter().filter_map(|v| self.find(v))
    }

    fn find(&self, value: &V) -> Option<&ComboItem<V>> {
        self.data.iter().find(|item| item.value == *value)
    }

    fn notify(&mut self) -> Selection<V> {
        let selection = self.selection();
        debug!(
            selected = self.selected.len(),
            multi = self.multi_select,
            "Combobox selection changed"
        );
        if let Some(listener) = self.listener.as_mut() {
            listener(&selection);
        }
        selection
    }
}

impl<V: Clone + PartialEq + fmt::Display> Combobox<V> {
    /// Renders the trigger, popover and hidden inputs posting the selection
    /// under `name`.
    pub fn render(&self, name: &str, invalid: bool) -> String {
        let id = format!("id_{name}");
        let menu_id = format!("{id}_list");
        let trigger_class = if invalid {
            "btn btn-outline-secondary w-100 d-flex justify-content-between \
             align-items-center is-invalid"
        } else {
            "btn btn-outline-secondary w-100 d-flex justify-content-between \
             align-items-center"
        };
        let expanded = if self.open { "true" } else { "false" };
        let menu_class = if self.open {
            "dropdown-menu w-100 p-2 show"
        } else {
            "dropdown-menu w-100 p-2"
        };
        let display = self.display_text();
        let badges: Vec<&ComboItem<V>> = self.selected_items().collect();
        let show_badges = self.multi_select && !badges.is_empty();

        let hidden: String = self
            .selected
            .iter()
            .map(|v| {
                format!(
                    r#"<input type="hidden" name="{}" value="{}">"#,
                    html_escape(name),
                    html_escape(&v.to_string())
                )
            })
            .collect();
        let search = format!(
            r#"<input type="search" class="form-control form-control-sm mb-2" placeholder="{}" data-combobox-search="{}">"#,
            html_escape(&self.placeholder),
            html_escape(name)
        );

        Element::<Div>::new()
            .class("dropdown")
            .attr("data-combobox", name)
            .child::<Button, _>(|b| {
                let b = b
                    .attr("type", "button")
                    .attr("id", &id)
                    .class(trigger_class)
                    .attr("role", "combobox")
                    .attr("aria-expanded", expanded)
                    .attr("aria-controls", &menu_id)
                    .attr("data-action", "toggle-combobox")
                    .attr("data-field", name);
                let b = if self.disabled {
                    b.attr("disabled", "disabled")
                } else {
                    b
                };
                let b = b.child::<Span, _>(|d| {
                    let d = d.class("d-flex flex-wrap gap-1 align-items-center");
                    if show_badges {
                        let mut d = d;
                        for item in &badges {
                            let value = item.value.to_string();
                            d = d.child::<Span, _>(|s| {
                                s.class("badge text-bg-secondary")
                                    .attr("data-action", "remove-selection")
                                    .attr("data-value", &value)
                                    .text(&item.name)
                            });
                        }
                        d
                    } else {
                        d.child::<Span, _>(|s| s.class("text-muted").text(&display))
                    }
                });
                if self.loading {
                    b.child::<Span, _>(|s| {
                        s.class("spinner-border spinner-border-sm")
                            .attr("aria-hidden", "true")
                    })
                } else {
                    b.child::<I, _>(|i| i.class("bi bi-chevron-expand opacity-50"))
                }
            })
            .child::<Div, _>(|menu| {
                let menu = menu.class(menu_class).attr("id", &menu_id).raw(&search);
                let menu = menu.child::<Ul, _>(|ul| {
                    let mut ul = ul.class("list-unstyled mb-0").attr("role", "listbox");
                    for item in &self.data {
                        let selected = self.is_selected(&item.value);
                        let value = item.value.to_string();
                        ul = ul.child::<Li, _>(|li| {
                            li.class("dropdown-item")
                                .attr("role", "option")
                                .attr("aria-selected", if selected { "true" } else { "false" })
                                .attr("data-action", "select")
                                .attr("data-field", name)
                                .attr("data-value", &value)
                                .child::<I, _>(|i| {
                                    i.class(if selected {
                                        "bi bi-check me-2 opacity-100"
                                    } else {
                                        "bi bi-check me-2 opacity-0"
                                    })
                                })
                                .text(&item.name)
                        });
                    }
                    ul.child::<Li, _>(|li| {
                        li.class("dropdown-item-text text-muted d-none")
                            .attr("data-combobox-empty", name)
                            .text(&self.empty_message)
                    })
                });
                if self.selected.is_empty() {
                    return menu;
                }
                menu.child::<Button, _>(|b| {
                    b.attr("type", "button")
                        .class("btn btn-link btn-sm w-100 mt-1")
                        .attr("data-action", "clear-selection")
                        .attr("data-field", name)
                        .text(&self.clear_message)
                })
            })
            .raw(&hidden)
            .render()
    }
}

impl<V: fmt::Debug> fmt::Debug for Combobox<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combobox")
            .field("data", &self.data)
            .field("selected", &self.selected)
            .field("open", &self.open)
            .field("multi_select", &self.multi_select)
            .field("return_full_object", &self.return_full_object)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

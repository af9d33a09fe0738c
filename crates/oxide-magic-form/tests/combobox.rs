//! Integration tests for the combobox picker.

use std::cell::RefCell;
use std::rc::Rc;

use oxide_magic_form::{ComboItem, Combobox, Selection};

fn numbers() -> Vec<ComboItem<i32>> {
    vec![
        ComboItem::new(1, "A"),
        ComboItem::new(2, "B"),
        ComboItem::new(3, "C"),
    ]
}

#[test]
fn single_select_emits_value_or_item() {
    let mut raw = Combobox::new(numbers());
    assert_eq!(raw.select(2), Some(Selection::Value(Some(2))));

    let mut full = Combobox::new(numbers()).return_full_object(true);
    assert_eq!(
        full.select(2),
        Some(Selection::Item(Some(ComboItem::new(2, "B"))))
    );
}

#[test]
fn multi_select_accumulates_in_order() {
    let emitted = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&emitted);
    let mut combo = Combobox::new(numbers())
        .multi_select(true)
        .on_selection_change(move |s| sink.borrow_mut().push(s.clone()));

    combo.select(1);
    combo.select(2);

    assert_eq!(
        *emitted.borrow(),
        vec![Selection::Values(vec![1]), Selection::Values(vec![1, 2])]
    );
    assert_eq!(combo.display_text(), "A, B");
    assert_eq!(combo.badges(), ["A", "B"]);
}

#[test]
fn multi_select_toggle_and_badge_removal() {
    let mut combo = Combobox::new(numbers())
        .multi_select(true)
        .return_full_object(true);
    combo.select(3);
    combo.select(1);
    combo.select(3);
    assert_eq!(combo.selected_values(), [1]);

    assert_eq!(combo.remove(&1), Some(Selection::Items(vec![])));
    assert_eq!(combo.remove(&1), None);
}

#[test]
fn single_select_closes_popover() {
    let mut combo = Combobox::new(numbers()).title("Pick one");
    combo.set_open(true);
    assert_eq!(combo.display_text(), "Pick one");

    combo.select(3);
    assert!(!combo.is_open());
    assert_eq!(combo.display_text(), "C");

    assert_eq!(combo.clear(), Some(Selection::Value(None)));
    assert_eq!(combo.display_text(), "Pick one");
}

#[test]
fn default_value_and_mount() {
    let mut combo = Combobox::new(numbers()).default_value([2]);
    assert!(combo.is_selected(&2));
    assert_eq!(combo.mount(), Selection::Value(Some(2)));
}

#[test]
fn disabled_ignores_selection() {
    let mut combo = Combobox::new(numbers()).disabled(true);
    assert_eq!(combo.select(1), None);
    assert!(combo.selected_values().is_empty());
}

#[test]
fn render_lists_every_item() {
    let mut combo = Combobox::new(numbers())
        .multi_select(true)
        .placeholder("Find...");
    combo.select(2);

    let html = combo.render("nums", false);
    assert!(html.contains(r#"placeholder="Find...""#));
    assert_eq!(html.matches(r#"data-action="select""#).count(), 3);
    assert!(html.contains(r#"type="hidden" name="nums" value="2""#));
    assert!(html.contains("Clear selection"));
}

//! Group placement and Bootstrap layout classes.
//!
//! Groups are bucketed by `position.row` (ascending). Inside a row they are
//! ordered by `position.column` with a stable sort, so groups sharing a
//! column keep their schema order.

use std::collections::BTreeMap;

use crate::schema::{FieldWidth, FormSchema, GroupLayout, GroupSpec, GroupWidth, LayoutKind};

/// Bootstrap supports `row-cols-*` up to 6.
const MAX_GRID_COLUMNS: usize = 6;

/// The groups placed on one row.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRow<'a> {
    /// Row index from the schema.
    pub row: usize,
    /// Groups left to right.
    pub groups: Vec<&'a GroupSpec>,
}

/// Buckets the schema's groups into rows.
pub fn layout_rows(schema: &FormSchema) -> Vec<LayoutRow<'_>> {
    let mut rows: BTreeMap<usize, Vec<&GroupSpec>> = BTreeMap::new();
    for group in schema.groups() {
        rows.entry(group.position.row).or_default().push(group);
    }
    rows.into_iter()
        .map(|(row, mut groups)| {
            groups.sort_by_key(|g| g.position.column);
            LayoutRow { row, groups }
        })
        .collect()
}

/// Class of the flex container holding one row of groups.
pub const ROW_CLASS: &str = "row g-3 mb-3";

/// Column class for a group of the given width.
pub fn group_width_class(width: GroupWidth) -> &'static str {
    match width {
        GroupWidth::Full => "col-12",
        GroupWidth::Half => "col-12 col-md-6",
        GroupWidth::Third => "col-12 col-md-4",
        GroupWidth::Quarter => "col-12 col-md-3",
    }
}

/// Class of the container holding a group's fields.
pub fn fields_container_class(layout: GroupLayout) -> String {
    match layout.kind {
        LayoutKind::Grid => {
            let columns = layout.columns.clamp(1, MAX_GRID_COLUMNS);
            format!("row row-cols-1 row-cols-md-{columns} g-3")
        }
        LayoutKind::Horizontal => "row g-3".to_string(),
        LayoutKind::Vertical => "d-flex flex-column gap-3".to_string(),
    }
}

/// Class of the wrapper around one field.
///
/// Grid cells share the grid's columns, so the field width only applies to
/// horizontal and vertical layouts.
pub fn field_wrapper_class(layout: GroupLayout, width: FieldWidth) -> &'static str {
    match (layout.kind, width) {
        (LayoutKind::Grid, _) => "col",
        (LayoutKind::Horizontal, FieldWidth::Full) => "col-12",
        (LayoutKind::Horizontal, FieldWidth::Half) => "col-12 col-md-6",
        (LayoutKind::Horizontal, FieldWidth::Third) => "col-12 col-md-4",
        (LayoutKind::Horizontal, FieldWidth::Auto) => "col-auto",
        (LayoutKind::Vertical, FieldWidth::Full) => "w-100",
        (LayoutKind::Vertical, FieldWidth::Half) => "w-50",
        // No one-third width utility exists; the column class sets it.
        (LayoutKind::Vertical, FieldWidth::Third) => "col-12 col-md-4",
        (LayoutKind::Vertical, FieldWidth::Auto) => "align-self-start",
    }
}

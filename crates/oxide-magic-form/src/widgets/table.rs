//! Repeatable table editor widget.

use super::bootstrap::{BootstrapRadioSelect, BootstrapSelect, BootstrapTextInput, BootstrapTextarea};
use super::{html_escape, Widget, WidgetAttrs};
use crate::schema::{FieldKind, FieldSpec};
use crate::value::FieldValue;

/// Bootstrap 5 table with one input per cell and add/remove row buttons.
#[derive(Debug, Clone)]
pub struct BootstrapTableEditor<'a> {
    /// Row schema.
    pub columns: &'a [FieldSpec],
    /// Label of the add button.
    pub add_label: String,
}

impl<'a> BootstrapTableEditor<'a> {
    pub fn new(columns: &'a [FieldSpec]) -> Self {
        Self {
            columns,
            add_label: "Add row".to_string(),
        }
    }

    fn render_cell(column: &FieldSpec, name: &str, value: &FieldValue, attrs: &WidgetAttrs) -> String {
        let placeholder = column.placeholder.as_deref();
        match &column.kind {
            FieldKind::Number => BootstrapTextInput::number()
                .placeholder(placeholder)
                .render(name, value, attrs),
            FieldKind::Date => BootstrapTextInput::date()
                .placeholder(placeholder)
                .render(name, value, attrs),
            FieldKind::Textarea { rows } => BootstrapTextarea::new(*rows)
                .placeholder(placeholder)
                .render(name, value, attrs),
            FieldKind::Select { options, .. } => BootstrapSelect::new(options.clone())
                .blank_label(placeholder.unwrap_or("Select"))
                .render(name, value, attrs),
            FieldKind::Radio { options } => BootstrapRadioSelect::new(options.clone())
                .inline()
                .render(name, value, attrs),
            FieldKind::Text | FieldKind::Checkbox | FieldKind::Image | FieldKind::Table { .. } => {
                BootstrapTextInput::new()
                    .placeholder(placeholder)
                    .render(name, value, attrs)
            }
        }
    }
}

impl Widget for BootstrapTableEditor<'_> {
    fn render(&self, name: &str, value: &FieldValue, attrs: &WidgetAttrs) -> String {
        let rows = value.as_rows().unwrap_or_default();
        let disabled = attrs.get("disabled").is_some();
        let disabled_attr = if disabled { r#" disabled="disabled""# } else { "" };
        let field = html_escape(name);

        let headers: String = self
            .columns
            .iter()
            .map(|col| {
                let marker = if col.required { " *" } else { "" };
                format!("<th>{}{marker}</th>", html_escape(&col.label))
            })
            .collect();

        let body: String = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cells: String = self
                    .columns
                    .iter()
                    .map(|col| {
                        let cell_name = format!("{name}[{i}][{}]", col.name);
                        let mut cell_attrs = WidgetAttrs::new()
                            .with("id", format!("id_{name}_{i}_{}", col.name))
                            .with("class", "form-control-sm")
                            .with("data-action", "update-cell")
                            .with("data-field", name)
                            .with("data-row", i.to_string())
                            .with("data-column", col.name.as_str());
                        if disabled || col.disabled {
                            cell_attrs.set("disabled", "disabled");
                        }
                        let cell = FieldValue::Text(row.get(&col.name).cloned().unwrap_or_default());
                        format!("<td>{}</td>", Self::render_cell(col, &cell_name, &cell, &cell_attrs))
                    })
                    .collect();

                format!(
                    r#"<tr data-row="{i}">{cells}<td class="text-center"><button type="button" class="btn btn-sm btn-outline-danger" data-action="remove-row" data-field="{field}" data-row="{i}"{disabled_attr}><i class="bi bi-x"></i></button></td></tr>"#
                )
            })
            .collect();

        format!(
            r#"<div class="table-responsive" id="{id}" data-table="{field}">
<table class="table table-sm align-middle mb-2">
<thead class="table-light"><tr>{headers}<th style="width: 60px;"></th></tr></thead>
<tbody>{body}</tbody>
</table>
<button type="button" class="btn btn-sm btn-outline-primary" data-action="add-row" data-field="{field}"{disabled_attr}><i class="bi bi-plus me-1"></i>{add_label}</button>
</div>"#,
            id = html_escape(&attrs.id_for(name)),
            add_label = html_escape(&self.add_label),
        )
    }

    fn input_type(&self) -> &str {
        "table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SelectOption;
    use crate::value::TableRow;

    #[test]
    fn test_render_rows() {
        let columns = vec![
            FieldSpec::text("sku", "SKU").required(),
            FieldSpec::select("unit", "Unit", vec![SelectOption::new("kg", "Kilogram")]),
        ];
        let mut row = TableRow::new();
        row.insert("sku".to_string(), "A-1".to_string());
        row.insert("unit".to_string(), "kg".to_string());

        let html = BootstrapTableEditor::new(&columns).render(
            "items",
            &FieldValue::Rows(vec![row]),
            &WidgetAttrs::new(),
        );

        assert!(html.contains("<th>SKU *</th>"));
        assert!(html.contains(r#"name="items[0][sku]""#));
        assert!(html.contains(r#"value="A-1""#));
        assert!(html.contains(r#"value="kg" selected"#));
        assert!(html.contains(r#"data-action="remove-row""#));
        assert!(html.contains(r#"data-action="add-row""#));
    }

    #[test]
    fn test_render_empty_table() {
        let columns = vec![FieldSpec::text("sku", "SKU")];
        let html = BootstrapTableEditor::new(&columns).render(
            "items",
            &FieldValue::Rows(vec![]),
            &WidgetAttrs::new(),
        );
        assert!(html.contains("<tbody></tbody>"));
        assert!(!html.contains("remove-row"));
    }
}

//! Table sub-editor: the rows of a `table` field.

use crate::error::{FormError, Result};
use crate::schema::FieldSpec;
use crate::value::TableRow;

/// Editing handle over the rows of one table field.
#[derive(Debug)]
pub struct TableEditor<'a> {
    field: &'a str,
    columns: &'a [FieldSpec],
    rows: &'a mut Vec<TableRow>,
}

impl<'a> TableEditor<'a> {
    /// Creates an editor for `field`'s rows.
    pub fn new(field: &'a FieldSpec, rows: &'a mut Vec<TableRow>) -> Result<Self> {
        let columns = field
            .columns()
            .ok_or_else(|| FormError::NotATable(field.name.clone()))?;
        Ok(Self {
            field: &field.name,
            columns,
            rows,
        })
    }

    /// Returns a row with every column set to the empty string.
    pub fn empty_row(columns: &[FieldSpec]) -> TableRow {
        columns
            .iter()
            .map(|c| (c.name.clone(), String::new()))
            .collect()
    }

    /// Appends an empty row and returns its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(Self::empty_row(self.columns));
        self.rows.len() - 1
    }

    /// Removes the row at `index`; later rows shift down by one.
    pub fn remove_row(&mut self, index: usize) -> Result<TableRow> {
        if index >= self.rows.len() {
            return Err(self.out_of_bounds(index));
        }
        Ok(self.rows.remove(index))
    }

    /// Sets one cell, replacing the row with an updated copy.
    pub fn update_cell(&mut self, index: usize, column: &str, value: impl Into<String>) -> Result<()> {
        if !self.columns.iter().any(|c| c.name == column) {
            return Err(FormError::UnknownColumn {
                field: self.field.to_string(),
                column: column.to_string(),
            });
        }
        let len = self.rows.len();
        let Some(slot) = self.rows.get_mut(index) else {
            return Err(FormError::RowOutOfBounds {
                field: self.field.to_string(),
                index,
                len,
            });
        };
        let mut row = slot.clone();
        row.insert(column.to_string(), value.into());
        *slot = row;
        Ok(())
    }

    pub fn rows(&self) -> &[TableRow] {
        self.rows
    }

    fn out_of_bounds(&self, index: usize) -> FormError {
        FormError::RowOutOfBounds {
            field: self.field.to_string(),
            index,
            len: self.rows.len(),
        }
    }
}

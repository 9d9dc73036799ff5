//! In-memory table model: cells, rows, and a table with a sort controller.

use crate::column::ColumnConfig;
use crate::controller::{Activation, SortController, SortRow};
use crate::error::SortError;

/// A single cell: display text plus an optional explicit comparison value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub text: String,
    /// When present, compared instead of the display text.
    pub value: Option<String>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: None,
        }
    }

    /// Set an explicit comparison value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// The value used for sorting: the override if set, else the trimmed
    /// display text.
    pub fn extract(&self) -> String {
        match &self.value {
            Some(value) => value.clone(),
            None => self.text.trim().to_string(),
        }
    }
}

/// An ordered row of cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Build a row from display texts.
    pub fn from_texts<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self::new(texts.into_iter().map(Cell::new))
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }
}

impl SortRow for Row {
    fn sort_value(&self, column_index: usize) -> String {
        self.cell(column_index).map(Cell::extract).unwrap_or_default()
    }
}

/// Header state plus body rows.
///
/// # Example
///
/// ```
/// use sortable::{Row, Table};
///
/// let mut table = Table::new(2, vec![
///     Row::from_texts(["banana", "3"]),
///     Row::from_texts(["Apple", "10"]),
/// ]);
///
/// table.activate(0).unwrap();
/// assert_eq!(table.rows()[0].cells[0].text, "Apple");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    controller: SortController,
    rows: Vec<Row>,
}

impl Table {
    /// A table with `columns` default-configured columns.
    pub fn new(columns: usize, rows: Vec<Row>) -> Self {
        Self {
            controller: SortController::with_columns(columns),
            rows,
        }
    }

    /// A table with explicit per-column configuration.
    pub fn with_columns(columns: impl IntoIterator<Item = ColumnConfig>, rows: Vec<Row>) -> Self {
        Self {
            controller: SortController::new(columns),
            rows,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn controller(&self) -> &SortController {
        &self.controller
    }

    /// Activate a column, reordering the rows.
    pub fn activate(&mut self, column: usize) -> Result<Activation, SortError> {
        self.controller.activate(column, &mut self.rows)
    }

    /// Run the activate-on-load column, if one is configured.
    pub fn activate_on_load(&mut self) -> Option<Activation> {
        let column = self.controller.load_activation()?;
        self.activate(column).ok()
    }

    /// Consume the table, yielding its rows in their current order.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_prefers_override() {
        let cell = Cell::new("  Ten  ").with_value("10");
        assert_eq!(cell.extract(), "10");
    }

    #[test]
    fn test_extract_trims_text() {
        assert_eq!(Cell::new("  Ten \n").extract(), "Ten");
        assert_eq!(Cell::default().extract(), "");
    }

    #[test]
    fn test_extract_does_not_trim_override() {
        assert_eq!(Cell::new("x").with_value(" 7 ").extract(), " 7 ");
    }

    #[test]
    fn test_missing_cell_reads_empty() {
        let row = Row::from_texts(["only"]);
        assert_eq!(row.sort_value(0), "only");
        assert_eq!(row.sort_value(3), "");
    }
}

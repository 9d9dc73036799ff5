//! Sort controller: per-column state transitions and row reordering.
//!
//! Activating a column either toggles it (when it is already the sorted
//! column) or sorts it fresh:
//!
//! - **Toggle**: flip the direction and reverse the current row order. Rows
//!   that compared equal keep the relative order the previous sort gave them.
//! - **Fresh**: resolve the column type (classifying on first use), pick the
//!   target direction (configured default, else the type's default), clear
//!   every column, stable-sort the rows with the type's comparator, and
//!   reverse if the target differs from the type's default.
//!
//! At most one column is sorted at any time.

use crate::classify::classify;
use crate::column::{ColumnConfig, ColumnState, SortDirection};
use crate::compare::ColumnType;
use crate::error::SortError;

/// Anything that can hand out a per-column comparison value.
///
/// Implementations must be pure: reading a value never changes the row.
pub trait SortRow {
    /// The comparison value for `column_index`, or an empty string when the
    /// row has no such cell.
    fn sort_value(&self, column_index: usize) -> String;
}

impl<R: SortRow + ?Sized> SortRow for &R {
    fn sort_value(&self, column_index: usize) -> String {
        (**self).sort_value(column_index)
    }
}

/// Result of a successful activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub column: usize,
    pub column_type: ColumnType,
    pub direction: SortDirection,
    /// True when the rows were reversed rather than re-sorted.
    pub toggled: bool,
}

/// Owns the state of every column of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct SortController {
    columns: Vec<ColumnState>,
}

impl SortController {
    /// Create a controller with one unsorted, unresolved column per config.
    pub fn new(configs: impl IntoIterator<Item = ColumnConfig>) -> Self {
        Self {
            columns: configs.into_iter().map(ColumnState::new).collect(),
        }
    }

    /// Create a controller for `count` columns with default configuration.
    pub fn with_columns(count: usize) -> Self {
        Self::new(std::iter::repeat_n(ColumnConfig::default(), count))
    }

    pub fn columns(&self) -> &[ColumnState] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnState> {
        self.columns.get(index)
    }

    /// The sorted column and its direction, if any.
    pub fn sorted(&self) -> Option<(usize, SortDirection)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(i, c)| c.direction.map(|d| (i, d)))
    }

    /// First column flagged to activate on load that is not disabled.
    pub fn load_activation(&self) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.config.activate_on_load && !c.config.disabled)
    }

    /// Activate `column`, reordering `rows` in place.
    ///
    /// Returns an error (and touches nothing) when the column is out of
    /// range or disabled, or when there are no rows.
    pub fn activate<R: SortRow>(
        &mut self,
        column: usize,
        rows: &mut Vec<R>,
    ) -> Result<Activation, SortError> {
        let columns = self.columns.len();
        let state = self
            .columns
            .get(column)
            .ok_or(SortError::ColumnOutOfRange { column, columns })?;
        if state.config.disabled {
            return Err(SortError::ColumnDisabled { column });
        }
        if rows.is_empty() {
            return Err(SortError::NoBodyRows);
        }

        if let Some(current) = state.direction {
            return Ok(self.toggle(column, current, rows));
        }
        Ok(self.sort_fresh(column, rows))
    }

    fn toggle<R>(&mut self, column: usize, current: SortDirection, rows: &mut [R]) -> Activation {
        let state = &mut self.columns[column];
        let direction = current.reversed();
        state.direction = Some(direction);
        rows.reverse();

        // A sorted column always has a resolved type
        let column_type = state.column_type.unwrap_or(ColumnType::Alpha);
        log::debug!(
            "[sortable] column {} toggled to {} ({} rows)",
            column,
            direction,
            rows.len()
        );

        Activation {
            column,
            column_type,
            direction,
            toggled: true,
        }
    }

    fn sort_fresh<R: SortRow>(&mut self, column: usize, rows: &mut Vec<R>) -> Activation {
        let column_type = match self.columns[column].column_type {
            Some(cached) => cached,
            None => {
                let inferred = classify(rows.iter().map(|r| r.sort_value(column)));
                log::debug!("[sortable] column {} classified as {:?}", column, inferred);
                self.columns[column].column_type = Some(inferred);
                inferred
            }
        };

        let direction = self.columns[column]
            .config
            .default_direction
            .unwrap_or_else(|| column_type.default_direction());

        for state in &mut self.columns {
            state.clear();
        }

        let mut keyed: Vec<_> = std::mem::take(rows)
            .into_iter()
            .map(|row| (column_type.sort_key(&row.sort_value(column)), row))
            .collect();
        // Stable: equal keys keep their current relative order
        keyed.sort_by(|a, b| a.0.compare(&b.0));
        if direction != column_type.default_direction() {
            keyed.reverse();
        }
        rows.extend(keyed.into_iter().map(|(_, row)| row));

        self.columns[column].direction = Some(direction);
        log::debug!(
            "[sortable] column {} sorted {} as {:?} ({} rows)",
            column,
            direction,
            column_type,
            rows.len()
        );

        Activation {
            column,
            column_type,
            direction,
            toggled: false,
        }
    }
}

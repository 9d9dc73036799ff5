//! Error types

/// Reasons an initialization or activation did not happen.
///
/// None of these are fatal. Heterogeneous pages routinely contain tables that
/// are not sortable, so callers going through the bulk entry points never see
/// them; they are logged and the table is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    /// No element with the given ID exists in the document.
    #[error("element not found: {id}")]
    NotFound { id: String },

    /// The element exists but is not a `<table>`.
    #[error("element {id} is not a table")]
    NotATable { id: String },

    /// The table has no `<thead>` row.
    #[error("table has no header row")]
    MissingHeader,

    /// The table head has more than one row, so columns are ambiguous.
    #[error("table has {rows} header rows, expected exactly one")]
    AmbiguousHeader { rows: usize },

    /// The table has no body rows to sort.
    #[error("table has no body rows")]
    NoBodyRows,

    /// The table already carries the initialized marker.
    #[error("table {id} is already initialized")]
    AlreadyInitialized { id: String },

    /// The table was never initialized (or has been torn down).
    #[error("table {id} is not initialized")]
    NotInitialized { id: String },

    /// The column index is past the last header cell.
    #[error("column {column} out of range ({columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },

    /// The column was explicitly marked as not sortable.
    #[error("column {column} is disabled")]
    ColumnDisabled { column: usize },
}

//! Per-column sort state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::compare::ColumnType;

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9, oldest first).
    Ascending,
    /// Descending order (Z-A, 9-0, newest first).
    Descending,
}

impl SortDirection {
    /// The attribute spelling, `"ascending"` or `"descending"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is neither `"ascending"` nor `"descending"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sort direction: {0:?}")]
pub struct ParseDirectionError(pub String);

impl FromStr for SortDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(Self::Ascending),
            "descending" | "desc" => Ok(Self::Descending),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Static per-column configuration, read once when a table is set up.
///
/// # Examples
///
/// ```
/// use sortable::{ColumnConfig, SortDirection};
///
/// let columns = vec![
///     ColumnConfig::new(),
///     ColumnConfig::new().default_direction(SortDirection::Descending),
///     ColumnConfig::new().disabled(),
/// ];
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnConfig {
    /// Overrides the column type's default direction on a fresh sort.
    pub default_direction: Option<SortDirection>,
    /// Disabled columns ignore activation.
    pub disabled: bool,
    /// Sort by this column right after initialization.
    pub activate_on_load: bool,
}

impl ColumnConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction used on a fresh sort of this column.
    pub fn default_direction(mut self, direction: SortDirection) -> Self {
        self.default_direction = Some(direction);
        self
    }

    /// Mark the column as not sortable.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Activate this column once, immediately after initialization.
    pub fn activate_on_load(mut self) -> Self {
        self.activate_on_load = true;
        self
    }
}

/// Mutable state of one column.
///
/// Created once per column with an unresolved type and no sort, then changed
/// only by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnState {
    pub(crate) config: ColumnConfig,
    pub(crate) column_type: Option<ColumnType>,
    pub(crate) direction: Option<SortDirection>,
}

impl ColumnState {
    pub fn new(config: ColumnConfig) -> Self {
        Self {
            config,
            column_type: None,
            direction: None,
        }
    }

    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    /// The cached type, or `None` while unresolved.
    pub fn column_type(&self) -> Option<ColumnType> {
        self.column_type
    }

    /// The active direction, or `None` when this column is not sorted.
    pub fn direction(&self) -> Option<SortDirection> {
        self.direction
    }

    pub fn is_sorted(&self) -> bool {
        self.direction.is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.direction = None;
    }
}

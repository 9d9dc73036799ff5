//! Engine configuration

use serde::{Deserialize, Serialize};
use tabledom::EventKind;

/// Configuration for a [`Sortable`](crate::Sortable) engine.
///
/// # Example
///
/// ```
/// use sortable::SortableConfig;
/// use tabledom::EventKind;
///
/// let config = SortableConfig::default()
///     .with_selector("table.report")
///     .with_activation(EventKind::Touch);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortableConfig {
    /// Selector used by `initialize_all` when none is given.
    ///
    /// Default: `table[data-sortable]`
    pub selector: String,

    /// Event kind that activates a header cell.
    ///
    /// Default: click
    pub activation: EventKind,

    /// Attribute set on a table once it has been initialized.
    ///
    /// Default: `data-sortable-initialized`
    pub initialized_marker: String,
}

impl Default for SortableConfig {
    fn default() -> Self {
        Self {
            selector: String::from("table[data-sortable]"),
            activation: EventKind::Click,
            initialized_marker: String::from("data-sortable-initialized"),
        }
    }
}

impl SortableConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default table selector.
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    /// Sets the activation event kind.
    pub fn with_activation(mut self, activation: EventKind) -> Self {
        self.activation = activation;
        self
    }

    /// Sets the initialized marker attribute name.
    pub fn with_initialized_marker(mut self, marker: impl Into<String>) -> Self {
        self.initialized_marker = marker.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial() {
        let config: SortableConfig =
            serde_json::from_str(r#"{ "activation": "touch" }"#).unwrap();
        assert_eq!(config.activation, EventKind::Touch);
        assert_eq!(config.selector, "table[data-sortable]");
    }

    #[test]
    fn test_round_trip_names() {
        let json = serde_json::to_value(SortableConfig::default()).unwrap();
        assert_eq!(json["activation"], "click");
        assert_eq!(json["initialized_marker"], "data-sortable-initialized");
    }
}

//! Binding between the sort engine and a [`tabledom::Document`].
//!
//! Column state lives in memory, one [`SortController`] per table. The
//! document only sees it at render time: after each activation the body rows
//! are reattached in their new order and every header cell gets its
//! `data-sorted` / `data-sorted-direction` attributes rewritten.

use std::collections::HashMap;

use tabledom::{select, Document, Element, Event, ListenerId, Selector};

use crate::column::{ColumnConfig, SortDirection};
use crate::config::SortableConfig;
use crate::controller::{Activation, SortController, SortRow};
use crate::error::SortError;

/// Explicit comparison value on a cell.
pub const ATTR_VALUE: &str = "data-value";
/// `"true"` on the sorted header cell, `"false"` on the others.
pub const ATTR_SORTED: &str = "data-sorted";
/// Direction of the sorted header cell.
pub const ATTR_SORTED_DIRECTION: &str = "data-sorted-direction";
/// Per-column direction for a fresh sort.
pub const ATTR_DEFAULT_DIRECTION: &str = "data-default-direction";
/// Present on header cells that must not sort.
pub const ATTR_DISABLED: &str = "data-sortable-disabled";
/// `data-sortable="false"` also disables a header cell.
pub const ATTR_SORTABLE: &str = "data-sortable";
/// Present on the header cell to sort right after initialization.
pub const ATTR_ACTIVATE_ON_LOAD: &str = "data-activate-on-load";
/// Older spelling of [`ATTR_ACTIVATE_ON_LOAD`]. Only honored with an empty value.
pub const ATTR_SORTABLE_DEFAULT: &str = "data-sortable-default";

/// Comparison value of a cell element: `data-value` if set, else its trimmed
/// text. A missing cell reads as empty.
pub fn cell_value(cell: Option<&Element>) -> String {
    let Some(cell) = cell else {
        return String::new();
    };
    match cell.get_attr(ATTR_VALUE) {
        Some(value) => value.to_string(),
        None => cell.text_content().trim().to_string(),
    }
}

fn is_cell(element: &Element) -> bool {
    element.is("td") || element.is("th")
}

/// `td`/`th` children of a row, in order.
fn cells(row: &Element) -> impl Iterator<Item = &Element> {
    row.child_elements().filter(|e| is_cell(e))
}

impl SortRow for Element {
    fn sort_value(&self, column_index: usize) -> String {
        cell_value(cells(self).nth(column_index))
    }
}

/// A body row and its position among the body rows before sorting.
struct IndexedRow<'a> {
    index: usize,
    element: &'a Element,
}

impl SortRow for IndexedRow<'_> {
    fn sort_value(&self, column_index: usize) -> String {
        self.element.sort_value(column_index)
    }
}

/// The single `thead` row of a table.
fn header_row(table: &Element) -> Result<&Element, SortError> {
    let thead = table
        .child_elements()
        .find(|e| e.is("thead"))
        .ok_or(SortError::MissingHeader)?;
    let rows: Vec<&Element> = thead.child_elements().filter(|e| e.is("tr")).collect();
    match rows.as_slice() {
        [] => Err(SortError::MissingHeader),
        [row] => Ok(row),
        _ => Err(SortError::AmbiguousHeader { rows: rows.len() }),
    }
}

fn body(table: &Element) -> Option<&Element> {
    table.child_elements().find(|e| e.is("tbody"))
}

fn body_rows(tbody: &Element) -> Vec<&Element> {
    tbody.child_elements().filter(|e| e.is("tr")).collect()
}

fn column_config(header: &Element) -> ColumnConfig {
    let mut config = ColumnConfig::new();

    if let Some(raw) = header.get_attr(ATTR_DEFAULT_DIRECTION) {
        match raw.parse::<SortDirection>() {
            Ok(direction) => config = config.default_direction(direction),
            Err(e) => log::warn!("[sortable] {}: ignoring {}: {}", header.id, ATTR_DEFAULT_DIRECTION, e),
        }
    }

    let disabled = header
        .get_attr(ATTR_DISABLED)
        .is_some_and(|v| v != "false")
        || header.get_attr(ATTR_SORTABLE) == Some("false");
    if disabled {
        config = config.disabled();
    }

    if header.has_attr(ATTR_ACTIVATE_ON_LOAD) || header.get_attr(ATTR_SORTABLE_DEFAULT) == Some("")
    {
        config = config.activate_on_load();
    }

    config
}

#[derive(Debug)]
struct BoundTable {
    controller: SortController,
    header_ids: Vec<String>,
    listeners: Vec<ListenerId>,
}

/// Sort engine bound to the tables of a document.
///
/// # Example
///
/// ```
/// use sortable::{Sortable, SortableConfig};
/// use tabledom::{Document, Element, Event};
///
/// let table = Element::table()
///     .id("scores")
///     .attr("data-sortable", "")
///     .child(Element::thead().child(Element::tr().child(Element::th("Score").id("score"))))
///     .child(
///         Element::tbody()
///             .child(Element::tr().child(Element::td("2")))
///             .child(Element::tr().child(Element::td("10"))),
///     );
/// let mut doc = Document::new(Element::new("body").child(table));
///
/// let mut sortable = Sortable::new(SortableConfig::default());
/// assert_eq!(sortable.initialize_all(&mut doc, None), vec!["scores".to_string()]);
///
/// let activations = sortable.handle_event(&mut doc, &Event::click("score"));
/// assert_eq!(activations.len(), 1);
/// assert_eq!(doc.get("score").unwrap().get_attr("data-sorted"), Some("true"));
/// ```
#[derive(Debug, Default)]
pub struct Sortable {
    config: SortableConfig,
    tables: HashMap<String, BoundTable>,
    bindings: HashMap<ListenerId, (String, usize)>,
}

impl Sortable {
    pub fn new(config: SortableConfig) -> Self {
        Self {
            config,
            tables: HashMap::new(),
            bindings: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SortableConfig {
        &self.config
    }

    pub fn is_initialized(&self, table_id: &str) -> bool {
        self.tables.contains_key(table_id)
    }

    /// Column state of an initialized table.
    pub fn controller(&self, table_id: &str) -> Option<&SortController> {
        self.tables.get(table_id).map(|t| &t.controller)
    }

    // -------------------------------------------------------------------------
    // Initialization
    // -------------------------------------------------------------------------

    /// Initialize every table matching `selector` (or the configured default).
    ///
    /// Returns the IDs of the tables actually initialized. Tables that do not
    /// qualify are skipped silently; a malformed selector initializes nothing.
    pub fn initialize_all(&mut self, doc: &mut Document, selector: Option<&str>) -> Vec<String> {
        let raw = selector.unwrap_or(&self.config.selector).to_string();
        let selector = match Selector::parse(&raw) {
            Ok(selector) => selector,
            Err(e) => {
                log::warn!("[sortable] bad selector {:?}: {}", raw, e);
                return Vec::new();
            }
        };

        let candidates: Vec<String> = select(doc.root(), &selector)
            .into_iter()
            .map(|e| e.id.clone())
            .collect();

        candidates
            .into_iter()
            .filter_map(|id| match self.initialize_table(doc, &id) {
                Ok(id) => Some(id),
                Err(e) => {
                    log::debug!("[sortable] skipping table {}: {}", id, e);
                    None
                }
            })
            .collect()
    }

    /// Initialize one table.
    ///
    /// Requires exactly one header row and at least one body row, and the
    /// table must not already be initialized. On success the table is marked,
    /// a listener is attached to every enabled header cell, and the
    /// activate-on-load column (if any) is sorted.
    pub fn initialize_table(&mut self, doc: &mut Document, table_id: &str) -> Result<String, SortError> {
        let table = doc.get(table_id).ok_or_else(|| SortError::NotFound {
            id: table_id.to_string(),
        })?;
        if !table.is("table") {
            return Err(SortError::NotATable {
                id: table_id.to_string(),
            });
        }

        let header = header_row(table)?;
        if table.get_attr(&self.config.initialized_marker) == Some("true")
            || self.tables.contains_key(table_id)
        {
            return Err(SortError::AlreadyInitialized {
                id: table_id.to_string(),
            });
        }
        if body(table).is_none_or(|tbody| body_rows(tbody).is_empty()) {
            return Err(SortError::NoBodyRows);
        }

        let headers: Vec<(String, ColumnConfig)> = cells(header)
            .map(|cell| (cell.id.clone(), column_config(cell)))
            .collect();

        if let Some(table) = doc.get_mut(table_id) {
            table.set_attr(self.config.initialized_marker.clone(), "true");
        }

        let mut listeners = Vec::new();
        for (column, (header_id, config)) in headers.iter().enumerate() {
            if config.disabled {
                continue;
            }
            let listener = doc.add_listener(header_id.clone(), self.config.activation);
            self.bindings.insert(listener, (table_id.to_string(), column));
            listeners.push(listener);
        }

        let controller = SortController::new(headers.iter().map(|(_, config)| *config));
        let load_column = controller.load_activation();
        let header_ids: Vec<String> = headers.into_iter().map(|(id, _)| id).collect();
        log::debug!(
            "[sortable] initialized table {} ({} columns, {} listeners)",
            table_id,
            header_ids.len(),
            listeners.len()
        );

        let load_target = load_column.map(|column| header_ids[column].clone());
        self.tables.insert(
            table_id.to_string(),
            BoundTable {
                controller,
                header_ids,
                listeners,
            },
        );

        if let Some(target) = load_target {
            let event = doc.trigger(target, self.config.activation);
            self.handle_event(doc, &event);
        }

        Ok(table_id.to_string())
    }

    /// Forget a table: detach its listeners, drop its column state and clear
    /// its markers so it can be initialized again.
    pub fn teardown(&mut self, doc: &mut Document, table_id: &str) -> Result<(), SortError> {
        let bound = self
            .tables
            .remove(table_id)
            .ok_or_else(|| SortError::NotInitialized {
                id: table_id.to_string(),
            })?;

        for listener in &bound.listeners {
            doc.remove_listener(*listener);
            self.bindings.remove(listener);
        }
        for header_id in &bound.header_ids {
            if let Some(header) = doc.get_mut(header_id) {
                header.remove_attr(ATTR_SORTED);
                header.remove_attr(ATTR_SORTED_DIRECTION);
            }
        }
        if let Some(table) = doc.get_mut(table_id) {
            table.remove_attr(&self.config.initialized_marker);
        }

        log::debug!("[sortable] tore down table {}", table_id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    /// Dispatch an event to the header listeners it reaches.
    ///
    /// Returns the activations that took place; skipped ones are logged.
    pub fn handle_event(&mut self, doc: &mut Document, event: &Event) -> Vec<Activation> {
        let mut activations = Vec::new();
        for listener in doc.listeners_for(event) {
            let Some((table_id, column)) = self.bindings.get(&listener).cloned() else {
                continue;
            };
            match self.activate(doc, &table_id, column) {
                Ok(activation) => activations.push(activation),
                Err(e) => log::debug!("[sortable] {} column {}: {}", table_id, column, e),
            }
        }
        activations
    }

    /// Activate `column` of an initialized table, then write the new row
    /// order and header state back to the document.
    pub fn activate(
        &mut self,
        doc: &mut Document,
        table_id: &str,
        column: usize,
    ) -> Result<Activation, SortError> {
        let bound = self
            .tables
            .get_mut(table_id)
            .ok_or_else(|| SortError::NotInitialized {
                id: table_id.to_string(),
            })?;
        let table = doc.get(table_id).ok_or_else(|| SortError::NotFound {
            id: table_id.to_string(),
        })?;
        let tbody = body(table).ok_or(SortError::NoBodyRows)?;

        let mut rows: Vec<IndexedRow<'_>> = body_rows(tbody)
            .into_iter()
            .enumerate()
            .map(|(index, element)| IndexedRow { index, element })
            .collect();
        let activation = bound.controller.activate(column, &mut rows)?;
        let order: Vec<usize> = rows.iter().map(|r| r.index).collect();

        reorder_rows(doc, table_id, &order);
        sync_headers(doc, &bound.header_ids, &bound.controller);
        Ok(activation)
    }
}

/// Reattach the body rows so that position `i` holds the row previously at
/// `order[i]`. Rows go to the end of the body, after any non-row children.
fn reorder_rows(doc: &mut Document, table_id: &str, order: &[usize]) {
    let Some(tbody) = doc
        .get_mut(table_id)
        .and_then(|table| table.child_elements_mut().find(|e| e.is("tbody")))
    else {
        return;
    };

    let (rows, mut others): (Vec<Element>, Vec<Element>) =
        tbody.take_children().into_iter().partition(|e| e.is("tr"));
    let mut slots: Vec<Option<Element>> = rows.into_iter().map(Some).collect();
    others.extend(order.iter().filter_map(|&i| slots.get_mut(i).and_then(Option::take)));
    // Anything the order missed stays, in its old relative order
    others.extend(slots.into_iter().flatten());

    log::trace!("[sortable] {}: row order {:?}", table_id, order);
    tbody.set_children(others);
}

/// Write each column's sort state onto its header cell.
fn sync_headers(doc: &mut Document, header_ids: &[String], controller: &SortController) {
    for (header_id, state) in header_ids.iter().zip(controller.columns()) {
        let Some(header) = doc.get_mut(header_id) else {
            continue;
        };
        match state.direction() {
            Some(direction) => {
                header.set_attr(ATTR_SORTED, "true");
                header.set_attr(ATTR_SORTED_DIRECTION, direction.as_str());
            }
            None => {
                header.set_attr(ATTR_SORTED, "false");
                header.remove_attr(ATTR_SORTED_DIRECTION);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_prefers_data_value() {
        let cell = Element::td("  Ten  ").attr(ATTR_VALUE, "10");
        assert_eq!(cell_value(Some(&cell)), "10");
        assert_eq!(cell_value(Some(&Element::td("  Ten  "))), "Ten");
        assert_eq!(cell_value(None), "");
    }

    #[test]
    fn test_row_sort_value_counts_th_and_td() {
        let row = Element::tr()
            .child(Element::th("label"))
            .child(Element::text("\n"))
            .child(Element::td("42"));
        assert_eq!(row.sort_value(0), "label");
        assert_eq!(row.sort_value(1), "42");
        assert_eq!(row.sort_value(2), "");
    }

    #[test]
    fn test_column_config_from_attributes() {
        let config = column_config(
            &Element::th("x")
                .attr(ATTR_DEFAULT_DIRECTION, "descending")
                .attr(ATTR_ACTIVATE_ON_LOAD, ""),
        );
        assert_eq!(config.default_direction, Some(SortDirection::Descending));
        assert!(config.activate_on_load);
        assert!(!config.disabled);

        assert!(column_config(&Element::th("x").attr(ATTR_SORTABLE, "false")).disabled);
        assert!(column_config(&Element::th("x").attr(ATTR_DISABLED, "")).disabled);
        assert!(!column_config(&Element::th("x").attr(ATTR_DISABLED, "false")).disabled);
        assert!(column_config(&Element::th("x").attr(ATTR_SORTABLE_DEFAULT, "")).activate_on_load);
    }

    #[test]
    fn test_legacy_default_needs_empty_value() {
        for value in ["true", "descending", "0"] {
            let header = Element::th("x").attr(ATTR_SORTABLE_DEFAULT, value);
            assert!(!column_config(&header).activate_on_load, "{value}");
        }
        // The current attribute accepts any value
        let header = Element::th("x").attr(ATTR_ACTIVATE_ON_LOAD, "true");
        assert!(column_config(&header).activate_on_load);
    }

    #[test]
    fn test_invalid_default_direction_is_ignored() {
        let config = column_config(&Element::th("x").attr(ATTR_DEFAULT_DIRECTION, "upward"));
        assert_eq!(config.default_direction, None);
    }

    #[test]
    fn test_header_row_requires_exactly_one() {
        let none = Element::table().child(Element::thead());
        assert_eq!(header_row(&none), Err(SortError::MissingHeader));

        let two = Element::table().child(Element::thead().child(Element::tr()).child(Element::tr()));
        assert_eq!(header_row(&two), Err(SortError::AmbiguousHeader { rows: 2 }));
    }
}

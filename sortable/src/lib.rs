//! Click-to-sort engine for tables.
//!
//! Clicking a column header sorts the body rows by that column. The column's
//! type (numeric, date or alpha) is inferred from its first non-empty value
//! and decides both the comparison and the default direction. Clicking the
//! same header again reverses the order.
//!
//! The engine is split into:
//!
//! - [`classify`]: column type inference
//! - [`compare`]: the comparator registry keyed by [`ColumnType`]
//! - [`controller`]: per-column state transitions and stable reordering
//! - [`table`]: a plain in-memory table model
//! - [`dom`]: the [`Sortable`] engine bound to a [`tabledom::Document`]

pub mod classify;
pub mod column;
pub mod compare;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod table;

pub use classify::{classify, parse_date};
pub use column::{ColumnConfig, ColumnState, ParseDirectionError, SortDirection};
pub use compare::{ColumnType, SortKey};
pub use config::SortableConfig;
pub use controller::{Activation, SortController, SortRow};
pub use dom::Sortable;
pub use error::SortError;
pub use table::{Cell, Row, Table};

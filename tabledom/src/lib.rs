pub mod document;
pub mod element;
pub mod event;
pub mod select;

pub use document::{Document, ListenerId};
pub use element::{find_element, find_element_mut, select_by_tag, Content, Element};
pub use event::{Event, EventKind};
pub use select::{select, Selector, SelectorError};

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Content;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// Tag used for bare text nodes.
pub const TEXT_TAG: &str = "#text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    // Identity
    pub id: String,
    pub tag: String,

    // Content
    pub content: Content,

    // String attributes (`data-*` and friends)
    pub attributes: HashMap<String, String>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            tag: String::from("div"),
            content: Content::None,
            attributes: HashMap::new(),
        }
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            id: generate_id(&tag),
            tag,
            ..Default::default()
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: generate_id("text"),
            tag: String::from(TEXT_TAG),
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    pub fn table() -> Self {
        Self::new("table")
    }

    pub fn thead() -> Self {
        Self::new("thead")
    }

    pub fn tbody() -> Self {
        Self::new("tbody")
    }

    pub fn tr() -> Self {
        Self::new("tr")
    }

    /// Header cell holding a single text node.
    pub fn th(text: impl Into<String>) -> Self {
        Self::new("th").child(Self::text(text))
    }

    /// Data cell holding a single text node.
    pub fn td(text: impl Into<String>) -> Self {
        Self::new("td").child(Self::text(text))
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    // Attributes
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        log::trace!("[dom] {}: {}={:?}", self.id, name, value);
        self.attributes.insert(name, value);
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    // Text

    /// Concatenated text of this element and all of its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match &self.content {
            Content::Text(text) => out.push_str(text),
            Content::Children(children) => {
                for child in children {
                    child.push_text(out);
                }
            }
            Content::None => {}
        }
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            Content::None => self.content = Content::Children(vec![child]),
            Content::Text(_) => {
                // Replace content with children
                self.content = Content::Children(vec![child]);
            }
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        match &mut self.content {
            Content::Children(children) => children.extend(new_children),
            Content::None | Content::Text(_) => {
                self.content = Content::Children(new_children.into_iter().collect());
            }
        }
        self
    }

    /// Direct child nodes, in order, `#text` nodes included. Callers that
    /// want elements of a given kind filter with [`Element::is`]. Empty for
    /// text and empty elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        let children: &[Element] = match &self.content {
            Content::Children(children) => children,
            _ => Default::default(),
        };
        children.iter()
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        let children: &mut [Element] = match &mut self.content {
            Content::Children(children) => children,
            _ => Default::default(),
        };
        children.iter_mut()
    }

    /// Take ownership of the children, leaving the element empty.
    pub fn take_children(&mut self) -> Vec<Element> {
        match std::mem::take(&mut self.content) {
            Content::Children(children) => children,
            other => {
                self.content = other;
                Vec::new()
            }
        }
    }

    /// Replace the children wholesale, in the given order.
    pub fn set_children(&mut self, children: Vec<Element>) {
        self.content = Content::Children(children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_concatenates_descendants() {
        let cell = Element::new("td")
            .child(Element::text("  12"))
            .child(Element::new("span").child(Element::text("34  ")));
        assert_eq!(cell.text_content(), "  1234  ");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Element::tr();
        let b = Element::tr();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("tr-"));
    }

    #[test]
    fn test_take_children_on_text_keeps_text() {
        let mut el = Element::text("hello");
        assert!(el.take_children().is_empty());
        assert_eq!(el.text_content(), "hello");
    }

    #[test]
    fn test_attributes() {
        let mut el = Element::th("Name").attr("data-sortable", "false");
        assert_eq!(el.get_attr("data-sortable"), Some("false"));
        el.set_attr("data-sorted", "true");
        assert!(el.has_attr("data-sorted"));
        assert_eq!(el.remove_attr("data-sorted"), Some("true".to_string()));
        assert!(!el.has_attr("data-sorted"));
    }

    #[test]
    fn test_child_elements_includes_text_nodes() {
        let row = Element::tr()
            .child(Element::text("\n  "))
            .child(Element::td("a"))
            .child(Element::text("\n"));
        let tags: Vec<&str> = row.child_elements().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec![TEXT_TAG, "td", TEXT_TAG]);
        assert_eq!(row.child_elements().filter(|e| e.is("td")).count(), 1);
        assert_eq!(Element::text("x").child_elements().count(), 0);
    }
}

//! Document root and activation listener registry.

use crate::element::{find_element, find_element_mut, Content, Element};
use crate::event::{Event, EventKind};

/// Handle for a registered listener.
///
/// Listeners carry no callback. Whoever registers one keeps its own mapping
/// from the handle to whatever it needs to act on the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
struct Listener {
    id: ListenerId,
    element_id: String,
    kind: EventKind,
}

/// An element tree plus the listeners attached to its elements.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
    listeners: Vec<Listener>,
    next_listener: u64,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            root,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        find_element(&self.root, id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        find_element_mut(&mut self.root, id)
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Attach a listener for `kind` events to the element with `element_id`.
    pub fn add_listener(&mut self, element_id: impl Into<String>, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        let element_id = element_id.into();
        log::debug!("[dom] listener {:?} on {} for {:?}", id, element_id, kind);
        self.listeners.push(Listener {
            id,
            element_id,
            kind,
        });
        id
    }

    /// Detach a listener. Returns false if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners that receive `event`, in bubbling order: those on the target
    /// first, then those on each ancestor up to the root.
    pub fn listeners_for(&self, event: &Event) -> Vec<ListenerId> {
        let Some(path) = path_to(&self.root, &event.target) else {
            log::trace!("[dom] event target {} not in document", event.target);
            return Vec::new();
        };

        let mut matched = Vec::new();
        for element_id in path.iter().rev() {
            matched.extend(
                self.listeners
                    .iter()
                    .filter(|l| l.kind == event.kind && l.element_id == **element_id)
                    .map(|l| l.id),
            );
        }
        matched
    }

    /// Build an event as if the user had activated `element_id`.
    pub fn trigger(&self, element_id: impl Into<String>, kind: EventKind) -> Event {
        Event::new(kind, element_id)
    }
}

/// IDs of the elements from `root` down to `target`, inclusive.
fn path_to<'a>(root: &'a Element, target: &str) -> Option<Vec<&'a str>> {
    if root.id == target {
        return Some(vec![root.id.as_str()]);
    }

    if let Content::Children(children) = &root.content {
        for child in children {
            if let Some(mut path) = path_to(child, target) {
                path.insert(0, root.id.as_str());
                return Some(path);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_to_nested() {
        let root = Element::new("div")
            .id("root")
            .child(Element::new("span").id("mid").child(Element::text("x").id("leaf")));
        assert_eq!(path_to(&root, "leaf"), Some(vec!["root", "mid", "leaf"]));
        assert_eq!(path_to(&root, "missing"), None);
    }
}

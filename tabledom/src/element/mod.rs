mod content;
mod node;

pub use content::Content;
pub use node::Element;

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    if let Content::Children(children) = &root.content {
        for child in children {
            if let Some(found) = find_element(child, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Find an element by ID in the tree, mutably.
pub fn find_element_mut<'a>(root: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if root.id == id {
        return Some(root);
    }

    if let Content::Children(children) = &mut root.content {
        for child in children {
            if let Some(found) = find_element_mut(child, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Collect all descendants of `root` (excluding `root` itself) with the given
/// tag, in document order.
pub fn select_by_tag<'a>(root: &'a Element, tag: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    collect_by_tag(root, tag, &mut found);
    found
}

fn collect_by_tag<'a>(element: &'a Element, tag: &str, found: &mut Vec<&'a Element>) {
    for child in element.child_elements() {
        if child.tag.eq_ignore_ascii_case(tag) {
            found.push(child);
        }
        collect_by_tag(child, tag, found);
    }
}

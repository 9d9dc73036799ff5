//! Minimal selector queries over an element tree.
//!
//! Supports comma-separated lists of compound selectors made of an optional
//! tag name, an optional `#id`, and any number of attribute filters:
//!
//! ```
//! use tabledom::{select, Element, Selector};
//!
//! let root = Element::new("div")
//!     .child(Element::table().attr("data-sortable", ""))
//!     .child(Element::table());
//!
//! let selector = Selector::parse("table[data-sortable]").unwrap();
//! assert_eq!(select(&root, &selector).len(), 1);
//! ```
//!
//! Descendant and child combinators are not supported.

use crate::element::Element;

/// Errors produced while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector (or one entry of a list) is empty.
    #[error("empty selector")]
    Empty,

    /// An unexpected character was found.
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    /// An attribute filter was not closed with `]`.
    #[error("unterminated attribute filter starting at offset {offset}")]
    UnterminatedAttribute { offset: usize },

    /// Whitespace inside a compound selector (a descendant combinator).
    #[error("combinators are not supported: {selector:?}")]
    Combinator { selector: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrFilter {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    attrs: Vec<AttrFilter>,
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag
            && !element.is(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && &element.id != id
        {
            return false;
        }
        self.attrs.iter().all(|filter| match &filter.value {
            Some(value) => element.get_attr(&filter.name) == Some(value.as_str()),
            None => element.has_attr(&filter.name),
        })
    }
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Parse a selector such as `table[data-sortable]` or `#orders, #users`.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        for (base, part) in split_list(input) {
            alternatives.push(parse_compound(part, base)?);
        }
        Ok(Self { alternatives })
    }

    /// Whether `element` matches any alternative of this selector.
    pub fn matches(&self, element: &Element) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }
}

/// All elements in the tree (root included) matching `selector`, in document
/// order.
pub fn select<'a>(root: &'a Element, selector: &Selector) -> Vec<&'a Element> {
    let mut found = Vec::new();
    collect(root, selector, &mut found);
    found
}

fn collect<'a>(element: &'a Element, selector: &Selector, found: &mut Vec<&'a Element>) {
    if selector.matches(element) {
        found.push(element);
    }
    for child in element.child_elements() {
        collect(child, selector, found);
    }
}

/// Split a selector list on commas outside attribute filters and quotes.
/// Each entry comes with its byte offset into `input`.
fn split_list(input: &str) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_brackets = false;
    let mut quote: Option<char> = None;

    for (offset, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if in_brackets => quote = Some(c),
            (None, '[') => in_brackets = true,
            (None, ']') => in_brackets = false,
            (None, ',') if !in_brackets => {
                parts.push((start, &input[start..offset]));
                start = offset + 1;
            }
            _ => {}
        }
    }
    parts.push((start, &input[start..]));
    parts
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(raw: &str, base: usize) -> Result<Compound, SelectorError> {
    let lead = raw.len() - raw.trim_start().len();
    let part = raw.trim();
    if part.is_empty() {
        return Err(SelectorError::Empty);
    }
    let base = base + lead;

    let mut compound = Compound::default();
    let chars: Vec<(usize, char)> = part.char_indices().collect();
    let mut i = 0;

    let read_name = |start: usize| -> (String, usize) {
        let mut end = start;
        while end < chars.len() && is_name_char(chars[end].1) {
            end += 1;
        }
        (chars[start..end].iter().map(|(_, c)| c).collect(), end)
    };

    // Leading tag name or universal selector
    if chars[0].1 == '*' {
        i = 1;
    } else if is_name_char(chars[0].1) {
        let (tag, end) = read_name(0);
        compound.tag = Some(tag);
        i = end;
    }

    while i < chars.len() {
        let (offset, c) = chars[i];
        match c {
            '#' => {
                let (id, end) = read_name(i + 1);
                if id.is_empty() {
                    return Err(SelectorError::Unexpected {
                        found: c,
                        offset: base + offset,
                    });
                }
                compound.id = Some(id);
                i = end;
            }
            '[' => {
                let close = closing_bracket(&chars, i).ok_or(
                    SelectorError::UnterminatedAttribute {
                        offset: base + offset,
                    },
                )?;
                let body: String = chars[i + 1..close].iter().map(|(_, c)| c).collect();
                compound.attrs.push(parse_attr(&body, base + offset)?);
                i = close + 1;
            }
            c if c.is_whitespace() => {
                return Err(SelectorError::Combinator {
                    selector: part.to_string(),
                });
            }
            _ => {
                return Err(SelectorError::Unexpected {
                    found: c,
                    offset: base + offset,
                });
            }
        }
    }

    Ok(compound)
}

/// Index of the `]` closing the filter opened at `open`, skipping quoted values.
fn closing_bracket(chars: &[(usize, char)], open: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, (_, c)) in chars.iter().enumerate().skip(open + 1) {
        match (quote, *c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(*c),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_attr(body: &str, offset: usize) -> Result<AttrFilter, SelectorError> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_string()))
        }
        None => (body.trim(), None),
    };

    if name.is_empty() {
        return Err(SelectorError::Empty);
    }
    if let Some(bad) = name.chars().find(|c| !is_name_char(*c)) {
        return Err(SelectorError::Unexpected { found: bad, offset });
    }

    Ok(AttrFilter {
        name: name.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_and_attribute() {
        let selector = Selector::parse("table[data-sortable]").unwrap();
        assert!(selector.matches(&Element::table().attr("data-sortable", "")));
        assert!(!selector.matches(&Element::table()));
        assert!(!selector.matches(&Element::new("div").attr("data-sortable", "")));
    }

    #[test]
    fn test_parse_attribute_value() {
        let selector = Selector::parse("th[data-sortable=\"false\"]").unwrap();
        assert!(selector.matches(&Element::th("a").attr("data-sortable", "false")));
        assert!(!selector.matches(&Element::th("a").attr("data-sortable", "true")));

        let selector = Selector::parse("[data-kind=report]").unwrap();
        assert!(selector.matches(&Element::table().attr("data-kind", "report")));
    }

    #[test]
    fn test_parse_id_and_list() {
        let selector = Selector::parse("#orders, table#users").unwrap();
        assert!(selector.matches(&Element::table().id("orders")));
        assert!(selector.matches(&Element::table().id("users")));
        assert!(!selector.matches(&Element::new("div").id("users")));
    }

    #[test]
    fn test_parse_quoted_value_with_separators() {
        let selector = Selector::parse("[data-x=\"a,b\"], #users").unwrap();
        assert_eq!(selector.alternatives.len(), 2);
        assert!(selector.matches(&Element::table().attr("data-x", "a,b")));
        assert!(!selector.matches(&Element::table().attr("data-x", "a")));
        assert!(selector.matches(&Element::table().id("users")));

        let selector = Selector::parse("th[data-label='x]y']").unwrap();
        assert!(selector.matches(&Element::th("a").attr("data-label", "x]y")));
    }

    #[test]
    fn test_split_list_offsets() {
        assert_eq!(
            split_list("a, [b=\",\"],c"),
            vec![(0, "a"), (2, " [b=\",\"]"), (11, "c")]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("table,"), Err(SelectorError::Empty));
        assert!(matches!(
            Selector::parse("table[data-sortable"),
            Err(SelectorError::UnterminatedAttribute { offset: 5 })
        ));
        assert!(matches!(
            Selector::parse("div table"),
            Err(SelectorError::Combinator { .. })
        ));
        assert!(matches!(
            Selector::parse("table.foo"),
            Err(SelectorError::Unexpected { found: '.', .. })
        ));
    }
}

//! Comparator registry keyed by column type.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::classify::parse_date;
use crate::column::SortDirection;

/// Longest leading float once everything but digits, `.` and `-` is gone.
static LEADING_FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:[0-9]+\.?[0-9]*|\.[0-9]+)").expect("Invalid float pattern"));

/// Inferred type of a column. Each type carries its default direction and
/// its comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Date,
    Alpha,
}

impl ColumnType {
    /// Direction produced by [`compare`](Self::compare) on its own.
    ///
    /// Numeric columns default to largest-first; dates and text to natural
    /// ascending order.
    pub fn default_direction(self) -> SortDirection {
        match self {
            Self::Numeric => SortDirection::Descending,
            Self::Date | Self::Alpha => SortDirection::Ascending,
        }
    }

    /// Compare two raw cell values in this type's default direction.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        self.sort_key(a).compare(&self.sort_key(b))
    }

    /// Parse a raw value into its comparable form.
    ///
    /// Unparseable numbers become `0` and unparseable dates become the epoch,
    /// so malformed cells still take part in the sort.
    pub fn sort_key(self, value: &str) -> SortKey {
        match self {
            Self::Numeric => SortKey::Number(parse_number(value)),
            Self::Date => SortKey::Timestamp(parse_date(value).unwrap_or(0)),
            Self::Alpha => SortKey::Text(value.to_string()),
        }
    }
}

/// A cell value parsed for comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Number(f64),
    /// Milliseconds since the epoch.
    Timestamp(i64),
    Text(String),
}

impl SortKey {
    /// Compare in the owning type's default direction: numbers descending,
    /// timestamps and text ascending.
    pub fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => b.partial_cmp(a).unwrap_or(Ordering::Equal),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => collate(a, b),
            // A column never mixes key kinds; keep the order total anyway.
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Timestamp(_) => 1,
            Self::Text(_) => 2,
        }
    }
}

/// Read a numeric cell the lenient way: drop everything except digits, `.`
/// and `-`, then take the longest leading float. Returns `0.0` when nothing
/// parses.
pub fn parse_number(value: &str) -> f64 {
    let stripped: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    LEADING_FLOAT
        .find(&stripped)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Default text collation.
///
/// Letters compare with accents and case folded away first, so `"éclair"`
/// lands between `"apple"` and `"fig"`. Ties break on accents (unaccented
/// first), then on case (lowercase first at the first difference), then on
/// code points.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| lowercase_decomposed(a).cmp(lowercase_decomposed(b)))
        .then_with(|| case_order(a, b))
        .then_with(|| a.cmp(b))
}

/// Canonically decomposed, combining marks dropped, lowercased.
fn base_letters(value: &str) -> impl Iterator<Item = char> + '_ {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn lowercase_decomposed(value: &str) -> impl Iterator<Item = char> + '_ {
    value.nfd().flat_map(char::to_lowercase)
}

fn case_order(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x != y {
            return match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            };
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directions() {
        assert_eq!(ColumnType::Numeric.default_direction(), SortDirection::Descending);
        assert_eq!(ColumnType::Date.default_direction(), SortDirection::Ascending);
        assert_eq!(ColumnType::Alpha.default_direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("10"), 10.0);
        assert_eq!(parse_number("$1,234.50"), 1234.5);
        assert_eq!(parse_number("-£3.25"), -3.25);
        assert_eq!(parse_number("45%"), 45.0);
        assert_eq!(parse_number("1.2.3"), 1.2);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("5-3"), 5.0);
    }

    #[test]
    fn test_parse_number_coerces_garbage_to_zero() {
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("-"), 0.0);
        assert_eq!(parse_number("."), 0.0);
    }

    #[test]
    fn test_numeric_compare_is_descending() {
        assert_eq!(ColumnType::Numeric.compare("10", "2"), Ordering::Less);
        assert_eq!(ColumnType::Numeric.compare("2", "10"), Ordering::Greater);
        assert_eq!(ColumnType::Numeric.compare("abc", "0"), Ordering::Equal);
        assert_eq!(ColumnType::Numeric.compare("-0", "0"), Ordering::Equal);
    }

    #[test]
    fn test_date_compare_is_chronological() {
        assert_eq!(ColumnType::Date.compare("2023-01-01", "2024-01-01"), Ordering::Less);
        assert_eq!(ColumnType::Date.compare("not a date", "1970-01-01"), Ordering::Equal);
    }

    #[test]
    fn test_collate() {
        assert_eq!(collate("Apple", "banana"), Ordering::Less);
        assert_eq!(collate("banana", "Cherry"), Ordering::Less);
        assert_eq!(collate("apple", "Apple"), Ordering::Less);
        assert_eq!(collate("Apple", "apple"), Ordering::Greater);
        assert_eq!(collate("app", "apple"), Ordering::Less);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_collate_folds_accents() {
        let mut words = vec!["éclair", "fig", "apple", "Zebra"];
        words.sort_by(|a, b| collate(a, b));
        assert_eq!(words, vec!["apple", "éclair", "fig", "Zebra"]);

        assert_eq!(collate("resume", "résumé"), Ordering::Less);
        assert_eq!(collate("résumé", "Resume"), Ordering::Greater);
        assert_eq!(collate("Émile", "emma"), Ordering::Less);
        // Precomposed and decomposed spellings tie until the code point check
        assert_ne!(collate("caf\u{e9}", "cafe\u{301}"), Ordering::Equal);
        assert_eq!(collate("caf\u{e9}", "cafe\u{301}x"), Ordering::Less);
    }
}

//! Column type inference.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::compare::ColumnType;

/// Optional sign, optional currency symbol, digits with grouping or decimal
/// separators, optional percent.
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[£$¤]?[0-9,.]+%?$").expect("Invalid number pattern"));

/// Date-time layouts without an offset. Parsed values are taken as UTC.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%y %H:%M",
    "%m/%d/%y %I:%M %p",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
];

/// Date-only layouts, taken as midnight UTC.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
    "%a, %d %b %Y",
    "%a %b %d %Y",
];

/// Month-only layouts, taken as the first of the month. Each is tried with
/// its suffix appended to the input so chrono has a day to read.
const MONTH_FORMATS: &[(&str, &str)] = &[
    ("%B %Y %d", " 1"),
    ("%Y-%m-%d", "-01"),
    ("%Y/%m/%d", "/01"),
];

/// `%Y` reads any run of digits, so `1/5/24` would otherwise land in the
/// year 24. Four-digit years only; two-digit years go through `%y`.
fn plausible(date: NaiveDate) -> bool {
    date.year() >= 1000
}

fn utc_millis(dt: NaiveDateTime) -> Option<i64> {
    plausible(dt.date()).then(|| dt.and_utc().timestamp_millis())
}

fn midnight_millis(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0).and_then(utc_millis)
}

/// Whether `value` looks like a number (`-$1,234.50`, `12%`, `£3`).
pub fn is_numeric(value: &str) -> bool {
    NUMBER_PATTERN.is_match(value)
}

/// Parse a calendar date or date-time into milliseconds since the epoch.
///
/// Offsets are honoured for RFC 3339 and RFC 2822 input; everything else is
/// read as UTC. A month with no day (`March 2024`, `2024-03`) is its first
/// day. Parses landing before the year 1000 are discarded.
pub fn parse_date(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.timestamp_millis());
    }

    let datetimes = DATETIME_FORMATS
        .iter()
        .filter_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .filter_map(utc_millis);
    let dates = DATE_FORMATS
        .iter()
        .filter_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .filter_map(midnight_millis);
    let months = MONTH_FORMATS
        .iter()
        .filter_map(|(format, day)| NaiveDate::parse_from_str(&format!("{value}{day}"), format).ok())
        .filter_map(midnight_millis);

    datetimes.chain(dates).chain(months).next()
}

/// Infer a column's type from its values, in row order.
///
/// Empty values are skipped. The first non-empty value decides: numeric,
/// then date, otherwise alpha. Later values are never consulted, so a column
/// whose first value is numeric stays numeric whatever follows. A column with
/// no non-empty value is alpha.
pub fn classify<I, S>(values: I) -> ColumnType
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let first = values.into_iter().find(|v| !v.as_ref().is_empty());
    let Some(first) = first else {
        log::trace!("[sortable] classify: no values, alpha");
        return ColumnType::Alpha;
    };
    let first = first.as_ref();

    let column_type = if is_numeric(first) {
        ColumnType::Numeric
    } else if parse_date(first).is_some() {
        ColumnType::Date
    } else {
        ColumnType::Alpha
    };
    log::trace!("[sortable] classify: {:?} -> {:?}", first, column_type);
    column_type
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_pattern() {
        for value in ["10", "-3", "1,234.50", "$12", "-£3.5", "¤7", "45%", ".5", "1.2.3"] {
            assert!(is_numeric(value), "{value} should be numeric");
        }
        for value in ["abc", "12 apples", "$", "€12", "1e5", "--1", "2024-01-15", "5%%"] {
            assert!(!is_numeric(value), "{value} should not be numeric");
        }
    }

    #[test]
    fn test_parse_date_formats() {
        let jan_15 = 1_705_276_800_000;
        assert_eq!(parse_date("2024-01-15"), Some(jan_15));
        assert_eq!(parse_date("2024/01/15"), Some(jan_15));
        assert_eq!(parse_date("01/15/2024"), Some(jan_15));
        assert_eq!(parse_date("January 15, 2024"), Some(jan_15));
        assert_eq!(parse_date("Jan 15, 2024"), Some(jan_15));
        assert_eq!(parse_date("15 January 2024"), Some(jan_15));
        assert_eq!(parse_date("2024-01-15T00:00:00Z"), Some(jan_15));
        assert_eq!(parse_date("2024-01-15T02:00:00+02:00"), Some(jan_15));
        assert_eq!(parse_date("2024-01-15 00:00:00"), Some(jan_15));
        assert_eq!(parse_date("Mon, 15 Jan 2024 00:00:00 +0000"), Some(jan_15));
        assert_eq!(parse_date("Mon Jan 15 2024"), Some(jan_15));

        assert_eq!(parse_date("12/25/2023 10:30 AM"), parse_date("2023-12-25 10:30"));
        assert_eq!(parse_date("12/25/2023 10:30 PM"), parse_date("2023-12-25 22:30"));
        assert_eq!(parse_date("12/25/2023 10:30:15 pm"), parse_date("2023-12-25T22:30:15"));
        assert!(parse_date("12/25/2023 10:30 AM").is_some());
    }

    #[test]
    fn test_parse_date_month_only() {
        let march_1 = parse_date("2024-03-01");
        assert!(march_1.is_some());
        assert_eq!(parse_date("March 2024"), march_1);
        assert_eq!(parse_date("Mar 2024"), march_1);
        assert_eq!(parse_date("2024-03"), march_1);
        assert_eq!(parse_date("2024/03"), march_1);
    }

    #[test]
    fn test_parse_date_two_digit_year() {
        assert_eq!(parse_date("1/5/24"), parse_date("2024-01-05"));
        assert_eq!(parse_date("1/5/99"), parse_date("1999-01-05"));
        assert_eq!(parse_date("1/5/24 9:15 PM"), parse_date("2024-01-05 21:15"));
        // Never a first-century date
        let year_one_thousand = parse_date("1000-01-01").unwrap();
        assert!(parse_date("1/5/24").unwrap() > year_one_thousand);
    }

    #[test]
    fn test_parse_date_rejects() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("banana"), None);
        assert_eq!(parse_date("2024-13-40"), None);
    }

    #[test]
    fn test_classify_numeric() {
        assert_eq!(classify(["10", "2", "5"]), ColumnType::Numeric);
        assert_eq!(classify(["$1,200", "$30"]), ColumnType::Numeric);
        assert_eq!(classify(["12%", "7%"]), ColumnType::Numeric);
    }

    #[test]
    fn test_classify_date() {
        assert_eq!(classify(["2024-01-15", "2023-12-01"]), ColumnType::Date);
        assert_eq!(classify(["March 3, 2021"]), ColumnType::Date);
        assert_eq!(classify(["March 2024", "2023-06-01"]), ColumnType::Date);
        assert_eq!(classify(["12/25/2023 10:30 AM"]), ColumnType::Date);
        assert_eq!(classify(["Mon Jan 15 2024"]), ColumnType::Date);
    }

    #[test]
    fn test_classify_alpha() {
        assert_eq!(classify(["banana", "Apple"]), ColumnType::Alpha);
        assert_eq!(classify(Vec::<String>::new()), ColumnType::Alpha);
        assert_eq!(classify(["", "", ""]), ColumnType::Alpha);
    }

    #[test]
    fn test_classify_skips_empty_values() {
        assert_eq!(classify(["", "", "42"]), ColumnType::Numeric);
    }

    #[test]
    fn test_classify_first_value_decides() {
        assert_eq!(classify(["1", "abc", "def"]), ColumnType::Numeric);
        assert_eq!(classify(["abc", "1", "2"]), ColumnType::Alpha);
    }
}

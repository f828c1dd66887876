//! Value ordering shared by sorting and inequality filters
//!
//! [`compare`] is a total order over [`FieldValue`]: it never panics, whatever
//! mix of types a field holds, and it is safe to hand to `sort_by`.
//!
//! 1. Null is greater than every non-null value (nulls trail).
//! 2. Numbers compare numerically (integers against floats exactly), dates by instant, booleans `false < true`,
//!    everything else by collation of the string form.
//! 3. A string that parses as a date is a date.
//! 4. Values of different classes order numbers, dates, booleans, text.

use crate::core::field::FieldValue;
use crate::core::record::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Compare two field values
pub fn compare(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
        (FieldValue::Null, _) => Ordering::Greater,
        (_, FieldValue::Null) => Ordering::Less,
        _ => match (SortClass::of(a), SortClass::of(b)) {
            (SortClass::Integer(x), SortClass::Integer(y)) => x.cmp(&y),
            (SortClass::Integer(x), SortClass::Float(y)) => compare_integer_float(x, y),
            (SortClass::Float(x), SortClass::Integer(y)) => compare_integer_float(y, x).reverse(),
            (SortClass::Float(x), SortClass::Float(y)) => compare_numbers(x, y),
            (SortClass::Date(x), SortClass::Date(y)) => x.cmp(&y),
            (SortClass::Boolean(x), SortClass::Boolean(y)) => x.cmp(&y),
            (SortClass::Text(x), SortClass::Text(y)) => collate(&x, &y),
            (x, y) => x.rank().cmp(&y.rank()),
        },
    }
}

/// Comparable reading of a non-null value
enum SortClass<'a> {
    Integer(i64),
    Float(f64),
    Date(DateTime<Utc>),
    Boolean(bool),
    Text(Cow<'a, str>),
}

impl<'a> SortClass<'a> {
    fn of(value: &'a FieldValue) -> Self {
        match value {
            FieldValue::Integer(i) => SortClass::Integer(*i),
            FieldValue::Float(f) => SortClass::Float(*f),
            FieldValue::DateTime(dt) => SortClass::Date(*dt),
            FieldValue::Boolean(b) => SortClass::Boolean(*b),
            FieldValue::String(s) => match parse_date(s) {
                Some(dt) => SortClass::Date(dt),
                None => SortClass::Text(Cow::Borrowed(s)),
            },
            other => SortClass::Text(Cow::Owned(other.to_display_string())),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortClass::Integer(_) | SortClass::Float(_) => 0,
            SortClass::Date(_) => 1,
            SortClass::Boolean(_) => 2,
            SortClass::Text(_) => 3,
        }
    }
}

/// Compare the values two records hold for a field
///
/// An unknown field reads as null on both sides and therefore ties.
pub fn compare_field(a: &Record, b: &Record, field: &str) -> Ordering {
    compare(a.get(field), b.get(field))
}

/// Numeric ordering with NaN after every number
pub fn compare_numbers(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact ordering of an integer against a float, NaN last
///
/// Casting the integer to `f64` would merge neighbouring integers beyond
/// 2^53 with the same float.
fn compare_integer_float(i: i64, f: f64) -> Ordering {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() || f >= TWO_POW_63 {
        return Ordering::Less;
    }
    if f < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(f - whole)).unwrap_or(Ordering::Equal),
        ordering => ordering,
    }
}

/// Locale-style string collation
///
/// Case-insensitive first; on case-only differences lowercase sorts first.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}

fn date_shape() -> &'static Regex {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    DATE_REGEX.get_or_init(|| {
        Regex::new(
            r"^\d{4}-\d{2}-\d{2}(?:[Tt ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:[Zz]|[+-]\d{2}:?\d{2})?)?$",
        )
        .expect("date pattern is valid")
    })
}

/// Parse a string that unambiguously denotes a date
///
/// Only ISO 8601 shapes are accepted (`2024-03-01`, `2024-03-01T10:00:00`,
/// `2024-03-01 10:00`, RFC 3339 with offset). Naive times are taken as UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if !date_shape().is_match(s) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Numeric reading of a value: numbers, or strings that parse as numbers
pub fn numeric_value(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Integer(_) | FieldValue::Float(_) => value.as_number(),
        FieldValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok().filter(|f| !f.is_nan())
            }
        }
        _ => None,
    }
}

/// Temporal reading of a value: dates, or strings that parse as dates
pub fn temporal_value(value: &FieldValue) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::DateTime(dt) => Some(*dt),
        FieldValue::String(s) => parse_date(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn s(v: &str) -> FieldValue {
        FieldValue::String(v.to_string())
    }

    #[test]
    fn test_null_trails_everything() {
        assert_eq!(compare(&FieldValue::Null, &FieldValue::Integer(1)), Ordering::Greater);
        assert_eq!(compare(&s("a"), &FieldValue::Null), Ordering::Less);
        assert_eq!(compare(&FieldValue::Null, &FieldValue::Null), Ordering::Equal);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(compare(&FieldValue::Integer(9), &FieldValue::Integer(10)), Ordering::Less);
        assert_eq!(compare(&FieldValue::Float(2.5), &FieldValue::Integer(2)), Ordering::Greater);
        assert_eq!(compare(&FieldValue::Integer(3), &FieldValue::Float(3.0)), Ordering::Equal);
    }

    #[test]
    fn test_nan_sorts_after_numbers() {
        assert_eq!(compare(&FieldValue::Float(f64::NAN), &FieldValue::Integer(1)), Ordering::Greater);
        assert_eq!(
            compare(&FieldValue::Float(f64::NAN), &FieldValue::Float(f64::NAN)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_large_integers_against_floats_stay_ordered() {
        let near_max = FieldValue::Integer(i64::MAX - 1);
        let max = FieldValue::Integer(i64::MAX);
        let two_pow_63 = FieldValue::Float(9_223_372_036_854_775_808.0);
        let two_pow_53 = FieldValue::Float(9_007_199_254_740_992.0);

        assert_eq!(compare(&near_max, &max), Ordering::Less);
        assert_eq!(compare(&max, &two_pow_63), Ordering::Less);
        assert_eq!(compare(&two_pow_63, &near_max), Ordering::Greater);
        assert_eq!(
            compare(&FieldValue::Integer(9_007_199_254_740_993), &two_pow_53),
            Ordering::Greater
        );
        assert_eq!(compare(&FieldValue::Integer(2), &FieldValue::Float(2.0)), Ordering::Equal);
        assert_eq!(compare(&FieldValue::Integer(-3), &FieldValue::Float(-2.5)), Ordering::Less);
        assert_eq!(compare(&FieldValue::Float(-2.5), &FieldValue::Integer(-2)), Ordering::Less);
        assert_eq!(compare(&FieldValue::Integer(i64::MIN), &FieldValue::Float(-1e300)), Ordering::Greater);
    }

    #[test]
    fn test_strings_collate_case_insensitively() {
        assert_eq!(compare(&s("apple"), &s("Banana")), Ordering::Less);
        assert_eq!(compare(&s("Zed"), &s("amy")), Ordering::Greater);
        assert_eq!(compare(&s("a"), &s("A")), Ordering::Less);
        assert_eq!(compare(&s("same"), &s("same")), Ordering::Equal);
    }

    #[test]
    fn test_date_strings_compare_as_dates() {
        // As text the first string is greater; as instants it is earlier
        assert_eq!(
            compare(&s("2024-03-01T00:00:00+05:00"), &s("2024-02-29T20:00:00Z")),
            Ordering::Less
        );
        assert_eq!(
            compare(&s("2024-03-01T02:00:00+02:00"), &s("2024-03-01 00:30")),
            Ordering::Less
        );
    }

    #[test]
    fn test_unparsed_string_is_text() {
        // "n/a" is text, which orders after any date
        assert_eq!(compare(&s("2024-03-01"), &s("n/a")), Ordering::Less);
        assert_eq!(compare(&s("2024-13-45"), &s("2024-03-01")), Ordering::Greater);
    }

    #[test]
    fn test_native_dates() {
        let early = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            compare(&FieldValue::DateTime(early), &FieldValue::DateTime(late)),
            Ordering::Less
        );
    }

    #[test]
    fn test_booleans_false_first() {
        assert_eq!(compare(&FieldValue::Boolean(false), &FieldValue::Boolean(true)), Ordering::Less);
    }

    #[test]
    fn test_mixed_types_order_by_class() {
        // Numbers before dates before booleans before text
        assert_eq!(compare(&FieldValue::Integer(99), &s("1")), Ordering::Less);
        assert_eq!(compare(&s("2024-03-01"), &FieldValue::Integer(1)), Ordering::Greater);
        assert_eq!(compare(&FieldValue::Boolean(true), &s("2024-03-01")), Ordering::Greater);
        assert_eq!(compare(&s("abc"), &FieldValue::Boolean(false)), Ordering::Greater);
        assert_eq!(
            compare(&FieldValue::List(vec![s("b")]), &s("a")),
            Ordering::Greater
        );
    }

    #[test]
    fn test_mixed_ordering_is_transitive() {
        // As strings "10" < "5" < "9" while 9 < 10 numerically
        let mut values = vec![
            FieldValue::Integer(10),
            s("5"),
            FieldValue::Integer(9),
            s("2024-01-01"),
            FieldValue::Null,
            FieldValue::Boolean(true),
        ];
        values.sort_by(compare);
        assert_eq!(
            values,
            vec![
                FieldValue::Integer(9),
                FieldValue::Integer(10),
                s("2024-01-01"),
                FieldValue::Boolean(true),
                s("5"),
                FieldValue::Null,
            ]
        );
    }

    #[test]
    fn test_parse_date_shapes() {
        assert!(parse_date("2024-03-01").is_some());
        assert!(parse_date("2024-03-01T10:00:00Z").is_some());
        assert!(parse_date("2024-03-01T10:00:00.250+01:00").is_some());
        assert!(parse_date("2024-03-01 10:00").is_some());
        assert!(parse_date("2024-13-01").is_none());
        assert!(parse_date("March 1st").is_none());
        assert!(parse_date("20240301").is_none());
        assert!(parse_date("42").is_none());
    }

    #[test]
    fn test_numeric_and_temporal_readings() {
        assert_eq!(numeric_value(&s(" 26 ")), Some(26.0));
        assert_eq!(numeric_value(&s("")), None);
        assert_eq!(numeric_value(&s("abc")), None);
        assert_eq!(numeric_value(&FieldValue::Boolean(true)), None);
        assert!(temporal_value(&s("2024-01-01")).is_some());
        assert!(temporal_value(&FieldValue::Integer(2024)).is_none());
    }

    #[test]
    fn test_compare_field_unknown_field_ties() {
        let a = Record::new().with("x", 1);
        let b = Record::new().with("x", 2);
        assert_eq!(compare_field(&a, &b, "missing"), Ordering::Equal);
        assert_eq!(compare_field(&a, &b, "x"), Ordering::Less);
    }
}

//! Field types and the literal values they parse to.
//!
//! Every [`FieldType`] owns three behaviours: the sort-key kind the result
//! sorter uses, how a range query is built from two boundary literals, and
//! how a term query is built from a single literal. Range and term
//! construction both go through [`FieldType::parse_value`], so a field always
//! interprets its literals the same way no matter which query it ends up in.

use std::fmt;
use std::ops::Bound;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use duckdb::types::{TimeUnit, Value as DuckValue};
use serde::{Deserialize, Serialize};

use crate::query::{Query, TextQuery};
use crate::{Config, Error, Result};

/// Default literal that leaves one side of a range unbounded.
pub const OPEN_BOUND: &str = "*";

/// The closed set of value interpretations a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Analyzed text; term queries accept the text sub-grammar and match
    /// case-insensitively. Ranges and sorting compare the raw strings, so
    /// they stay case-sensitive (`[a TO z]` excludes `"The"`).
    Text,
    /// Exact string, matched verbatim.
    String,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Timestamp, ordered as epoch milliseconds.
    Date,
}

/// Case-insensitive lookup table for type names.
const TYPE_NAMES: [(&str, FieldType); 7] = [
    ("text", FieldType::Text),
    ("string", FieldType::String),
    ("int", FieldType::Int),
    ("long", FieldType::Long),
    ("float", FieldType::Float),
    ("double", FieldType::Double),
    ("date", FieldType::Date),
];

/// Sort-key kind used by the result sorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    /// Lexicographic ordering.
    String,
    Int,
    Long,
    Float,
    Double,
}

/// A literal parsed according to a field type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Date(DateTime<Utc>),
}

impl FieldType {
    /// All variants, in declaration order.
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::String,
        FieldType::Int,
        FieldType::Long,
        FieldType::Float,
        FieldType::Double,
        FieldType::Date,
    ];

    /// Canonical lowercase name, as written inside `<...>`.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Date => "date",
        }
    }

    /// Resolve a type name, ignoring ASCII case.
    pub fn lookup(name: &str) -> Option<FieldType> {
        TYPE_NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, field_type)| *field_type)
    }

    pub fn sort_kind(self) -> SortKind {
        match self {
            FieldType::Text | FieldType::String => SortKind::String,
            FieldType::Int => SortKind::Int,
            FieldType::Long | FieldType::Date => SortKind::Long,
            FieldType::Float => SortKind::Float,
            FieldType::Double => SortKind::Double,
        }
    }

    /// Parse a literal according to this type's syntax.
    pub fn parse_value(self, text: &str) -> Result<Value> {
        let invalid = |reason: String| Error::malformed_literal(self, text, reason);

        match self {
            FieldType::Text => {
                if text.trim().is_empty() {
                    return Err(invalid("empty text".to_string()));
                }
                Ok(Value::Str(text.to_string()))
            }
            FieldType::String => Ok(Value::Str(text.to_string())),
            FieldType::Int => text
                .trim()
                .parse::<i32>()
                .map(Value::Int)
                .map_err(|e| invalid(e.to_string())),
            FieldType::Long => text
                .trim()
                .parse::<i64>()
                .map(Value::Long)
                .map_err(|e| invalid(e.to_string())),
            FieldType::Float => {
                let value = text.trim().parse::<f32>().map_err(|e| invalid(e.to_string()))?;
                if value.is_nan() {
                    return Err(invalid("NaN is not orderable".to_string()));
                }
                Ok(Value::Float(value))
            }
            FieldType::Double => {
                let value = text.trim().parse::<f64>().map_err(|e| invalid(e.to_string()))?;
                if value.is_nan() {
                    return Err(invalid("NaN is not orderable".to_string()));
                }
                Ok(Value::Double(value))
            }
            FieldType::Date => parse_date(text)
                .map(Value::Date)
                .ok_or_else(|| invalid("expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS".to_string())),
        }
    }

    /// Build a range query over `field`.
    ///
    /// A bound of `None` or [`OPEN_BOUND`] leaves that side unbounded and
    /// ignores its inclusivity flag. This applies to every type, so a
    /// `string` field cannot use a literal `*` as a bound; configure a
    /// different [`Config::open_bound`] and use
    /// [`to_range_query_with`](Self::to_range_query_with) for that.
    pub fn to_range_query(
        self,
        field: &str,
        lower: Option<&str>,
        upper: Option<&str>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    ) -> Result<Query> {
        self.to_range_query_with(
            field,
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
            &Config::default(),
        )
    }

    /// Build a range query over `field`, using `config.open_bound` as the
    /// unbounded marker.
    pub fn to_range_query_with(
        self,
        field: &str,
        lower: Option<&str>,
        upper: Option<&str>,
        lower_inclusive: bool,
        upper_inclusive: bool,
        config: &Config,
    ) -> Result<Query> {
        let lower = self.parse_bound(lower, lower_inclusive, &config.open_bound)?;
        let upper = self.parse_bound(upper, upper_inclusive, &config.open_bound)?;

        Ok(Query::Range {
            field: field.to_string(),
            lower,
            upper,
        })
    }

    /// Build an equality query over `field`.
    ///
    /// Text fields take a sub-expression (term, phrase, prefix or wildcard)
    /// instead of a plain value.
    pub fn to_term_query(self, field: &str, text: &str) -> Result<Query> {
        match self {
            FieldType::Text => Ok(Query::Text {
                field: field.to_string(),
                text: TextQuery::parse(text)?,
            }),
            _ => Ok(Query::Term {
                field: field.to_string(),
                value: self.parse_value(text)?,
            }),
        }
    }

    fn parse_bound(
        self,
        text: Option<&str>,
        inclusive: bool,
        open_bound: &str,
    ) -> Result<Bound<Value>> {
        match text {
            None => Ok(Bound::Unbounded),
            Some(text) if text == open_bound => Ok(Bound::Unbounded),
            Some(text) => {
                let value = self.parse_value(text)?;
                Ok(if inclusive {
                    Bound::Included(value)
                } else {
                    Bound::Excluded(value)
                })
            }
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FieldType::lookup(s).ok_or_else(|| Error::UnknownType { name: s.to_string() })
    }
}

impl fmt::Display for SortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKind::String => "STRING",
            SortKind::Int => "INT",
            SortKind::Long => "LONG",
            SortKind::Float => "FLOAT",
            SortKind::Double => "DOUBLE",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Convert to a DuckDB parameter value.
    pub fn to_sql_value(&self) -> DuckValue {
        match self {
            Value::Str(s) => DuckValue::Text(s.clone()),
            Value::Int(v) => DuckValue::Int(*v),
            Value::Long(v) => DuckValue::BigInt(*v),
            Value::Float(v) => DuckValue::Float(*v),
            Value::Double(v) => DuckValue::Double(*v),
            Value::Date(dt) => DuckValue::Timestamp(TimeUnit::Millisecond, dt.timestamp_millis()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Date(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

/// Parse a date literal. Naive forms are taken as UTC.
///
/// Accepted: `2024-01-31`, `2024-01-31Z`, `2024-01-31+02:00`,
/// `2024-01-31T10:15:00`, `2024-01-31T10:15:00.250`, and any of the time
/// forms followed by `Z` or an offset. `t` and `z` may be lowercase.
fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim().to_ascii_uppercase();

    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    // Date with a zone but no time of day
    if text.len() > 10 && text.is_char_boundary(10) {
        let (date, zone) = text.split_at(10);
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
            let midnight = format!("{}T00:00:00{}", date, zone);
            if let Ok(dt) = DateTime::parse_from_rfc3339(&midnight) {
                return Some(dt.with_timezone(&Utc));
            }
        }
    }

    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(FieldType::lookup("int"), Some(FieldType::Int));
        assert_eq!(FieldType::lookup("INT"), Some(FieldType::Int));
        assert_eq!(FieldType::lookup("DaTe"), Some(FieldType::Date));
        assert_eq!(FieldType::lookup("number"), None);
        assert_eq!(FieldType::lookup(" int"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for field_type in FieldType::ALL {
            assert_eq!(field_type.name().parse::<FieldType>().unwrap(), field_type);
            assert_eq!(field_type.to_string(), field_type.name());
        }
    }

    #[test]
    fn test_sort_kinds() {
        assert_eq!(FieldType::Text.sort_kind(), SortKind::String);
        assert_eq!(FieldType::String.sort_kind(), SortKind::String);
        assert_eq!(FieldType::Int.sort_kind(), SortKind::Int);
        assert_eq!(FieldType::Long.sort_kind(), SortKind::Long);
        assert_eq!(FieldType::Float.sort_kind(), SortKind::Float);
        assert_eq!(FieldType::Double.sort_kind(), SortKind::Double);
        // Dates sort as epoch millis
        assert_eq!(FieldType::Date.sort_kind(), SortKind::Long);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(FieldType::Int.parse_value("42").unwrap(), Value::Int(42));
        assert_eq!(FieldType::Int.parse_value(" -7 ").unwrap(), Value::Int(-7));
        assert_eq!(
            FieldType::Long.parse_value("9000000000").unwrap(),
            Value::Long(9_000_000_000)
        );
        assert_eq!(FieldType::Float.parse_value("9.99").unwrap(), Value::Float(9.99));
        assert_eq!(FieldType::Double.parse_value("1e3").unwrap(), Value::Double(1000.0));
    }

    #[test]
    fn test_parse_numbers_rejects_garbage() {
        assert!(matches!(
            FieldType::Int.parse_value("abc"),
            Err(Error::MalformedLiteral { field_type: FieldType::Int, .. })
        ));
        // Out of i32 range
        assert!(FieldType::Int.parse_value("9000000000").is_err());
        assert!(FieldType::Long.parse_value("1.5").is_err());
        assert!(FieldType::Float.parse_value("NaN").is_err());
        assert!(FieldType::Double.parse_value("").is_err());
    }

    #[test]
    fn test_parse_dates() {
        assert_eq!(
            FieldType::Date.parse_value("2024-01-31").unwrap(),
            Value::Date(utc(2024, 1, 31, 0, 0, 0))
        );
        assert_eq!(
            FieldType::Date.parse_value("2024-01-31T10:15:00").unwrap(),
            Value::Date(utc(2024, 1, 31, 10, 15, 0))
        );
        assert_eq!(
            FieldType::Date.parse_value("2024-01-31t10:15:00z").unwrap(),
            Value::Date(utc(2024, 1, 31, 10, 15, 0))
        );
        assert_eq!(
            FieldType::Date.parse_value("2024-01-31T12:15:00+02:00").unwrap(),
            Value::Date(utc(2024, 1, 31, 10, 15, 0))
        );
        assert_eq!(
            FieldType::Date.parse_value("2024-01-31+01:00").unwrap(),
            Value::Date(utc(2024, 1, 30, 23, 0, 0))
        );
        assert_eq!(
            FieldType::Date.parse_value("2024-01-31Z").unwrap(),
            Value::Date(utc(2024, 1, 31, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_dates_with_millis() {
        let value = FieldType::Date.parse_value("2024-01-31T10:15:00.250").unwrap();
        match value {
            Value::Date(dt) => assert_eq!(dt.timestamp_millis() % 1000, 250),
            other => panic!("expected date, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_dates_rejects_garbage() {
        assert!(FieldType::Date.parse_value("yesterday").is_err());
        assert!(FieldType::Date.parse_value("2024-13-01").is_err());
        assert!(FieldType::Date.parse_value("2024-01-31T25:00:00").is_err());
    }

    #[test]
    fn test_text_and_string_literals() {
        assert_eq!(
            FieldType::String.parse_value("").unwrap(),
            Value::Str(String::new())
        );
        assert!(FieldType::Text.parse_value("  ").is_err());
        assert_eq!(
            FieldType::Text.parse_value("Hello").unwrap(),
            Value::Str("Hello".to_string())
        );
    }

    #[test]
    fn test_range_query_bounds() {
        let query = FieldType::Int
            .to_range_query("count", Some("1"), Some("10"), true, false)
            .unwrap();
        assert_eq!(
            query,
            Query::Range {
                field: "count".to_string(),
                lower: Bound::Included(Value::Int(1)),
                upper: Bound::Excluded(Value::Int(10)),
            }
        );
    }

    #[test]
    fn test_range_query_open_bounds() {
        let query = FieldType::Double
            .to_range_query("score", Some("*"), None, true, true)
            .unwrap();
        assert_eq!(
            query,
            Query::Range {
                field: "score".to_string(),
                lower: Bound::Unbounded,
                upper: Bound::Unbounded,
            }
        );
    }

    #[test]
    fn test_string_star_is_always_open() {
        let query = FieldType::String
            .to_range_query("sku", Some("*"), Some("AB"), true, true)
            .unwrap();
        assert_eq!(
            query,
            Query::Range {
                field: "sku".to_string(),
                lower: Bound::Unbounded,
                upper: Bound::Included(Value::Str("AB".to_string())),
            }
        );
    }

    #[test]
    fn test_configured_open_bound() {
        let config = Config {
            open_bound: "..".to_string(),
            ..Config::default()
        };

        // '*' becomes an ordinary string literal
        let query = FieldType::String
            .to_range_query_with("sku", Some("*"), Some(".."), true, false, &config)
            .unwrap();
        assert_eq!(
            query,
            Query::Range {
                field: "sku".to_string(),
                lower: Bound::Included(Value::Str("*".to_string())),
                upper: Bound::Unbounded,
            }
        );

        // Numeric types reject the old marker
        assert!(FieldType::Int
            .to_range_query_with("n", Some("*"), None, true, true, &config)
            .is_err());
    }

    #[test]
    fn test_text_range_keeps_raw_strings() {
        let query = FieldType::Text
            .to_range_query("title", Some("A"), Some("M"), true, false)
            .unwrap();
        assert_eq!(
            query,
            Query::Range {
                field: "title".to_string(),
                lower: Bound::Included(Value::Str("A".to_string())),
                upper: Bound::Excluded(Value::Str("M".to_string())),
            }
        );
        assert!(FieldType::Text
            .to_range_query("title", Some(" "), None, true, true)
            .is_err());
    }

    #[test]
    fn test_range_query_rejects_bad_bound() {
        let err = FieldType::Date
            .to_range_query("when", Some("2024-01-01"), Some("soon"), true, true)
            .unwrap_err();
        match err {
            Error::MalformedLiteral { field_type, text, .. } => {
                assert_eq!(field_type, FieldType::Date);
                assert_eq!(text, "soon");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_term_query_per_type() {
        assert_eq!(
            FieldType::Float.to_term_query("price", "9.99").unwrap(),
            Query::Term {
                field: "price".to_string(),
                value: Value::Float(9.99),
            }
        );
        assert_eq!(
            FieldType::String.to_term_query("sku", "AB-1").unwrap(),
            Query::Term {
                field: "sku".to_string(),
                value: Value::Str("AB-1".to_string()),
            }
        );
        assert_eq!(
            FieldType::Text.to_term_query("body", "\"quick fox\"").unwrap(),
            Query::Text {
                field: "body".to_string(),
                text: TextQuery::Phrase(vec!["quick".to_string(), "fox".to_string()]),
            }
        );
        assert!(FieldType::Float.to_term_query("price", "abc").is_err());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(
            Value::Date(utc(2024, 1, 31, 10, 15, 0)).to_string(),
            "2024-01-31T10:15:00.000Z"
        );
    }

    #[test]
    fn test_value_to_sql() {
        assert_eq!(Value::Long(5).to_sql_value(), DuckValue::BigInt(5));
        assert_eq!(
            Value::Date(utc(1970, 1, 1, 0, 0, 1)).to_sql_value(),
            DuckValue::Timestamp(TimeUnit::Millisecond, 1000)
        );
    }
}

//! Sort specifications.
//!
//! A sort string is a comma-separated list of entries. Each entry is a field
//! reference, `<score>` for relevance or `<doc>` for index order, optionally
//! prefixed with `\` to reverse it: `\price<float>,title`.

use std::fmt;

use crate::field::FieldRef;
use crate::query::quote_ident;
use crate::types::{FieldType, SortKind};
use crate::{Config, Error, Result};

const RELEVANCE: &str = "<score>";
const INDEX_ORDER: &str = "<doc>";

/// One ordering criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortSpec {
    /// By relevance score, best first unless reversed.
    Relevance { reverse: bool },
    /// By position in the index.
    IndexOrder { reverse: bool },
    /// By a typed field value, ascending unless reversed.
    Field { field: FieldRef, reverse: bool },
}

impl SortSpec {
    /// Parse a single sort entry.
    pub fn parse_with(entry: &str, config: &Config) -> Result<Self> {
        let entry = entry.trim();
        let (reverse, rest) = match entry.strip_prefix('\\') {
            Some(rest) => (true, rest),
            None => (false, entry),
        };

        match rest {
            "" => Err(Error::MalformedSort {
                spec: entry.to_string(),
            }),
            RELEVANCE => Ok(SortSpec::Relevance { reverse }),
            INDEX_ORDER => Ok(SortSpec::IndexOrder { reverse }),
            _ => Ok(SortSpec::Field {
                field: FieldRef::parse_with(rest, config)?,
                reverse,
            }),
        }
    }

    /// Sort-key kind of a field sort; `None` for relevance and index order.
    pub fn sort_kind(&self) -> Option<SortKind> {
        match self {
            SortSpec::Field { field, .. } => Some(field.sort_kind()),
            SortSpec::Relevance { .. } | SortSpec::IndexOrder { .. } => None,
        }
    }

    pub fn is_reverse(&self) -> bool {
        match self {
            SortSpec::Relevance { reverse }
            | SortSpec::IndexOrder { reverse }
            | SortSpec::Field { reverse, .. } => *reverse,
        }
    }

    /// SQL `ORDER BY` term. Relevance reads a `score` column.
    fn to_sql(&self) -> String {
        let direction = |descending: bool| if descending { "DESC" } else { "ASC" };

        match self {
            SortSpec::Relevance { reverse } => format!("\"score\" {}", direction(!reverse)),
            SortSpec::IndexOrder { reverse } => format!("rowid {}", direction(*reverse)),
            SortSpec::Field { field, reverse } => {
                format!("{} {} NULLS LAST", sort_key_sql(field), direction(*reverse))
            }
        }
    }
}

/// Sort key expression for a field, coerced to its declared type.
///
/// Values that do not convert become NULL and sort last.
fn sort_key_sql(field: &FieldRef) -> String {
    let column = quote_ident(field.name());

    // Dates order by epoch millis
    if field.field_type() == FieldType::Date {
        return format!("epoch_ms(TRY_CAST({} AS TIMESTAMP))", column);
    }

    let sql_type = match field.sort_kind() {
        SortKind::String => "VARCHAR",
        SortKind::Int => "INTEGER",
        SortKind::Long => "BIGINT",
        SortKind::Float => "FLOAT",
        SortKind::Double => "DOUBLE",
    };
    format!("TRY_CAST({} AS {})", column, sql_type)
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reverse() {
            f.write_str("\\")?;
        }
        match self {
            SortSpec::Relevance { .. } => f.write_str(RELEVANCE),
            SortSpec::IndexOrder { .. } => f.write_str(INDEX_ORDER),
            SortSpec::Field { field, .. } => write!(f, "{}", field),
        }
    }
}

/// Parse a comma-separated sort string with the default config.
pub fn parse_sort(spec: &str) -> Result<Vec<SortSpec>> {
    parse_sort_with(spec, &Config::default())
}

/// Parse a comma-separated sort string.
pub fn parse_sort_with(spec: &str, config: &Config) -> Result<Vec<SortSpec>> {
    spec.split(',')
        .map(|entry| {
            SortSpec::parse_with(entry, config).map_err(|e| match e {
                Error::MalformedSort { .. } => Error::MalformedSort {
                    spec: spec.to_string(),
                },
                other => other,
            })
        })
        .collect()
}

/// Render an `ORDER BY` clause, or an empty string for no criteria.
pub fn order_by_sql(specs: &[SortSpec]) -> String {
    if specs.is_empty() {
        return String::new();
    }
    let terms: Vec<String> = specs.iter().map(SortSpec::to_sql).collect();
    format!("ORDER BY {}", terms.join(", "))
}

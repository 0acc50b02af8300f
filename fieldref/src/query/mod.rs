//! Typed queries built from field references.
//!
//! A [`Query`] is the engine-neutral form produced by
//! [`FieldType::to_range_query`](crate::FieldType::to_range_query) and
//! [`FieldType::to_term_query`](crate::FieldType::to_term_query). It lowers to
//! a parameterised DuckDB predicate via [`Query::to_predicate`]; executing
//! that predicate is up to the caller.

mod text;

use std::fmt;
use std::ops::Bound;

use duckdb::types::Value as DuckValue;

use crate::types::Value;

pub use text::TextQuery;

/// A query over a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Exact match on a typed value.
    Term { field: String, value: Value },
    /// Value within (possibly open) bounds.
    Range {
        field: String,
        lower: Bound<Value>,
        upper: Bound<Value>,
    },
    /// Lexical match on a text field.
    Text { field: String, text: TextQuery },
}

/// A SQL boolean expression with `?` placeholders and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub sql: String,
    pub params: Vec<DuckValue>,
}

impl Query {
    /// The field this query targets.
    pub fn field(&self) -> &str {
        match self {
            Query::Term { field, .. } | Query::Range { field, .. } | Query::Text { field, .. } => {
                field
            }
        }
    }

    /// Lower to a DuckDB predicate over a column named after the field.
    pub fn to_predicate(&self) -> Predicate {
        let column = quote_ident(self.field());

        match self {
            Query::Term { value, .. } => Predicate {
                sql: format!("{} = ?", column),
                params: vec![value.to_sql_value()],
            },
            Query::Range { lower, upper, .. } => {
                let mut conditions = Vec::new();
                let mut params = Vec::new();

                match lower {
                    Bound::Included(v) => {
                        conditions.push(format!("{} >= ?", column));
                        params.push(v.to_sql_value());
                    }
                    Bound::Excluded(v) => {
                        conditions.push(format!("{} > ?", column));
                        params.push(v.to_sql_value());
                    }
                    Bound::Unbounded => {}
                }
                match upper {
                    Bound::Included(v) => {
                        conditions.push(format!("{} <= ?", column));
                        params.push(v.to_sql_value());
                    }
                    Bound::Excluded(v) => {
                        conditions.push(format!("{} < ?", column));
                        params.push(v.to_sql_value());
                    }
                    Bound::Unbounded => {}
                }

                // Fully open range still excludes missing values
                if conditions.is_empty() {
                    conditions.push(format!("{} IS NOT NULL", column));
                }

                Predicate {
                    sql: conditions.join(" AND "),
                    params,
                }
            }
            Query::Text { text, .. } => Predicate {
                sql: format!("regexp_matches({}, ?)", column),
                params: vec![DuckValue::Text(text.to_regex())],
            },
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Term { field, value } => write!(f, "{}:{}", field, value),
            Query::Text { field, text } => write!(f, "{}:{}", field, text),
            Query::Range {
                field,
                lower,
                upper,
            } => {
                let (open, low) = match lower {
                    Bound::Included(v) => ('[', v.to_string()),
                    Bound::Excluded(v) => ('{', v.to_string()),
                    Bound::Unbounded => ('[', "*".to_string()),
                };
                let (close, high) = match upper {
                    Bound::Included(v) => (']', v.to_string()),
                    Bound::Excluded(v) => ('}', v.to_string()),
                    Bound::Unbounded => (']', "*".to_string()),
                };
                write!(f, "{}:{}{} TO {}{}", field, open, low, high, close)
            }
        }
    }
}

/// Quote a SQL identifier, doubling embedded quotes.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

//! fieldref: typed field references for full-text search queries.
//!
//! Resolves `name` / `name<type>` field syntax into a [`FieldRef`] that builds
//! range queries, term queries and sort specifications consistent with its
//! declared [`FieldType`].

pub mod config;
pub mod error;
pub mod field;
pub mod query;
pub mod sort;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use field::FieldRef;
pub use query::{Predicate, Query, TextQuery};
pub use sort::{order_by_sql, parse_sort, parse_sort_with, SortSpec};
pub use types::{FieldType, SortKind, Value, OPEN_BOUND};

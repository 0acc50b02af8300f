//! Parser for `name<type>` field references.

use std::fmt;
use std::ops::Bound;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::query::Query;
use crate::types::{FieldType, SortKind};
use crate::{Config, Error, Result};

/// A field name paired with its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldRef {
    name: String,
    field_type: FieldType,
}

impl FieldRef {
    /// Create a reference from parts, validating the name.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.contains('<') {
            return Err(Error::MalformedReference { raw: name });
        }
        Ok(Self { name, field_type })
    }

    /// Parse `name` or `name<type>`, defaulting to text.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_with(raw, &Config::default())
    }

    /// Parse `name` or `name<type>`, defaulting to `config.default_type`.
    pub fn parse_with(raw: &str, config: &Config) -> Result<Self> {
        let (name, type_name) = match split_reference(raw) {
            Some(parts) => parts,
            None => {
                tracing::trace!(raw, "rejected malformed field reference");
                return Err(Error::MalformedReference {
                    raw: raw.to_string(),
                });
            }
        };

        let field_type = match type_name {
            None => config.default_type,
            Some(type_name) => FieldType::lookup(type_name).ok_or_else(|| {
                tracing::trace!(raw, type_name, "rejected unknown field type");
                Error::UnknownType {
                    name: type_name.to_string(),
                }
            })?,
        };

        tracing::debug!(field = name, %field_type, "resolved field reference");

        Ok(Self {
            name: name.to_string(),
            field_type,
        })
    }

    /// The underlying index field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn sort_kind(&self) -> SortKind {
        self.field_type.sort_kind()
    }

    /// Build a range query over this field. See [`FieldType::to_range_query`].
    pub fn to_range_query(
        &self,
        lower: Option<&str>,
        upper: Option<&str>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    ) -> Result<Query> {
        self.field_type
            .to_range_query(&self.name, lower, upper, lower_inclusive, upper_inclusive)
    }

    /// Build a range query using `config.open_bound` as the unbounded marker.
    pub fn to_range_query_with(
        &self,
        lower: Option<&str>,
        upper: Option<&str>,
        lower_inclusive: bool,
        upper_inclusive: bool,
        config: &Config,
    ) -> Result<Query> {
        self.field_type.to_range_query_with(
            &self.name,
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
            config,
        )
    }

    /// Build a range query from `std` bounds over raw literals.
    pub fn to_range_query_bounds(&self, lower: Bound<&str>, upper: Bound<&str>) -> Result<Query> {
        let (lower, lower_inclusive) = split_bound(lower);
        let (upper, upper_inclusive) = split_bound(upper);
        self.to_range_query(lower, upper, lower_inclusive, upper_inclusive)
    }

    /// Build a term query over this field. See [`FieldType::to_term_query`].
    pub fn to_term_query(&self, text: &str) -> Result<Query> {
        self.field_type.to_term_query(&self.name, text)
    }
}

/// Split `raw` into name and optional type name.
///
/// Returns `None` unless the whole input is `name` or `name<type>` with both
/// parts non-empty.
fn split_reference(raw: &str) -> Option<(&str, Option<&str>)> {
    let Some(open) = raw.find('<') else {
        return (!raw.is_empty()).then_some((raw, None));
    };

    let name = &raw[..open];
    let suffix = &raw[open + 1..];
    let close = suffix.find('>')?;

    // Nothing may follow the closing '>'
    if name.is_empty() || close == 0 || close + 1 != suffix.len() {
        return None;
    }

    Some((name, Some(&suffix[..close])))
}

fn split_bound(bound: Bound<&str>) -> (Option<&str>, bool) {
    match bound {
        Bound::Included(text) => (Some(text), true),
        Bound::Excluded(text) => (Some(text), false),
        Bound::Unbounded => (None, true),
    }
}

impl fmt::Display for FieldRef {
    /// Canonical `name<type>` form; re-parses to an equal reference.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.name, self.field_type)
    }
}

impl FromStr for FieldRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FieldRef::parse(s)
    }
}

impl TryFrom<String> for FieldRef {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        FieldRef::parse(&value)
    }
}

impl From<FieldRef> for String {
    fn from(field: FieldRef) -> Self {
        field.to_string()
    }
}

//! Error types for field reference operations.

use crate::types::FieldType;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Field '{raw}' not recognized")]
    MalformedReference { raw: String },

    #[error("Unrecognized type '{name}'")]
    UnknownType { name: String },

    #[error("Cannot parse '{text}' as {field_type}: {reason}")]
    MalformedLiteral {
        field_type: FieldType,
        text: String,
        reason: String,
    },

    #[error("Sort '{spec}' not recognized")]
    MalformedSort { spec: String },

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed_literal(
        field_type: FieldType,
        text: &str,
        reason: impl Into<String>,
    ) -> Self {
        Error::MalformedLiteral {
            field_type,
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

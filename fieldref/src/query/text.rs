//! Sub-expressions accepted by term queries on text fields.

use std::fmt;

use regex::Regex;

use crate::types::FieldType;
use crate::{Error, Result};

/// A lexical match against an analyzed text field.
///
/// Matching is case-insensitive and anchored on word boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextQuery {
    /// A single word: `fox`
    Term(String),
    /// Consecutive words: `"quick brown fox"`
    Phrase(Vec<String>),
    /// Words starting with a stem: `qui*`
    Prefix(String),
    /// `*` matches any run of word characters, `?` exactly one: `f?x*`
    Wildcard(String),
}

impl TextQuery {
    /// Parse a text sub-expression.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::malformed_literal(FieldType::Text, text, reason);
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Err(invalid("empty text"));
        }

        if let Some(inner) = trimmed
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            let mut words: Vec<String> = inner.split_whitespace().map(str::to_string).collect();
            return match words.len() {
                0 => Err(invalid("empty phrase")),
                1 => Ok(TextQuery::Term(words.remove(0))),
                _ => Ok(TextQuery::Phrase(words)),
            };
        }

        if trimmed.starts_with('"') || trimmed.ends_with('"') {
            return Err(invalid("unbalanced quote"));
        }

        // Unquoted words are matched as a phrase
        if trimmed.contains(char::is_whitespace) {
            return Ok(TextQuery::Phrase(
                trimmed.split_whitespace().map(str::to_string).collect(),
            ));
        }

        if let Some(stem) = trimmed.strip_suffix('*') {
            if !stem.is_empty() && !stem.contains(['*', '?']) {
                return Ok(TextQuery::Prefix(stem.to_string()));
            }
        }

        if trimmed.contains(['*', '?']) {
            return Ok(TextQuery::Wildcard(trimmed.to_string()));
        }

        Ok(TextQuery::Term(trimmed.to_string()))
    }

    /// The regular expression this query matches with.
    ///
    /// Word and space classes are spelled out as Unicode properties: `\w`,
    /// `\W` and `\s` are Unicode-aware in the `regex` crate but ASCII-only in
    /// DuckDB's RE2, and both engines must agree.
    pub fn to_regex(&self) -> String {
        const WORD: &str = r"[\p{L}\p{M}\p{N}_]";
        const START: &str = r"(?:^|[^\p{L}\p{M}\p{N}_])";
        const END: &str = r"(?:[^\p{L}\p{M}\p{N}_]|$)";
        const SPACES: &str = r"[\t\n\x0B\f\r\x{85}\p{Z}]+";

        match self {
            TextQuery::Term(word) => format!("(?i){}{}{}", START, regex::escape(word), END),
            TextQuery::Phrase(words) => {
                let body: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
                format!("(?i){}{}{}", START, body.join(SPACES), END)
            }
            TextQuery::Prefix(stem) => format!("(?i){}{}", START, regex::escape(stem)),
            TextQuery::Wildcard(pattern) => {
                let mut body = String::new();
                for c in pattern.chars() {
                    match c {
                        '*' => {
                            body.push_str(WORD);
                            body.push('*');
                        }
                        '?' => body.push_str(WORD),
                        c => body.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
                    }
                }
                format!("(?i){}{}{}", START, body, END)
            }
        }
    }

    /// Check whether a stored text value matches.
    pub fn matches(&self, value: &str) -> Result<bool> {
        let re = Regex::new(&self.to_regex())?;
        Ok(re.is_match(value))
    }
}

impl fmt::Display for TextQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextQuery::Term(word) => f.write_str(word),
            TextQuery::Phrase(words) => write!(f, "\"{}\"", words.join(" ")),
            TextQuery::Prefix(stem) => write!(f, "{}*", stem),
            TextQuery::Wildcard(pattern) => f.write_str(pattern),
        }
    }
}

//! Configuration for field reference parsing.
//!
//! Resolution order for the default field type:
//! 1. Value set on the [`Config`] passed to [`FieldRef::parse_with`](crate::FieldRef::parse_with)
//! 2. `FIELDREF_DEFAULT_TYPE` environment variable (via [`Config::from_env`])
//! 3. Default: `text`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{FieldType, OPEN_BOUND};
use crate::{Error, Result};

/// Environment variable overriding the default field type.
pub const DEFAULT_TYPE_VAR: &str = "FIELDREF_DEFAULT_TYPE";

/// Field reference configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Type given to references without a `<type>` suffix.
    #[serde(default = "default_type")]
    pub default_type: FieldType,

    /// Range bound literal meaning "unbounded".
    #[serde(default = "default_open_bound")]
    pub open_bound: String,
}

fn default_type() -> FieldType {
    FieldType::Text
}

fn default_open_bound() -> String {
    OPEN_BOUND.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_type: default_type(),
            open_bound: default_open_bound(),
        }
    }
}

impl Config {
    /// Defaults, with `FIELDREF_DEFAULT_TYPE` applied if set.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(name) = lookup(DEFAULT_TYPE_VAR) {
            config.default_type = FieldType::lookup(&name).ok_or_else(|| {
                Error::Config(format!("{} names unknown type '{}'", DEFAULT_TYPE_VAR, name))
            })?;
        }
        Ok(config)
    }

    /// Load config from a TOML file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save config to a TOML file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

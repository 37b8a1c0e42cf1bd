//! Lock keys and cloud config documents.
//!
//! A cloud config is identified by the director that serves it and its
//! config name. The pair, joined as `{director}_{name}`, is the unit of
//! serialization: every read-modify-write against the same pair runs under
//! one lock.

use crate::error::{LockError, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;

/// Composite identifier of a serializable update stream.
///
/// Equality covers both parts, not just the joined identity: `("a_b", "c")`
/// and `("a", "b_c")` share the identity `a_b_c` but address different
/// documents, so they lock independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LockKey {
    director: String,
    config_name: String,
    identity: String,
}

impl LockKey {
    /// Build a key from a director name and a cloud config name.
    ///
    /// Both parts are required; blank values are rejected with
    /// `LockError::InvalidArgument` before any state is touched.
    pub fn new(director: &str, config_name: &str) -> Result<Self> {
        let director = director.trim();
        let config_name = config_name.trim();

        if director.is_empty() {
            return Err(LockError::InvalidArgument(
                "director name required for this operation".to_string(),
            ));
        }
        if config_name.is_empty() {
            return Err(LockError::InvalidArgument(
                "cloud config name required for this operation".to_string(),
            ));
        }

        Ok(Self {
            identity: format!("{}_{}", director, config_name),
            director: director.to_string(),
            config_name: config_name.to_string(),
        })
    }

    /// The director part of the key.
    pub fn director(&self) -> &str {
        &self.director
    }

    /// The cloud config name part of the key.
    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    /// The joined identity, e.g. `dirA_cfgX`.
    pub fn as_str(&self) -> &str {
        &self.identity
    }
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity)
    }
}

/// A cloud config document.
///
/// The content is kept as a YAML value so that fields this crate knows
/// nothing about survive a read-modify-write untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CloudConfig(Value);

impl Default for CloudConfig {
    fn default() -> Self {
        Self(Value::Mapping(Mapping::new()))
    }
}

impl From<Value> for CloudConfig {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl CloudConfig {
    /// Parse a document from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            LockError::InvalidArgument(format!("failed to parse cloud config YAML: {}", e))
        })
    }

    /// Serialize the document to YAML text.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.0).map_err(|e| {
            LockError::InvalidArgument(format!("failed to serialize cloud config: {}", e))
        })
    }

    /// Borrow the underlying YAML value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Consume the document, returning the underlying YAML value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Look up a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Merge `other` into this document.
    ///
    /// Top-level fields of `other` overwrite fields of the same name. If
    /// either side is not a mapping the whole document is replaced.
    pub fn merge(&mut self, other: CloudConfig) {
        match (&mut self.0, other.0) {
            (Value::Mapping(ours), Value::Mapping(theirs)) => {
                for (field, value) in theirs {
                    ours.insert(field, value);
                }
            }
            (ours, theirs) => *ours = theirs,
        }
    }
}

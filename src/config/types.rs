//! Configuration types and defaults.
//!
//! This module defines enums, nested sections and default value functions
//! used by the Config struct.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How lock tokens are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenStrategy {
    /// Random UUID v4 per acquisition (default).
    #[default]
    Uuid,
    /// Deterministic counter, useful for reproducible runs.
    Sequential,
}

impl TokenStrategy {
    /// Parse a token strategy from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "uuid" => Some(Self::Uuid),
            "sequential" => Some(Self::Sequential),
            _ => None,
        }
    }
}

/// A director whose cloud configs may be updated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// Director name, the first half of every lock key it serves.
    pub name: String,

    /// Reject writes to this director's cloud configs.
    pub read_only: bool,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl DirectorConfig {
    /// A writable director with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

// Default value functions for serde
pub(crate) fn default_store_dir() -> String {
    "cloud-configs".to_string()
}
pub(crate) fn default_lock_stale_minutes() -> u32 {
    30
}
pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

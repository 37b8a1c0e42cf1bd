//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::{DirectorConfig, TokenStrategy};
use crate::error::{LockError, Result};
use crate::store::{SequentialTokenGenerator, TokenGenerator, UuidTokenGenerator};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path` if it exists, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document; treat it as all defaults.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| LockError::Config(format!("failed to parse config YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| LockError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `lock_stale_minutes` must be positive
    /// - `cycle_timeout_secs`, when present, must be positive
    /// - director names must be non-empty, unpadded and unique
    pub fn validate(&self) -> Result<()> {
        if self.lock_stale_minutes == 0 {
            return Err(LockError::Config(
                "config validation failed: lock_stale_minutes must be greater than 0".to_string(),
            ));
        }

        if self.cycle_timeout_secs == Some(0) {
            return Err(LockError::Config(
                "config validation failed: cycle_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for director in &self.directors {
            if director.name.trim().is_empty() {
                return Err(LockError::Config(
                    "config validation failed: director names must be non-empty".to_string(),
                ));
            }
            if director.name != director.name.trim() {
                return Err(LockError::Config(format!(
                    "config validation failed: director name '{}' has surrounding whitespace",
                    director.name
                )));
            }
            if !seen.insert(director.name.as_str()) {
                return Err(LockError::Config(format!(
                    "config validation failed: director '{}' is listed more than once",
                    director.name
                )));
            }
        }

        Ok(())
    }

    /// Look up a configured director by name.
    pub fn director(&self, name: &str) -> Option<&DirectorConfig> {
        self.directors.iter().find(|d| d.name == name)
    }

    /// Cycle timeout as a duration, if configured.
    pub fn cycle_timeout(&self) -> Option<Duration> {
        self.cycle_timeout_secs.map(Duration::from_secs)
    }

    /// Build the token generator selected by `token_strategy`.
    pub fn token_generator(&self) -> Arc<dyn TokenGenerator> {
        match self.token_strategy {
            TokenStrategy::Uuid => Arc::new(UuidTokenGenerator),
            TokenStrategy::Sequential => Arc::new(SequentialTokenGenerator::new()),
        }
    }
}

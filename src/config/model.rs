//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for `ccl` and the locks it builds.
///
/// This struct represents the contents of `ccl.yml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Store settings
    // =========================================================================
    /// Directory holding one sub-directory of cloud configs per director.
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Directors whose cloud configs may be read or updated.
    pub directors: Vec<DirectorConfig>,

    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Minutes after which a held lock is reported as stale.
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: u32,

    /// Upper bound in seconds for one fetch/transform/write cycle.
    /// Absent means cycles may run forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_timeout_secs: Option<u64>,

    /// How lock tokens are generated.
    pub token_strategy: TokenStrategy,

    // =========================================================================
    // Logging settings
    // =========================================================================
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            directors: Vec::new(),
            lock_stale_minutes: default_lock_stale_minutes(),
            cycle_timeout_secs: None,
            token_strategy: TokenStrategy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

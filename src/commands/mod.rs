//! Command implementations for `ccl`.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command works against the file-backed store
//! described by the loaded configuration.

mod show;
mod update;


use crate::cli::Command;
use crate::config::Config;
use crate::document::CloudConfig;
use crate::error::{LockError, Result};
use crate::locks::KeyedUpdateLock;
use crate::store::FileStore;
use std::path::Path;
use std::sync::Arc;

pub use show::cmd_show;
pub use update::{cmd_merge, cmd_put};

/// Dispatch a command to its implementation.
pub async fn dispatch(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Show(args) => cmd_show(args, config).await,
        Command::Merge(args) => cmd_merge(args, config).await,
        Command::Put(args) => cmd_put(args, config).await,
    }
}

/// File store for the configured directory and directors.
fn open_store(config: &Config) -> Arc<FileStore> {
    Arc::new(FileStore::new(&config.store_dir, config.directors.clone()))
}

/// Update lock over the configured file store.
fn open_lock(config: &Config) -> KeyedUpdateLock {
    KeyedUpdateLock::from_config(open_store(config), config)
}

/// Read a YAML document given on the command line.
fn read_document(path: &Path) -> Result<CloudConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        LockError::InvalidArgument(format!("failed to read '{}': {}", path.display(), e))
    })?;

    CloudConfig::from_yaml(&content).map_err(|e| {
        LockError::InvalidArgument(format!("'{}' is not a valid document: {}", path.display(), e))
    })
}

//! Directory-backed document store.
//!
//! Layout: `<root>/<director>/<config_name>.yml`. Only configured directors
//! are reachable, mirroring a deployment where every director needs its own
//! entry before the broker may talk to it.

use super::atomic::atomic_write;
use super::{DocumentStore, WriteAck};
use crate::config::DirectorConfig;
use crate::document::{CloudConfig, LockKey};
use crate::error::{LockError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Stores each cloud config as a YAML file.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    directors: Vec<DirectorConfig>,
    version: AtomicU64,
}

impl FileStore {
    /// Create a store rooted at `root` serving the given directors.
    pub fn new(root: impl Into<PathBuf>, directors: Vec<DirectorConfig>) -> Self {
        Self {
            root: root.into(),
            directors,
            version: AtomicU64::new(0),
        }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding the document for `key`.
    ///
    /// Both key parts must be a single plain path component, so a key can
    /// never address a file outside its director's directory.
    pub fn document_path(&self, key: &LockKey) -> Result<PathBuf> {
        let director = path_component("director name", key.director())?;
        let name = path_component("cloud config name", key.config_name())?;
        Ok(self.root.join(director).join(format!("{}.yml", name)))
    }

    fn director(&self, key: &LockKey) -> Result<&DirectorConfig> {
        self.directors
            .iter()
            .find(|d| d.name == key.director())
            .ok_or_else(|| {
                LockError::NotFound(format!("director '{}' is not configured", key.director()))
            })
    }
}

fn path_component<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == value => Ok(value),
        _ => Err(LockError::InvalidArgument(format!(
            "{} '{}' must be a single path component",
            what, value
        ))),
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn fetch(&self, key: &LockKey) -> Result<Option<CloudConfig>> {
        self.director(key)?;
        let path = self.document_path(key)?;

        let content = tokio::task::spawn_blocking(move || match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LockError::Transport(format!(
                "failed to read '{}': {}",
                path.display(),
                e
            ))),
        })
        .await
        .map_err(|e| LockError::Transport(format!("read task failed: {}", e)))??;

        match content {
            Some(yaml) => CloudConfig::from_yaml(&yaml).map(Some).map_err(|e| {
                LockError::Transport(format!("stored cloud config for '{}' is corrupt: {}", key, e))
            }),
            None => Ok(None),
        }
    }

    async fn write(&self, key: &LockKey, document: &CloudConfig) -> Result<WriteAck> {
        let director = self.director(key)?;
        if director.read_only {
            return Err(LockError::Unauthorized(format!(
                "director '{}' does not accept cloud config updates",
                director.name
            )));
        }

        let path = self.document_path(key)?;
        let yaml = document
            .to_yaml()
            .map_err(|e| LockError::Transport(e.to_string()))?;

        tokio::task::spawn_blocking(move || atomic_write(&path, yaml.as_bytes()))
            .await
            .map_err(|e| LockError::Transport(format!("write task failed: {}", e)))??;

        Ok(WriteAck {
            key: key.clone(),
            version: self.version.fetch_add(1, Ordering::SeqCst) + 1,
            written_at: Utc::now(),
        })
    }
}

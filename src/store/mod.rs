//! Collaborators consumed by the update lock.
//!
//! The lock never talks to a director directly. It reads and writes cloud
//! configs through a [`DocumentStore`] and stamps every acquisition with a
//! token from a [`TokenGenerator`]. Token validation is the lock's own
//! responsibility; stores know nothing about tokens.
//!
//! Two stores ship with the crate:
//! - [`MemoryStore`]: in-process, keeps every version and an operation log
//! - [`FileStore`]: one YAML file per director and config name

mod atomic;
mod file;
mod memory;
mod token;

#[cfg(test)]
mod tests;

use crate::document::{CloudConfig, LockKey};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub use file::FileStore;
pub use memory::{MemoryStore, StoreOp};
pub use token::{LockToken, SequentialTokenGenerator, TokenGenerator, UuidTokenGenerator};

/// Acknowledgement returned by a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAck {
    /// Key the document was written under.
    pub key: LockKey,
    /// Store-assigned version of the written document.
    pub version: u64,
    /// When the store accepted the write.
    pub written_at: DateTime<Utc>,
}

/// Remote holder of cloud config documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the latest version of the document, `None` if none exists yet.
    async fn fetch(&self, key: &LockKey) -> Result<Option<CloudConfig>>;

    /// Persist a new version of the document.
    async fn write(&self, key: &LockKey, document: &CloudConfig) -> Result<WriteAck>;
}

/// Shared document store for injection into the lock.
pub type SharedDocumentStore = Arc<dyn DocumentStore>;

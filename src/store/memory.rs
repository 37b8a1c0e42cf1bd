//! In-process document store.

use super::{DocumentStore, WriteAck};
use crate::document::{CloudConfig, LockKey};
use crate::error::{LockError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// One call observed by a [`MemoryStore`], in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    /// `fetch` was called for the key.
    Fetch(LockKey),
    /// `write` was called for the key with the document.
    Write(LockKey, CloudConfig),
}

#[derive(Debug, Default)]
struct Inner {
    versions: HashMap<LockKey, Vec<CloudConfig>>,
    ops: Vec<StoreOp>,
    fail_next_fetch: Option<LockError>,
    fail_next_write: Option<LockError>,
}

/// Document store held entirely in memory.
///
/// Every written version is kept, and every call is appended to an
/// operation log so callers can see exactly what reached the store and in
/// which order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    latency: Option<Duration>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that sleeps for `latency` inside every call.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            inner: Mutex::default(),
            latency: Some(latency),
        }
    }

    /// Seed a document without recording an operation.
    pub fn insert(&self, key: &LockKey, document: CloudConfig) {
        self.inner()
            .versions
            .entry(key.clone())
            .or_default()
            .push(document);
    }

    /// Latest version stored under `key`.
    pub fn latest(&self, key: &LockKey) -> Option<CloudConfig> {
        self.inner()
            .versions
            .get(key)
            .and_then(|versions| versions.last().cloned())
    }

    /// Number of versions stored under `key`, seeded ones included.
    pub fn version_count(&self, key: &LockKey) -> usize {
        self.inner().versions.get(key).map_or(0, Vec::len)
    }

    /// Snapshot of the operation log.
    pub fn ops(&self) -> Vec<StoreOp> {
        self.inner().ops.clone()
    }

    /// Make the next `fetch` fail with `error`.
    pub fn fail_next_fetch(&self, error: LockError) {
        self.inner().fail_next_fetch = Some(error);
    }

    /// Make the next `write` fail with `error`.
    pub fn fail_next_write(&self, error: LockError) {
        self.inner().fail_next_write = Some(error);
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch(&self, key: &LockKey) -> Result<Option<CloudConfig>> {
        let injected = {
            let mut inner = self.inner();
            inner.ops.push(StoreOp::Fetch(key.clone()));
            inner.fail_next_fetch.take()
        };
        self.delay().await;

        if let Some(err) = injected {
            return Err(err);
        }
        Ok(self.latest(key))
    }

    async fn write(&self, key: &LockKey, document: &CloudConfig) -> Result<WriteAck> {
        let injected = {
            let mut inner = self.inner();
            inner
                .ops
                .push(StoreOp::Write(key.clone(), document.clone()));
            inner.fail_next_write.take()
        };
        self.delay().await;

        if let Some(err) = injected {
            return Err(err);
        }

        let mut inner = self.inner();
        let versions = inner.versions.entry(key.clone()).or_default();
        versions.push(document.clone());
        Ok(WriteAck {
            key: key.clone(),
            version: versions.len() as u64,
            written_at: Utc::now(),
        })
    }
}

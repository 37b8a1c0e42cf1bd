//! Read-modify-write of cloud configs under a per-key lock.

use super::registry::{Acquisition, LockRegistry};
use super::types::{LockInfo, LockOptions};
use crate::config::Config;
use crate::document::{CloudConfig, LockKey};
use crate::error::{LockError, Result};
use crate::store::{SharedDocumentStore, UuidTokenGenerator};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Serializes updates to each cloud config.
///
/// For a given [`LockKey`] at most one fetch/transform/write cycle is in
/// flight. Callers arriving while the key is locked queue up and run in
/// arrival order once the holder succeeds. Keys are fully independent.
///
/// A failed cycle releases the lock but does not start the next queued
/// caller; the queue moves again on the next successful cycle for the key
/// or on [`clear_lock`](Self::clear_lock).
#[derive(Clone)]
pub struct KeyedUpdateLock {
    store: SharedDocumentStore,
    registry: Arc<LockRegistry>,
    options: LockOptions,
}

impl fmt::Debug for KeyedUpdateLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedUpdateLock")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl KeyedUpdateLock {
    /// Lock with UUID tokens and default options.
    pub fn new(store: SharedDocumentStore) -> Self {
        Self::with_registry(
            store,
            Arc::new(LockRegistry::new(Arc::new(UuidTokenGenerator))),
            LockOptions::default(),
        )
    }

    /// Lock over an explicitly provided registry.
    pub fn with_registry(
        store: SharedDocumentStore,
        registry: Arc<LockRegistry>,
        options: LockOptions,
    ) -> Self {
        Self {
            store,
            registry,
            options,
        }
    }

    /// Lock configured from `config`: token strategy, timeout, stale threshold.
    pub fn from_config(store: SharedDocumentStore, config: &Config) -> Self {
        Self::with_registry(
            store,
            Arc::new(LockRegistry::new(config.token_generator())),
            LockOptions {
                cycle_timeout: config.cycle_timeout(),
                lock_stale_minutes: config.lock_stale_minutes,
            },
        )
    }

    /// The registry backing this lock.
    pub fn registry(&self) -> &Arc<LockRegistry> {
        &self.registry
    }

    /// Options this lock was built with.
    pub fn options(&self) -> LockOptions {
        self.options
    }

    /// Build the key from its parts and run [`with_lock`](Self::with_lock).
    pub async fn fetch_and_update<F, Fut>(
        &self,
        director: &str,
        config_name: &str,
        transform: F,
    ) -> Result<CloudConfig>
    where
        F: FnOnce(Option<CloudConfig>) -> Fut,
        Fut: Future<Output = Result<CloudConfig>>,
    {
        let key = LockKey::new(director, config_name)?;
        self.with_lock(&key, transform).await
    }

    /// Fetch the document for `key`, transform it, and write the result back,
    /// all under the key's lock.
    ///
    /// `transform` receives `None` when no document exists yet. The value
    /// returned is the transform's output, not the store's acknowledgement.
    ///
    /// Errors from the store come back unchanged. `LockError::LockNotHeld`
    /// means the lock was cleared or taken over while the transform ran; the
    /// write was not attempted.
    pub async fn with_lock<F, Fut>(&self, key: &LockKey, transform: F) -> Result<CloudConfig>
    where
        F: FnOnce(Option<CloudConfig>) -> Fut,
        Fut: Future<Output = Result<CloudConfig>>,
    {
        let mut guard = match self.registry.acquire_or_enqueue(key) {
            Acquisition::Acquired(guard) => guard,
            Acquisition::Queued(turn) => turn.await.map_err(|_| {
                LockError::Cancelled(format!(
                    "queued update for '{}' was dropped before its turn",
                    key
                ))
            })?,
        };
        guard.start();

        let cycle = async {
            let current = self.store.fetch(guard.key()).await?;
            let updated = transform(current).await?;
            guard.verify()?;
            let ack = self.store.write(guard.key(), &updated).await?;
            debug!(key = %ack.key, version = ack.version, token = %guard.token(), "cloud config updated");
            Ok::<_, LockError>(updated)
        };

        let outcome = match self.options.cycle_timeout {
            Some(limit) => tokio::time::timeout(limit, cycle)
                .await
                .unwrap_or_else(|_| {
                    Err(LockError::Timeout(format!(
                        "update of '{}' did not finish within {:?}",
                        key, limit
                    )))
                }),
            None => cycle.await,
        };

        match outcome {
            Ok(updated) => {
                guard.finish();
                Ok(updated)
            }
            Err(err) => {
                guard.fail();
                Err(err)
            }
        }
    }

    /// Snapshot of every key this lock has seen.
    pub fn list_locks(&self) -> Vec<LockInfo> {
        self.registry.list(self.options.lock_stale_minutes)
    }

    /// Snapshot of one key, `None` if the key was never used.
    pub fn lock_info(&self, key: &LockKey) -> Option<LockInfo> {
        self.registry
            .lock_info(key, self.options.lock_stale_minutes)
    }

    /// Force-release `key` and start its next queued caller.
    ///
    /// Returns the state the key was in before clearing.
    pub fn clear_lock(&self, key: &LockKey) -> Result<LockInfo> {
        self.registry
            .clear(key, self.options.lock_stale_minutes)
    }
}

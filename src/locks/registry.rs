//! Per-key lock state and FIFO hand-off.
//!
//! The registry maps every [`LockKey`] ever seen to a [`LockState`]. Entries
//! are created lazily and reused across lock cycles; they are never removed.
//! The map sits behind a synchronous mutex that is only held for the short
//! bookkeeping sections below, never across an `.await`.

use super::guard::CycleGuard;
use super::metadata::LockMetadata;
use super::types::LockInfo;
use crate::document::LockKey;
use crate::error::{LockError, Result};
use crate::store::{LockToken, TokenGenerator};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// A caller blocked on a locked key.
///
/// The caller's transform stays in the caller's own future. When its turn
/// comes the lock is re-taken on its behalf and the resulting guard is sent
/// through `grant`.
struct PendingRequest {
    grant: oneshot::Sender<CycleGuard>,
    queued_at: DateTime<Utc>,
}

#[derive(Default)]
struct LockState {
    locked: bool,
    token: Option<LockToken>,
    metadata: Option<LockMetadata>,
    waiters: VecDeque<PendingRequest>,
}

impl LockState {
    fn take(&mut self, token: LockToken) -> LockMetadata {
        let metadata = LockMetadata::new(token.clone());
        self.locked = true;
        self.token = Some(token);
        self.metadata = Some(metadata.clone());
        metadata
    }

    fn unlock(&mut self) {
        self.locked = false;
        self.token = None;
        self.metadata = None;
    }

    fn is_held_by(&self, token: &LockToken) -> bool {
        self.locked && self.token.as_ref() == Some(token)
    }

    fn live_waiters(&self) -> usize {
        self.waiters.iter().filter(|w| !w.grant.is_closed()).count()
    }

    fn info(&self, key: &LockKey, stale_minutes: u32) -> LockInfo {
        LockInfo {
            key: key.clone(),
            locked: self.locked,
            metadata: self.metadata.clone(),
            waiters: self.live_waiters(),
            is_stale: self
                .metadata
                .as_ref()
                .is_some_and(|m| self.locked && m.is_stale(stale_minutes)),
        }
    }
}

/// Outcome of trying to take a key's lock.
pub(crate) enum Acquisition {
    /// The lock was free and is now held by the returned guard.
    Acquired(CycleGuard),
    /// The lock is held; the guard arrives on this channel when it is our turn.
    Queued(oneshot::Receiver<CycleGuard>),
}

/// Registry of lock states, one per key.
pub struct LockRegistry {
    locks: Mutex<HashMap<LockKey, LockState>>,
    tokens: Arc<dyn TokenGenerator>,
}

impl fmt::Debug for LockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockRegistry")
            .field("keys", &self.key_count())
            .finish_non_exhaustive()
    }
}

impl LockRegistry {
    /// Create an empty registry drawing tokens from `tokens`.
    pub fn new(tokens: Arc<dyn TokenGenerator>) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            tokens,
        }
    }

    /// Number of keys seen so far.
    pub fn key_count(&self) -> usize {
        self.locks().len()
    }

    /// Snapshot of one key's state, `None` if the key was never used.
    pub fn lock_info(&self, key: &LockKey, stale_minutes: u32) -> Option<LockInfo> {
        self.locks()
            .get(key)
            .map(|state| state.info(key, stale_minutes))
    }

    /// Snapshot of every key's state, sorted by key.
    pub fn list(&self, stale_minutes: u32) -> Vec<LockInfo> {
        let mut infos: Vec<LockInfo> = self
            .locks()
            .iter()
            .map(|(key, state)| state.info(key, stale_minutes))
            .collect();
        infos.sort_by(|a, b| a.key.cmp(&b.key));
        infos
    }

    /// Take the lock for `key`, or join the back of its queue.
    pub(crate) fn acquire_or_enqueue(self: &Arc<Self>, key: &LockKey) -> Acquisition {
        let mut locks = self.locks();
        let state = locks.entry(key.clone()).or_default();

        if state.locked {
            let (grant, turn) = oneshot::channel();
            state.waiters.push_back(PendingRequest {
                grant,
                queued_at: Utc::now(),
            });
            info!(
                key = %key,
                queued = state.waiters.len(),
                "cloud config currently locked, queueing update request"
            );
            return Acquisition::Queued(turn);
        }

        let metadata = state.take(self.tokens.next_token());
        debug!(key = %key, token = %metadata.token, "lock acquired");
        Acquisition::Acquired(CycleGuard::new(Arc::clone(self), key.clone(), metadata))
    }

    /// Check that `token` still owns `key`, right before a write.
    pub(crate) fn verify(&self, key: &LockKey, token: &LockToken) -> Result<()> {
        let locks = self.locks();
        let state = locks.get(key);

        match state {
            Some(state) if state.is_held_by(token) => Ok(()),
            Some(state) if state.locked => {
                let current = state
                    .token
                    .as_ref()
                    .map_or_else(|| "<none>".to_string(), ToString::to_string);
                error!(key = %key, presented = %token, current = %current, "lock token mismatch, refusing to update cloud config");
                Err(LockError::LockNotHeld(format!(
                    "lock token {} does not match the lock token {} for '{}'",
                    token, current, key
                )))
            }
            _ => {
                error!(key = %key, presented = %token, "lock not acquired, refusing to update cloud config");
                Err(LockError::LockNotHeld(format!(
                    "updating '{}' without acquiring the lock is not permitted",
                    key
                )))
            }
        }
    }

    /// Release `key` if `token` still owns it. Waiters are left queued.
    ///
    /// Returns whether anything was released.
    pub(crate) fn release(&self, key: &LockKey, token: &LockToken) -> bool {
        let mut locks = self.locks();
        match locks.get_mut(key) {
            Some(state) if state.is_held_by(token) => {
                state.unlock();
                debug!(key = %key, waiters = state.waiters.len(), "lock released without hand-off");
                true
            }
            _ => false,
        }
    }

    /// Release `key` if `token` still owns it and hand it to the next waiter.
    ///
    /// Waiters whose caller has gone away are skipped; the loop stops at the
    /// first waiter that accepts its guard or when the queue is empty.
    pub(crate) fn release_and_drain(self: &Arc<Self>, key: &LockKey, token: &LockToken) {
        let mut token = token.clone();

        loop {
            let (pending, metadata) = {
                let mut locks = self.locks();
                let Some(state) = locks.get_mut(key) else {
                    return;
                };
                if !state.is_held_by(&token) {
                    return;
                }

                state.unlock();
                let Some(pending) = state.waiters.pop_front() else {
                    debug!(key = %key, "lock released, no queued requests");
                    return;
                };

                info!(
                    key = %key,
                    remaining = state.waiters.len(),
                    waited_ms = (Utc::now() - pending.queued_at).num_milliseconds(),
                    "processing queued update request"
                );
                let metadata = state.take(self.tokens.next_token());
                (pending, metadata)
            };

            let next_token = metadata.token.clone();
            let guard = CycleGuard::new(Arc::clone(self), key.clone(), metadata);
            match pending.grant.send(guard) {
                Ok(()) => return,
                Err(mut guard) => {
                    guard.disarm();
                    warn!(key = %key, "queued update request was abandoned, skipping");
                    token = next_token;
                }
            }
        }
    }

    /// Force-release a held key and hand it to the next waiter.
    ///
    /// A cycle still running under the cleared token will have its write
    /// rejected with `LockError::LockNotHeld`.
    pub fn clear(self: &Arc<Self>, key: &LockKey, stale_minutes: u32) -> Result<LockInfo> {
        let (info, token) = {
            let locks = self.locks();
            let state = locks.get(key).ok_or_else(|| {
                LockError::InvalidArgument(format!("lock '{}' does not exist", key))
            })?;
            let token = match (&state.token, state.locked) {
                (Some(token), true) => token.clone(),
                _ => {
                    return Err(LockError::InvalidArgument(format!(
                        "lock '{}' is not held",
                        key
                    )));
                }
            };
            (state.info(key, stale_minutes), token)
        };

        warn!(key = %key, token = %token, "clearing lock");
        self.release_and_drain(key, &token);
        Ok(info)
    }

    /// Overwrite the current token of a held key, simulating a stolen lock.
    #[cfg(test)]
    pub(crate) fn replace_token(&self, key: &LockKey, token: LockToken) {
        if let Some(state) = self.locks().get_mut(key) {
            if let Some(metadata) = state.metadata.as_mut() {
                metadata.token = token.clone();
            }
            state.token = Some(token);
        }
    }

    fn locks(&self) -> MutexGuard<'_, HashMap<LockKey, LockState>> {
        self.locks.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

//! Lock information structures.

use super::metadata::LockMetadata;
use crate::document::LockKey;
use std::time::Duration;

/// Snapshot of one key's lock state.
#[derive(Debug, Clone)]
pub struct LockInfo {
    /// The lock key.
    pub key: LockKey,

    /// Whether a holder currently owns the key.
    pub locked: bool,

    /// Holder metadata, present while locked.
    pub metadata: Option<LockMetadata>,

    /// Callers still waiting for their turn.
    pub waiters: usize,

    /// Whether the lock has been held longer than the stale threshold.
    pub is_stale: bool,
}

impl std::fmt::Display for LockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.metadata {
            Some(meta) if self.locked => write!(
                f,
                "{} (owner: {}, age: {}, waiters: {}{})",
                self.key,
                meta.owner,
                meta.age_string(),
                self.waiters,
                if self.is_stale { ", STALE" } else { "" }
            ),
            _ => write!(f, "{} (unlocked, waiters: {})", self.key, self.waiters),
        }
    }
}

/// Tuning for a [`KeyedUpdateLock`](super::KeyedUpdateLock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOptions {
    /// Upper bound for one fetch/transform/write cycle; `None` waits forever.
    pub cycle_timeout: Option<Duration>,

    /// Minutes after which a held lock is reported as stale.
    pub lock_stale_minutes: u32,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            cycle_timeout: None,
            lock_stale_minutes: 30,
        }
    }
}

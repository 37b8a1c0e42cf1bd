//! RAII guard for one lock cycle.

use super::metadata::LockMetadata;
use super::registry::LockRegistry;
use crate::document::LockKey;
use crate::error::Result;
use crate::store::LockToken;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Lock taken for this cycle, fetch not started yet.
    Granted,
    /// Fetch, transform or write in flight.
    Running,
    /// Released explicitly, or never owned anything.
    Finished,
}

/// Ownership of a key's lock for the duration of one cycle.
///
/// When dropped without an explicit `finish` or `fail`:
/// - a granted but unstarted guard hands the lock to the next waiter
/// - a running guard releases the lock and leaves the queue alone, the same
///   as a failed cycle
pub(crate) struct CycleGuard {
    registry: Arc<LockRegistry>,
    key: LockKey,
    metadata: LockMetadata,
    phase: Phase,
}

impl fmt::Debug for CycleGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CycleGuard")
            .field("key", &self.key)
            .field("token", &self.metadata.token)
            .field("phase", &self.phase)
            .finish()
    }
}

impl CycleGuard {
    pub(super) fn new(registry: Arc<LockRegistry>, key: LockKey, metadata: LockMetadata) -> Self {
        Self {
            registry,
            key,
            metadata,
            phase: Phase::Granted,
        }
    }

    pub(crate) fn key(&self) -> &LockKey {
        &self.key
    }

    pub(crate) fn token(&self) -> &LockToken {
        &self.metadata.token
    }

    /// Mark the cycle as started.
    pub(crate) fn start(&mut self) {
        self.phase = Phase::Running;
    }

    /// Confirm this guard's token still owns the key.
    pub(crate) fn verify(&self) -> Result<()> {
        self.registry.verify(&self.key, self.token())
    }

    /// Successful cycle: release and hand the lock to the next waiter.
    pub(crate) fn finish(mut self) {
        self.phase = Phase::Finished;
        self.registry.release_and_drain(&self.key, &self.metadata.token);
    }

    /// Failed cycle: release and leave queued waiters where they are.
    pub(crate) fn fail(mut self) {
        self.phase = Phase::Finished;
        self.registry.release(&self.key, &self.metadata.token);
    }

    /// Forget the guard without touching the registry.
    pub(super) fn disarm(&mut self) {
        self.phase = Phase::Finished;
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        match self.phase {
            Phase::Granted => {
                self.registry
                    .release_and_drain(&self.key, &self.metadata.token);
            }
            Phase::Running => {
                warn!(key = %self.key, token = %self.metadata.token, "lock cycle abandoned mid-flight, releasing lock");
                self.registry.release(&self.key, &self.metadata.token);
            }
            Phase::Finished => {}
        }
    }
}

//! Lock tokens and their generators.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Opaque value proving continued ownership of a lock across an await.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockToken(String);

impl LockToken {
    /// Wrap an externally produced token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces a fresh token for every lock acquisition.
pub trait TokenGenerator: Send + Sync {
    /// Return a token not handed out before by this generator.
    fn next_token(&self) -> LockToken;
}

/// Random UUID v4 tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTokenGenerator;

impl TokenGenerator for UuidTokenGenerator {
    fn next_token(&self) -> LockToken {
        LockToken(Uuid::new_v4().to_string())
    }
}

/// Deterministic `token-1`, `token-2`, ... tokens.
#[derive(Debug, Default)]
pub struct SequentialTokenGenerator {
    counter: AtomicU64,
}

impl SequentialTokenGenerator {
    /// Create a generator whose first token is `token-1`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenGenerator for SequentialTokenGenerator {
    fn next_token(&self) -> LockToken {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        LockToken(format!("token-{}", n))
    }
}

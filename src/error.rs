//! Error types for cloud config locking.
//!
//! Uses thiserror for derive macros. Messages are meant to be shown to the
//! caller as-is, so they name the lock key or director involved.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for lock cycles and their collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    /// Caller misuse: empty director or config name, unknown lock key.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A write presented a stale or missing lock token.
    #[error("lock not held: {0}")]
    LockNotHeld(String),

    /// The document store refused access.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The document store could not be reached or failed mid-operation.
    #[error("transport error: {0}")]
    Transport(String),

    /// The document store has no such director or resource.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller-supplied transform failed.
    #[error("transform failed: {0}")]
    Transform(String),

    /// The configured cycle timeout elapsed before the write completed.
    #[error("timed out: {0}")]
    Timeout(String),

    /// A queued request lost its hand-off channel before its turn came.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Configuration could not be read, parsed or validated.
    #[error("configuration error: {0}")]
    Config(String),
}

impl LockError {
    /// Whether the error originated in the document store.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            LockError::Unauthorized(_) | LockError::Transport(_) | LockError::NotFound(_)
        )
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LockError::InvalidArgument(_) | LockError::Transform(_) => exit_codes::USER_ERROR,
            LockError::Unauthorized(_) | LockError::Transport(_) | LockError::NotFound(_) => {
                exit_codes::UPSTREAM_FAILURE
            }
            LockError::LockNotHeld(_) | LockError::Timeout(_) | LockError::Cancelled(_) => {
                exit_codes::LOCK_FAILURE
            }
            LockError::Config(_) => exit_codes::CONFIG_ERROR,
        }
    }
}

/// Result type alias for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;

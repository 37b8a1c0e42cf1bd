//! Per-key update locking for cloud configs.
//!
//! Every cloud config is a shared document that several callers may want to
//! modify. Updates to the same config are serialized by a lock keyed on
//! `{director}_{config_name}`:
//!
//! - The first caller takes the lock, fetches the document, runs its
//!   transform and writes the result back.
//! - Callers arriving meanwhile queue up. On a successful write the lock is
//!   handed to the oldest queued caller, which then runs its own cycle.
//! - A failed cycle releases the lock without starting the next caller.
//!
//! # Lock Tokens
//!
//! Each acquisition gets a fresh token. The token is checked right before
//! the write, so a cycle whose lock was cleared or taken over in the
//! meantime fails with `LockError::LockNotHeld` instead of overwriting
//! somebody else's update.
//!
//! # RAII Guards
//!
//! Lock ownership travels in a guard. Dropping a cycle's future mid-flight
//! releases the lock the same way a failure does.

mod guard;
mod manager;
mod metadata;
mod registry;
mod types;


// Re-export public API
pub use manager::KeyedUpdateLock;
pub use metadata::LockMetadata;
pub use registry::LockRegistry;
pub use types::{LockInfo, LockOptions};

//! Exit code constants for the `ccl` binary.
//!
//! - 0: Success
//! - 1: User error (bad arguments, failed transform)
//! - 2: Document store failure (unauthorized, transport, not found)
//! - 3: Lock failure (stale token, timeout, cancelled hand-off)
//! - 4: Configuration error

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or a transform that refused the document.
pub const USER_ERROR: i32 = 1;

/// The document store rejected or failed the request.
pub const UPSTREAM_FAILURE: i32 = 2;

/// Lock lifecycle failure.
pub const LOCK_FAILURE: i32 = 3;

/// Configuration could not be loaded.
pub const CONFIG_ERROR: i32 = 4;

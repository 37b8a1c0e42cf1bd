//! Lock metadata recorded for every acquisition.

use crate::store::LockToken;
use chrono::{DateTime, Duration, Utc};

/// Who holds a lock, since when, and under which token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockMetadata {
    /// Token the holder must present when writing.
    pub token: LockToken,

    /// Owner of the lock (e.g., `user@HOST`).
    pub owner: String,

    /// Process ID of the lock holder.
    pub pid: u32,

    /// When the lock was taken. Diagnostic only.
    pub created_at: DateTime<Utc>,
}

impl LockMetadata {
    /// Create new lock metadata with the current timestamp.
    pub fn new(token: LockToken) -> Self {
        Self {
            token,
            owner: get_owner_string(),
            pid: std::process::id(),
            created_at: Utc::now(),
        }
    }

    /// Calculate the age of the lock.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let seconds = age.num_seconds();
        let minutes = age.num_minutes();
        let hours = age.num_hours();

        if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds % 60)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Check if the lock is stale based on the given threshold in minutes.
    pub fn is_stale(&self, stale_minutes: u32) -> bool {
        self.age().num_minutes() > i64::from(stale_minutes)
    }
}

/// Get the owner string for lock metadata.
fn get_owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

//! Per-key update locking for shared cloud config documents.
//!
//! A cloud config is one YAML document per director and config name that
//! many service instances need to modify. [`locks::KeyedUpdateLock`] runs
//! each read-modify-write cycle under a lock keyed by that pair, queues
//! concurrent callers, and serves them in arrival order.
//!
//! ```no_run
//! use cloud_config_lock::document::CloudConfig;
//! use cloud_config_lock::locks::KeyedUpdateLock;
//! use cloud_config_lock::store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn run() -> cloud_config_lock::error::Result<()> {
//! let lock = KeyedUpdateLock::new(Arc::new(MemoryStore::new()));
//! let updated = lock
//!     .fetch_and_update("bosh-a", "default", |current| async move {
//!         let mut document = current.unwrap_or_default();
//!         document.merge(CloudConfig::from_yaml("networks: []")?);
//!         Ok(document)
//!     })
//!     .await?;
//! assert!(updated.get("networks").is_some());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod exit_codes;
pub mod locks;
pub mod logging;
pub mod store;

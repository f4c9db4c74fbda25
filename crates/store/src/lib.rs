//! Disk layer for slugstore
//!
//! This crate handles everything that touches the filesystem:
//!
//! - StoreConfig: injected paths and lock retry budget (no module-level globals)
//! - StoreLock: exclusive-create sentinel file serializing mutations
//! - BlogStore: fail-open reads, atomic whole-file writes, lock-guarded
//!   read-modify-write updates
//! - Counter operations: view increments and like toggles
//!
//! ## Key principle
//!
//! Readers never take the lock. They can still never observe a torn file
//! because every write goes through a temp file and an atomic rename.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod counters;
pub mod lock;
pub mod store;

pub use config::StoreConfig;
pub use store::BlogStore;

//! Error types for the record store
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Two conditions that might look like errors are deliberately not modeled
//! here:
//!
//! - An absent slug is a normal result value (`Ok(None)` from updates), not
//!   an error. Callers translate it to their own not-found response.
//! - A malformed store file is handled fail-open on read: it degrades to an
//!   empty record list with a warning-level log entry rather than failing
//!   every caller.

use std::io;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error types for the record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error (file creation, write, rename, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error while encoding the record array for a write
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Mutation lock could not be acquired within the retry budget
    #[error("lock not acquired after {attempts} attempts (held by pid {holder})", holder = held_by.as_deref().unwrap_or("unknown"))]
    LockTimeout {
        /// Number of acquisition attempts made before giving up
        attempts: u32,
        /// Pid recorded in the lock file by the current holder, if readable
        held_by: Option<String>,
    },

    /// A mutator produced a record that violates store invariants
    #[error("Record invariant violated: {0}")]
    RecordInvariant(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialize(e.to_string())
    }
}

//! Mutation lock
//!
//! Serializes store mutations with an exclusive-create sentinel file, which
//! also works across OS processes sharing the filesystem. The file's content
//! is the holder's pid, recorded for diagnostics only; there is no stale-lock
//! detection.
//!
//! Acquisition retries with a cooperatively yielding delay so that other
//! requests on the same runtime keep being served while one waits. Release
//! happens in `Drop`, so the lock is released on every exit path, including
//! a panicking mutator.

use std::io;
use std::path::PathBuf;
use std::process;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::sleep;
use tracing::{debug, warn};

use slugstore_core::{Result, StoreError};

use crate::config::StoreConfig;

/// RAII guard over the lock sentinel file
///
/// Dropping the guard deletes the file. Deletion failures are logged and
/// swallowed: failing to release must never mask the outcome of the mutation
/// that already completed.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    /// Acquire the mutation lock, retrying up to the configured budget
    ///
    /// Each attempt creates the lock file in fail-if-exists mode. If another
    /// mutation holds the lock, the task sleeps for `lock_retry_delay` and
    /// tries again. After `max_lock_attempts` failures the whole operation
    /// fails with [`StoreError::LockTimeout`] carrying the holder's pid when
    /// the lock file is readable.
    pub async fn acquire(config: &StoreConfig) -> Result<Self> {
        for attempt in 1..=config.max_lock_attempts {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&config.lock_path)
                .await
            {
                Ok(mut file) => {
                    // Guard constructed before the pid write: if the write
                    // fails, Drop still removes the half-initialized file.
                    let guard = Self {
                        path: config.lock_path.clone(),
                    };
                    file.write_all(process::id().to_string().as_bytes())
                        .await?;
                    debug!(
                        path = %guard.path.display(),
                        attempt,
                        "Mutation lock acquired"
                    );
                    return Ok(guard);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    sleep(config.lock_retry_delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        let held_by = std::fs::read_to_string(&config.lock_path)
            .ok()
            .map(|pid| pid.trim().to_string());
        Err(StoreError::LockTimeout {
            attempts: config.max_lock_attempts,
            held_by,
        })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove lock file on release"
            );
        }
    }
}

//! Store configuration
//!
//! All paths and lock tuning are injected here rather than read from
//! module-level globals, so a process can host several independent stores
//! (and tests can point each case at its own temp directory).

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of lock acquisition attempts before giving up
pub const DEFAULT_MAX_LOCK_ATTEMPTS: u32 = 50;

/// Default delay between lock acquisition attempts
pub const DEFAULT_LOCK_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Configuration for a [`BlogStore`](crate::store::BlogStore)
///
/// # Example
/// ```ignore
/// let config = StoreConfig::for_store_path("data/blogs.json")
///     .with_max_lock_attempts(10)
///     .with_lock_retry_delay(Duration::from_millis(5));
/// let store = BlogStore::new(config);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the JSON store file (a JSON array of records)
    pub store_path: PathBuf,
    /// Path of the lock sentinel file
    pub lock_path: PathBuf,
    /// Maximum lock acquisition attempts before reporting `LockTimeout`
    pub max_lock_attempts: u32,
    /// Delay between lock acquisition attempts (cooperatively yielding)
    pub lock_retry_delay: Duration,
}

impl StoreConfig {
    /// Create a config with explicit store and lock paths
    pub fn new(store_path: impl Into<PathBuf>, lock_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            lock_path: lock_path.into(),
            max_lock_attempts: DEFAULT_MAX_LOCK_ATTEMPTS,
            lock_retry_delay: DEFAULT_LOCK_RETRY_DELAY,
        }
    }

    /// Create a config from the store path alone
    ///
    /// The lock file becomes a dot-prefixed sibling of the store file:
    /// `data/blogs.json` locks via `data/.blogs.json.lock`.
    pub fn for_store_path(store_path: impl Into<PathBuf>) -> Self {
        let store_path = store_path.into();
        let lock_path = derive_lock_path(&store_path);
        Self::new(store_path, lock_path)
    }

    /// Set the maximum number of lock acquisition attempts
    pub fn with_max_lock_attempts(mut self, max_lock_attempts: u32) -> Self {
        self.max_lock_attempts = max_lock_attempts;
        self
    }

    /// Set the delay between lock acquisition attempts
    pub fn with_lock_retry_delay(mut self, lock_retry_delay: Duration) -> Self {
        self.lock_retry_delay = lock_retry_delay;
        self
    }
}

fn derive_lock_path(store_path: &Path) -> PathBuf {
    let file_name = store_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    store_path.with_file_name(format!(".{file_name}.lock"))
}

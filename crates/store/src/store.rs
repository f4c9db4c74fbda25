//! The file-backed record store
//!
//! A single JSON array of records at a fixed path, with three access modes:
//!
//! - **Fail-open reads**: a missing, unreadable, or corrupt store file
//!   degrades to an empty record list instead of failing the caller.
//!   Corruption is still visible to operators through a warning-level log
//!   entry, distinct from the debug entry an absent file produces.
//! - **Atomic whole-file writes**: temp file + fsync + rename, so lock-free
//!   readers never observe a half-written file.
//! - **Lock-guarded read-modify-write**: `update_by_slug` holds the mutation
//!   lock for the entire cycle, which serializes updates across tasks and
//!   across processes sharing the filesystem.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use slugstore_core::{BlogRecord, Result, StoreError};

use crate::config::StoreConfig;
use crate::lock::StoreLock;

/// Slug-addressed record store over a single JSON file
#[derive(Debug)]
pub struct BlogStore {
    config: StoreConfig,
}

impl BlogStore {
    /// Create a store over the given configuration
    ///
    /// The store file itself is created externally (seed step); the store
    /// only reads and overwrites it.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// The configuration this store was built with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read the full record sequence
    ///
    /// Fail-open: any failure to read or parse yields an empty sequence so
    /// that absent data degrades to "nothing found" rather than an error on
    /// every caller. Does not take the mutation lock.
    pub async fn read_all(&self) -> Vec<BlogRecord> {
        let bytes = match fs::read(&self.config.store_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(
                    path = %self.config.store_path.display(),
                    "Store file absent, treating as empty"
                );
                return Vec::new();
            }
            Err(e) => {
                warn!(
                    path = %self.config.store_path.display(),
                    error = %e,
                    "Store file unreadable, treating as empty"
                );
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                // Distinct from the absent-file case: repeated occurrences
                // here mean silent data loss, not a genuinely empty store.
                warn!(
                    path = %self.config.store_path.display(),
                    error = %e,
                    "Store file is not valid JSON, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Find one record by slug (lock-free read)
    pub async fn get_by_slug(&self, slug: &str) -> Option<BlogRecord> {
        self.read_all().await.into_iter().find(|r| r.slug == slug)
    }

    /// Overwrite the store file with the full record sequence
    ///
    /// Uses temp file + rename:
    /// 1. Write the serialized array to `<store>.tmp`
    /// 2. Sync the temp file
    /// 3. Rename temp to final (atomic on POSIX)
    ///
    /// If any step fails, the temp file is cleaned up and the previous store
    /// content stays in place.
    pub async fn write_all(&self, records: &[BlogRecord]) -> Result<()> {
        let temp_path = self.temp_path();

        // Clean up stale temp file if exists (from a previous failed attempt)
        if temp_path.exists() {
            warn!(path = %temp_path.display(), "Removing stale temp file");
            let _ = fs::remove_file(&temp_path).await;
        }

        let data = serde_json::to_vec_pretty(records)?;

        let result = self.write_temp(&temp_path, &data).await;
        if let Err(e) = result {
            warn!(
                temp_path = %temp_path.display(),
                error = %e,
                "Write failed, cleaning up temp file"
            );
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &self.config.store_path).await {
            warn!(
                temp_path = %temp_path.display(),
                error = %e,
                "Rename failed, cleaning up temp file"
            );
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(
            path = %self.config.store_path.display(),
            records = records.len(),
            bytes = data.len(),
            "Store written"
        );
        Ok(())
    }

    /// Apply a mutator to the record with the given slug
    ///
    /// Holds the mutation lock for the entire read-modify-write cycle. The
    /// mutator must be pure and total: it receives the current record and
    /// returns the updated one, without side effects. Its output is validated
    /// before the write (see below); the write only happens after the mutator
    /// returns, so a panicking mutator leaves the store unmodified, with the
    /// lock released during unwind.
    ///
    /// Returns `Ok(None)` when no record carries the slug; the file is left
    /// byte-for-byte unchanged in that case. Otherwise returns the updated
    /// record, replaced at its original position in the sequence.
    ///
    /// # Errors
    ///
    /// - [`StoreError::LockTimeout`] if the lock retry budget is exhausted
    /// - [`StoreError::RecordInvariant`] if the mutator emptied the slug or
    ///   changed it to one already used by another record
    /// - [`StoreError::Io`] / [`StoreError::Serialize`] from the write
    pub async fn update_by_slug<F>(&self, slug: &str, mutator: F) -> Result<Option<BlogRecord>>
    where
        F: FnOnce(BlogRecord) -> BlogRecord,
    {
        let _lock = StoreLock::acquire(&self.config).await?;

        let mut records = self.read_all().await;
        let Some(pos) = records.iter().position(|r| r.slug == slug) else {
            return Ok(None);
        };

        let updated = mutator(records[pos].clone());
        validate_update(&records, pos, &updated)?;

        records[pos] = updated.clone();
        self.write_all(&records).await?;
        Ok(Some(updated))
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .config
            .store_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        self.config
            .store_path
            .with_file_name(format!("{file_name}.tmp"))
    }

    async fn write_temp(&self, temp_path: &Path, data: &[u8]) -> Result<()> {
        let mut file = fs::File::create(temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        Ok(())
    }
}

/// Check a mutator's output against store invariants before it is written
///
/// The mutator is trusted with every field except the key: the slug must stay
/// unique within the sequence and must not be emptied, otherwise later
/// lookups would silently miss or alias records.
fn validate_update(records: &[BlogRecord], pos: usize, updated: &BlogRecord) -> Result<()> {
    if updated.slug.is_empty() {
        return Err(StoreError::RecordInvariant(
            "mutator emptied the record's slug".to_string(),
        ));
    }
    let collides = records
        .iter()
        .enumerate()
        .any(|(i, r)| i != pos && r.slug == updated.slug);
    if collides {
        return Err(StoreError::RecordInvariant(format!(
            "mutator changed slug to \"{}\", which another record already uses",
            updated.slug
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> StoreConfig {
        StoreConfig::for_store_path(dir.path().join("blogs.json"))
            .with_max_lock_attempts(5)
            .with_lock_retry_delay(Duration::from_millis(1))
    }

    fn seed(config: &StoreConfig, records: serde_json::Value) {
        std::fs::write(&config.store_path, records.to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_read_all_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = BlogStore::new(test_config(&dir));
        assert!(store.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_read_all_invalid_json_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        std::fs::write(&config.store_path, "{ not json ]").unwrap();
        let store = BlogStore::new(config);
        assert!(store.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = BlogStore::new(test_config(&dir));

        let records = vec![
            BlogRecord::new("first").with_field("title", json!("First")),
            BlogRecord::new("second"),
        ];
        store.write_all(&records).await.unwrap();

        let read_back = store.read_all().await;
        assert_eq!(read_back, records);
    }

    #[tokio::test]
    async fn test_write_all_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = BlogStore::new(test_config(&dir));
        store.write_all(&[BlogRecord::new("only")]).await.unwrap();

        let residue: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(residue.is_empty(), "temp residue: {residue:?}");
    }

    #[tokio::test]
    async fn test_write_all_replaces_stale_temp_file() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        std::fs::write(dir.path().join("blogs.json.tmp"), "stale").unwrap();

        let store = BlogStore::new(config);
        store.write_all(&[BlogRecord::new("only")]).await.unwrap();
        assert!(!dir.path().join("blogs.json.tmp").exists());
        assert_eq!(store.read_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_by_slug_replaces_in_place() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        seed(
            &config,
            json!([
                {"slug": "a", "views": 1, "likes": 0},
                {"slug": "b", "views": 2, "likes": 0},
                {"slug": "c", "views": 3, "likes": 0},
            ]),
        );
        let store = BlogStore::new(config);

        let updated = store
            .update_by_slug("b", |mut r| {
                r.views = 99;
                r
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.views, 99);

        let slugs: Vec<_> = store.read_all().await.into_iter().map(|r| r.slug).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_update_missing_slug_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        seed(&config, json!([{"slug": "a", "views": 5, "likes": 2}]));
        let before = std::fs::read(&config.store_path).unwrap();

        let store = BlogStore::new(config);
        let result = store
            .update_by_slug("missing", |r| r)
            .await
            .unwrap();
        assert!(result.is_none());

        let after = std::fs::read(store.config().store_path.as_path()).unwrap();
        assert_eq!(before, after, "file changed on a not-found update");
        assert!(!store.config().lock_path.exists());
    }

    #[tokio::test]
    async fn test_update_preserves_passthrough_fields() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        seed(
            &config,
            json!([{
                "slug": "a",
                "views": 0,
                "likes": 0,
                "title": "A Post",
                "tags": ["one", "two"],
            }]),
        );
        let store = BlogStore::new(config);

        store
            .update_by_slug("a", |mut r| {
                r.views += 1;
                r
            })
            .await
            .unwrap()
            .unwrap();

        let record = store.get_by_slug("a").await.unwrap();
        assert_eq!(record.views, 1);
        assert_eq!(record.extra.get("title"), Some(&json!("A Post")));
        assert_eq!(record.extra.get("tags"), Some(&json!(["one", "two"])));
    }

    #[tokio::test]
    async fn test_mutator_slug_collision_rejected() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        seed(
            &config,
            json!([{"slug": "a", "views": 0, "likes": 0}, {"slug": "b", "views": 0, "likes": 0}]),
        );
        let before = std::fs::read(&config.store_path).unwrap();
        let store = BlogStore::new(config);

        let err = store
            .update_by_slug("a", |mut r| {
                r.slug = "b".to_string();
                r
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RecordInvariant(_)));

        let after = std::fs::read(store.config().store_path.as_path()).unwrap();
        assert_eq!(before, after);
        assert!(!store.config().lock_path.exists());
    }

    #[tokio::test]
    async fn test_mutator_emptied_slug_rejected() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        seed(&config, json!([{"slug": "a", "views": 0, "likes": 0}]));
        let store = BlogStore::new(config);

        let err = store
            .update_by_slug("a", |mut r| {
                r.slug.clear();
                r
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RecordInvariant(_)));
        assert!(!store.config().lock_path.exists());
    }

    #[tokio::test]
    async fn test_mutator_may_rename_to_unused_slug() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        seed(&config, json!([{"slug": "old-name", "views": 0, "likes": 0}]));
        let store = BlogStore::new(config);

        let updated = store
            .update_by_slug("old-name", |mut r| {
                r.slug = "new-name".to_string();
                r
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.slug, "new-name");
        assert!(store.get_by_slug("new-name").await.is_some());
        assert!(store.get_by_slug("old-name").await.is_none());
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        seed(
            &config,
            json!([{"slug": "a", "views": 7, "likes": 1}, {"slug": "b", "views": 0, "likes": 0}]),
        );
        let store = BlogStore::new(config);

        assert_eq!(store.get_by_slug("a").await.unwrap().views, 7);
        assert!(store.get_by_slug("zzz").await.is_none());
    }
}

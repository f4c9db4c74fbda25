//! Slugstore - file-locked atomic JSON record store for blog content
//!
//! A single-file, lock-guarded, slug-addressed record store over a JSON
//! array of blog records. It backs the view and like counters of a content
//! site as a fallback to the primary database: low write volume, one global
//! mutation lock, whole-file atomic rewrites.
//!
//! # Quick Start
//!
//! ```ignore
//! use slugstore::{BlogStore, StoreConfig};
//!
//! let store = BlogStore::new(StoreConfig::for_store_path("data/blogs.json"));
//!
//! // Fetch a post (lock-free read)
//! let post = store.get_by_slug("hello-world").await;
//!
//! // Count a page view; None means the slug is unknown
//! let views = store.increment_views("hello-world").await?;
//!
//! // Register or withdraw a like; the count never goes below zero
//! let likes = store.toggle_like("hello-world", true).await?;
//! ```
//!
//! # Guarantees
//!
//! - Updates on any slug are serialized by an exclusive-create lock file,
//!   in-process and across processes sharing the filesystem.
//! - Every write replaces the store file atomically (temp + rename), so
//!   lock-free readers never observe a torn file.
//! - Reads fail open: a missing or corrupt store file reads as empty, with
//!   a warning logged for the corrupt case.

// Re-export the public API from the member crates
pub use slugstore_core::{BlogRecord, Result, StoreError};
pub use slugstore_store::{BlogStore, StoreConfig};

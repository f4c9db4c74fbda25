//! Counter operations
//!
//! The store exists to serve two mutations from the site's request handlers:
//! bumping a post's view counter and toggling a like. Both are thin wrappers
//! over [`BlogStore::update_by_slug`] that return only the changed counter,
//! so handlers never leak unrelated record fields into responses.

use slugstore_core::Result;

use crate::store::BlogStore;

impl BlogStore {
    /// Increment the view counter of the record with the given slug
    ///
    /// Returns the new view count, or `None` when the slug is absent.
    pub async fn increment_views(&self, slug: &str) -> Result<Option<u64>> {
        let updated = self
            .update_by_slug(slug, |mut r| {
                r.views = r.views.saturating_add(1);
                r
            })
            .await?;
        Ok(updated.map(|r| r.views))
    }

    /// Adjust the like counter of the record with the given slug
    ///
    /// The caller decides the sign via `increment`; the store enforces the
    /// floor at zero regardless of how many decrements arrive. Returns the
    /// new like count, or `None` when the slug is absent.
    pub async fn toggle_like(&self, slug: &str, increment: bool) -> Result<Option<u64>> {
        let updated = self
            .update_by_slug(slug, move |mut r| {
                r.likes = if increment {
                    r.likes.saturating_add(1)
                } else {
                    r.likes.saturating_sub(1)
                };
                r
            })
            .await?;
        Ok(updated.map(|r| r.likes))
    }
}
